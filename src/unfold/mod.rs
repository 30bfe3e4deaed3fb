//! Flattening: assigns every tree node the rigid transform that lays its
//! flange into the z = 0 plane.
//!
//! The root flange maps onto z = 0 directly. Every other flange first
//! relaxes its parent bend (rotates back about the bend axis, then shifts
//! outward to make room for the developed bend strip) and then applies its
//! parent's transform. Transforms and flat lengths are computed into
//! scratch storage and committed only when every bend succeeds, so a
//! failed run leaves the tree untouched.

pub mod allowance;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::adapter::SolidQuery;
use crate::error::{Result, TopologyError};
use crate::geometry::surface::Plane;
use crate::math::{rigid_3d, Matrix4};
use crate::tree::{BendEdge, SheetTree};

/// Material parameters shared by every bend without an override.
#[derive(Debug, Clone, Copy)]
pub struct SheetParams {
    thickness: f64,
    k_factor: f64,
}

impl SheetParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the thickness is not positive or the k-factor
    /// falls outside `[0, 1]`.
    pub fn new(thickness: f64, k_factor: f64) -> Result<Self> {
        allowance::check_thickness(thickness)?;
        allowance::check_k_factor(k_factor)?;
        Ok(Self {
            thickness,
            k_factor,
        })
    }

    /// Sheet thickness.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Neutral-fiber position within the thickness.
    #[must_use]
    pub fn k_factor(&self) -> f64 {
        self.k_factor
    }
}

impl Default for SheetParams {
    /// Unit thickness with the neutral fiber at 40% of the material.
    fn default() -> Self {
        Self {
            thickness: 1.0,
            k_factor: 0.4,
        }
    }
}

/// Computes flattening transforms and per-bend flat lengths for a tree.
#[derive(Debug)]
pub struct Unfold {
    params: SheetParams,
}

impl Unfold {
    /// Creates the operation with the given material parameters.
    #[must_use]
    pub fn new(params: SheetParams) -> Self {
        Self { params }
    }

    /// Unfolds `tree` in place.
    ///
    /// Walks nodes in discovery order so parents are finished before
    /// their children. Runs are independent: every transform and flat
    /// length is recomputed from the folded geometry, so repeating the
    /// operation yields the same tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a bend has a zero or negative radius, if
    /// material parameters (including overrides) are invalid, or if the
    /// tree references missing entities. On error the tree is unchanged.
    pub fn execute(&self, query: &SolidQuery<'_>, tree: &mut SheetTree) -> Result<()> {
        let root = tree.root();
        let root_face = tree.node(root)?.face;
        let root_plane = query.plane(root_face)?;

        let mut transforms: SecondaryMap<_, Matrix4> = SecondaryMap::new();
        let mut flat_lengths: SecondaryMap<_, f64> = SecondaryMap::new();
        transforms.insert(root, plane_to_flat(root_plane));

        for &node_id in tree.nodes_in_order() {
            let parent_transform = *transforms
                .get(node_id)
                .ok_or_else(|| TopologyError::EntityNotFound("bend node".into()))?;
            for &edge_id in &tree.node(node_id)?.children {
                let edge = tree.edge(edge_id)?;
                let length = self.developed_length(edge)?;
                transforms.insert(edge.child, parent_transform * relax_transform(edge, length));
                flat_lengths.insert(edge_id, length);
            }
        }

        // Commit. The scratch maps cover every node and edge, so stale
        // values from a previous run cannot survive.
        for (node_id, transform) in &transforms {
            tree.node_mut(node_id)?.transform = *transform;
        }
        for (edge_id, length) in &flat_lengths {
            tree.edge_mut(edge_id)?.flat_length = Some(*length);
        }

        debug!("unfolded {} bends", tree.edge_count());
        Ok(())
    }

    /// Flat strip width of one bend, honoring per-bend overrides.
    fn developed_length(&self, edge: &BendEdge) -> Result<f64> {
        let radius = edge.radius_override.unwrap_or(edge.radius);
        let thickness = edge.thickness_override.unwrap_or(self.params.thickness);
        let k_factor = edge.k_factor_override.unwrap_or(self.params.k_factor);
        allowance::bend_allowance(radius, thickness, k_factor, edge.angle)
    }
}

/// Rigid map taking a plane onto z = 0, its u direction onto +x and its
/// v direction onto +y.
fn plane_to_flat(plane: &Plane) -> Matrix4 {
    let u = plane.u_dir();
    let v = plane.v_dir();
    let n = plane.normal();
    let o = plane.origin();
    Matrix4::new(
        u.x,
        u.y,
        u.z,
        -u.dot(&o.coords),
        v.x,
        v.y,
        v.z,
        -v.dot(&o.coords),
        n.x,
        n.y,
        n.z,
        -n.dot(&o.coords),
        0.0,
        0.0,
        0.0,
        1.0,
    )
}

/// Map that rotates a child flange back about its parent bend axis and
/// shifts it outward by the developed bend length.
///
/// Operates in the folded model's coordinates: the composed tree
/// transform of the parent turns the result into flat coordinates.
fn relax_transform(edge: &BendEdge, flat_length: f64) -> Matrix4 {
    let rotation = rigid_3d::rotation_about_line(&edge.axis_point, &edge.axis_dir, -edge.angle);
    let shift = Matrix4::new_translation(&(edge.unfold_dir * flat_length));
    shift * rotation
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::creation::{MakeSheet, ProfileSegment, SheetProfile};
    use crate::error::{ConfigError, UnbendError, UnfoldError};
    use crate::math::Point3;
    use crate::topology::{SolidId, TopologyStore};
    use crate::tree::build::BuildTree;

    fn flange(length: f64) -> ProfileSegment {
        ProfileSegment::Flange { length }
    }

    fn bend(radius: f64, angle: f64) -> ProfileSegment {
        ProfileSegment::Bend { radius, angle }
    }

    fn bracket(store: &mut TopologyStore) -> SolidId {
        let profile =
            SheetProfile::open(vec![flange(10.0), bend(1.0, FRAC_PI_2), flange(5.0)]).unwrap();
        MakeSheet::new(profile, 4.0).execute(store).unwrap()
    }

    // ── parameters ──

    #[test]
    fn default_params_are_unit_mild_steel() {
        let params = SheetParams::default();
        assert_relative_eq!(params.thickness(), 1.0);
        assert_relative_eq!(params.k_factor(), 0.4);
    }

    #[test]
    fn params_reject_bad_material() {
        assert!(matches!(
            SheetParams::new(0.0, 0.4),
            Err(UnbendError::Config(ConfigError::InvalidThickness(t))) if t == 0.0
        ));
        assert!(matches!(
            SheetParams::new(1.0, -0.1),
            Err(UnbendError::Config(ConfigError::InvalidKFactor(k))) if k == -0.1
        ));
    }

    // ── flattening ──

    #[test]
    fn bracket_child_lands_past_the_allowance_strip() {
        let mut store = TopologyStore::new();
        let solid = bracket(&mut store);
        let query = crate::adapter::SolidQuery::new(&store, solid).unwrap();
        let mut tree = BuildTree::new().execute(&query).unwrap();
        Unfold::new(SheetParams::default())
            .execute(&query, &mut tree)
            .unwrap();

        let allowance = (1.0 + 0.4) * FRAC_PI_2;
        let edge = tree.edge(tree.edges_in_order()[0]).unwrap();
        assert_relative_eq!(edge.flat_length.unwrap(), allowance, epsilon = 1e-9);

        // The folded child flange spans x = 11, z in [1, 6]. Flat, its
        // near edge sits one allowance past the tangent line at x = 10.
        let child = tree.node(edge.child).unwrap();
        let near = rigid_3d::transform_point(&child.transform, &Point3::new(11.0, 0.0, 1.0));
        let far = rigid_3d::transform_point(&child.transform, &Point3::new(11.0, 0.0, 6.0));
        assert_relative_eq!(near.x, 10.0 + allowance, epsilon = 1e-9);
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(far.x, 15.0 + allowance, epsilon = 1e-9);
        assert_relative_eq!(far.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn root_flange_keeps_its_outline() {
        let mut store = TopologyStore::new();
        let solid = bracket(&mut store);
        let query = crate::adapter::SolidQuery::new(&store, solid).unwrap();
        let mut tree = BuildTree::new().execute(&query).unwrap();
        Unfold::new(SheetParams::default())
            .execute(&query, &mut tree)
            .unwrap();
        let root = tree.node(tree.root()).unwrap();
        let p = rigid_3d::transform_point(&root.transform, &Point3::new(10.0, 4.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 4.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_tree_unfolds_to_identity() {
        let mut store = TopologyStore::new();
        let profile =
            SheetProfile::open(vec![flange(6.0), bend(1.0, 0.0), flange(4.0)]).unwrap();
        let solid = MakeSheet::new(profile, 2.0).execute(&mut store).unwrap();
        let query = crate::adapter::SolidQuery::new(&store, solid).unwrap();
        let mut tree = BuildTree::new().execute(&query).unwrap();
        Unfold::new(SheetParams::default())
            .execute(&query, &mut tree)
            .unwrap();
        for &node_id in tree.nodes_in_order() {
            let transform = tree.node(node_id).unwrap().transform;
            assert_relative_eq!(transform, Matrix4::identity(), epsilon = 1e-9);
        }
    }

    #[test]
    fn repeated_runs_agree() {
        let mut store = TopologyStore::new();
        let solid = bracket(&mut store);
        let query = crate::adapter::SolidQuery::new(&store, solid).unwrap();
        let mut tree = BuildTree::new().execute(&query).unwrap();
        let op = Unfold::new(SheetParams::default());
        op.execute(&query, &mut tree).unwrap();
        let edge_id = tree.edges_in_order()[0];
        let first = tree.edge(edge_id).unwrap().flat_length;
        let first_child = tree.edge(edge_id).unwrap().child;
        let first_transform = tree.node(first_child).unwrap().transform;
        op.execute(&query, &mut tree).unwrap();
        assert_eq!(tree.edge(edge_id).unwrap().flat_length, first);
        let second_transform = tree.node(first_child).unwrap().transform;
        assert_relative_eq!(first_transform, second_transform, epsilon = 1e-12);
    }

    // ── overrides and failure ──

    #[test]
    fn thickness_override_widens_the_strip() {
        let mut store = TopologyStore::new();
        let solid = bracket(&mut store);
        let query = crate::adapter::SolidQuery::new(&store, solid).unwrap();
        let mut tree = BuildTree::new().execute(&query).unwrap();
        let edge_id = tree.edges_in_order()[0];
        tree.edge_mut(edge_id).unwrap().thickness_override = Some(2.0);
        Unfold::new(SheetParams::default())
            .execute(&query, &mut tree)
            .unwrap();
        let length = tree.edge(edge_id).unwrap().flat_length.unwrap();
        assert_relative_eq!(length, (1.0 + 0.4 * 2.0) * FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn zero_radius_override_fails_and_leaves_tree_untouched() {
        let mut store = TopologyStore::new();
        let solid = bracket(&mut store);
        let query = crate::adapter::SolidQuery::new(&store, solid).unwrap();
        let mut tree = BuildTree::new().execute(&query).unwrap();
        let edge_id = tree.edges_in_order()[0];
        tree.edge_mut(edge_id).unwrap().radius_override = Some(0.0);

        let result = Unfold::new(SheetParams::default()).execute(&query, &mut tree);
        assert!(matches!(
            result,
            Err(UnbendError::Unfold(UnfoldError::ZeroRadius))
        ));
        // Nothing committed on failure.
        assert!(tree.edge(edge_id).unwrap().flat_length.is_none());
        for &node_id in tree.nodes_in_order() {
            assert_relative_eq!(
                tree.node(node_id).unwrap().transform,
                Matrix4::identity(),
                epsilon = 0.0
            );
        }
    }

    #[test]
    fn negative_radius_override_is_reported_as_such() {
        let mut store = TopologyStore::new();
        let solid = bracket(&mut store);
        let query = crate::adapter::SolidQuery::new(&store, solid).unwrap();
        let mut tree = BuildTree::new().execute(&query).unwrap();
        let edge_id = tree.edges_in_order()[0];
        tree.edge_mut(edge_id).unwrap().radius_override = Some(-2.0);
        let result = Unfold::new(SheetParams::default()).execute(&query, &mut tree);
        assert!(matches!(
            result,
            Err(UnbendError::Unfold(UnfoldError::NegativeRadius(r))) if r == -2.0
        ));
    }
}
