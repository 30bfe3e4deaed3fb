//! Bend tree: flanges as nodes, bends as edges.
//!
//! The tree is the intermediate model between a classified sheet solid and
//! its flat pattern. [`build::BuildTree`] constructs it by breadth-first
//! traversal of face adjacency; unfolding then fills in node transforms and
//! per-bend flat lengths in place.

pub mod build;

use slotmap::{new_key_type, SlotMap};

use crate::error::TopologyError;
use crate::math::{Matrix4, Point3, Vector3};
use crate::topology::FaceId;

new_key_type! {
    /// Handle to a flange node in a bend tree.
    pub struct BendNodeId;
    /// Handle to a bend connection in a bend tree.
    pub struct BendEdgeId;
}

/// Which way a bend folds relative to the sheet's tracked side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldDirection {
    /// The child flange rises toward the parent face normal.
    Up,
    /// The child flange drops away from the parent face normal.
    Down,
}

/// A flange in the bend tree.
#[derive(Debug, Clone)]
pub struct BendNode {
    /// Planar face this node represents.
    pub face: FaceId,
    /// Flattening transform; identity until the tree is unfolded.
    pub transform: Matrix4,
    /// Bend connecting this node to its parent; `None` for the root.
    pub parent_edge: Option<BendEdgeId>,
    /// Bends leading to child flanges, in discovery order.
    pub children: Vec<BendEdgeId>,
}

/// A bend connecting two flanges.
///
/// Axis and angle are canonical: rotating the parent-side radial direction
/// by `angle` about `axis_dir` yields the child-side radial direction, and
/// the sign of `angle` encodes the fold side (positive folds toward the
/// parent normal).
#[derive(Debug, Clone)]
pub struct BendEdge {
    /// Parent flange.
    pub parent: BendNodeId,
    /// Child flange.
    pub child: BendNodeId,
    /// Cylindrical face realizing the bend.
    pub face: FaceId,
    /// Signed bend angle in radians.
    pub angle: f64,
    /// Bend radius from the cylinder, before overrides.
    pub radius: f64,
    /// A point on the bend axis.
    pub axis_point: Point3,
    /// Unit bend axis direction.
    pub axis_dir: Vector3,
    /// Endpoints of the tangent edge between parent flange and bend face.
    pub parent_tangent: (Point3, Point3),
    /// In-plane unit direction the child material extends after unfolding,
    /// pointing out of the parent flange across the tangent edge.
    pub unfold_dir: Vector3,
    /// Per-bend radius override used instead of the measured radius.
    pub radius_override: Option<f64>,
    /// Per-bend sheet thickness override.
    pub thickness_override: Option<f64>,
    /// Per-bend k-factor override.
    pub k_factor_override: Option<f64>,
    /// Developed length of the bend region; set by unfolding.
    pub flat_length: Option<f64>,
}

impl BendEdge {
    /// Fold direction derived from the sign of the bend angle.
    #[must_use]
    pub fn direction(&self) -> FoldDirection {
        if self.angle >= 0.0 {
            FoldDirection::Up
        } else {
            FoldDirection::Down
        }
    }
}

/// Rooted tree of flanges and bends over one sheet solid.
///
/// Node and edge orders record breadth-first discovery; every traversal in
/// the crate follows them, so results are reproducible run to run.
#[derive(Debug, Clone)]
pub struct SheetTree {
    nodes: SlotMap<BendNodeId, BendNode>,
    edges: SlotMap<BendEdgeId, BendEdge>,
    root: BendNodeId,
    node_order: Vec<BendNodeId>,
    edge_order: Vec<BendEdgeId>,
}

impl SheetTree {
    /// Root node of the tree.
    #[must_use]
    pub fn root(&self) -> BendNodeId {
        self.root
    }

    /// Number of flange nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of bends.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node IDs in breadth-first discovery order, root first.
    #[must_use]
    pub fn nodes_in_order(&self) -> &[BendNodeId] {
        &self.node_order
    }

    /// Edge IDs in breadth-first discovery order.
    #[must_use]
    pub fn edges_in_order(&self) -> &[BendEdgeId] {
        &self.edge_order
    }

    /// Looks up a node.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the ID is stale.
    pub fn node(&self, id: BendNodeId) -> Result<&BendNode, TopologyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("bend node".into()))
    }

    /// Looks up a node mutably.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the ID is stale.
    pub fn node_mut(&mut self, id: BendNodeId) -> Result<&mut BendNode, TopologyError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("bend node".into()))
    }

    /// Looks up a bend.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the ID is stale.
    pub fn edge(&self, id: BendEdgeId) -> Result<&BendEdge, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("bend edge".into()))
    }

    /// Looks up a bend mutably.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] if the ID is stale.
    pub fn edge_mut(&mut self, id: BendEdgeId) -> Result<&mut BendEdge, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("bend edge".into()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn leaf_edge(angle: f64) -> BendEdge {
        BendEdge {
            parent: BendNodeId::default(),
            child: BendNodeId::default(),
            face: FaceId::default(),
            angle,
            radius: 1.0,
            axis_point: Point3::origin(),
            axis_dir: Vector3::z(),
            parent_tangent: (Point3::origin(), Point3::new(1.0, 0.0, 0.0)),
            unfold_dir: Vector3::y(),
            radius_override: None,
            thickness_override: None,
            k_factor_override: None,
            flat_length: None,
        }
    }

    #[test]
    fn positive_angle_folds_up() {
        assert_eq!(leaf_edge(1.0).direction(), FoldDirection::Up);
        assert_eq!(leaf_edge(0.0).direction(), FoldDirection::Up);
    }

    #[test]
    fn negative_angle_folds_down() {
        assert_eq!(leaf_edge(-0.5).direction(), FoldDirection::Down);
    }
}
