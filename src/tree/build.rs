//! Bend tree construction by breadth-first traversal of face adjacency.

use std::collections::VecDeque;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::adapter::{SolidQuery, SurfaceClass};
use crate::error::{GeometryError, Result, TopologyError, UnbendError};
use crate::math::{rigid_3d, Matrix4, Point3, Vector3, TOLERANCE};
use crate::topology::FaceId;
use crate::tree::{BendEdge, BendNode, BendNodeId, SheetTree};

/// How far the cylinder radial at a tangent edge may deviate from the
/// flange normal before the faces are rejected as non-tangent.
const TANGENCY_TOL: f64 = 1e-6;

/// Builds a [`SheetTree`] over a classified sheet solid.
///
/// Flanges become nodes and bend faces become edges. Traversal starts at
/// the root flange (the largest one unless overridden) and walks outward
/// breadth-first; discovery order is the shell's face order, so repeated
/// builds over the same solid yield the same tree.
#[derive(Debug, Default)]
pub struct BuildTree {
    root: Option<FaceId>,
}

impl BuildTree {
    /// Creates a builder that picks the largest flange as root.
    #[must_use]
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Overrides the root flange.
    #[must_use]
    pub fn with_root(mut self, face: FaceId) -> Self {
        self.root = Some(face);
        self
    }

    /// Runs the traversal and returns the finished tree.
    ///
    /// # Errors
    ///
    /// Returns an error if any face is neither planar nor cylindrical, if
    /// two flanges touch without a bend between them, if a bend connects
    /// fewer or more than two flanges, if the bend graph contains a cycle,
    /// or if faces remain unreachable from the root.
    pub fn execute(&self, query: &SolidQuery<'_>) -> Result<SheetTree> {
        // Any unsupported surface fails the whole build before traversal.
        for &face in query.faces() {
            if let SurfaceClass::Other { kind } = query.classify(face)? {
                return Err(UnbendError::UnsupportedGeometry { kind: kind.clone() });
            }
        }

        let root_face = match self.root {
            Some(face) => {
                query.plane(face)?;
                face
            }
            None => largest_flange(query)?,
        };

        let mut nodes = slotmap::SlotMap::with_key();
        let mut edges = slotmap::SlotMap::with_key();
        let mut node_order = Vec::new();
        let mut edge_order = Vec::new();
        let mut face_node: SecondaryMap<FaceId, BendNodeId> = SecondaryMap::new();
        let mut used_bends: SecondaryMap<FaceId, ()> = SecondaryMap::new();

        let root_node = nodes.insert(BendNode {
            face: root_face,
            transform: Matrix4::identity(),
            parent_edge: None,
            children: Vec::new(),
        });
        face_node.insert(root_face, root_node);
        node_order.push(root_node);

        let mut queue = VecDeque::new();
        queue.push_back((root_node, root_face));

        while let Some((node_id, face)) = queue.pop_front() {
            for neighbor in query.adjacent_faces(face)? {
                match query.classify(neighbor)? {
                    SurfaceClass::Planar { .. } => {
                        return Err(TopologyError::AdjacentFlanges.into());
                    }
                    SurfaceClass::Other { kind } => {
                        return Err(UnbendError::UnsupportedGeometry { kind: kind.clone() });
                    }
                    SurfaceClass::Cylindrical { .. } => {}
                }
                let bend_face = neighbor;
                if used_bends.contains_key(bend_face) {
                    // Second encounter of a bend is the link back to the
                    // parent flange.
                    continue;
                }
                used_bends.insert(bend_face, ());

                let mut flanges = Vec::new();
                for candidate in query.adjacent_faces(bend_face)? {
                    if matches!(query.classify(candidate)?, SurfaceClass::Planar { .. }) {
                        flanges.push(candidate);
                    }
                }
                if flanges.len() > 2 {
                    return Err(TopologyError::AmbiguousBend {
                        flange_count: flanges.len(),
                    }
                    .into());
                }
                if flanges.len() < 2 {
                    return Err(TopologyError::DanglingBend {
                        flange_count: flanges.len(),
                    }
                    .into());
                }
                let other = flanges
                    .into_iter()
                    .find(|&f| f != face)
                    .ok_or(TopologyError::DanglingBend { flange_count: 1 })?;
                if face_node.contains_key(other) {
                    return Err(TopologyError::Cycle.into());
                }

                let params = bend_parameters(query, face, bend_face, other)?;
                let child_node = nodes.insert(BendNode {
                    face: other,
                    transform: Matrix4::identity(),
                    parent_edge: None,
                    children: Vec::new(),
                });
                let edge_id = edges.insert(BendEdge {
                    parent: node_id,
                    child: child_node,
                    face: bend_face,
                    angle: params.angle,
                    radius: params.radius,
                    axis_point: params.axis_point,
                    axis_dir: params.axis_dir,
                    parent_tangent: params.parent_tangent,
                    unfold_dir: params.unfold_dir,
                    radius_override: None,
                    thickness_override: None,
                    k_factor_override: None,
                    flat_length: None,
                });
                nodes[child_node].parent_edge = Some(edge_id);
                nodes[node_id].children.push(edge_id);
                face_node.insert(other, child_node);
                node_order.push(child_node);
                edge_order.push(edge_id);
                queue.push_back((child_node, other));
            }
        }

        let visited = face_node.len() + used_bends.len();
        let total = query.faces().len();
        if visited < total {
            return Err(TopologyError::Disconnected {
                count: total - visited,
            }
            .into());
        }

        debug!(
            "built bend tree over {} flanges and {} bends",
            node_order.len(),
            edge_order.len()
        );
        Ok(SheetTree {
            nodes,
            edges,
            root: root_node,
            node_order,
            edge_order,
        })
    }
}

/// Largest planar face of the sheet; ties keep the first in shell order.
fn largest_flange(query: &SolidQuery<'_>) -> Result<FaceId> {
    let mut best: Option<(FaceId, f64)> = None;
    for &face in query.faces() {
        if let SurfaceClass::Planar { area, .. } = query.classify(face)? {
            if best.is_none_or(|(_, a)| *area > a) {
                best = Some((face, *area));
            }
        }
    }
    best.map(|(face, _)| face)
        .ok_or_else(|| TopologyError::NoRootFlange.into())
}

struct BendParams {
    angle: f64,
    radius: f64,
    axis_point: Point3,
    axis_dir: Vector3,
    parent_tangent: (Point3, Point3),
    unfold_dir: Vector3,
}

/// Measures one bend between a parent flange and its child.
///
/// The returned axis and angle are canonical: rotating the parent-side
/// radial direction by `angle` about `axis_dir` yields the child-side
/// radial direction, and `angle` is positive when the child material lies
/// on the parent normal's side of the parent plane.
fn bend_parameters(
    query: &SolidQuery<'_>,
    parent: FaceId,
    bend: FaceId,
    child: FaceId,
) -> Result<BendParams> {
    let cylinder = query.cylinder(bend)?;
    let parent_plane = query.plane(parent)?;
    let child_plane = query.plane(child)?;

    let parent_tangent = tangent_segment(query, parent, bend)?;
    let child_tangent = tangent_segment(query, child, bend)?;
    let m_a = midpoint(&parent_tangent.0, &parent_tangent.1);
    let m_b = midpoint(&child_tangent.0, &child_tangent.1);

    let u_a = cylinder.radial_at(&m_a)?;
    let u_b = cylinder.radial_at(&m_b)?;
    check_tangency(&u_a, parent_plane.normal())?;
    check_tangency(&u_b, child_plane.normal())?;

    let axis_raw = *cylinder.axis();
    let phi = rigid_3d::signed_angle_about(&u_a, &u_b, &axis_raw);
    let side = parent_plane.normal().dot(&(m_b - m_a));
    let sign_h = if side >= 0.0 { 1.0 } else { -1.0 };
    let sign_phi = if phi >= 0.0 { 1.0 } else { -1.0 };
    let angle = phi.abs() * sign_h;
    let axis_dir = axis_raw * (sign_phi * sign_h);
    let axis_point = cylinder.closest_axis_point(&m_a);

    let chord = parent_tangent.1 - parent_tangent.0;
    if chord.norm() < TOLERANCE {
        return Err(GeometryError::Degenerate(
            "tangent edge between flange and bend has zero length".to_string(),
        )
        .into());
    }
    let along = chord.normalize();
    let across = along.cross(parent_plane.normal());
    if across.norm() < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    let mut unfold_dir = across.normalize();
    let interior = ring_centroid(&query.outline(parent)?.outer);
    if unfold_dir.dot(&(m_a - interior)) < 0.0 {
        unfold_dir = -unfold_dir;
    }

    Ok(BendParams {
        angle,
        radius: cylinder.radius(),
        axis_point,
        axis_dir,
        parent_tangent,
        unfold_dir,
    })
}

/// The single straight edge a flange shares with a bend face.
fn tangent_segment(
    query: &SolidQuery<'_>,
    flange: FaceId,
    bend: FaceId,
) -> Result<(Point3, Point3)> {
    let shared = query.shared_edges(flange, bend)?;
    if shared.len() != 1 {
        return Err(GeometryError::Degenerate(format!(
            "expected one tangent edge between flange and bend, found {}",
            shared.len()
        ))
        .into());
    }
    query.straight_edge(shared[0])
}

/// Rejects flange/bend pairs that merely touch instead of meeting
/// tangentially.
fn check_tangency(radial: &Vector3, normal: &Vector3) -> Result<()> {
    if (radial.dot(normal).abs() - 1.0).abs() > TANGENCY_TOL {
        return Err(GeometryError::Degenerate(
            "flange is not tangent to its bend cylinder".to_string(),
        )
        .into());
    }
    Ok(())
}

fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) * 0.5)
}

#[allow(clippy::cast_precision_loss)]
fn ring_centroid(ring: &[Point3]) -> Point3 {
    let mut sum = Vector3::zeros();
    for p in ring {
        sum += p.coords;
    }
    Point3::from(sum / ring.len().max(1) as f64)
}
