//! Pattern assembly: projects unfolded flanges to 2D, rejects overlapping
//! layouts and annotates bend lines.

use tracing::debug;

use crate::adapter::SolidQuery;
use crate::error::{PatternError, Result};
use crate::math::{polygon_2d, rigid_3d, Matrix4, Point2, Point3};
use crate::pattern::{BendLine, FaceOutline, FlatPattern};
use crate::tree::SheetTree;

/// Assembles the flat pattern of an unfolded tree.
///
/// Every flange outline is sampled from the model, pushed through its
/// node transform and dropped to 2D. Outlines that properly overlap fail
/// the run; rings that merely share boundary points (as the two sides of
/// a zero-angle bend do) are accepted. Each bend contributes one bend
/// line through the middle of its developed strip.
#[derive(Debug, Default)]
pub struct AssemblePattern;

impl AssemblePattern {
    /// Creates the operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Runs the assembly.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::TreeNotUnfolded`] if any bend is missing
    /// its flat length, [`PatternError::SelfIntersection`] if two
    /// unfolded outlines properly overlap, or a topology error if the
    /// tree references missing entities.
    pub fn execute(&self, query: &SolidQuery<'_>, tree: &SheetTree) -> Result<FlatPattern> {
        for &edge_id in tree.edges_in_order() {
            if tree.edge(edge_id)?.flat_length.is_none() {
                return Err(PatternError::TreeNotUnfolded.into());
            }
        }

        let mut outlines = Vec::new();
        for &node_id in tree.nodes_in_order() {
            let node = tree.node(node_id)?;
            let sampled = query.outline(node.face)?;
            outlines.push(FaceOutline {
                node: node_id,
                outer: flatten_ring(&node.transform, &sampled.outer),
                holes: sampled
                    .holes
                    .iter()
                    .map(|ring| flatten_ring(&node.transform, ring))
                    .collect(),
            });
        }

        for i in 0..outlines.len() {
            for j in (i + 1)..outlines.len() {
                if polygon_2d::rings_properly_overlap(&outlines[i].outer, &outlines[j].outer) {
                    return Err(PatternError::SelfIntersection {
                        a: outlines[i].node,
                        b: outlines[j].node,
                    }
                    .into());
                }
            }
        }

        let mut bend_lines = Vec::new();
        for &edge_id in tree.edges_in_order() {
            let edge = tree.edge(edge_id)?;
            let parent_transform = tree.node(edge.parent)?.transform;
            let length = edge.flat_length.ok_or(PatternError::TreeNotUnfolded)?;
            // Center of the developed strip: half an allowance past the
            // parent tangent line.
            let offset =
                rigid_3d::transform_direction(&parent_transform, &edge.unfold_dir) * (length * 0.5);
            let place = |p: &Point3| {
                let q = rigid_3d::transform_point(&parent_transform, p);
                Point2::new(q.x + offset.x, q.y + offset.y)
            };
            bend_lines.push(BendLine {
                edge: edge_id,
                start: place(&edge.parent_tangent.0),
                end: place(&edge.parent_tangent.1),
                angle: edge.angle,
                radius: edge.radius_override.unwrap_or(edge.radius),
                direction: edge.direction(),
            });
        }

        debug!(
            "assembled flat pattern: {} outlines, {} bend lines",
            outlines.len(),
            bend_lines.len()
        );
        Ok(FlatPattern {
            outlines,
            bend_lines,
        })
    }
}

fn flatten_ring(transform: &Matrix4, ring: &[Point3]) -> Vec<Point2> {
    ring.iter()
        .map(|p| {
            let q = rigid_3d::transform_point(transform, p);
            Point2::new(q.x, q.y)
        })
        .collect()
}
