//! Flat pattern: the unfolded 2D outlines plus bend-line annotations.

pub mod assemble;

use crate::math::Point2;
use crate::tree::{BendEdgeId, BendNodeId, FoldDirection};

/// Unfolded outline of one flange.
#[derive(Debug, Clone)]
pub struct FaceOutline {
    /// Tree node the outline came from.
    pub node: BendNodeId,
    /// Outer ring, without a repeated closing point.
    pub outer: Vec<Point2>,
    /// Hole rings.
    pub holes: Vec<Vec<Point2>>,
}

/// Annotation marking where a bend must be formed in the flat sheet.
///
/// The line runs through the middle of the developed bend strip, parallel
/// to the bend axis.
#[derive(Debug, Clone)]
pub struct BendLine {
    /// Tree edge the annotation came from.
    pub edge: BendEdgeId,
    /// One end of the line.
    pub start: Point2,
    /// Other end of the line.
    pub end: Point2,
    /// Signed bend angle in radians.
    pub angle: f64,
    /// Bend radius to form, overrides applied.
    pub radius: f64,
    /// Fold side relative to the tracked sheet surface.
    pub direction: FoldDirection,
}

/// Assembled flat pattern of one sheet.
#[derive(Debug, Clone)]
pub struct FlatPattern {
    outlines: Vec<FaceOutline>,
    bend_lines: Vec<BendLine>,
}

impl FlatPattern {
    /// Flange outlines in tree discovery order.
    #[must_use]
    pub fn outlines(&self) -> &[FaceOutline] {
        &self.outlines
    }

    /// Bend-line annotations in tree discovery order.
    #[must_use]
    pub fn bend_lines(&self) -> &[BendLine] {
        &self.bend_lines
    }

    /// Axis-aligned bounds over all outline rings, `None` for an empty
    /// pattern.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let mut points = self
            .outlines
            .iter()
            .flat_map(|o| o.outer.iter().chain(o.holes.iter().flatten()));
        let first = points.next()?;
        let mut min = *first;
        let mut max = *first;
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }
}
