//! 2D polygon predicates used by pattern assembly.
//!
//! Rings are vertex lists without a repeated closing point; the segment
//! from the last vertex back to the first is implied.

use super::{Point2, TOLERANCE};

/// Signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise winding, negative for clockwise.
#[must_use]
pub fn signed_area(ring: &[Point2]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    0.5 * sum
}

/// Winding number of `point` with respect to `ring`.
///
/// Non-zero means inside, zero means outside.
#[must_use]
pub fn winding_number(point: &Point2, ring: &[Point2]) -> i32 {
    let n = ring.len();
    let mut winding = 0i32;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];

        if a.y <= point.y {
            if b.y > point.y && cross_2d(b.x - a.x, b.y - a.y, point.x - a.x, point.y - a.y) > 0.0
            {
                winding += 1;
            }
        } else if b.y <= point.y
            && cross_2d(b.x - a.x, b.y - a.y, point.x - a.x, point.y - a.y) < 0.0
        {
            winding -= 1;
        }
    }
    winding
}

/// Whether `point` lies inside or on the boundary of `ring`.
#[must_use]
pub fn point_in_ring(point: &Point2, ring: &[Point2]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    point_on_ring(point, ring) || winding_number(point, ring) != 0
}

/// Whether `point` lies strictly inside `ring` (boundary excluded).
#[must_use]
pub fn point_strictly_inside(point: &Point2, ring: &[Point2]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    !point_on_ring(point, ring) && winding_number(point, ring) != 0
}

/// Whether `point` lies on any boundary segment of `ring`.
#[must_use]
pub fn point_on_ring(point: &Point2, ring: &[Point2]) -> bool {
    let n = ring.len();
    (0..n).any(|i| point_on_segment(point, &ring[i], &ring[(i + 1) % n]))
}

/// Whether `point` lies on the segment from `a` to `b` (within tolerance).
#[must_use]
pub fn point_on_segment(point: &Point2, a: &Point2, b: &Point2) -> bool {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return (point - a).norm() < TOLERANCE;
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (point - closest).norm() < TOLERANCE
}

/// Whether two segments cross at a point strictly interior to both.
///
/// Shared endpoints, endpoint-on-segment contact, and collinear overlap
/// all return `false`; those are touches, not crossings.
#[must_use]
pub fn segments_properly_cross(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let denom = cross_2d(d1.x, d1.y, d2.x, d2.y);
    if denom.abs() < TOLERANCE {
        return false;
    }
    let diff = b0 - a0;
    let t = cross_2d(diff.x, diff.y, d2.x, d2.y) / denom;
    let u = cross_2d(diff.x, diff.y, d1.x, d1.y) / denom;
    t > TOLERANCE && t < 1.0 - TOLERANCE && u > TOLERANCE && u < 1.0 - TOLERANCE
}

/// Whether two rings overlap with non-empty interior intersection.
///
/// Rings that merely touch (shared vertices or collinear boundary
/// segments) do not count as overlapping. A ring covered by the other
/// counts even when its every vertex lies on the covering ring's
/// boundary, as do fully coincident rings.
#[must_use]
pub fn rings_properly_overlap(a: &[Point2], b: &[Point2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    let Some((a_min, a_max)) = bounds(a) else {
        return false;
    };
    let Some((b_min, b_max)) = bounds(b) else {
        return false;
    };
    // Separated or merely touching bounding boxes cannot overlap properly.
    if a_max.x <= b_min.x + TOLERANCE
        || b_max.x <= a_min.x + TOLERANCE
        || a_max.y <= b_min.y + TOLERANCE
        || b_max.y <= a_min.y + TOLERANCE
    {
        return false;
    }

    let na = a.len();
    let nb = b.len();
    for i in 0..na {
        for j in 0..nb {
            if segments_properly_cross(&a[i], &a[(i + 1) % na], &b[j], &b[(j + 1) % nb]) {
                return true;
            }
        }
    }

    if a.iter().any(|p| point_strictly_inside(p, b))
        || b.iter().any(|p| point_strictly_inside(p, a))
    {
        return true;
    }

    // Vertex-aligned coverings have no proper crossing and no strictly
    // interior vertex; an edge midpoint strictly inside the other ring
    // still betrays the shared interior.
    if (0..na).any(|i| point_strictly_inside(&midpoint(&a[i], &a[(i + 1) % na]), b))
        || (0..nb).any(|j| point_strictly_inside(&midpoint(&b[j], &b[(j + 1) % nb]), a))
    {
        return true;
    }

    // Coincident rings keep every vertex and midpoint on the boundary.
    rings_coincide(a, b)
}

/// Whether two rings list the same vertices in the same cyclic order,
/// traversed in either direction.
fn rings_coincide(a: &[Point2], b: &[Point2]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let n = a.len();
    (0..n).any(|offset| {
        (0..n).all(|i| (a[i] - b[(offset + i) % n]).norm() < TOLERANCE)
            || (0..n).all(|i| (a[i] - b[(offset + n - i) % n]).norm() < TOLERANCE)
    })
}

/// Axis-aligned bounds of a point set, or `None` if empty.
#[must_use]
pub fn bounds(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// 2D cross product: `ax * by - ay * bx`.
#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Midpoint of the segment from `a` to `b`.
#[inline]
fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new(0.5 * (a.x + b.x), 0.5 * (a.y + b.y))
}
