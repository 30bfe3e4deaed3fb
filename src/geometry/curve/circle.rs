use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A full circle in 3D space; edges bound it to an arc through their
/// parameter range.
///
/// Defined by a center, radius, the normal of the circle plane, and a
/// reference direction marking angle zero. The parametric form is
/// `P(t) = center + radius * (cos(t) * ref_dir + sin(t) * binormal)`
/// with `binormal = normal x ref_dir`.
#[derive(Debug, Clone)]
pub struct Circle {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the normal is
    /// zero-length, or the reference direction is not perpendicular to
    /// the normal.
    pub fn new(center: Point3, radius: f64, normal: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("circle radius must be positive".into()).into());
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if normal.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
        })
    }

    /// Returns the center of the circle.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the normal of the circle plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Computes the second in-plane axis (`normal x ref_dir`).
    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }

    /// Evaluates the circle at angle `t` (radians).
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point3 {
        let binormal = self.binormal();
        let x = self.radius * t.cos();
        let y = self.radius * t.sin();
        self.center + self.ref_dir * x + binormal * y
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    fn xy_circle(radius: f64) -> Circle {
        Circle::new(Point3::origin(), radius, Vector3::z(), Vector3::x()).unwrap()
    }

    #[test]
    fn evaluate_at_zero_is_along_ref_dir() {
        let c = xy_circle(2.0);
        let p = c.evaluate(0.0);
        assert!((p - Point3::new(2.0, 0.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn evaluate_quarter_turn() {
        let c = xy_circle(2.0);
        let p = c.evaluate(FRAC_PI_2);
        assert!((p - Point3::new(0.0, 2.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn constructor_normalizes_axes() {
        let c = Circle::new(
            Point3::new(1.0, 0.0, 0.0),
            2.0,
            Vector3::z() * 3.0,
            Vector3::x() * 0.5,
        )
        .unwrap();
        assert!((c.normal() - Vector3::z()).norm() < TOLERANCE);
        assert!((c.radius() - 2.0).abs() < TOLERANCE);
        assert!((c.center() - Point3::new(1.0, 0.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert!(Circle::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x()).is_err());
    }

    #[test]
    fn skewed_ref_dir_is_rejected() {
        let r = Circle::new(
            Point3::origin(),
            1.0,
            Vector3::z(),
            Vector3::new(1.0, 0.0, 0.5),
        );
        assert!(r.is_err());
    }
}
