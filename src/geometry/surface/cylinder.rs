use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A cylindrical surface in 3D space.
///
/// Defined by a point on the axis, the radius, the axis direction, and a
/// reference direction marking angle zero.
///
/// `P(u, v) = center + radius * cos(u) * ref_dir + radius * sin(u) * binormal + v * axis`
/// where `binormal = axis x ref_dir`.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
}

impl Cylinder {
    /// Creates a new cylinder.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the axis is
    /// zero-length, or the reference direction is not perpendicular to
    /// the axis.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }

        let axis_len = axis.norm();
        if axis_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let axis = axis / axis_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if axis.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to axis".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
        })
    }

    /// Returns the reference point on the axis.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the axis direction (unit vector).
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns the reference direction (u = 0).
    #[must_use]
    pub fn ref_dir(&self) -> &Vector3 {
        &self.ref_dir
    }

    /// Computes the binormal direction (`axis x ref_dir`).
    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    /// Evaluates the surface at parameters `(u, v)`.
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        let binormal = self.binormal();
        let x = self.radius * u.cos();
        let y = self.radius * u.sin();
        self.center + self.ref_dir * x + binormal * y + self.axis * v
    }

    /// Returns the point on the axis line closest to `point`.
    #[must_use]
    pub fn closest_axis_point(&self, point: &Point3) -> Point3 {
        let v = (point - self.center).dot(&self.axis);
        self.center + self.axis * v
    }

    /// Unit radial direction from the axis toward `point`.
    ///
    /// # Errors
    ///
    /// Returns an error if the point lies on the axis.
    pub fn radial_at(&self, point: &Point3) -> Result<Vector3> {
        let radial = point - self.closest_axis_point(point);
        let len = radial.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(radial / len)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    fn z_cylinder(radius: f64) -> Cylinder {
        Cylinder::new(Point3::origin(), radius, Vector3::z(), Vector3::x()).unwrap()
    }

    #[test]
    fn evaluate_at_zero() {
        let c = z_cylinder(2.0);
        let p = c.point_at(0.0, 0.0);
        assert!((p - Point3::new(2.0, 0.0, 0.0)).norm() < TOLERANCE);
    }

    #[test]
    fn evaluate_at_quarter_turn_with_height() {
        let c = z_cylinder(2.0);
        let p = c.point_at(FRAC_PI_2, 3.0);
        assert!((p - Point3::new(0.0, 2.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn zero_radius_is_rejected() {
        let r = Cylinder::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x());
        assert!(r.is_err());
    }

    #[test]
    fn closest_axis_point_drops_radial_part() {
        let c = z_cylinder(1.0);
        let q = c.closest_axis_point(&Point3::new(5.0, -2.0, 7.0));
        assert!((q - Point3::new(0.0, 0.0, 7.0)).norm() < TOLERANCE);
    }

    #[test]
    fn radial_at_points_away_from_axis() {
        let c = z_cylinder(2.0);
        let r = c.radial_at(&Point3::new(0.0, 3.0, 1.0)).unwrap();
        assert!((r - Vector3::y()).norm() < TOLERANCE);
    }

    #[test]
    fn radial_at_on_axis_is_rejected() {
        let c = z_cylinder(2.0);
        assert!(c.radial_at(&Point3::new(0.0, 0.0, 4.0)).is_err());
    }
}
