//! Rigid-motion helpers over homogeneous 4x4 matrices.

use nalgebra::Vector4;

use super::{Matrix4, Point3, Vector3};

/// Builds a 4x4 rotation matrix around a unit axis by an angle (Rodrigues).
///
/// The axis must already be normalized; callers validate it.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    )
}

/// Rotation about an arbitrary axis line through `origin` with unit
/// direction `axis`: translate to the origin, rotate, translate back.
#[must_use]
pub fn rotation_about_line(origin: &Point3, axis: &Vector3, angle: f64) -> Matrix4 {
    let t_neg = Matrix4::new_translation(&(-origin.coords));
    let rot = rotation_matrix(axis, angle);
    let t_pos = Matrix4::new_translation(&origin.coords);
    t_pos * rot * t_neg
}

/// Applies a homogeneous transform to a point (`w = 1`).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let h = matrix * Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(h.x, h.y, h.z)
}

/// Applies a homogeneous transform to a direction (`w = 0`, translation
/// has no effect).
#[must_use]
pub fn transform_direction(matrix: &Matrix4, dir: &Vector3) -> Vector3 {
    let h = matrix * Vector4::new(dir.x, dir.y, dir.z, 0.0);
    Vector3::new(h.x, h.y, h.z)
}

/// Signed angle that rotates `from` onto `to` about the unit `axis`.
///
/// Both input vectors are expected to be unit length and perpendicular
/// to the axis. The result lies in `(-pi, pi]`.
#[must_use]
pub fn signed_angle_about(from: &Vector3, to: &Vector3, axis: &Vector3) -> f64 {
    let sin = from.cross(to).dot(axis);
    let cos = from.dot(to);
    sin.atan2(cos)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn rotate_point_90_around_z() {
        let m = rotation_matrix(&Vector3::z(), FRAC_PI_2);
        let p = transform_point(&m, &Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn line_rotation_fixes_points_on_the_line() {
        let origin = Point3::new(2.0, -1.0, 3.0);
        let axis = Vector3::y();
        let m = rotation_about_line(&origin, &axis, 1.2);
        let on_line = origin + axis * 4.5;
        let q = transform_point(&m, &on_line);
        assert!((q - on_line).norm() < 1e-9);
    }

    #[test]
    fn line_rotation_moves_off_line_points() {
        let origin = Point3::new(0.0, 0.0, 1.0);
        let m = rotation_about_line(&origin, &Vector3::y(), FRAC_PI_2);
        // (0, 0, 0) is one unit below the axis line; a quarter turn about
        // +Y carries it to (-1, 0, 1).
        let q = transform_point(&m, &Point3::origin());
        assert!((q - Point3::new(-1.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn directions_ignore_translation() {
        let m = Matrix4::new_translation(&Vector3::new(10.0, 20.0, 30.0));
        let d = transform_direction(&m, &Vector3::x());
        assert!((d - Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn signed_angle_quarter_turn() {
        let a = signed_angle_about(&Vector3::x(), &Vector3::y(), &Vector3::z());
        assert!((a - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn signed_angle_is_negative_against_axis() {
        let a = signed_angle_about(&Vector3::y(), &Vector3::x(), &Vector3::z());
        assert!((a + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn signed_angle_opposite_vectors() {
        let a = signed_angle_about(&Vector3::x(), &(-Vector3::x()), &Vector3::z());
        assert!((a.abs() - PI).abs() < 1e-12);
    }

    #[test]
    fn rotation_matches_signed_angle() {
        let axis = Vector3::new(0.3, -0.5, 0.8).normalize();
        // Build two unit vectors perpendicular to the axis.
        let u = axis.cross(&Vector3::x()).normalize();
        let m = rotation_matrix(&axis, 0.7);
        let v = transform_direction(&m, &u);
        let a = signed_angle_about(&u, &v, &axis);
        assert!((a - 0.7).abs() < 1e-9);
    }
}
