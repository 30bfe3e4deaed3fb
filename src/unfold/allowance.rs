//! Bend allowance: how much flat material a bend consumes.

use crate::error::{ConfigError, Result, UnfoldError};
use crate::math::TOLERANCE;

/// Developed length of a bend region, `(R + k·T) · |angle|`.
///
/// The k-factor places the neutral fiber at `k·T` above the inner bend
/// surface; the fiber keeps its length when the sheet is flattened, so its
/// arc length is the width of the flat strip the bend turns into.
///
/// # Errors
///
/// Returns an error if the thickness is not positive, the k-factor falls
/// outside `[0, 1]`, or the radius is zero or negative.
pub fn bend_allowance(radius: f64, thickness: f64, k_factor: f64, angle: f64) -> Result<f64> {
    check_thickness(thickness)?;
    check_k_factor(k_factor)?;
    if radius < 0.0 {
        return Err(UnfoldError::NegativeRadius(radius).into());
    }
    if radius < TOLERANCE {
        return Err(UnfoldError::ZeroRadius.into());
    }
    Ok((radius + k_factor * thickness) * angle.abs())
}

pub(crate) fn check_thickness(thickness: f64) -> Result<()> {
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(ConfigError::InvalidThickness(thickness).into());
    }
    Ok(())
}

pub(crate) fn check_k_factor(k_factor: f64) -> Result<()> {
    if !k_factor.is_finite() || !(0.0..=1.0).contains(&k_factor) {
        return Err(ConfigError::InvalidKFactor(k_factor).into());
    }
    Ok(())
}
