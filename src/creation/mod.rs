//! Sheet construction: sweeps an alternating flange/bend profile into a
//! face-level sheet model.

pub mod make_sheet;

pub use make_sheet::MakeSheet;

use std::f64::consts::PI;

use crate::error::{ConfigError, Result};

/// One segment of a sheet profile, in profile order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileSegment {
    /// Straight run of the given length.
    Flange {
        /// Length along the profile direction.
        length: f64,
    },
    /// Circular transition with the given radius of the tracked surface
    /// and signed turn angle (positive folds toward the sheet normal).
    Bend {
        /// Radius of the tracked surface.
        radius: f64,
        /// Signed turn angle in radians, magnitude below half a turn.
        angle: f64,
    },
}

/// Validated profile: flanges and bends in strict alternation.
///
/// Open profiles start and end with a flange. Closed profiles end with a
/// bend that joins the last flange back to the first.
#[derive(Debug, Clone)]
pub struct SheetProfile {
    segments: Vec<ProfileSegment>,
    closed: bool,
}

impl SheetProfile {
    /// Creates an open profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the segments do not alternate flange/bend
    /// starting and ending with a flange, or any segment is degenerate.
    pub fn open(segments: Vec<ProfileSegment>) -> Result<Self> {
        Self::validate(&segments, false)?;
        Ok(Self {
            segments,
            closed: false,
        })
    }

    /// Creates a closed profile whose final bend joins back to the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the segments do not alternate flange/bend
    /// starting with a flange and ending with a bend, or any segment is
    /// degenerate.
    pub fn closed(segments: Vec<ProfileSegment>) -> Result<Self> {
        Self::validate(&segments, true)?;
        Ok(Self {
            segments,
            closed: true,
        })
    }

    /// Segments in profile order.
    #[must_use]
    pub fn segments(&self) -> &[ProfileSegment] {
        &self.segments
    }

    /// Whether the profile closes back onto its first flange.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn validate(segments: &[ProfileSegment], closed: bool) -> Result<()> {
        let Some(first) = segments.first() else {
            return Err(ConfigError::InvalidProfile("profile is empty".into()).into());
        };
        if !matches!(first, ProfileSegment::Flange { .. }) {
            return Err(
                ConfigError::InvalidProfile("profile must start with a flange".into()).into(),
            );
        }
        for pair in segments.windows(2) {
            let alternates = matches!(
                pair,
                [ProfileSegment::Flange { .. }, ProfileSegment::Bend { .. }]
                    | [ProfileSegment::Bend { .. }, ProfileSegment::Flange { .. }]
            );
            if !alternates {
                return Err(
                    ConfigError::InvalidProfile("flanges and bends must alternate".into()).into(),
                );
            }
        }
        match (closed, segments.last()) {
            (false, Some(ProfileSegment::Bend { .. })) => {
                return Err(
                    ConfigError::InvalidProfile("open profile must end with a flange".into())
                        .into(),
                );
            }
            (true, Some(ProfileSegment::Flange { .. })) => {
                return Err(ConfigError::InvalidProfile(
                    "closed profile must end with its closing bend".into(),
                )
                .into());
            }
            _ => {}
        }
        for segment in segments {
            match *segment {
                ProfileSegment::Flange { length } => {
                    if !length.is_finite() || length <= 0.0 {
                        return Err(ConfigError::InvalidProfile(format!(
                            "flange length must be positive, got {length}"
                        ))
                        .into());
                    }
                }
                ProfileSegment::Bend { radius, angle } => {
                    if !radius.is_finite() || radius <= 0.0 {
                        return Err(ConfigError::InvalidProfile(format!(
                            "bend radius must be positive, got {radius}"
                        ))
                        .into());
                    }
                    if !angle.is_finite() || angle.abs() >= PI {
                        return Err(ConfigError::InvalidProfile(format!(
                            "bend angle magnitude must stay below half a turn, got {angle}"
                        ))
                        .into());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::error::UnbendError;

    fn flange(length: f64) -> ProfileSegment {
        ProfileSegment::Flange { length }
    }

    fn bend(radius: f64, angle: f64) -> ProfileSegment {
        ProfileSegment::Bend { radius, angle }
    }

    fn invalid(result: Result<SheetProfile>) -> String {
        match result {
            Err(UnbendError::Config(ConfigError::InvalidProfile(message))) => message,
            other => panic!("expected InvalidProfile, got {other:?}"),
        }
    }

    #[test]
    fn accepts_alternating_open_profile() {
        let profile =
            SheetProfile::open(vec![flange(10.0), bend(1.0, FRAC_PI_2), flange(5.0)]).unwrap();
        assert_eq!(profile.segments().len(), 3);
        assert!(!profile.is_closed());
    }

    #[test]
    fn accepts_zero_angle_bends() {
        assert!(SheetProfile::open(vec![flange(6.0), bend(1.0, 0.0), flange(4.0)]).is_ok());
    }

    #[test]
    fn accepts_negative_angles() {
        assert!(SheetProfile::open(vec![flange(6.0), bend(1.0, -FRAC_PI_2), flange(4.0)]).is_ok());
    }

    #[test]
    fn rejects_empty_profile() {
        let message = invalid(SheetProfile::open(Vec::new()));
        assert!(message.contains("empty"));
    }

    #[test]
    fn rejects_leading_bend() {
        let message = invalid(SheetProfile::open(vec![bend(1.0, FRAC_PI_2), flange(5.0)]));
        assert!(message.contains("start with a flange"));
    }

    #[test]
    fn rejects_consecutive_flanges() {
        let message = invalid(SheetProfile::open(vec![flange(5.0), flange(5.0)]));
        assert!(message.contains("alternate"));
    }

    #[test]
    fn rejects_open_profile_ending_in_a_bend() {
        let message = invalid(SheetProfile::open(vec![flange(5.0), bend(1.0, FRAC_PI_2)]));
        assert!(message.contains("end with a flange"));
    }

    #[test]
    fn rejects_closed_profile_ending_in_a_flange() {
        let message = invalid(SheetProfile::closed(vec![
            flange(5.0),
            bend(1.0, FRAC_PI_2),
            flange(5.0),
        ]));
        assert!(message.contains("closing bend"));
    }

    #[test]
    fn rejects_degenerate_segments() {
        let message = invalid(SheetProfile::open(vec![
            flange(0.0),
            bend(1.0, FRAC_PI_2),
            flange(5.0),
        ]));
        assert!(message.contains("length"));
        let message = invalid(SheetProfile::open(vec![
            flange(5.0),
            bend(0.0, FRAC_PI_2),
            flange(5.0),
        ]));
        assert!(message.contains("radius"));
        let message = invalid(SheetProfile::open(vec![
            flange(5.0),
            bend(1.0, PI),
            flange(5.0),
        ]));
        assert!(message.contains("half a turn"));
    }
}
