//! Raw-to-logical coordinate transform
//!
//! Linear interpolation from `[raw_min, raw_max]` onto `[0, dimension]` per
//! axis. Samples outside the calibrated range come from noise near the
//! bezel; they are clamped so the engine never sees an off-canvas point.

use glasspane_hal::RawSample;

use crate::config::{CalibrationProfile, ConfigError};
use crate::engine::Point;

/// Maps raw digitizer space to display pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibrator {
    profile: CalibrationProfile,
    width: u16,
    height: u16,
}

impl Calibrator {
    /// Create a calibrator for a `width` x `height` display
    pub fn new(profile: CalibrationProfile, width: u16, height: u16) -> Result<Self, ConfigError> {
        if !profile.is_valid() {
            return Err(ConfigError::InvalidCalibration);
        }
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyDisplay);
        }
        Ok(Self {
            profile,
            width,
            height,
        })
    }

    /// Get the calibration profile
    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Interpolate a raw X reading onto `[0, width]`
    pub fn scale_x(&self, raw: u16) -> u16 {
        scale(raw, self.profile.x_min, self.profile.x_max, self.width)
    }

    /// Interpolate a raw Y reading onto `[0, height]`
    pub fn scale_y(&self, raw: u16) -> u16 {
        scale(raw, self.profile.y_min, self.profile.y_max, self.height)
    }

    /// Calibrate a raw sample into a point inside `[0, width) x [0, height)`
    pub fn calibrate(&self, sample: RawSample) -> Point {
        Point::new(
            self.scale_x(sample.x).min(self.width - 1),
            self.scale_y(sample.y).min(self.height - 1),
        )
    }
}

/// Affine map with the raw value clamped to the calibrated range first
fn scale(raw: u16, min: u16, max: u16, dimension: u16) -> u16 {
    let raw = raw.clamp(min, max);
    let offset = u32::from(raw - min);
    let span = u32::from(max - min);
    // offset <= span, so the quotient never exceeds `dimension`
    (offset * u32::from(dimension) / span) as u16
}
