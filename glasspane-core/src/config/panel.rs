//! Panel configuration
//!
//! Display geometry, draw buffer sizing, touch gating and loop pacing.

use glasspane_hal::Rotation;

use super::calibration::CalibrationProfile;
use crate::scheduler::DEFAULT_YIELD_MS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration defects detected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    EmptyDisplay,
    /// Calibration has min >= max on an axis
    InvalidCalibration,
    /// Draw buffer divisor is zero or larger than the frame
    InvalidDrawBuffer,
}

/// Complete panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Logical display width in pixels (after rotation)
    pub width: u16,
    /// Logical display height in pixels (after rotation)
    pub height: u16,
    /// Display and digitizer rotation
    pub rotation: Rotation,
    /// Touch calibration bounds
    pub calibration: CalibrationProfile,
    /// Draw buffer holds `width * height / draw_buffer_divisor` pixels
    pub draw_buffer_divisor: u16,
    /// Minimum digitizer pressure accepted as a press
    pub min_pressure: u16,
    /// Sleep between scheduler iterations in milliseconds
    pub yield_ms: u32,
    /// Send pixels high byte first
    pub swap_bytes: bool,
}

impl PanelConfig {
    /// Reference 320x240 landscape ILI9341 + XPT2046 board
    pub const REFERENCE: Self = Self {
        width: 320,
        height: 240,
        rotation: Rotation::LandscapeFlipped,
        calibration: CalibrationProfile::REFERENCE,
        draw_buffer_divisor: 10,
        min_pressure: 300,
        yield_ms: DEFAULT_YIELD_MS,
        swap_bytes: true,
    };

    /// Number of pixels in one full frame
    pub const fn frame_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of pixels the partial draw buffer holds
    pub const fn draw_buffer_pixels(&self) -> usize {
        if self.draw_buffer_divisor == 0 {
            return 0;
        }
        self.frame_pixels() / self.draw_buffer_divisor as usize
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyDisplay);
        }
        if !self.calibration.is_valid() {
            return Err(ConfigError::InvalidCalibration);
        }
        // A partial buffer must hold at least one full row so a dirty
        // rectangle can always be banded
        if self.draw_buffer_divisor == 0 || self.draw_buffer_pixels() < self.width as usize {
            return Err(ConfigError::InvalidDrawBuffer);
        }
        Ok(())
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_config() {
        let config = PanelConfig::REFERENCE;
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_pixels(), 76_800);
        assert_eq!(config.draw_buffer_pixels(), 7_680);
        assert_eq!(config.yield_ms, DEFAULT_YIELD_MS);
    }

    #[test]
    fn test_rejects_empty_display() {
        let config = PanelConfig {
            width: 0,
            ..PanelConfig::REFERENCE
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyDisplay));
    }

    #[test]
    fn test_rejects_bad_calibration() {
        let config = PanelConfig {
            calibration: CalibrationProfile::new(3700, 200, 240, 3800),
            ..PanelConfig::REFERENCE
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidCalibration));
    }

    #[test]
    fn test_rejects_bad_draw_buffer() {
        let zero = PanelConfig {
            draw_buffer_divisor: 0,
            ..PanelConfig::REFERENCE
        };
        assert_eq!(zero.validate(), Err(ConfigError::InvalidDrawBuffer));
        assert_eq!(zero.draw_buffer_pixels(), 0);

        // 240 rows / 241 leaves less than one row
        let too_small = PanelConfig {
            draw_buffer_divisor: 241,
            ..PanelConfig::REFERENCE
        };
        assert_eq!(too_small.validate(), Err(ConfigError::InvalidDrawBuffer));
    }
}
