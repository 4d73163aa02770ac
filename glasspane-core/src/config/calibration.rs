//! Touch calibration profile
//!
//! Factory-measured raw bounds of the digitizer, one pair per axis.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw digitizer bounds per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationProfile {
    /// Raw X reading at the left edge
    pub x_min: u16,
    /// Raw X reading at the right edge
    pub x_max: u16,
    /// Raw Y reading at the top edge
    pub y_min: u16,
    /// Raw Y reading at the bottom edge
    pub y_max: u16,
}

impl CalibrationProfile {
    /// Bounds measured on the reference 2.8" XPT2046 panel
    pub const REFERENCE: Self = Self::new(200, 3700, 240, 3800);

    /// Create a new calibration profile
    pub const fn new(x_min: u16, x_max: u16, y_min: u16, y_max: u16) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Check that each axis has a non-empty raw range
    pub const fn is_valid(&self) -> bool {
        self.x_min < self.x_max && self.y_min < self.y_max
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_profile_is_valid() {
        assert!(CalibrationProfile::REFERENCE.is_valid());
        assert_eq!(CalibrationProfile::default(), CalibrationProfile::REFERENCE);
    }

    #[test]
    fn test_degenerate_axis_is_invalid() {
        assert!(!CalibrationProfile::new(200, 200, 240, 3800).is_valid());
        assert!(!CalibrationProfile::new(200, 3700, 3800, 240).is_valid());
    }
}
