//! Panel rotation
//!
//! Shared by the display controller (scan direction) and the digitizer
//! (raw axis remapping) so both agree on which corner is the origin.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Panel rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Rotation {
    /// Native portrait orientation
    #[default]
    Portrait = 0,
    /// Landscape, rotated 90°
    Landscape = 1,
    /// Portrait, rotated 180°
    PortraitFlipped = 2,
    /// Landscape, rotated 270°
    LandscapeFlipped = 3,
}

impl Rotation {
    /// Get the rotation as a quarter-turn count
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a rotation from a quarter-turn count
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Rotation::Portrait),
            1 => Some(Rotation::Landscape),
            2 => Some(Rotation::PortraitFlipped),
            3 => Some(Rotation::LandscapeFlipped),
            _ => None,
        }
    }

    /// Check if this rotation exchanges the panel's width and height
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Landscape | Rotation::LandscapeFlipped)
    }
}
