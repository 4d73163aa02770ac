//! Touch digitizer abstractions
//!
//! Both operations assume single-point contact.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest value a 12-bit resistive digitizer channel can report
pub const RAW_MAX: u16 = 4095;

/// One raw digitizer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawSample {
    /// Raw X reading
    pub x: u16,
    /// Raw Y reading
    pub y: u16,
    /// Contact pressure (higher = firmer)
    pub z: u16,
}

impl RawSample {
    /// Create a new raw sample
    pub const fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }
}

/// Touch digitizer
pub trait Digitizer {
    /// Error type for sample retrieval
    type Error;

    /// Check whether something is touching the panel
    ///
    /// Transport faults must be reported as "not touched".
    fn touched(&mut self) -> bool;

    /// Fetch one raw sample
    fn get_point(&mut self) -> Result<RawSample, Self::Error>;
}
