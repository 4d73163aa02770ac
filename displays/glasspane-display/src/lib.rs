//! Display controller and digitizer drivers for Glasspane panels
//!
//! This crate provides blocking drivers over `embedded-hal` 1.0:
//! - [`Ili9341`]: 320x240 RGB565 TFT controller, implements
//!   [`glasspane_hal::PanelController`]
//! - [`Xpt2046`]: 4-wire resistive touch controller, implements
//!   [`glasspane_hal::Digitizer`]
//!
//! # Architecture
//!
//! Each driver owns an [`embedded_hal::spi::SpiDevice`], so chip select is
//! handled per transaction by the bus layer (for example
//! `embedded-hal-bus`'s `ExclusiveDevice`). The display and the digitizer
//! are normally on separate buses.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod ili9341;
pub mod xpt2046;

// Re-export key types
pub use ili9341::{Ili9341, PanelError};
pub use xpt2046::{TouchError, Xpt2046};
