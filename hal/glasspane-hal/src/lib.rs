//! Glasspane Hardware Abstraction Layer
//!
//! This crate defines the hardware boundaries the panel core consumes.
//! Concrete drivers (ILI9341, XPT2046, ...) implement them, which keeps
//! the adapter and scheduler logic testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (glasspane-firmware)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  glasspane-core (adapters, scheduler)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  glasspane-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │   ILI9341     │       │   XPT2046     │
//! │  (SPI panel)  │       │  (digitizer)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`panel::PanelController`] - Windowed pixel writes to a display controller
//! - [`digitizer::Digitizer`] - Single-point touch sampling
//! - [`clock::MonotonicClock`] - Millisecond time base

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod digitizer;
pub mod panel;
pub mod rotation;

// Re-export key traits at crate root for convenience
pub use clock::MonotonicClock;
pub use digitizer::{Digitizer, RawSample, RAW_MAX};
pub use panel::PanelController;
pub use rotation::Rotation;
