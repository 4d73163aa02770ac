//! Configuration types
//!
//! Board-agnostic panel configuration. Values are fixed at build time (the
//! firmware generates them from `panel.toml`); nothing here changes while
//! the loop is running.

pub mod calibration;
pub mod panel;

pub use calibration::*;
pub use panel::*;
