//! Minimal retained scene engine for Glasspane panels
//!
//! Implements the `glasspane-core` GUI engine boundary with:
//!
//! - A fixed-capacity widget pool (screens, labels, buttons, image buttons,
//!   text areas) with absolute positioning and centre alignment
//! - Dirty-area tracking and band-wise rendering into a borrowed partial
//!   buffer, drawn with `embedded-graphics` primitives and mono fonts
//! - Periodic pointer polling with press/release/click hit-testing
//!
//! There is no layout engine, no font rasterizer and no image decoder;
//! image buttons render as outlined boxes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod band;
pub mod engine;
pub mod error;
pub mod render;
pub mod widget;

pub use engine::{SceneEngine, INPUT_PERIOD_MS, MAX_WIDGETS, REFRESH_PERIOD_MS};
pub use error::SceneError;
