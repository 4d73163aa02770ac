//! Board-agnostic core of the Glasspane panel firmware
//!
//! This crate binds a retained-mode GUI engine to real hardware without
//! depending on any particular board:
//!
//! - Coordinate calibration and the pull-based touch input adapter
//! - The partial-framebuffer display flush adapter
//! - The cooperative tick scheduler
//! - The declarative screen registry
//! - The bridge forwarding widget events into an external flow engine
//! - Panel configuration types
//!
//! Hardware is reached only through the `glasspane-hal` traits; the engine
//! and the flow engine only through the traits in [`engine`] and [`flow`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod engine;
pub mod flow;
pub mod input;
pub mod registry;
pub mod runtime;
pub mod scheduler;

pub use runtime::{Runtime, RuntimeError};
