//! Display output path
//!
//! Streams dirty rectangles from the engine's render buffer to the panel
//! controller.

pub mod flush;

pub use flush::{FlushAdapter, FlushFault};
