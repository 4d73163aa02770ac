//! Touch input path
//!
//! Raw digitizer samples are calibrated into logical display pixels and
//! reported to the engine on demand.

pub mod adapter;
pub mod calibrator;

pub use adapter::InputAdapter;
pub use calibrator::Calibrator;
