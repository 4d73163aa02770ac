//! Cooperative tick scheduler
//!
//! One loop, one thread. Each iteration reads the monotonic clock, hands
//! the elapsed milliseconds to the loop body, lets the body drive the GUI
//! engine, then yields a fixed quantum.

pub mod tick;

pub use tick::TickScheduler;

/// Reference yield between iterations (ms)
pub const DEFAULT_YIELD_MS: u32 = 5;

/// Work performed once per scheduler iteration
pub trait LoopBody {
    /// Fatal error type; the scheduler stops on it
    type Error;

    /// Advance engine time by `elapsed_ms`
    fn advance(&mut self, elapsed_ms: u32);

    /// Run the engine driver and the active screen's tick routine
    fn drive(&mut self) -> Result<(), Self::Error>;
}
