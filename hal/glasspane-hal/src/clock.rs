//! Monotonic time base

/// Millisecond clock
///
/// The counter is free running and wraps at `u32::MAX`; consumers compute
/// deltas with wrapping arithmetic.
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u32;
}
