//! Embassy-backed millisecond clock

use embassy_time::Instant;
use glasspane_hal::MonotonicClock;

/// Uptime in milliseconds, truncated to 32 bits
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
