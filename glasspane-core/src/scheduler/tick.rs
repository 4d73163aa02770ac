//! Scheduler state and iteration

use embedded_hal::delay::DelayNs;
use glasspane_hal::MonotonicClock;

use super::LoopBody;

/// Tick scheduler over a monotonic clock
pub struct TickScheduler<C> {
    clock: C,
    last_tick: u32,
    yield_ms: u32,
    iterations: u32,
}

impl<C: MonotonicClock> TickScheduler<C> {
    /// Create a scheduler; the first iteration measures from now
    pub fn new(clock: C, yield_ms: u32) -> Self {
        let last_tick = clock.now_ms();
        Self {
            clock,
            last_tick,
            yield_ms,
            iterations: 0,
        }
    }

    /// Run one iteration without yielding
    ///
    /// Returns the elapsed milliseconds handed to the body. Elapsed time is
    /// recomputed from absolute clock reads, so jitter in the yield never
    /// accumulates.
    pub fn step<B: LoopBody>(&mut self, body: &mut B) -> Result<u32, B::Error> {
        let now = self.clock.now_ms();
        let elapsed = now.wrapping_sub(self.last_tick);
        body.advance(elapsed);
        self.last_tick = now;
        self.iterations = self.iterations.wrapping_add(1);

        body.drive()?;
        Ok(elapsed)
    }

    /// Run forever on a blocking delay
    ///
    /// Only returns when the body reports a fatal error.
    pub fn run_blocking<B, D>(&mut self, body: &mut B, delay: &mut D) -> B::Error
    where
        B: LoopBody,
        D: DelayNs,
    {
        loop {
            if let Err(e) = self.step(body) {
                return e;
            }
            delay.delay_ms(self.yield_ms);
        }
    }

    /// Yield quantum between iterations (ms)
    pub fn yield_ms(&self) -> u32 {
        self.yield_ms
    }

    /// Clock reading at the last iteration
    pub fn last_tick(&self) -> u32 {
        self.last_tick
    }

    /// Completed iterations (wrapping)
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Borrow the clock
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use proptest::prelude::*;

    /// Clock advanced by hand
    struct FakeClock(Cell<u32>);

    impl FakeClock {
        fn at(ms: u32) -> Self {
            Self(Cell::new(ms))
        }

        fn advance(&self, ms: u32) {
            self.0.set(self.0.get().wrapping_add(ms));
        }
    }

    impl MonotonicClock for &FakeClock {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    /// Body that records what it was given
    #[derive(Default)]
    struct CountingBody {
        total_ms: u64,
        advances: u32,
        drives: u32,
        fail_after: Option<u32>,
    }

    impl LoopBody for CountingBody {
        type Error = &'static str;

        fn advance(&mut self, elapsed_ms: u32) {
            self.total_ms += elapsed_ms as u64;
            self.advances += 1;
        }

        fn drive(&mut self) -> Result<(), Self::Error> {
            self.drives += 1;
            match self.fail_after {
                Some(n) if self.drives > n => Err("halt"),
                _ => Ok(()),
            }
        }
    }

    /// Delay that only accumulates requested time
    #[derive(Default)]
    struct RecordingDelay {
        total_ns: u64,
        calls: u32,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
            self.calls += 1;
        }
    }

    #[test]
    fn test_first_step_measures_from_creation() {
        let clock = FakeClock::at(1_000);
        let mut scheduler = TickScheduler::new(&clock, 5);
        let mut body = CountingBody::default();

        clock.advance(7);
        assert_eq!(scheduler.step(&mut body), Ok(7));
        assert_eq!(scheduler.last_tick(), 1_007);
        assert_eq!(body.drives, 1);
    }

    #[test]
    fn test_no_time_passed() {
        let clock = FakeClock::at(50);
        let mut scheduler = TickScheduler::new(&clock, 5);
        let mut body = CountingBody::default();

        assert_eq!(scheduler.step(&mut body), Ok(0));
        assert_eq!(scheduler.step(&mut body), Ok(0));
        assert_eq!(body.advances, 2);
    }

    #[test]
    fn test_clock_wraparound() {
        let clock = FakeClock::at(u32::MAX - 2);
        let mut scheduler = TickScheduler::new(&clock, 5);
        let mut body = CountingBody::default();

        clock.advance(10);
        assert_eq!(scheduler.step(&mut body), Ok(10));
        assert_eq!(scheduler.last_tick(), 7);
    }

    #[test]
    fn test_run_blocking_yields_between_iterations() {
        let clock = FakeClock::at(0);
        let mut scheduler = TickScheduler::new(&clock, 5);
        let mut body = CountingBody {
            fail_after: Some(3),
            ..Default::default()
        };
        let mut delay = RecordingDelay::default();

        let err = scheduler.run_blocking(&mut body, &mut delay);

        assert_eq!(err, "halt");
        assert_eq!(body.drives, 4);
        assert_eq!(scheduler.iterations(), 4);
        // Three successful iterations, each followed by a 5 ms yield
        assert_eq!(delay.total_ns, 3 * 5_000_000);
        assert!(delay.calls >= 3);
    }

    proptest! {
        #[test]
        fn prop_cumulative_elapsed_matches_clock(
            start in any::<u32>(),
            deltas in proptest::collection::vec(0u32..10_000, 0..64),
        ) {
            let clock = FakeClock::at(start);
            let mut scheduler = TickScheduler::new(&clock, 5);
            let mut body = CountingBody::default();

            let mut reported = 0u64;
            for delta in &deltas {
                clock.advance(*delta);
                reported += scheduler.step(&mut body).unwrap() as u64;
            }

            let expected: u64 = deltas.iter().map(|d| *d as u64).sum();
            prop_assert_eq!(reported, expected);
            prop_assert_eq!(body.total_ms, expected);
            prop_assert_eq!(
                clock.0.get().wrapping_sub(start) as u64,
                expected % (1u64 << 32)
            );
        }
    }
}
