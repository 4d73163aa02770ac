//! Pointer input adapter
//!
//! Engine-driven polling: the engine calls [`PointerSource::read_pointer`]
//! when it wants fresh data, and the adapter queries the digitizer once.
//! Single most-recent-sample semantics, no queueing, no multi-touch.

use glasspane_hal::Digitizer;

use super::calibrator::Calibrator;
use crate::engine::{Point, PointerSample, PointerSource};

/// Digitizer-backed pointer source
pub struct InputAdapter<D> {
    digitizer: D,
    calibrator: Calibrator,
    /// Samples lighter than this are treated as no contact
    min_pressure: u16,
    /// Position of the last accepted press
    last_point: Point,
    /// Sample retrievals that failed while touched
    read_failures: u32,
}

impl<D: Digitizer> InputAdapter<D> {
    /// Create a new input adapter
    ///
    /// # Arguments
    /// - `digitizer`: The touch controller to poll
    /// - `calibrator`: Raw-to-logical transform
    /// - `min_pressure`: Pressure gate (0 accepts every sample)
    pub fn new(digitizer: D, calibrator: Calibrator, min_pressure: u16) -> Self {
        Self {
            digitizer,
            calibrator,
            min_pressure,
            last_point: Point::default(),
            read_failures: 0,
        }
    }

    /// Get the calibrator
    pub fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    /// Get mutable access to the digitizer
    pub fn digitizer_mut(&mut self) -> &mut D {
        &mut self.digitizer
    }

    /// Number of failed sample retrievals so far
    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }
}

impl<D: Digitizer> PointerSource for InputAdapter<D> {
    fn read_pointer(&mut self) -> PointerSample {
        if !self.digitizer.touched() {
            return PointerSample::released(self.last_point);
        }

        match self.digitizer.get_point() {
            Ok(sample) if sample.z >= self.min_pressure => {
                let point = self.calibrator.calibrate(sample);
                self.last_point = point;
                PointerSample::pressed(point)
            }
            Ok(_) => PointerSample::released(self.last_point),
            Err(_) => {
                // Touched but unreadable: never report a stale press
                self.read_failures = self.read_failures.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("digitizer sample failed, reporting release");
                PointerSample::released(self.last_point)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalibrationProfile;
    use crate::engine::PointerState;
    use glasspane_hal::RawSample;

    /// Scripted digitizer for testing
    struct MockDigitizer {
        touched: bool,
        sample: Result<RawSample, ()>,
        point_reads: u32,
    }

    impl MockDigitizer {
        fn new() -> Self {
            Self {
                touched: false,
                sample: Ok(RawSample::default()),
                point_reads: 0,
            }
        }
    }

    impl Digitizer for MockDigitizer {
        type Error = ();

        fn touched(&mut self) -> bool {
            self.touched
        }

        fn get_point(&mut self) -> Result<RawSample, Self::Error> {
            self.point_reads += 1;
            self.sample
        }
    }

    fn adapter(min_pressure: u16) -> InputAdapter<MockDigitizer> {
        let cal = Calibrator::new(CalibrationProfile::REFERENCE, 320, 240).unwrap();
        InputAdapter::new(MockDigitizer::new(), cal, min_pressure)
    }

    #[test]
    fn test_press_is_calibrated() {
        let mut input = adapter(0);
        input.digitizer_mut().touched = true;
        input.digitizer_mut().sample = Ok(RawSample::new(1950, 2020, 800));

        let sample = input.read_pointer();
        assert_eq!(sample.state, PointerState::Pressed);
        assert_eq!(sample.point, Point::new(160, 120));
    }

    #[test]
    fn test_no_touch_reports_release() {
        let mut input = adapter(0);

        // Press first, then lift
        input.digitizer_mut().touched = true;
        input.digitizer_mut().sample = Ok(RawSample::new(1950, 2020, 800));
        assert!(input.read_pointer().is_pressed());

        input.digitizer_mut().touched = false;
        for _ in 0..3 {
            let sample = input.read_pointer();
            assert_eq!(sample.state, PointerState::Released);
            // Last press position is carried, not altered
            assert_eq!(sample.point, Point::new(160, 120));
        }
        // No sample retrieval while untouched
        assert_eq!(input.digitizer_mut().point_reads, 1);
    }

    #[test]
    fn test_read_failure_defaults_to_release() {
        let mut input = adapter(0);
        input.digitizer_mut().touched = true;
        input.digitizer_mut().sample = Err(());

        let sample = input.read_pointer();
        assert_eq!(sample.state, PointerState::Released);
        assert_eq!(input.read_failures(), 1);
    }

    #[test]
    fn test_pressure_gate() {
        let mut input = adapter(300);
        input.digitizer_mut().touched = true;
        input.digitizer_mut().sample = Ok(RawSample::new(1950, 2020, 120));
        assert_eq!(input.read_pointer().state, PointerState::Released);

        input.digitizer_mut().sample = Ok(RawSample::new(1950, 2020, 300));
        assert_eq!(input.read_pointer().state, PointerState::Pressed);
    }

    #[test]
    fn test_out_of_range_press_is_clamped() {
        let mut input = adapter(0);
        input.digitizer_mut().touched = true;
        input.digitizer_mut().sample = Ok(RawSample::new(4000, 10, 900));

        let sample = input.read_pointer();
        assert_eq!(sample.point, Point::new(319, 0));
    }
}
