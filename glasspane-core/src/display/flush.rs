//! Partial-framebuffer flush adapter
//!
//! Invoked by the engine once per dirty rectangle, on the scheduler's
//! thread, never reentrant. The completion signal is always raised before
//! returning, including when the transport fails, so the engine never
//! stalls waiting for its buffer. A failed area is remembered and handed
//! back to the scheduler, which invalidates it for the next frame.

use glasspane_hal::PanelController;

use crate::engine::{Area, DisplaySink, FlushSignal};

/// Why a flush did not reach the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushFault {
    /// Controller transport reported an error
    Transport,
    /// Pixel block shorter than the area
    ShortBuffer,
    /// Area lies entirely off the panel
    OffScreen,
}

/// Display sink writing to a [`PanelController`]
pub struct FlushAdapter<P> {
    panel: P,
    width: u16,
    height: u16,
    swap_bytes: bool,
    /// Bounding box of areas whose transfer failed
    retry: Option<Area>,
    /// Number of failed flushes
    failures: u32,
}

impl<P: PanelController> FlushAdapter<P> {
    /// Create a flush adapter for an initialized panel
    ///
    /// # Arguments
    /// - `panel`: The display controller
    /// - `swap_bytes`: Send each pixel high byte first
    pub fn new(panel: P, swap_bytes: bool) -> Self {
        let (width, height) = panel.dimensions();
        Self {
            panel,
            width,
            height,
            swap_bytes,
            retry: None,
            failures: 0,
        }
    }

    /// Get the panel controller
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Get mutable access to the panel controller
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Take the area that must be redrawn because a transfer failed
    pub fn take_retry(&mut self) -> Option<Area> {
        self.retry.take()
    }

    /// Number of failed flushes so far
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Write one dirty rectangle
    fn write(&mut self, area: &Area, pixels: &[u16]) -> Result<(), FlushFault> {
        if pixels.len() < area.pixel_count() {
            return Err(FlushFault::ShortBuffer);
        }
        let screen = Area::full(self.width, self.height).ok_or(FlushFault::OffScreen)?;
        let visible = area.intersect(&screen).ok_or(FlushFault::OffScreen)?;

        self.panel.begin_write().map_err(|_| FlushFault::Transport)?;
        let streamed = self.stream(area, &visible, pixels);
        // Close the transaction even when streaming failed
        let closed = self.panel.end_write().map_err(|_| FlushFault::Transport);
        streamed.and(closed)
    }

    /// Address `visible` and stream its pixels out of the block for `area`
    fn stream(&mut self, area: &Area, visible: &Area, pixels: &[u16]) -> Result<(), FlushFault> {
        // visible lies inside the panel, so its corners fit in u16
        self.panel
            .set_address_window(
                visible.x1 as u16,
                visible.y1 as u16,
                visible.width() as u16,
                visible.height() as u16,
            )
            .map_err(|_| FlushFault::Transport)?;

        let count = area.pixel_count();
        if visible == area {
            return self
                .panel
                .push_pixels(&pixels[..count], self.swap_bytes)
                .map_err(|_| FlushFault::Transport);
        }

        // Clipped: stream the visible part of each row
        let stride = area.width() as usize;
        let skip = (visible.x1 - area.x1) as usize;
        let run = visible.width() as usize;
        for row in visible.y1..=visible.y2 {
            let start = (row - area.y1) as usize * stride + skip;
            self.panel
                .push_pixels(&pixels[start..start + run], self.swap_bytes)
                .map_err(|_| FlushFault::Transport)?;
        }
        Ok(())
    }
}

impl<P: PanelController> DisplaySink for FlushAdapter<P> {
    fn flush(&mut self, area: &Area, pixels: &[u16], done: &mut dyn FlushSignal) {
        match self.write(area, pixels) {
            Ok(()) => {}
            Err(FlushFault::Transport) => {
                self.failures = self.failures.saturating_add(1);
                self.retry = Some(match self.retry {
                    Some(pending) => pending.union(area),
                    None => *area,
                });
                #[cfg(feature = "defmt")]
                defmt::warn!("flush failed, area queued for redraw: {}", area);
            }
            Err(_fault) => {
                self.failures = self.failures.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("flush dropped: {}", _fault);
            }
        }
        done.flush_ready();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Panel that records every call
    struct RecordingPanel {
        windows: heapless::Vec<(u16, u16, u16, u16), 8>,
        pixels: usize,
        begins: u32,
        ends: u32,
        swapped: bool,
        fail_push: bool,
    }

    impl RecordingPanel {
        fn new() -> Self {
            Self {
                windows: heapless::Vec::new(),
                pixels: 0,
                begins: 0,
                ends: 0,
                swapped: false,
                fail_push: false,
            }
        }
    }

    impl PanelController for RecordingPanel {
        type Error = ();

        fn begin_write(&mut self) -> Result<(), ()> {
            self.begins += 1;
            Ok(())
        }

        fn set_address_window(&mut self, x: u16, y: u16, w: u16, h: u16) -> Result<(), ()> {
            self.windows.push((x, y, w, h)).map_err(|_| ())
        }

        fn push_pixels(&mut self, pixels: &[u16], swap_bytes: bool) -> Result<(), ()> {
            if self.fail_push {
                return Err(());
            }
            self.pixels += pixels.len();
            self.swapped = swap_bytes;
            Ok(())
        }

        fn end_write(&mut self) -> Result<(), ()> {
            self.ends += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u16, u16) {
            (320, 240)
        }
    }

    /// Counts completion signals
    struct CountingSignal(u32);

    impl FlushSignal for CountingSignal {
        fn flush_ready(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_flush_writes_exact_window() {
        let mut sink = FlushAdapter::new(RecordingPanel::new(), true);
        let area = Area::from_origin(10, 20, 30, 4).unwrap();
        let pixels = [0xF800u16; 120];
        let mut done = CountingSignal(0);

        sink.flush(&area, &pixels, &mut done);

        let panel = sink.panel_mut();
        assert_eq!(panel.windows.as_slice(), &[(10, 20, 30, 4)]);
        assert_eq!(panel.pixels, 120);
        assert!(panel.swapped);
        assert_eq!(panel.begins, 1);
        assert_eq!(panel.ends, 1);
        assert_eq!(done.0, 1);
    }

    #[test]
    fn test_flush_ignores_buffer_tail() {
        // Engine buffers are larger than most dirty areas
        let mut sink = FlushAdapter::new(RecordingPanel::new(), false);
        let area = Area::from_origin(0, 0, 2, 2).unwrap();
        let pixels = [0u16; 7680];
        let mut done = CountingSignal(0);

        sink.flush(&area, &pixels, &mut done);
        assert_eq!(sink.panel_mut().pixels, 4);
        assert_eq!(done.0, 1);
    }

    #[test]
    fn test_transport_failure_signals_and_queues_retry() {
        let mut panel = RecordingPanel::new();
        panel.fail_push = true;
        let mut sink = FlushAdapter::new(panel, true);
        let mut done = CountingSignal(0);

        let first = Area::new(0, 0, 9, 9);
        let second = Area::new(100, 50, 109, 59);
        sink.flush(&first, &[0; 100], &mut done);
        sink.flush(&second, &[0; 100], &mut done);

        assert_eq!(done.0, 2);
        assert_eq!(sink.failures(), 2);
        // Transaction closed despite the failure
        assert_eq!(sink.panel_mut().ends, 2);
        assert_eq!(sink.take_retry(), Some(Area::new(0, 0, 109, 59)));
        assert_eq!(sink.take_retry(), None);
    }

    #[test]
    fn test_short_buffer_is_dropped() {
        let mut sink = FlushAdapter::new(RecordingPanel::new(), true);
        let mut done = CountingSignal(0);

        sink.flush(&Area::new(0, 0, 9, 9), &[0; 50], &mut done);

        assert_eq!(done.0, 1);
        assert_eq!(sink.panel_mut().begins, 0);
        assert_eq!(sink.take_retry(), None);
    }

    #[test]
    fn test_partially_off_screen_area_is_clipped() {
        let mut sink = FlushAdapter::new(RecordingPanel::new(), true);
        let mut done = CountingSignal(0);

        // 20x4 block hanging 10 columns past the right edge
        let area = Area::from_origin(310, 0, 20, 4).unwrap();
        sink.flush(&area, &[0; 80], &mut done);

        let panel = sink.panel_mut();
        assert_eq!(panel.windows.as_slice(), &[(310, 0, 10, 4)]);
        assert_eq!(panel.pixels, 40);
        assert_eq!(done.0, 1);
    }

    #[test]
    fn test_off_screen_area_still_signals() {
        let mut sink = FlushAdapter::new(RecordingPanel::new(), true);
        let mut done = CountingSignal(0);

        sink.flush(&Area::new(400, 300, 409, 309), &[0; 100], &mut done);

        assert_eq!(done.0, 1);
        assert_eq!(sink.panel_mut().begins, 0);
    }

    proptest! {
        #[test]
        fn prop_flush_streams_visible_pixels_once(
            x in -64i32..384,
            y in -64i32..304,
            width in 1u32..80,
            height in 1u32..80,
        ) {
            let mut sink = FlushAdapter::new(RecordingPanel::new(), true);
            let area = Area::from_origin(x, y, width, height).unwrap();
            let pixels = vec![0x07E0u16; (width * height) as usize];
            let mut done = CountingSignal(0);

            sink.flush(&area, &pixels, &mut done);

            let left = x.max(0);
            let top = y.max(0);
            let right = (x + width as i32 - 1).min(319);
            let bottom = (y + height as i32 - 1).min(239);

            let panel = sink.panel_mut();
            if left > right || top > bottom {
                prop_assert_eq!(panel.begins, 0);
                prop_assert_eq!(panel.pixels, 0);
            } else {
                let visible_w = (right - left + 1) as u16;
                let visible_h = (bottom - top + 1) as u16;
                prop_assert_eq!(
                    panel.windows.as_slice(),
                    &[(left as u16, top as u16, visible_w, visible_h)]
                );
                prop_assert_eq!(panel.pixels, visible_w as usize * visible_h as usize);
                prop_assert_eq!(panel.begins, 1);
                prop_assert_eq!(panel.ends, 1);
            }
            prop_assert_eq!(done.0, 1);
        }
    }
}
