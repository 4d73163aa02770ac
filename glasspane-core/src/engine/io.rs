//! Capabilities the engine calls back into
//!
//! These replace free-function callbacks: the panel core implements them
//! with its adapters and lends them to the engine for one
//! [`GuiEngine::timer_handler`](super::GuiEngine::timer_handler) call.

use super::types::{Area, PointerSample, WidgetEvent};
use crate::flow::EventBinding;

/// Flush completion signal
///
/// The sink must call [`FlushSignal::flush_ready`] exactly once per flush,
/// before returning. Only then may the engine reuse the render buffer.
pub trait FlushSignal {
    /// Report that the pixel block has been consumed
    fn flush_ready(&mut self);
}

/// Receiver of dirty-rectangle pixel blocks
pub trait DisplaySink {
    /// Write `pixels` (row-major, `area.width() * area.height()` entries)
    /// to `area` and signal `done`
    fn flush(&mut self, area: &Area, pixels: &[u16], done: &mut dyn FlushSignal);
}

/// Pull-based pointer input
pub trait PointerSource {
    /// Read the most recent pointer state
    fn read_pointer(&mut self) -> PointerSample;
}

/// Receiver of widget events
pub trait EventSink {
    /// Handle one event raised on a widget carrying `binding`
    fn dispatch(&mut self, binding: &EventBinding, event: &WidgetEvent);
}

/// Capabilities lent to the engine for one driver iteration
pub struct EngineIo<'a> {
    /// Display flush path
    pub display: &'a mut dyn DisplaySink,
    /// Pointer input path
    pub pointer: &'a mut dyn PointerSource,
    /// Widget event path
    pub events: &'a mut dyn EventSink,
}

impl<'a> EngineIo<'a> {
    /// Bundle the three capabilities
    pub fn new(
        display: &'a mut dyn DisplaySink,
        pointer: &'a mut dyn PointerSource,
        events: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            display,
            pointer,
            events,
        }
    }
}
