//! Retained-mode GUI engine boundary
//!
//! The engine owns the scene graph, layout and rendering. This module only
//! describes what the panel core needs from it and what it hands back:
//!
//! - [`GuiEngine`]: time advancement, the per-iteration driver, display and
//!   pointer registration, invalidation and screen loading
//! - [`WidgetTree`]: the structural construction calls the screen registry
//!   issues while materializing screens
//! - [`DisplaySink`] / [`PointerSource`] / [`EventSink`]: capabilities the
//!   engine calls back into during [`GuiEngine::timer_handler`]

pub mod io;
pub mod types;

pub use io::{DisplaySink, EngineIo, EventSink, FlushSignal, PointerSource};
pub use types::*;

use crate::flow::EventBinding;

/// Structural widget construction
///
/// Styling beyond the hints carried here (fonts, colors, images) is the
/// engine's business.
pub trait WidgetTree {
    /// Error type for construction calls
    type Error;

    /// Create a widget; `parent == None` creates a top-level screen
    fn create(
        &mut self,
        kind: WidgetKind,
        parent: Option<WidgetHandle>,
    ) -> Result<WidgetHandle, Self::Error>;

    /// Position and size a widget relative to its parent
    fn set_geometry(&mut self, widget: WidgetHandle, geometry: Geometry)
        -> Result<(), Self::Error>;

    /// Replace a widget's text
    fn set_text(&mut self, widget: WidgetHandle, text: &str) -> Result<(), Self::Error>;

    /// Apply text style hints
    fn set_text_style(&mut self, widget: WidgetHandle, style: TextStyle)
        -> Result<(), Self::Error>;

    /// Align a widget inside its parent
    fn set_align(&mut self, widget: WidgetHandle, align: Align) -> Result<(), Self::Error>;

    /// Enable or disable scrolling of a container
    fn set_scrollable(&mut self, widget: WidgetHandle, scrollable: bool)
        -> Result<(), Self::Error>;

    /// Configure a text area
    fn configure_text_area(
        &mut self,
        widget: WidgetHandle,
        options: TextAreaOptions,
    ) -> Result<(), Self::Error>;

    /// Attach an event binding; every event on the widget is reported
    /// through [`EventSink::dispatch`] with this binding
    fn attach_event(&mut self, widget: WidgetHandle, binding: EventBinding)
        -> Result<(), Self::Error>;
}

/// Runtime side of the engine
pub trait GuiEngine: WidgetTree {
    /// Register the display sink geometry and draw buffer mode
    fn register_display(&mut self, registration: DisplayRegistration) -> Result<(), Self::Error>;

    /// Register a pointer input device
    fn register_pointer(&mut self) -> Result<(), Self::Error>;

    /// Install the default theme
    fn apply_theme(&mut self, theme: Theme);

    /// Advance the engine's time base
    fn tick_inc(&mut self, elapsed_ms: u32);

    /// Run one iteration: poll input if due, run timers, render dirty areas
    /// and flush them through `io`
    fn timer_handler(&mut self, io: EngineIo<'_>);

    /// Mark an area for redraw on the next render
    fn invalidate(&mut self, area: Area);

    /// Make a top-level screen the active one
    fn load_screen(&mut self, screen: WidgetHandle) -> Result<(), Self::Error>;
}
