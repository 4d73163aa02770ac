//! Widget storage

use glasspane_core::engine::{Align, Geometry, TextAreaOptions, TextStyle, WidgetKind};
use glasspane_core::flow::EventBinding;
use heapless::String;

/// Text capacity of a single widget, sized for the largest text area
pub const MAX_TEXT: usize = 128;

/// One node of the scene graph
#[derive(Debug, Clone)]
pub struct Widget {
    /// Widget type
    pub kind: WidgetKind,
    /// Index of the parent widget
    pub parent: Option<u16>,
    /// Index of the screen this widget belongs to
    pub root: u16,
    /// Position and size relative to the parent
    pub geometry: Geometry,
    /// Text content
    pub text: String<MAX_TEXT>,
    /// Font and color hints
    pub style: TextStyle,
    /// Alignment inside the parent
    pub align: Align,
    /// Content may scroll
    pub scrollable: bool,
    /// Text input limits, for text areas
    pub text_area: Option<TextAreaOptions>,
    /// Event binding reported to the event sink
    pub binding: Option<EventBinding>,
    /// Pointer is currently held on this widget
    pub pressed: bool,
}

impl Widget {
    /// Create a widget with default styling
    pub fn new(kind: WidgetKind, parent: Option<u16>, root: u16) -> Self {
        Self {
            kind,
            parent,
            root,
            geometry: Geometry::content(0, 0),
            text: String::new(),
            style: TextStyle::NONE,
            align: Align::TopLeft,
            scrollable: kind == WidgetKind::Screen,
            text_area: None,
            binding: None,
            pressed: false,
        }
    }

    /// Maximum characters this widget accepts
    pub fn text_limit(&self) -> usize {
        match self.text_area {
            Some(options) => options.max_length as usize,
            None => MAX_TEXT,
        }
    }
}
