//! Value types shared across the engine boundary

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Screen-space rectangle with inclusive corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    /// Left column
    pub x1: i32,
    /// Top row
    pub y1: i32,
    /// Right column (inclusive)
    pub x2: i32,
    /// Bottom row (inclusive)
    pub y2: i32,
}

impl Area {
    /// Create an area from inclusive corners
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create an area from an origin and a size
    ///
    /// Returns `None` for an empty size.
    pub fn from_origin(x: i32, y: i32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x1: x,
            y1: y,
            x2: x.saturating_add(width as i32 - 1),
            y2: y.saturating_add(height as i32 - 1),
        })
    }

    /// Full-screen area for a display of the given size
    pub fn full(width: u16, height: u16) -> Option<Self> {
        Self::from_origin(0, 0, width as u32, height as u32)
    }

    /// Width in pixels (0 for inverted corners)
    pub fn width(&self) -> u32 {
        if self.x2 < self.x1 {
            0
        } else {
            (self.x2 - self.x1) as u32 + 1
        }
    }

    /// Height in pixels (0 for inverted corners)
    pub fn height(&self) -> u32 {
        if self.y2 < self.y1 {
            0
        } else {
            (self.y2 - self.y1) as u32 + 1
        }
    }

    /// Number of pixels covered
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Intersection with another area, if any
    pub fn intersect(&self, other: &Area) -> Option<Area> {
        let area = Area {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        if area.x1 > area.x2 || area.y1 > area.y2 {
            None
        } else {
            Some(area)
        }
    }

    /// Smallest area covering both
    pub fn union(&self, other: &Area) -> Area {
        Area {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Check whether a point lies inside
    pub fn contains(&self, point: Point) -> bool {
        let (x, y) = (point.x as i32, point.y as i32);
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// Logical display coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    /// Column
    pub x: u16,
    /// Row
    pub y: u16,
}

impl Point {
    /// Create a new point
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Binary pointer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerState {
    /// Contact present
    Pressed,
    /// No contact
    #[default]
    Released,
}

/// One pointer reading handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerSample {
    /// Logical position (meaningful only while pressed)
    pub point: Point,
    /// Contact state
    pub state: PointerState,
}

impl PointerSample {
    /// A press at `point`
    pub const fn pressed(point: Point) -> Self {
        Self {
            point,
            state: PointerState::Pressed,
        }
    }

    /// A release; `point` is the last known position
    pub const fn released(point: Point) -> Self {
        Self {
            point,
            state: PointerState::Released,
        }
    }

    /// Check if the sample reports contact
    pub fn is_pressed(&self) -> bool {
        self.state == PointerState::Pressed
    }
}

/// Opaque reference into the engine's object graph
///
/// Handles are issued by the engine; holders never dereference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetHandle(u16);

impl WidgetHandle {
    /// Wrap an engine-internal identifier
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Get the engine-internal identifier
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Widget classes the registry can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    /// Top-level screen container
    Screen,
    /// Static or dynamic text
    Label,
    /// Push button (children carry its caption)
    Button,
    /// Button drawn from an image
    ImageButton,
    /// Editable text field
    TextArea,
}

impl WidgetKind {
    /// Check if widgets of this kind take pointer input
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            WidgetKind::Button | WidgetKind::ImageButton | WidgetKind::TextArea
        )
    }
}

/// One dimension of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dim {
    /// Fixed size in pixels
    Px(u16),
    /// Sized to content by the engine
    Content,
}

/// Position (relative to the parent) and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Column offset from the parent's origin
    pub x: i16,
    /// Row offset from the parent's origin
    pub y: i16,
    /// Width
    pub width: Dim,
    /// Height
    pub height: Dim,
}

impl Geometry {
    /// Fixed-size geometry
    pub const fn fixed(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width: Dim::Px(width),
            height: Dim::Px(height),
        }
    }

    /// Content-sized geometry
    pub const fn content(x: i16, y: i16) -> Self {
        Self {
            x,
            y,
            width: Dim::Content,
            height: Dim::Content,
        }
    }
}

/// Alignment inside the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    /// Offset from the parent's top-left corner
    #[default]
    TopLeft,
    /// Offset from the parent's centre
    Center,
}

/// Text style hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    /// Requested font height in pixels (engine picks the closest)
    pub font_px: Option<u8>,
    /// Text color as 0xAARRGGBB
    pub color: Option<u32>,
}

impl TextStyle {
    /// No hints
    pub const NONE: Self = Self {
        font_px: None,
        color: None,
    };

    /// Check if any hint is set
    pub fn is_set(&self) -> bool {
        self.font_px.is_some() || self.color.is_some()
    }
}

/// Text area options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextAreaOptions {
    /// Maximum number of characters
    pub max_length: u16,
    /// Single-line mode
    pub one_line: bool,
    /// Mask input
    pub password: bool,
}

/// Widget interaction types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventCode {
    /// Pointer went down on the widget
    Pressed,
    /// Pointer released after pressing the widget
    Released,
    /// Released while still over the widget
    Clicked,
    /// Value of an input widget changed
    ValueChanged,
}

/// Raw event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetEvent {
    /// Interaction type
    pub code: EventCode,
    /// Widget the event was raised on
    pub target: WidgetHandle,
    /// Pointer position when the event was raised
    pub point: Point,
}

/// Theme palette entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Palette {
    /// Material blue
    Blue,
    /// Material red
    Red,
}

impl Palette {
    /// Main shade as 0xRRGGBB
    pub const fn main_rgb(self) -> u32 {
        match self {
            Palette::Blue => 0x2196F3,
            Palette::Red => 0xF44336,
        }
    }
}

/// Default theme installed before any screen is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Theme {
    /// Primary accent (buttons)
    pub primary: Palette,
    /// Secondary accent (focus, errors)
    pub secondary: Palette,
    /// Dark background
    pub dark: bool,
}

impl Theme {
    /// Dark blue/red theme used by every screen
    pub const DEFAULT: Self = Self {
        primary: Palette::Blue,
        secondary: Palette::Red,
        dark: true,
    };
}

/// How the engine fills its draw buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderMode {
    /// Buffer smaller than the frame; dirty areas are rendered in bands
    Partial,
}

/// Display registration handed to the engine at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayRegistration {
    /// Logical width in pixels
    pub width: u16,
    /// Logical height in pixels
    pub height: u16,
    /// Draw buffer size in pixels
    pub buffer_pixels: usize,
    /// Render mode
    pub render_mode: RenderMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_dimensions() {
        let area = Area::new(10, 20, 19, 24);
        assert_eq!(area.width(), 10);
        assert_eq!(area.height(), 5);
        assert_eq!(area.pixel_count(), 50);

        let inverted = Area::new(5, 5, 4, 4);
        assert_eq!(inverted.pixel_count(), 0);
    }

    #[test]
    fn test_area_from_origin() {
        assert_eq!(
            Area::from_origin(270, 190, 50, 50),
            Some(Area::new(270, 190, 319, 239))
        );
        assert_eq!(Area::from_origin(0, 0, 0, 10), None);
        assert_eq!(Area::full(320, 240), Some(Area::new(0, 0, 319, 239)));
    }

    #[test]
    fn test_area_intersect_and_union() {
        let screen = Area::new(0, 0, 319, 239);
        let overhang = Area::new(300, 230, 340, 250);
        assert_eq!(screen.intersect(&overhang), Some(Area::new(300, 230, 319, 239)));
        assert_eq!(screen.intersect(&Area::new(400, 0, 410, 10)), None);
        assert_eq!(
            Area::new(0, 0, 9, 9).union(&Area::new(20, 5, 29, 30)),
            Area::new(0, 0, 29, 30)
        );
    }

    #[test]
    fn test_area_contains() {
        let button = Area::new(270, 190, 319, 239);
        assert!(button.contains(Point::new(270, 190)));
        assert!(button.contains(Point::new(319, 239)));
        assert!(!button.contains(Point::new(269, 200)));
    }

    #[test]
    fn test_interactive_kinds() {
        assert!(WidgetKind::Button.is_interactive());
        assert!(WidgetKind::ImageButton.is_interactive());
        assert!(WidgetKind::TextArea.is_interactive());
        assert!(!WidgetKind::Label.is_interactive());
        assert!(!WidgetKind::Screen.is_interactive());
    }
}
