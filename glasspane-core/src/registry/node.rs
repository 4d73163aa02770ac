//! Static screen description

use super::{ObjectSlot, ScreenId};
use crate::engine::{Align, EventCode, Geometry, TextAreaOptions, TextStyle, WidgetKind};
use crate::flow::FlowEngine;

/// Flow routing for an interactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventRoute {
    /// Only this event type is forwarded
    pub filter: EventCode,
    /// Screen-local component index in the flow program
    pub object_index: u16,
    /// Component output to activate
    pub action_index: u16,
}

/// One widget in a screen's node table
///
/// Node 0 is the screen root. Every other node names an earlier node as
/// its parent, so a single forward pass materializes the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// Widget class
    pub kind: WidgetKind,
    /// Index of the parent node (`None` only for the root)
    pub parent: Option<u8>,
    /// Position and size
    pub geometry: Geometry,
    /// Initial text
    pub text: Option<&'static str>,
    /// Text style hints
    pub style: TextStyle,
    /// Alignment inside the parent
    pub align: Align,
    /// Scrolling override
    pub scrollable: Option<bool>,
    /// Text area configuration
    pub text_area: Option<TextAreaOptions>,
    /// Object table slot receiving this node's handle
    pub object: Option<ObjectSlot>,
    /// Flow routing for events on this node
    pub route: Option<EventRoute>,
}

impl Node {
    const fn base(kind: WidgetKind, parent: Option<u8>, geometry: Geometry) -> Self {
        Self {
            kind,
            parent,
            geometry,
            text: None,
            style: TextStyle::NONE,
            align: Align::TopLeft,
            scrollable: None,
            text_area: None,
            object: None,
            route: None,
        }
    }

    /// Screen root covering the whole display
    pub const fn screen(width: u16, height: u16) -> Self {
        Self::base(WidgetKind::Screen, None, Geometry::fixed(0, 0, width, height))
    }

    /// Child of node `parent`
    pub const fn child(kind: WidgetKind, parent: u8, geometry: Geometry) -> Self {
        Self::base(kind, Some(parent), geometry)
    }

    /// Static text content
    pub const fn text(mut self, text: &'static str) -> Self {
        self.text = Some(text);
        self
    }

    /// Font height in pixels
    pub const fn font(mut self, px: u8) -> Self {
        self.style.font_px = Some(px);
        self
    }

    /// Text color as 0xAARRGGBB
    pub const fn color(mut self, argb: u32) -> Self {
        self.style.color = Some(argb);
        self
    }

    /// Alignment inside the parent
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Override the engine's default scroll behavior
    pub const fn scrollable(mut self, scrollable: bool) -> Self {
        self.scrollable = Some(scrollable);
        self
    }

    /// Text input limits
    pub const fn text_area(mut self, max_length: u16, one_line: bool, password: bool) -> Self {
        self.text_area = Some(TextAreaOptions {
            max_length,
            one_line,
            password,
        });
        self
    }

    /// Store this node's handle in an object slot
    pub const fn object(mut self, slot: ObjectSlot) -> Self {
        self.object = Some(slot);
        self
    }

    /// Route `filter` events to flow component `object_index`, output
    /// `action_index`
    pub const fn on(mut self, filter: EventCode, object_index: u16, action_index: u16) -> Self {
        self.route = Some(EventRoute {
            filter,
            object_index,
            action_index,
        });
        self
    }
}

/// State lent to a screen's tick routine
pub struct TickContext<'a> {
    /// Screen being ticked
    pub screen: ScreenId,
    /// Flow engine
    pub flow: &'a mut dyn FlowEngine,
}

/// Registered screen
pub struct ScreenDescriptor {
    /// Screen identity
    pub id: ScreenId,
    /// Node table, root first
    pub nodes: &'static [Node],
    /// Per-iteration routine, run while the screen is active
    pub tick: fn(&mut TickContext<'_>),
}
