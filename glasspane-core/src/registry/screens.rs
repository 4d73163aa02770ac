//! Screen tables
//!
//! Structure mirrors the UI export: one root per screen, children in
//! creation order. Coordinates are relative to the parent.

use super::{Node, ObjectSlot, ScreenDescriptor, ScreenId, TickContext, SCREEN_COUNT};
use crate::engine::{Align, EventCode, Geometry, WidgetKind};

const WIDTH: u16 = 320;
const HEIGHT: u16 = 240;

/// Clock color (opaque red)
const CLOCK_COLOR: u32 = 0xFFF7_0000;

/// Main screen: clock, date and the settings button
pub static MAIN_NODES: [Node; 7] = [
    Node::screen(WIDTH, HEIGHT)
        .object(ObjectSlot::Main)
        .scrollable(false),
    Node::child(WidgetKind::Label, 0, Geometry::content(9, 15))
        .text("00:00")
        .font(48)
        .color(CLOCK_COLOR)
        .object(ObjectSlot::Obj0),
    Node::child(WidgetKind::Label, 0, Geometry::content(9, 67)).text("CN, 09-09-2025"),
    Node::child(WidgetKind::Label, 0, Geometry::content(148, 41)).text("PM"),
    Node::child(WidgetKind::ImageButton, 0, Geometry::fixed(270, 190, 50, 50))
        .object(ObjectSlot::BtnSetting)
        .on(EventCode::Released, 4, 0),
    Node::child(WidgetKind::Button, 0, Geometry::fixed(98, 120, 100, 50)),
    Node::child(WidgetKind::Label, 5, Geometry::content(0, 0))
        .text("Button")
        .align(Align::Center),
];

/// Menu screen: save button and a free-text field
pub static MENU_NODES: [Node; 4] = [
    Node::screen(WIDTH, HEIGHT).object(ObjectSlot::Menu),
    Node::child(WidgetKind::Button, 0, Geometry::fixed(110, 205, 100, 35)),
    Node::child(WidgetKind::Label, 1, Geometry::content(0, 0))
        .text("SAVE")
        .font(20)
        .align(Align::Center),
    Node::child(WidgetKind::TextArea, 0, Geometry::fixed(85, 74, 150, 70))
        .text_area(128, false, false),
];

/// Registered screens, indexed by [`ScreenId::index`]
pub static SCREENS: [ScreenDescriptor; SCREEN_COUNT] = [
    ScreenDescriptor {
        id: ScreenId::Main,
        nodes: &MAIN_NODES,
        tick: tick_screen,
    },
    ScreenDescriptor {
        id: ScreenId::Menu,
        nodes: &MENU_NODES,
        tick: tick_screen,
    },
];

/// Resolve the flow state so the flow program sees the screen as live
fn tick_screen(ctx: &mut TickContext<'_>) {
    let _state = ctx.flow.flow_state(0, ctx.screen.index() as u16);
}
