//! Navigation flow
//!
//! A small stand-in for the generated flow program: it hands out one state
//! token per screen and turns the settings button's action into a pending
//! screen change that the main loop applies between iterations.

use defmt::{debug, info};
use glasspane_core::engine::WidgetEvent;
use glasspane_core::flow::{FlowEngine, FlowStateToken};
use glasspane_core::registry::ScreenId;

/// Flow object the settings image button routes to
const SETTINGS_OBJECT: u16 = 4;
/// Action of that object that opens the menu
const OPEN_MENU_ACTION: u16 = 0;

/// Flow engine driving screen navigation
pub struct NavigationFlow {
    screen_names: &'static [&'static str],
    pending: Option<ScreenId>,
    propagations: u32,
}

impl NavigationFlow {
    /// Create a flow with no pending navigation
    pub const fn new() -> Self {
        Self {
            screen_names: &[],
            pending: None,
            propagations: 0,
        }
    }

    /// Screen change requested by the last propagated action, if any
    pub fn take_navigation(&mut self) -> Option<ScreenId> {
        self.pending.take()
    }

    /// Number of events propagated so far
    pub fn propagations(&self) -> u32 {
        self.propagations
    }
}

impl FlowEngine for NavigationFlow {
    fn init_screen_names(&mut self, names: &'static [&'static str]) {
        info!("Flow screens: {}", names);
        self.screen_names = names;
    }

    fn init_object_names(&mut self, names: &'static [&'static str]) {
        info!("Flow objects: {}", names);
    }

    fn flow_state(&mut self, instance: u16, screen: u16) -> FlowStateToken {
        FlowStateToken::from_raw(((instance as u32) << 16) | screen as u32)
    }

    fn propagate(
        &mut self,
        state: FlowStateToken,
        object_index: u16,
        action_index: u16,
        event: &WidgetEvent,
    ) {
        self.propagations = self.propagations.wrapping_add(1);
        debug!(
            "Flow action: state={} object={} action={} event={}",
            state, object_index, action_index, event
        );

        if object_index == SETTINGS_OBJECT && action_index == OPEN_MENU_ACTION {
            let screen = (state.raw() & 0xFFFF) as usize;
            let from = self.screen_names.get(screen).copied().unwrap_or("?");
            info!("Opening menu from {}", from);
            self.pending = Some(ScreenId::Menu);
        }
    }
}
