//! Event-flow bridge
//!
//! Interaction events on registered widgets are forwarded, uninterpreted,
//! to an external flow engine that runs the UI's action program.

pub mod bridge;

pub use bridge::{EventBinding, FlowBridge};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::WidgetEvent;

/// Opaque per-screen-instance handle issued by the flow engine
///
/// The core passes it through and never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlowStateToken(u32);

impl FlowStateToken {
    /// Wrap a flow-engine identifier
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the flow-engine identifier
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// External flow engine call contract
pub trait FlowEngine {
    /// Publish the ordered screen name table
    fn init_screen_names(&mut self, names: &'static [&'static str]);

    /// Publish the ordered object name table
    fn init_object_names(&mut self, names: &'static [&'static str]);

    /// Look up the state token of a screen
    ///
    /// - `instance`: Parent flow instance (0 for top-level screens)
    /// - `screen`: Screen index in the screen name table
    fn flow_state(&mut self, instance: u16, screen: u16) -> FlowStateToken;

    /// Propagate a widget event into the flow program
    ///
    /// - `object_index`: Screen-local index of the component that fired
    /// - `action_index`: Output of that component to activate
    fn propagate(
        &mut self,
        state: FlowStateToken,
        object_index: u16,
        action_index: u16,
        event: &WidgetEvent,
    );
}
