//! Forwarding layer between widget events and the flow engine

use super::{FlowEngine, FlowStateToken};
use crate::engine::{EventCode, EventSink, WidgetEvent};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Routing attached to an interactive widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventBinding {
    /// State token of the screen that owns the widget
    pub state: FlowStateToken,
    /// Screen-local component index
    pub object_index: u16,
    /// Component output to activate
    pub action_index: u16,
    /// Only events of this type are forwarded
    pub filter: EventCode,
}

impl EventBinding {
    /// Check if an event passes this binding's filter
    pub fn accepts(&self, event: &WidgetEvent) -> bool {
        event.code == self.filter
    }
}

/// Event sink forwarding filtered events to a [`FlowEngine`]
///
/// Holds no state of its own.
pub struct FlowBridge<'a, F: ?Sized> {
    flow: &'a mut F,
}

impl<'a, F: FlowEngine + ?Sized> FlowBridge<'a, F> {
    /// Create a bridge over a flow engine
    pub fn new(flow: &'a mut F) -> Self {
        Self { flow }
    }
}

impl<F: FlowEngine + ?Sized> EventSink for FlowBridge<'_, F> {
    fn dispatch(&mut self, binding: &EventBinding, event: &WidgetEvent) {
        if binding.accepts(event) {
            self.flow.propagate(
                binding.state,
                binding.object_index,
                binding.action_index,
                event,
            );
        }
    }
}
