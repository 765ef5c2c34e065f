//! Gesture handler
//!
//! Maps bound key sequences to resource reports. Each gesture runs to
//! completion (sample, format, speak) before control returns to the event
//! loop.

use super::{HandlerAction, KeyAction, KeySequence};
use crate::resources::{ProbeError, ResourceAction};
use crate::state::State;
use crate::Result;
use log::debug;
use std::collections::HashMap;

/// Handles the gestures in the keymap and lets everything else through
pub struct GestureHandler {
    keymap: HashMap<KeySequence, KeyAction>,
}

impl GestureHandler {
    pub fn new(keymap: HashMap<KeySequence, KeyAction>) -> Self {
        debug!("Creating gesture handler with {} bindings", keymap.len());
        Self { keymap }
    }

    /// Look up the action bound to a key sequence
    pub fn action_for(&self, key: &[u8]) -> Option<KeyAction> {
        self.keymap.get(key).copied()
    }

    /// Process a key read from the user's terminal
    ///
    /// `focus` resolves the focused process; it is only called when the key
    /// is a report gesture.
    pub fn process_key<F>(&mut self, key: &[u8], state: &mut State, focus: F) -> Result<HandlerAction>
    where
        F: FnOnce() -> std::result::Result<Option<u32>, ProbeError>,
    {
        let Some(action) = self.action_for(key) else {
            return Ok(HandlerAction::Passthrough);
        };
        debug!("Gesture: {:?}", action);

        let resource = match action {
            KeyAction::ReportCpuCores => ResourceAction::CpuCores,
            KeyAction::ReportMemory => ResourceAction::Memory,
            KeyAction::ReportAverageCpu => ResourceAction::AverageCpu,
            KeyAction::Silence => {
                state.cancel_speech()?;
                return Ok(HandlerAction::Handled);
            }
        };

        state.cancel_speech()?;
        state.report(resource, focus())?;
        Ok(HandlerAction::Handled)
    }
}
