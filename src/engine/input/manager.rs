// Input manager - turns key events into queued actions

use super::action::{default_bindings, Action, InputSource};
use std::collections::{HashMap, VecDeque};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Queues actions from key presses until the frame drains them
#[derive(Debug)]
pub struct InputManager {
    /// Mapping from input sources to actions; a later binding for the same
    /// source wins
    bindings: HashMap<InputSource, Action>,
    pending: VecDeque<Action>,
}

impl InputManager {
    /// Create an input manager with the given bindings
    pub fn new(bindings: Vec<(InputSource, Action)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            pending: VecDeque::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Queue the bound action for a fresh key press
    pub fn process_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        if state != ElementState::Pressed || repeat {
            return;
        }

        if let Some(&action) = self.bindings.get(&InputSource::key(key_code)) {
            log::debug!("{:?} -> {:?}", key_code, action);
            self.pending.push_back(action);
        }
    }

    /// Take every queued action in press order
    pub fn drain_actions(&mut self) -> Vec<Action> {
        self.pending.drain(..).collect()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(default_bindings())
    }
}
