//! Keyboard state
//!
//! The browser pushes key transitions as they arrive; the game loop reads one
//! [`TickInput`] snapshot at the top of each frame. Keys are tracked by their
//! physical `KeyboardEvent.code` so layouts don't matter.

use std::collections::HashSet;

use crate::sim::TickInput;

const RIGHT_KEYS: [&str; 2] = ["ArrowRight", "KeyD"];
const LEFT_KEYS: [&str; 2] = ["ArrowLeft", "KeyA"];
const JUMP_KEYS: [&str; 3] = ["Space", "ArrowUp", "KeyW"];
const PAUSE_KEY: &str = "Escape";

/// Held-key table plus the one-shot pause request
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<String>,
    pause_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Escape is edge-triggered and never held.
    pub fn key_down(&mut self, code: &str) {
        if code == PAUSE_KEY {
            self.pause_requested = true;
            return;
        }
        self.held.insert(code.to_string());
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Drop every held key (focus loss, level change)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pause_requested = false;
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    fn any_held(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.held.contains(*c))
    }

    /// Consume a pending pause request
    pub fn take_pause_request(&mut self) -> bool {
        std::mem::take(&mut self.pause_requested)
    }

    /// Snapshot of the held controls for one tick
    pub fn tick_input(&self) -> TickInput {
        let move_right = self.any_held(&RIGHT_KEYS);
        TickInput {
            // Right wins when both directions are held
            move_left: !move_right && self.any_held(&LEFT_KEYS),
            move_right,
            jump: self.any_held(&JUMP_KEYS),
        }
    }
}

/// Keys the page should not scroll or otherwise act on
pub fn is_game_key(code: &str) -> bool {
    code == PAUSE_KEY
        || RIGHT_KEYS.contains(&code)
        || LEFT_KEYS.contains(&code)
        || JUMP_KEYS.contains(&code)
}
