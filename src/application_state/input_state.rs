//! # Input State
//!
//! This module defines the input state types used by the input manager.
//! It provides enums and structs for representing the state of input devices.

use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Derives the state from the previous and current raw pressed flags
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// A snapshot of the input for one frame.
///
/// Key states carry their transition (pressed, held, released, not pressed). The
/// cursor position is cumulative: the sum of every raw mouse motion received so far,
/// or `None` until the first motion arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedInputState {
    /// Current state of all tracked keyboard keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Cumulative cursor position (x, y)
    pub cursor_position: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// Returns a copy of this snapshot with `key` set to `state`.
    pub fn with_key(mut self, key: KeyCode, state: RawInputState) -> Self {
        self.keyboard_states.insert(key, state);
        self
    }

    /// Returns a copy of this snapshot with the given cursor position.
    pub fn with_cursor(mut self, x: f64, y: f64) -> Self {
        self.cursor_position = Some((x, y));
        self
    }

    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Gets the cumulative cursor position
    pub fn get_cursor_position(&self) -> Option<(f64, f64)> {
        self.cursor_position
    }
}
