//! # Input Manager
//!
//! Collects window and device events between frames and turns them into a
//! [`ProcessedInputState`] snapshot:
//! - keyboard keys are tracked as an old/new pair of pressed flags so every key
//!   reports its transition for the frame
//! - raw mouse motion is summed into a cumulative cursor position, which keeps working
//!   while the cursor is locked to the window
//! - window focus is tracked here, since losing it releases every key and stops
//!   mouse motion from being recorded

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{ProcessedInputState, RawInputState};

/// Keys the engine reacts to
pub const KEY_CODES: [KeyCode; 11] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::KeyQ,
    KeyCode::KeyE,
    KeyCode::ShiftLeft,
    KeyCode::Escape,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
];

/// How a focus event changed the window's focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Gained,
    Lost,
    Unchanged,
}

/// Manages the state of all input devices and processes input events.
pub struct InputManager {
    /// Pressed flags of all tracked keys as of the previous snapshot
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Pressed flags of all tracked keys as of now
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Sum of all raw mouse motion received so far
    pub cursor_position: Option<(f64, f64)>,

    /// Whether the window has keyboard focus
    focused: bool,
}

impl InputManager {
    /// Creates an input manager with every tracked key released, no cursor sample, and
    /// the window focused.
    pub fn new() -> Self {
        let keyboard_inputs_old = KEY_CODES.iter().map(|key| (*key, false)).collect();
        let keyboard_inputs_new = KEY_CODES.iter().map(|key| (*key, false)).collect();

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            cursor_position: None,
            focused: true,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Records a focus event. Losing focus releases every key.
    pub fn set_focused(&mut self, focused: bool) -> FocusChange {
        let change = match (self.focused, focused) {
            (false, true) => FocusChange::Gained,
            (true, false) => FocusChange::Lost,
            _ => FocusChange::Unchanged,
        };
        self.focused = focused;

        if change == FocusChange::Lost {
            self.reset_inputs();
        }
        change
    }

    /// Processes a window event and updates the tracked key flags.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state,
                    physical_key: PhysicalKey::Code(key),
                    ..
                },
            ..
        } = event
        {
            self.set_key_pressed(*key, *state == ElementState::Pressed);
        }
    }

    /// Records the pressed flag of a key. Untracked keys are ignored.
    pub fn set_key_pressed(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Adds a raw mouse motion delta to the cumulative cursor position.
    ///
    /// Motion received while unfocused is dropped so the view does not jump on refocus.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.focused {
            return;
        }
        let (x, y) = self.cursor_position.unwrap_or((0.0, 0.0));
        self.cursor_position = Some((x + delta.0, y + delta.1));
    }

    /// Builds the snapshot for the current frame from the old and new key flags.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            cursor_position: self.cursor_position,
        }
    }

    /// Returns the snapshot for this frame and makes the current flags the old ones.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.move_old_states();
        processed_input
    }

    /// Copies the current key flags into the old ones.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }

    /// Releases every key.
    ///
    /// Called when the window loses focus, since release events for keys held at that
    /// moment are delivered to another window.
    pub fn reset_inputs(&mut self) {
        for key_state in self.keyboard_inputs_new.values_mut() {
            *key_state = false;
        }
        self.move_old_states();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use crate::application_state::input_state::RawInputState;

    use super::{FocusChange, InputManager};

    #[test]
    fn key_transitions_across_frames() {
        let mut input_manager = InputManager::new();

        input_manager.set_key_pressed(KeyCode::KeyW, true);
        let first = input_manager.get_and_reset_processed_input();
        assert_eq!(first.get_key_state(KeyCode::KeyW), RawInputState::Pressed);

        let second = input_manager.get_and_reset_processed_input();
        assert_eq!(second.get_key_state(KeyCode::KeyW), RawInputState::Held);

        input_manager.set_key_pressed(KeyCode::KeyW, false);
        let third = input_manager.get_and_reset_processed_input();
        assert_eq!(third.get_key_state(KeyCode::KeyW), RawInputState::Released);

        let fourth = input_manager.get_and_reset_processed_input();
        assert_eq!(fourth.get_key_state(KeyCode::KeyW), RawInputState::NotPressed);
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut input_manager = InputManager::new();
        input_manager.set_key_pressed(KeyCode::KeyZ, true);

        let input = input_manager.get_and_reset_processed_input();
        assert!(!input.keyboard_states.contains_key(&KeyCode::KeyZ));
    }

    #[test]
    fn mouse_motion_accumulates_into_a_cursor_position() {
        let mut input_manager = InputManager::new();
        assert_eq!(input_manager.create_processed_input_state().cursor_position, None);

        input_manager.intake_mouse_motion((10.0, -4.0));
        input_manager.intake_mouse_motion((2.5, 1.0));
        let input = input_manager.get_and_reset_processed_input();
        assert_eq!(input.cursor_position, Some((12.5, -3.0)));

        // The position survives the per-frame reset.
        let next = input_manager.get_and_reset_processed_input();
        assert_eq!(next.cursor_position, Some((12.5, -3.0)));
    }

    #[test]
    fn focus_changes_are_reported_once() {
        let mut input_manager = InputManager::new();
        assert!(input_manager.is_focused());

        assert_eq!(input_manager.set_focused(true), FocusChange::Unchanged);
        assert_eq!(input_manager.set_focused(false), FocusChange::Lost);
        assert!(!input_manager.is_focused());
        assert_eq!(input_manager.set_focused(false), FocusChange::Unchanged);
        assert_eq!(input_manager.set_focused(true), FocusChange::Gained);
        assert!(input_manager.is_focused());
    }

    #[test]
    fn mouse_motion_while_unfocused_is_dropped() {
        let mut input_manager = InputManager::new();
        input_manager.intake_mouse_motion((5.0, 5.0));

        input_manager.set_focused(false);
        input_manager.intake_mouse_motion((100.0, -50.0));
        input_manager.set_focused(true);
        input_manager.intake_mouse_motion((1.0, 1.0));

        let input = input_manager.get_and_reset_processed_input();
        assert_eq!(input.cursor_position, Some((6.0, 6.0)));
    }

    #[test]
    fn focus_loss_via_event_releases_held_keys() {
        let mut input_manager = InputManager::new();
        input_manager.set_key_pressed(KeyCode::KeyW, true);
        input_manager.get_and_reset_processed_input();

        input_manager.set_focused(false);

        let input = input_manager.get_and_reset_processed_input();
        assert_eq!(input.get_key_state(KeyCode::KeyW), RawInputState::NotPressed);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut input_manager = InputManager::new();
        input_manager.set_key_pressed(KeyCode::ShiftLeft, true);
        input_manager.get_and_reset_processed_input();

        input_manager.reset_inputs();

        let input = input_manager.get_and_reset_processed_input();
        assert_eq!(input.get_key_state(KeyCode::ShiftLeft), RawInputState::NotPressed);
    }
}
