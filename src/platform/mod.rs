//! Platform abstraction layer
//!
//! Turns raw key events (browser `KeyboardEvent.key` names) into the
//! per-tick input the simulation consumes.

use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Start,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Enter" => Some(Key::Start),
            _ => None,
        }
    }
}

/// Held-key state between frames
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    left: bool,
    right: bool,
    start: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is one the game uses
    pub fn key_down(&mut self, name: &str) -> bool {
        match Key::from_key_name(name) {
            Some(Key::Left) => self.left = true,
            Some(Key::Right) => self.right = true,
            Some(Key::Start) => self.start = true,
            None => return false,
        }
        true
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        match Key::from_key_name(name) {
            Some(Key::Left) => self.left = false,
            Some(Key::Right) => self.right = false,
            // Start is one-shot; cleared when consumed
            Some(Key::Start) => {}
            None => return false,
        }
        true
    }

    /// Input for this frame. Start is consumed.
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            start: self.start,
        };
        self.start = false;
        input
    }

    /// Release everything (window blur)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_persist() {
        let mut keys = KeyState::new();
        assert!(keys.key_down("ArrowLeft"));
        assert_eq!(keys.take_input().direction(), -1);
        assert_eq!(keys.take_input().direction(), -1);
        keys.key_up("ArrowLeft");
        assert_eq!(keys.take_input().direction(), 0);
    }

    #[test]
    fn test_start_is_one_shot() {
        let mut keys = KeyState::new();
        keys.key_down("Enter");
        assert!(keys.take_input().start);
        assert!(!keys.take_input().start);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut keys = KeyState::new();
        assert!(!keys.key_down("q"));
        assert_eq!(keys.take_input(), TickInput::default());
    }

    #[test]
    fn test_release_all() {
        let mut keys = KeyState::new();
        keys.key_down("d");
        keys.key_down(" ");
        keys.release_all();
        assert_eq!(keys.take_input(), TickInput::default());
    }
}
