//! Keyboard state
//!
//! Tracks held keys by their `KeyboardEvent.key` value and maps them to the
//! per-frame inputs of each game.

use std::collections::HashSet;

use crate::sim::{Input2d, Input3d};

#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    fn any_down(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.is_down(k))
    }

    /// Arrows move, Space shoots
    pub fn input_2d(&self) -> Input2d {
        Input2d {
            up: self.is_down("ArrowUp"),
            down: self.is_down("ArrowDown"),
            left: self.is_down("ArrowLeft"),
            right: self.is_down("ArrowRight"),
            shoot: self.is_down(" "),
        }
    }

    /// WASD or arrows move. One-shot commands are set by the caller.
    pub fn input_3d(&self) -> Input3d {
        Input3d {
            forward: self.any_down(&["w", "W", "ArrowUp"]),
            back: self.any_down(&["s", "S", "ArrowDown"]),
            left: self.any_down(&["a", "A", "ArrowLeft"]),
            right: self.any_down(&["d", "D", "ArrowRight"]),
            ..Default::default()
        }
    }
}
