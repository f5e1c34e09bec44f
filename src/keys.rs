//! Keyboard state map
//!
//! A single process-scoped mapping from key identifier to pressed state,
//! written by the host's input listeners and read synchronously by the
//! simulation each tick. Tests inject a synthetic map directly.

use std::collections::HashSet;

/// Live pressed-key set. Key names follow `KeyboardEvent.key`, normalized
/// to lowercase so `A` and `a` are the same key.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: HashSet<String>,
}

impl KeyState {
    fn normalize(key: &str) -> String {
        key.to_lowercase()
    }

    /// Record a key press or release
    pub fn set(&mut self, key: &str, down: bool) {
        let key = Self::normalize(key);
        if down {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.down.contains(&Self::normalize(key))
    }

    /// Release everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.down.clear();
    }

    pub fn left(&self) -> bool {
        self.is_down("ArrowLeft") || self.is_down("a")
    }

    pub fn right(&self) -> bool {
        self.is_down("ArrowRight") || self.is_down("d")
    }

    pub fn fire(&self) -> bool {
        self.is_down(" ") || self.is_down("ArrowUp")
    }
}
