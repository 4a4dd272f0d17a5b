//! Held-key tracking
//!
//! Key events arrive whenever the platform delivers them; the game loop reads
//! the latest snapshot once per tick. No queueing, no debouncing.

use std::collections::HashSet;

use crate::sim::{PaddleIntent, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
}

impl Key {
    /// Map a platform key identifier (`KeyboardEvent.key`) to a game key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            _ => None,
        }
    }
}

/// Live set of currently held keys
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    held: HashSet<Key>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down; unknown keys are ignored
    pub fn press(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.insert(key);
        }
    }

    /// Key came up; unknown keys are ignored
    pub fn release(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Forget every held key (focus loss can swallow key-up events)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Tick input for the current frame; drives the left paddle only
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            player: PaddleIntent {
                up: self.is_held(Key::Up),
                down: self.is_held(Key::Down),
            },
            ..Default::default()
        }
    }
}
