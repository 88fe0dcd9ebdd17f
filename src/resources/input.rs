//! Per-frame keyboard snapshot.
//!
//! The platform samples the full key space once per input phase and hands the
//! resulting [`KeyboardState`] to every live actor. Key names are parsed from the
//! `[controls]` section of the config file via [`Key::from_str`].

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Fixed key-code space understood by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub const COUNT: usize = 11;

    pub const ALL: [Key; Key::COUNT] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Space,
        Key::Escape,
        Key::Enter,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::W => "W",
            Key::A => "A",
            Key::S => "S",
            Key::D => "D",
            Key::Space => "Space",
            Key::Escape => "Escape",
            Key::Enter => "Enter",
            Key::Up => "Up",
            Key::Down => "Down",
            Key::Left => "Left",
            Key::Right => "Right",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = ConfigError;

    /// Case-insensitive; also accepts `Esc`, `Return` and `ArrowUp`-style names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "space" => Key::Space,
            "escape" | "esc" => Key::Escape,
            "enter" | "return" => Key::Enter,
            "up" | "arrowup" => Key::Up,
            "down" | "arrowdown" => Key::Down,
            "left" | "arrowleft" => Key::Left,
            "right" | "arrowright" => Key::Right,
            _ => return Err(ConfigError::UnknownKey(s.to_string())),
        };
        Ok(key)
    }
}

/// Snapshot of which keys are held down this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    down: [bool; Key::COUNT],
}

impl KeyboardState {
    /// Snapshot with only `keys` held.
    pub fn with_pressed(keys: &[Key]) -> Self {
        let mut state = Self::default();
        for key in keys {
            state.set(*key, true);
        }
        state
    }

    /// Build a snapshot by querying `is_down` for every key in the key space.
    pub fn sample(mut is_down: impl FnMut(Key) -> bool) -> Self {
        let mut state = Self::default();
        for key in Key::ALL {
            state.set(key, is_down(key));
        }
        state
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.down[key.index()] = down;
    }

    pub fn any_down(&self) -> bool {
        self.down.iter().any(|d| *d)
    }
}
