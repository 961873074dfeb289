//! Keyboard input delivered to the live minigame

use serde::{Deserialize, Serialize};

/// Arrow direction (also the marker kinds and mascot moves)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::Right => "right",
        }
    }

    /// Unit step in screen space (y grows downward)
    pub fn delta(&self) -> glam::Vec2 {
        match self {
            Direction::Left => glam::Vec2::new(-1.0, 0.0),
            Direction::Right => glam::Vec2::new(1.0, 0.0),
            Direction::Up => glam::Vec2::new(0.0, -1.0),
            Direction::Down => glam::Vec2::new(0.0, 1.0),
        }
    }
}

/// A key as the minigames understand it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Arrow(Direction),
    /// Upper-case letter or digit
    Symbol(char),
    /// Anything else (ignored by every minigame)
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Key {
        match key {
            "ArrowLeft" | "Left" => Key::Arrow(Direction::Left),
            "ArrowRight" | "Right" => Key::Arrow(Direction::Right),
            "ArrowUp" | "Up" => Key::Arrow(Direction::Up),
            "ArrowDown" | "Down" => Key::Arrow(Direction::Down),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => {
                        Key::Symbol(c.to_ascii_uppercase())
                    }
                    _ => Key::Other,
                }
            }
        }
    }

    pub fn arrow(&self) -> Option<Direction> {
        match self {
            Key::Arrow(dir) => Some(*dir),
            _ => None,
        }
    }
}

/// Key transition from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

/// Watches typed characters for a secret word
#[derive(Debug, Clone)]
pub struct CheatBuffer {
    word: &'static str,
    typed: String,
}

impl CheatBuffer {
    /// Typing this ends the session on the spot
    pub const GAME_OVER: &'static str = "gameover";

    pub fn new(word: &'static str) -> Self {
        Self {
            word,
            typed: String::with_capacity(word.len()),
        }
    }

    /// Feed one DOM key; true when the word has just been completed
    pub fn push(&mut self, key: &str) -> bool {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return false;
        };
        self.typed.push(c.to_ascii_lowercase());
        let excess = self.typed.chars().count().saturating_sub(self.word.len());
        if excess > 0 {
            self.typed = self.typed.chars().skip(excess).collect();
        }
        if self.typed == self.word {
            self.typed.clear();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::Arrow(Direction::Left));
        assert_eq!(Key::from_dom("Down"), Key::Arrow(Direction::Down));
        assert_eq!(Key::from_dom("q"), Key::Symbol('Q'));
        assert_eq!(Key::from_dom("7"), Key::Symbol('7'));
        assert_eq!(Key::from_dom("Shift"), Key::Other);
        assert_eq!(Key::from_dom(" "), Key::Other);
        assert_eq!(Key::from_dom("ç"), Key::Other);
    }

    #[test]
    fn test_cheat_word_detected_with_noise() {
        let mut cheat = CheatBuffer::new(CheatBuffer::GAME_OVER);
        let mut fired = false;
        for key in ["x", "g", "a", "m", "e", "Shift", "o", "v", "e"] {
            fired |= cheat.push(key);
        }
        assert!(!fired);
        assert!(cheat.push("R"));
        // Buffer resets after firing
        assert!(!cheat.push("r"));
    }
}
