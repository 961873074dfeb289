//! Platform abstraction layer
//!
//! Key routing is shared by every host; the browser pieces (canvas painter,
//! image store, DOM HUD) only exist on wasm32.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod hud;

use crate::sim::input::{CheatBuffer, InputEvent, Key};

/// Key that toggles the autopilot (idle mode)
pub const AUTOPILOT_KEY: &str = "F2";

/// What the host should do with a raw key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Input(InputEvent),
    Restart,
    ForceGameOver,
    ToggleAutopilot,
}

/// Turns DOM key names into host actions
#[derive(Debug, Clone)]
pub struct KeyRouter {
    cheat: CheatBuffer,
}

impl Default for KeyRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyRouter {
    pub fn new() -> Self {
        Self {
            cheat: CheatBuffer::new(CheatBuffer::GAME_OVER),
        }
    }

    pub fn key_down(&mut self, key: &str, session_active: bool) -> Vec<HostAction> {
        let mut actions = Vec::with_capacity(2);
        if key == AUTOPILOT_KEY {
            actions.push(HostAction::ToggleAutopilot);
            return actions;
        }
        if !session_active {
            if key == "Enter" {
                actions.push(HostAction::Restart);
            }
            return actions;
        }
        actions.push(HostAction::Input(InputEvent::Pressed(Key::from_dom(key))));
        if self.cheat.push(key) {
            actions.push(HostAction::ForceGameOver);
        }
        actions
    }

    pub fn key_up(&self, key: &str) -> HostAction {
        HostAction::Input(InputEvent::Released(Key::from_dom(key)))
    }
}

/// Player name from a `?player=` query string
pub fn player_from_query(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "player")
        .map(|(_, v)| v.replace('+', " ").trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Direction;

    #[test]
    fn test_keys_feed_active_session() {
        let mut router = KeyRouter::new();
        assert_eq!(
            router.key_down("ArrowUp", true),
            vec![HostAction::Input(InputEvent::Pressed(Key::Arrow(Direction::Up)))]
        );
        assert_eq!(
            router.key_up("ArrowUp"),
            HostAction::Input(InputEvent::Released(Key::Arrow(Direction::Up)))
        );
    }

    #[test]
    fn test_enter_restarts_only_from_summary() {
        let mut router = KeyRouter::new();
        assert_eq!(router.key_down("Enter", false), vec![HostAction::Restart]);
        assert_eq!(router.key_down("q", false), vec![]);
        assert_eq!(
            router.key_down("Enter", true),
            vec![HostAction::Input(InputEvent::Pressed(Key::Other))]
        );
    }

    #[test]
    fn test_cheat_word_forces_game_over() {
        let mut router = KeyRouter::new();
        let mut actions = Vec::new();
        for key in "gameover".chars() {
            actions.extend(router.key_down(&key.to_string(), true));
        }
        assert_eq!(actions.last(), Some(&HostAction::ForceGameOver));
        assert_eq!(
            actions.iter().filter(|a| **a == HostAction::ForceGameOver).count(),
            1
        );
    }

    #[test]
    fn test_autopilot_toggle_anywhere() {
        let mut router = KeyRouter::new();
        assert_eq!(router.key_down(AUTOPILOT_KEY, true), vec![HostAction::ToggleAutopilot]);
        assert_eq!(router.key_down(AUTOPILOT_KEY, false), vec![HostAction::ToggleAutopilot]);
    }

    #[test]
    fn test_player_from_query() {
        assert_eq!(player_from_query("?player=Nia"), Some("Nia".into()));
        assert_eq!(player_from_query("?x=1&player=Big+Bo"), Some("Big Bo".into()));
        assert_eq!(player_from_query("?player="), None);
        assert_eq!(player_from_query(""), None);
    }
}
