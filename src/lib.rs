//! Plugie Arcade - a chain of timed reflex minigames
//!
//! Core modules:
//! - `sim`: Minigame state machines, maze generation and the session orchestrator
//! - `summary`: End-of-session summary view
//! - `renderer`: Backend-neutral draw list
//! - `platform`: Key routing for every host; canvas painter and DOM HUD in the browser
//! - `persistence`: JSON storage helper shared by settings and profiles
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod platform;
pub mod profiles;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod summary;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use error::{Error, Result};
pub use profiles::{Profile, Profiles};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal host frame time (60 Hz). Per-frame speeds in tuning are expressed against it.
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Longest step a unit integrates in one update (tab switches, hitches)
    pub const MAX_STEP_MS: f64 = 50.0;

    /// Session lives
    pub const MAX_LIVES: u32 = 4;
    /// Difficulty growth applied each time the minigame list wraps (+20%)
    pub const DIFFICULTY_GROWTH: f32 = 1.2;

    /// Viewport used until the host reports its real size
    pub const DEFAULT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_HEIGHT: f32 = 720.0;
}

/// Convert a per-nominal-frame speed into pixels per millisecond
#[inline]
pub fn per_frame_to_per_ms(px_per_frame: f32) -> f32 {
    px_per_frame / consts::FRAME_MS as f32
}

/// Axis-aligned overlap between a circle's bounding square and a rectangle
///
/// Matches the forgiving exit test of the maze: corners count as touching.
#[inline]
pub fn circle_touches_rect(center: Vec2, radius: f32, min: Vec2, size: Vec2) -> bool {
    center.x + radius > min.x
        && center.x - radius < min.x + size.x
        && center.y + radius > min.y
        && center.y - radius < min.y + size.y
}
