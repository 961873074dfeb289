//! Data-driven game balance
//!
//! Every knob of the three minigames, with defaults matching the shipped game.
//! Missing JSON fields keep their default.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::sim::reaction::SYMBOLS;

/// Marker-matching rhythm game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    /// Pre-roll before markers start spawning (ms)
    pub preroll_ms: f64,
    pub mistake_limit: u32,
    pub hits_to_win: u32,
    /// Marker sprite size (px)
    pub marker_size: f32,
    /// Height of the bottom band holding the hit zone (px)
    pub band_height: f32,
    /// Hit zone edge length (px)
    pub zone_size: f32,
    /// Maximum marker pairs on screen
    pub max_pairs: usize,
    /// Spawn interval at 1x difficulty (ms), divided by the multiplier
    pub spawn_interval_ms: f64,
    /// Marker speed at 1x difficulty (px per nominal frame)
    pub speed_per_frame: f32,
    /// Delay between the winning hit and the finale (ms)
    pub win_grace_ms: f64,
    /// Finale frame interval (ms)
    pub finale_interval_ms: f64,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            preroll_ms: 500.0,
            mistake_limit: 3,
            hits_to_win: 3,
            marker_size: 120.0,
            band_height: 200.0,
            zone_size: 140.0,
            max_pairs: 9,
            spawn_interval_ms: 1200.0,
            speed_per_frame: 5.0,
            win_grace_ms: 500.0,
            finale_interval_ms: 300.0,
        }
    }
}

/// Type-the-symbols reaction game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionTuning {
    /// Shortest randomized wait (ms)
    pub min_wait_ms: f64,
    /// Longest randomized wait (ms, exclusive)
    pub max_wait_ms: f64,
    /// Wrong keys allowed
    pub mistake_limit: u32,
    /// Distinct symbols the player must press
    pub keys_required: usize,
    /// Discrete approach steps before the threat arrives
    pub countdown_steps: u8,
    /// Base step delay (ms) before dividing by the approach speed
    pub step_delay_ms: f64,
    /// Approach speed at 1x difficulty
    pub approach_speed: f64,
    pub resolve_grace_ms: f64,
    pub finale_interval_ms: f64,
}

impl Default for ReactionTuning {
    fn default() -> Self {
        Self {
            min_wait_ms: 2000.0,
            max_wait_ms: 5000.0,
            mistake_limit: 3,
            keys_required: 3,
            countdown_steps: 6,
            step_delay_ms: 100.0,
            approach_speed: 0.22,
            resolve_grace_ms: 150.0,
            finale_interval_ms: 200.0,
        }
    }
}

/// Maze navigation game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationTuning {
    pub preroll_ms: f64,
    pub cols: usize,
    pub rows: usize,
    /// Cell edge length (px)
    pub cell_size: f32,
    /// Player sprite size (px)
    pub player_size: f32,
    /// Collision radius, smaller than the sprite for forgiveness (px)
    pub player_radius: f32,
    /// Player speed at 1x difficulty (px per nominal frame)
    pub speed_per_frame: f32,
    pub resolve_grace_ms: f64,
    pub finale_interval_ms: f64,
}

impl Default for NavigationTuning {
    fn default() -> Self {
        Self {
            preroll_ms: 500.0,
            cols: 5,
            rows: 6,
            cell_size: 85.0,
            player_size: 36.0,
            player_radius: 15.0,
            speed_per_frame: 4.0,
            resolve_grace_ms: 100.0,
            finale_interval_ms: 100.0,
        }
    }
}

/// Balance for the whole arcade
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub timing: TimingTuning,
    pub reaction: ReactionTuning,
    pub navigation: NavigationTuning,
}

impl Tuning {
    /// Parse tuning overrides from JSON and reject unplayable values
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every knob a round depends on to be winnable and losable
    pub fn validate(&self) -> crate::Result<()> {
        let t = &self.timing;
        at_least_one("timing.mistake_limit", t.mistake_limit as usize)?;
        at_least_one("timing.hits_to_win", t.hits_to_win as usize)?;
        at_least_one("timing.max_pairs", t.max_pairs)?;
        positive("timing.marker_size", t.marker_size as f64)?;
        positive("timing.zone_size", t.zone_size as f64)?;
        positive("timing.spawn_interval_ms", t.spawn_interval_ms)?;
        positive("timing.speed_per_frame", t.speed_per_frame as f64)?;

        let r = &self.reaction;
        at_least_one("reaction.mistake_limit", r.mistake_limit as usize)?;
        at_least_one("reaction.keys_required", r.keys_required)?;
        if r.keys_required > SYMBOLS.len() {
            return Err(invalid(format!(
                "reaction.keys_required must be at most {}, got {}",
                SYMBOLS.len(),
                r.keys_required
            )));
        }
        at_least_one("reaction.countdown_steps", r.countdown_steps as usize)?;
        positive("reaction.step_delay_ms", r.step_delay_ms)?;
        positive("reaction.approach_speed", r.approach_speed)?;
        if !(r.min_wait_ms >= 0.0 && r.min_wait_ms <= r.max_wait_ms) {
            return Err(invalid(format!(
                "reaction wait range {}..{} is empty or negative",
                r.min_wait_ms, r.max_wait_ms
            )));
        }

        let n = &self.navigation;
        at_least_one("navigation.cols", n.cols)?;
        at_least_one("navigation.rows", n.rows)?;
        positive("navigation.cell_size", n.cell_size as f64)?;
        positive("navigation.player_radius", n.player_radius as f64)?;
        positive("navigation.speed_per_frame", n.speed_per_frame as f64)?;
        if n.player_radius * 2.0 >= n.cell_size {
            return Err(invalid(format!(
                "navigation.player_radius {} does not fit a {} px cell",
                n.player_radius, n.cell_size
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidTuning(msg)
}

fn at_least_one(name: &str, value: usize) -> crate::Result<()> {
    if value == 0 {
        return Err(invalid(format!("{name} must be at least 1")));
    }
    Ok(())
}

fn positive(name: &str, value: f64) -> crate::Result<()> {
    // NaN fails too
    if !(value > 0.0 && value.is_finite()) {
        return Err(invalid(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}
