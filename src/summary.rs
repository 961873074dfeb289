//! End-of-session summary screen

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::renderer::{DrawList, Rgba, SpriteId};
use crate::sim::clock::Millis;
use crate::sim::services::{Cue, Services};

/// How long each crying frame stays up (ms)
const CRY_INTERVAL_MS: Millis = 400.0;

/// Final tallies of a session, emitted once at game over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub lives_lost: u32,
    pub total_score: u64,
    pub elapsed_ms: u64,
    pub perfect_rounds: u32,
}

/// Format milliseconds as `m:ss`
pub fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Terminal presentation state fed by the orchestrator's final tallies
#[derive(Debug, Clone)]
pub struct Summary {
    payload: SessionSummary,
    shown_at: Millis,
    is_new_record: bool,
    player: Option<String>,
    width: f32,
    height: f32,
}

impl Summary {
    /// Build the screen, report the score to the profile store and play the
    /// game-over cue
    pub fn new(payload: SessionSummary, now: Millis, sv: &mut Services) -> Self {
        let is_new_record = sv.update_highscore(payload.total_score);
        let player = sv.current_profile().map(|p| p.name);
        sv.play(Cue::GameOver);

        if is_new_record {
            log::info!(
                "New record for {}: {}",
                player.as_deref().unwrap_or("?"),
                payload.total_score
            );
        }

        Self {
            payload,
            shown_at: now,
            is_new_record,
            player,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn payload(&self) -> &SessionSummary {
        &self.payload
    }

    pub fn is_new_record(&self) -> bool {
        self.is_new_record
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Stop the game-over cue (restart from the summary)
    pub fn cleanup(&self, sv: &mut Services) {
        sv.pause(Cue::GameOver);
    }

    fn crying_frame(&self, now: Millis) -> u8 {
        (((now - self.shown_at).max(0.0) / CRY_INTERVAL_MS) as u64 % 2) as u8
    }

    pub fn draw(&self, now: Millis, out: &mut DrawList<'_>) {
        let cx = self.width / 2.0;
        let h = self.height;
        out.clear(Rgba::BACKDROP);

        let title_pos = Vec2::new(cx, h * 0.14);
        let title_size = Vec2::new(self.width.min(640.0), h * 0.18);
        out.sprite_or(SpriteId::GameOverTitle, title_pos, title_size, 1.0, |l| {
            l.text("GAME OVER", title_pos, 72.0, Rgba(255, 80, 80, 255))
        });

        let face = Vec2::splat(h * 0.3);
        out.sprite_or(
            SpriteId::GameOverCrying(self.crying_frame(now)),
            Vec2::new(cx, h * 0.4),
            face,
            1.0,
            |_| {},
        );

        let mut y = h * 0.62;
        let line = 44.0;
        out.text(
            format!("Score: {}", self.payload.total_score),
            Vec2::new(cx, y),
            40.0,
            Rgba::WHITE,
        );
        if self.is_new_record {
            y += line;
            out.text("NEW RECORD!", Vec2::new(cx, y), 36.0, Rgba(255, 215, 0, 255));
        }
        if let Some(name) = &self.player {
            y += line;
            out.text(format!("Player: {name}"), Vec2::new(cx, y), 28.0, Rgba::gray(210));
        }
        y += line;
        out.text(
            format!(
                "Time: {}   Perfect rounds: {}",
                format_elapsed(self.payload.elapsed_ms),
                self.payload.perfect_rounds
            ),
            Vec2::new(cx, y),
            24.0,
            Rgba::gray(180),
        );
        out.text(
            "Press Enter to play again",
            Vec2::new(cx, h - 40.0),
            22.0,
            Rgba::gray(140),
        );
    }
}
