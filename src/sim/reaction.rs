//! Reaction game: type the shown symbols before the threat arrives
//!
//! After a randomized wait the threat starts approaching in discrete steps.
//! The player has to press every required symbol (any order) before the
//! countdown runs out.

use glam::Vec2;
use rand::Rng;
use rand::seq::index;

use super::clock::Millis;
use super::input::{InputEvent, Key};
use super::minigame::Minigame;
use super::phase::{Finale, Phase, Resolution, TerminalStep};
use super::services::{Ctx, Cue};
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::renderer::{DrawList, Rgba, SpriteId};
use crate::tuning::ReactionTuning;

pub const WIN_FRAMES: &[u8] = &[1, 1, 2, 2, 3, 3, 4, 4, 5, 5];
pub const LOSE_FRAMES: &[u8] = &[1, 1, 2, 2, 3, 3];

/// Symbols the game may ask for
pub const SYMBOLS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Points for a won round
///
/// `elapsed` is measured from the moment the countdown began.
pub fn score_for(elapsed: Millis, wrong_keys: u32) -> u32 {
    let bonus: i64 = if elapsed < 2000.0 {
        30
    } else if elapsed < 4000.0 {
        15
    } else if elapsed < 6000.0 {
        0
    } else {
        -20
    };
    (100 + bonus - 15 * wrong_keys as i64).max(0) as u32
}

/// Pick `count` distinct symbols
pub fn pick_symbols(rng: &mut impl Rng, count: usize) -> Vec<char> {
    let count = count.min(SYMBOLS.len());
    index::sample(rng, SYMBOLS.len(), count)
        .into_iter()
        .map(|i| SYMBOLS[i] as char)
        .collect()
}

/// Active payload
#[derive(Debug, Clone)]
pub struct Challenge {
    required: Vec<char>,
    pressed: Vec<char>,
    steps_left: u8,
    started_at: Millis,
    last_step: Millis,
}

impl Challenge {
    fn remaining(&self) -> impl Iterator<Item = char> + '_ {
        self.required
            .iter()
            .copied()
            .filter(|c| !self.pressed.contains(c))
    }
}

pub struct ReactionGame {
    tuning: ReactionTuning,
    width: f32,
    height: f32,
    step_delay: Millis,
    mistakes: u32,
    score: u32,
    phase: Phase<Challenge>,
}

impl ReactionGame {
    pub fn new(tuning: ReactionTuning) -> Self {
        Self {
            step_delay: tuning.step_delay_ms / tuning.approach_speed,
            tuning,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mistakes: 0,
            score: 0,
            phase: Phase::Finished(Resolution::Lost),
        }
    }

    pub fn phase(&self) -> &Phase<Challenge> {
        &self.phase
    }

    /// Symbols still to press (empty outside the active phase)
    pub fn remaining(&self) -> Vec<char> {
        self.phase
            .active()
            .map(|c| c.remaining().collect())
            .unwrap_or_default()
    }

    pub fn required(&self) -> &[char] {
        self.phase.active().map(|c| c.required.as_slice()).unwrap_or(&[])
    }

    pub fn steps_left(&self) -> Option<u8> {
        self.phase.active().map(|c| c.steps_left)
    }

    /// Delay between two approach steps at the current difficulty
    pub fn step_delay(&self) -> Millis {
        self.step_delay
    }

    fn finale(tuning: &ReactionTuning, outcome: Resolution) -> Finale {
        match outcome {
            Resolution::Won => Finale {
                cue: Cue::ReactionPunch,
                frames: WIN_FRAMES,
                interval: tuning.finale_interval_ms,
            },
            Resolution::Lost => Finale {
                cue: Cue::ReactionGrowl,
                frames: LOSE_FRAMES,
                interval: tuning.finale_interval_ms,
            },
        }
    }

    fn lose(&mut self, now: Millis) {
        self.phase.resolve(Resolution::Lost, now + self.tuning.resolve_grace_ms, None);
    }

    fn advance_countdown(&mut self, cx: &mut Ctx<'_>) {
        let now = cx.now;
        let delay = self.step_delay;
        let Some(challenge) = self.phase.active_mut() else {
            return;
        };

        let mut stepped = 0;
        while challenge.steps_left > 0 && now - challenge.last_step >= delay {
            challenge.steps_left -= 1;
            challenge.last_step += delay;
            stepped += 1;
        }
        let arrived = challenge.steps_left == 0;

        for _ in 0..stepped {
            cx.sv.play(Cue::ReactionFootstep);
        }

        if arrived {
            self.mistakes = self.tuning.mistake_limit;
            self.lose(now);
            log::info!("ReactionGame: too slow, threat arrived");
        }
    }

    fn draw_finale(&self, outcome: Resolution, out: &mut DrawList<'_>) {
        let screen = Vec2::new(self.width, self.height);
        let center = screen / 2.0;
        let frame = self.phase.finale_frame().unwrap_or(1);
        out.clear(Rgba::BLACK);

        match outcome {
            Resolution::Won => {
                out.sprite_or(SpriteId::ReactionWin(frame), center, screen, 1.0, |l| {
                    l.text("POW!", center, 72.0, Rgba(255, 220, 80, 255))
                });
            }
            Resolution::Lost => {
                out.sprite_or(SpriteId::ReactionLose(frame), center, screen, 1.0, |l| {
                    l.text("GRRR!", center, 72.0, Rgba(200, 40, 40, 255))
                });
            }
        }
    }
}

impl Minigame for ReactionGame {
    fn name(&self) -> &'static str {
        "reaction"
    }

    fn start(&mut self, speed: f32, cx: &mut Ctx<'_>) {
        let speed = if speed > 0.0 { speed as f64 } else { 1.0 };

        self.mistakes = 0;
        self.score = 0;
        self.step_delay = self.tuning.step_delay_ms / (self.tuning.approach_speed * speed);

        let (lo, hi) = (self.tuning.min_wait_ms, self.tuning.max_wait_ms);
        let wait = if hi > lo {
            cx.sv.rng.random_range(lo..hi)
        } else {
            lo
        };
        self.phase = Phase::waiting(cx.now, wait);

        cx.sv.play(Cue::ReactionWaiting);

        log::info!("ReactionGame started with speed multiplier {:.2}", speed);
        log::debug!("  wait {:.0} ms, step every {:.0} ms", wait, self.step_delay);
    }

    fn update(&mut self, cx: &mut Ctx<'_>) {
        let tuning = &self.tuning;
        match self.phase.step_terminal(cx, |o| Self::finale(tuning, o)) {
            TerminalStep::NotTerminal => {}
            TerminalStep::Finished(outcome) => {
                log::debug!("ReactionGame: finale over ({:?})", outcome);
                return;
            }
            TerminalStep::Settling(_) | TerminalStep::Pending => return,
        }

        let now = cx.now;
        let keys = self.tuning.keys_required;
        let steps = self.tuning.countdown_steps;
        let rng = &mut cx.sv.rng;
        let activated = self.phase.activate_when_due(now, || Challenge {
            required: pick_symbols(rng, keys),
            pressed: Vec::with_capacity(keys),
            steps_left: steps,
            started_at: now,
            last_step: now,
        });
        if activated {
            cx.sv.pause(Cue::ReactionWaiting);
            log::debug!("ReactionGame: threat approaching, keys {:?}", self.required());
        }

        self.advance_countdown(cx);
    }

    fn draw(&self, out: &mut DrawList<'_>) {
        if let Some(outcome) = self.phase.outcome() {
            if matches!(self.phase, Phase::Settling { .. } | Phase::Finished(_)) {
                self.draw_finale(outcome, out);
                return;
            }
        }

        let screen = Vec2::new(self.width, self.height);
        let center = screen / 2.0;
        out.clear(Rgba::BACKDROP);

        let Some(challenge) = self.phase.active() else {
            out.text("...", center, 48.0, Rgba::gray(160));
            return;
        };

        // Threat grows as it closes in
        let total = self.tuning.countdown_steps.max(1) as f32;
        let closeness = 1.0 - challenge.steps_left as f32 / total;
        let size = Vec2::splat(self.height * (0.25 + 0.6 * closeness));
        let threat_pos = Vec2::new(center.x, self.height * 0.4);
        out.sprite_or(SpriteId::Threat(challenge.steps_left), threat_pos, size, 1.0, |l| {
            l.circle(threat_pos, size.x / 2.0, Rgba(90, 140, 60, 255))
        });

        let key_size = 80.0;
        let gap = 20.0;
        let n = challenge.required.len() as f32;
        let row_width = n * key_size + (n - 1.0).max(0.0) * gap;
        let y = self.height - key_size;
        for (i, symbol) in challenge.required.iter().enumerate() {
            let x = center.x - row_width / 2.0 + i as f32 * (key_size + gap);
            let done = challenge.pressed.contains(symbol);
            let fill = if done { Rgba(60, 160, 80, 255) } else { Rgba::gray(235) };
            let ink = if done { Rgba::WHITE } else { Rgba::BLACK };
            out.rect(
                Vec2::new(x, y - key_size / 2.0),
                Vec2::splat(key_size),
                Some(fill),
                Some((Rgba::BLACK, 3.0)),
                10.0,
            );
            out.text(
                symbol.to_string(),
                Vec2::new(x + key_size / 2.0, y),
                key_size * 0.6,
                ink,
            );
        }
    }

    fn handle_input(&mut self, event: InputEvent, cx: &mut Ctx<'_>) {
        let InputEvent::Pressed(Key::Symbol(symbol)) = event else {
            return;
        };
        let Some(challenge) = self.phase.active_mut() else {
            return;
        };

        if challenge.pressed.contains(&symbol) {
            return;
        }

        if challenge.required.contains(&symbol) {
            challenge.pressed.push(symbol);
            if challenge.remaining().next().is_some() {
                return;
            }
            let elapsed = cx.now - challenge.started_at;
            self.score = score_for(elapsed, self.mistakes);
            self.phase.resolve(
                Resolution::Won,
                cx.now + self.tuning.resolve_grace_ms,
                None,
            );
            log::info!(
                "ReactionGame: won in {:.0} ms with {} wrong keys, score {}",
                elapsed,
                self.mistakes,
                self.score
            );
            return;
        }

        self.mistakes += 1;
        log::debug!(
            "ReactionGame: wrong key {} ({}/{})",
            symbol,
            self.mistakes,
            self.tuning.mistake_limit
        );
        if self.mistakes >= self.tuning.mistake_limit {
            self.lose(cx.now);
            log::info!("ReactionGame: lost on wrong keys");
        }
    }

    fn cleanup(&mut self, cx: &mut Ctx<'_>) {
        cx.sv.pause(Cue::ReactionWaiting);
        cx.sv.pause(Cue::ReactionFootstep);
        cx.sv.pause(Cue::ReactionGrowl);
        cx.sv.pause(Cue::ReactionPunch);
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    fn mistakes(&self) -> u32 {
        self.mistakes
    }

    fn mistake_limit(&self) -> u32 {
        self.tuning.mistake_limit
    }

    fn round_score(&self) -> u32 {
        self.score
    }

    fn autopilot(&self, now: Millis, out: &mut Vec<InputEvent>) {
        // One key every quarter second
        let Some(challenge) = self.phase.active() else {
            return;
        };
        let due = ((now - challenge.started_at) / 250.0) as usize;
        if challenge.pressed.len() < due {
            if let Some(symbol) = challenge.remaining().next() {
                out.push(InputEvent::Pressed(Key::Symbol(symbol)));
            }
        }
    }
}
