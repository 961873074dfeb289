//! Timing game: press the matching arrow while a marker pair overlaps the zone
//!
//! Pairs enter from both screen edges and converge on a hit zone centered in
//! the bottom band. A pair is stored as one signed distance from the zone
//! center (both markers mirror each other), so resizing only moves the zone.

use glam::Vec2;
use rand::Rng;

use super::clock::Millis;
use super::input::{Direction, InputEvent, Key};
use super::minigame::Minigame;
use super::phase::{Finale, Phase, Resolution, TerminalStep};
use super::services::{Ctx, Cue};
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_STEP_MS};
use crate::per_frame_to_per_ms;
use crate::renderer::{DrawList, Rgba, SpriteId};
use crate::tuning::TimingTuning;

/// Win celebration: three frames looped
pub const WIN_FRAMES: &[u8] = &[0, 1, 2, 0, 1, 2, 0];
/// Loss animation, played once
pub const LOSE_FRAMES: &[u8] = &[0, 1, 2, 3];

/// Points for a won round by mistakes made
pub fn score_for_mistakes(mistakes: u32) -> u32 {
    match mistakes {
        0 => 100,
        1 => 70,
        2 => 40,
        _ => 0,
    }
}

/// Two mirrored markers converging on the zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPair {
    pub kind: Direction,
    /// Distance of each marker from the zone center; negative once they crossed
    pub offset: f32,
}

/// Active payload
#[derive(Debug, Clone)]
pub struct Lane {
    pairs: Vec<MarkerPair>,
    hits: u32,
    last_spawn: Millis,
    last_update: Millis,
}

pub struct TimingGame {
    tuning: TimingTuning,
    width: f32,
    height: f32,
    /// px per ms at the current difficulty
    speed: f32,
    spawn_interval: Millis,
    mistakes: u32,
    score: u32,
    phase: Phase<Lane>,
}

impl TimingGame {
    pub fn new(tuning: TimingTuning) -> Self {
        Self {
            speed: per_frame_to_per_ms(tuning.speed_per_frame),
            spawn_interval: tuning.spawn_interval_ms,
            tuning,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mistakes: 0,
            score: 0,
            phase: Phase::Finished(Resolution::Lost),
        }
    }

    /// Center of the hit zone in screen space
    pub fn zone_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - self.tuning.band_height / 2.0)
    }

    pub fn pairs(&self) -> &[MarkerPair] {
        self.phase.active().map(|l| l.pairs.as_slice()).unwrap_or(&[])
    }

    pub fn hits(&self) -> u32 {
        self.phase.active().map(|l| l.hits).unwrap_or(0)
    }

    pub fn phase(&self) -> &Phase<Lane> {
        &self.phase
    }

    /// Kind of the first pair whose markers are both inside the zone
    pub fn pair_in_zone(&self) -> Option<Direction> {
        let half = self.tuning.zone_size / 2.0;
        self.pairs()
            .iter()
            .find(|p| p.offset.abs() <= half)
            .map(|p| p.kind)
    }

    fn finale(tuning: &TimingTuning, outcome: Resolution) -> Finale {
        match outcome {
            Resolution::Won => Finale {
                cue: Cue::TimingWin,
                frames: WIN_FRAMES,
                interval: tuning.finale_interval_ms,
            },
            Resolution::Lost => Finale {
                cue: Cue::TimingLose,
                frames: LOSE_FRAMES,
                interval: tuning.finale_interval_ms,
            },
        }
    }

    fn register_mistake(&mut self, cx: &mut Ctx<'_>) {
        self.mistakes += 1;
        cx.sv.play(Cue::TimingWrong);
        log::debug!(
            "TimingGame: mistake {}/{}",
            self.mistakes,
            self.tuning.mistake_limit
        );

        if self.mistakes >= self.tuning.mistake_limit {
            cx.sv.pause(Cue::TimingMusic);
            // Finale waits for the buzz of the last mistake
            self.phase.resolve(Resolution::Lost, cx.now, Some(Cue::TimingWrong));
            log::info!("TimingGame: lost after {} mistakes", self.mistakes);
        }
    }

    fn register_hit(&mut self, kind: Direction, hits: u32, cx: &mut Ctx<'_>) {
        cx.sv.play(Cue::TimingHit(kind));
        cx.sv.on_hud(|h| h.animate_mascot(kind));

        if hits >= self.tuning.hits_to_win {
            self.score = score_for_mistakes(self.mistakes);
            cx.sv.pause(Cue::TimingMusic);
            self.phase.resolve(
                Resolution::Won,
                cx.now + self.tuning.win_grace_ms,
                None,
            );
            log::info!(
                "TimingGame: won with {} mistakes, score {}",
                self.mistakes,
                self.score
            );
        }
    }

    fn advance_lane(&mut self, cx: &mut Ctx<'_>) {
        let now = cx.now;
        let spawn_x = self.width / 2.0 + self.tuning.marker_size;
        let miss_margin = self.tuning.zone_size / 2.0 + self.tuning.marker_size / 2.0;
        let (speed, interval, max_pairs) = (self.speed, self.spawn_interval, self.tuning.max_pairs);

        let Some(lane) = self.phase.active_mut() else {
            return;
        };

        let dt = (now - lane.last_update).clamp(0.0, MAX_STEP_MS) as f32;
        lane.last_update = now;

        if lane.pairs.len() < max_pairs && now - lane.last_spawn >= interval {
            lane.last_spawn = now;
            let kind = Direction::ALL[cx.sv.rng.random_range(0..Direction::ALL.len())];
            lane.pairs.push(MarkerPair {
                kind,
                offset: spawn_x,
            });
            log::debug!("TimingGame: spawned {} pair", kind.as_str());
        }

        let mut missed = 0;
        lane.pairs.retain_mut(|p| {
            p.offset -= speed * dt;
            if p.offset < -miss_margin {
                missed += 1;
                false
            } else {
                true
            }
        });

        for _ in 0..missed {
            if self.phase.active().is_none() {
                break;
            }
            self.register_mistake(cx);
        }
    }

    fn draw_finale(&self, outcome: Resolution, out: &mut DrawList<'_>) {
        let screen = Vec2::new(self.width, self.height);
        let center = screen / 2.0;
        let frame = self.phase.finale_frame().unwrap_or(0);
        out.clear(Rgba::BLACK);

        match outcome {
            Resolution::Won => {
                out.sprite_or(SpriteId::TimingWinBackdrop, center, screen, 1.0, |_| {});
                out.sprite_or(SpriteId::TimingWin(frame), center, screen, 1.0, |l| {
                    l.text("YOU DID IT!", center, 64.0, Rgba(100, 255, 100, 255))
                });
            }
            Resolution::Lost => {
                out.sprite_or(SpriteId::TimingLose(frame), center, screen, 1.0, |l| {
                    l.text("OH NO!", center, 64.0, Rgba(255, 80, 80, 255))
                });
            }
        }
    }
}

impl Minigame for TimingGame {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn start(&mut self, speed: f32, cx: &mut Ctx<'_>) {
        let speed = if speed > 0.0 { speed } else { 1.0 };

        self.mistakes = 0;
        self.score = 0;
        self.speed = per_frame_to_per_ms(self.tuning.speed_per_frame) * speed;
        self.spawn_interval = self.tuning.spawn_interval_ms / speed as f64;
        self.phase = Phase::waiting(cx.now, self.tuning.preroll_ms);

        cx.sv.play(Cue::TimingMusic);

        log::info!("TimingGame started with speed multiplier {:.2}", speed);
        log::debug!(
            "  speed {:.3} px/ms, spawn every {:.0} ms",
            self.speed,
            self.spawn_interval
        );
    }

    fn update(&mut self, cx: &mut Ctx<'_>) {
        let tuning = &self.tuning;
        match self.phase.step_terminal(cx, |o| Self::finale(tuning, o)) {
            TerminalStep::NotTerminal => {}
            TerminalStep::Settling(_) => {
                cx.sv.on_hud(|h| h.hide_mascot());
                return;
            }
            TerminalStep::Finished(outcome) => {
                log::debug!("TimingGame: finale over ({:?})", outcome);
                return;
            }
            TerminalStep::Pending => return,
        }

        let now = cx.now;
        if self.phase.activate_when_due(now, || Lane {
            pairs: Vec::new(),
            hits: 0,
            last_spawn: now,
            last_update: now,
        }) {
            log::debug!("TimingGame: markers incoming");
        }

        self.advance_lane(cx);
    }

    fn draw(&self, out: &mut DrawList<'_>) {
        if let Some(outcome) = self.phase.outcome() {
            if matches!(self.phase, Phase::Settling { .. } | Phase::Finished(_)) {
                self.draw_finale(outcome, out);
                return;
            }
        }

        let band = self.tuning.band_height;
        let scenery = Vec2::new(self.width, self.height - band);
        out.clear(Rgba::gray(30));
        out.sprite_or(SpriteId::TimingBackdrop, scenery / 2.0, scenery, 1.0, |_| {});
        out.fill_rect(
            Vec2::new(0.0, self.height - band),
            Vec2::new(self.width, band),
            Rgba::gray(40),
        );

        let zone = self.zone_center();
        let zone_size = Vec2::splat(self.tuning.zone_size);
        out.sprite_or(SpriteId::HitZone, zone, zone_size, 1.0, |l| {
            l.rect(
                zone - zone_size / 2.0,
                zone_size,
                None,
                Some((Rgba::WHITE.with_alpha(200), 3.0)),
                0.0,
            )
        });

        if self.phase.is_waiting() {
            out.text("Get ready...", Vec2::new(zone.x, scenery.y / 2.0), 40.0, Rgba::WHITE);
        }

        let size = Vec2::splat(self.tuning.marker_size);
        for pair in self.pairs() {
            for (pos, glyph) in [
                (Vec2::new(zone.x - pair.offset, zone.y), "←"),
                (Vec2::new(zone.x + pair.offset, zone.y), "→"),
            ] {
                out.sprite_or(SpriteId::Marker(pair.kind), pos, size, 1.0, |l| {
                    l.text(glyph, pos, size.x * 0.5, Rgba::WHITE)
                });
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent, cx: &mut Ctx<'_>) {
        let InputEvent::Pressed(Key::Arrow(pressed)) = event else {
            return;
        };
        let half = self.tuning.zone_size / 2.0;
        let Some(lane) = self.phase.active_mut() else {
            return;
        };

        let judged = match lane.pairs.iter().position(|p| p.offset.abs() <= half) {
            Some(i) => {
                let pair = lane.pairs.remove(i);
                if pair.kind == pressed {
                    lane.hits += 1;
                    Some(lane.hits)
                } else {
                    None
                }
            }
            // Nothing in the zone: early or late
            None => None,
        };

        match judged {
            Some(hits) => self.register_hit(pressed, hits, cx),
            None => self.register_mistake(cx),
        }
    }

    fn cleanup(&mut self, cx: &mut Ctx<'_>) {
        cx.sv.pause(Cue::TimingMusic);
        for dir in Direction::ALL {
            cx.sv.pause(Cue::TimingHit(dir));
        }
        cx.sv.pause(Cue::TimingWrong);
        cx.sv.pause(Cue::TimingWin);
        cx.sv.pause(Cue::TimingLose);
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

    fn shows_mascot(&self) -> bool {
        true
    }

    fn autopilot(&self, _now: Millis, out: &mut Vec<InputEvent>) {
        // Aim for the middle of the zone rather than its edge
        let sweet_spot = self.tuning.zone_size / 4.0;
        if let Some(pair) = self.pairs().iter().find(|p| p.offset.abs() <= sweet_spot) {
            out.push(InputEvent::Pressed(Key::Arrow(pair.kind)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCmd, NoAssets};
    use crate::sim::services::Services;
    use crate::sim::testkit::{RecordingHud, ScriptedAudio};

    fn started(sv: &mut Services) -> TimingGame {
        let mut game = TimingGame::new(TimingTuning::default());
        game.on_resize(800.0, 600.0);
        game.start(1.0, &mut Ctx::new(0.0, sv));
        game
    }

    fn update(game: &mut TimingGame, sv: &mut Services, now: Millis) {
        game.update(&mut Ctx::new(now, sv));
    }

    fn press(game: &mut TimingGame, sv: &mut Services, now: Millis, dir: Direction) {
        game.handle_input(InputEvent::Pressed(Key::Arrow(dir)), &mut Ctx::new(now, sv));
    }

    /// Step time until a pair sits in the zone, then press its direction
    fn hit_next(game: &mut TimingGame, sv: &mut Services, t: &mut Millis) {
        loop {
            *t += 10.0;
            update(game, sv, *t);
            if let Some(kind) = game.pair_in_zone() {
                press(game, sv, *t, kind);
                return;
            }
            assert!(*t < 60_000.0, "no pair ever reached the zone");
        }
    }

    fn run_until_finished(game: &mut TimingGame, sv: &mut Services, t: &mut Millis) {
        while !game.is_finished() {
            *t += 10.0;
            update(game, sv, *t);
            assert!(*t < 120_000.0, "round never settled");
        }
    }

    fn wrong_of(dir: Direction) -> Direction {
        match dir {
            Direction::Left => Direction::Right,
            _ => Direction::Left,
        }
    }

    #[test]
    fn test_not_finished_right_after_start() {
        let mut sv = Services::new(1);
        let game = started(&mut sv);
        assert!(!game.is_finished());
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_clean_win_scores_100() {
        let mut sv = Services::new(42);
        let mut game = started(&mut sv);
        let mut t = 0.0;
        for _ in 0..3 {
            hit_next(&mut game, &mut sv, &mut t);
        }
        assert!(matches!(game.phase(), Phase::Resolving { outcome: Resolution::Won, .. }));
        assert_eq!(game.round_score(), 100);

        run_until_finished(&mut game, &mut sv, &mut t);
        assert_eq!(game.mistakes(), 0);
        assert_eq!(game.round_score(), 100);
        assert_eq!(game.outcome(), Some(Resolution::Won));
    }

    #[test]
    fn test_two_mistakes_then_win_scores_40() {
        let mut sv = Services::new(7);
        let mut game = started(&mut sv);
        update(&mut game, &mut sv, 600.0);
        assert!(game.phase().active().is_some());

        // No pair has spawned yet: both presses are early
        press(&mut game, &mut sv, 600.0, Direction::Left);
        press(&mut game, &mut sv, 610.0, Direction::Up);
        assert_eq!(game.mistakes(), 2);

        let mut t = 610.0;
        for _ in 0..3 {
            hit_next(&mut game, &mut sv, &mut t);
        }
        run_until_finished(&mut game, &mut sv, &mut t);
        assert_eq!(game.round_score(), 40);
        assert_eq!(game.outcome(), Some(Resolution::Won));
    }

    #[test]
    fn test_three_mistakes_lose_after_buzz_and_finale() {
        let audio = ScriptedAudio::new();
        let mut sv = Services::new(3).with_audio(audio.clone());
        let mut game = started(&mut sv);
        update(&mut game, &mut sv, 600.0);

        for i in 0..3 {
            press(&mut game, &mut sv, 600.0 + i as f64, Direction::Down);
        }
        assert_eq!(game.mistakes(), 3);
        assert!(audio.was_paused(Cue::TimingMusic));

        // Finale held back until the last buzz ends
        update(&mut game, &mut sv, 2000.0);
        assert!(matches!(game.phase(), Phase::Resolving { .. }));
        audio.finish(Cue::TimingWrong);
        update(&mut game, &mut sv, 2010.0);
        assert!(matches!(game.phase(), Phase::Settling { .. }));

        // Frames done, lose cue still playing
        update(&mut game, &mut sv, 4000.0);
        assert!(!game.is_finished());
        audio.finish(Cue::TimingLose);
        update(&mut game, &mut sv, 4010.0);
        assert!(game.is_finished());
        assert_eq!(game.outcome(), Some(Resolution::Lost));
    }

    #[test]
    fn test_wrong_direction_in_zone_is_a_mistake() {
        let mut sv = Services::new(11);
        let mut game = started(&mut sv);
        let mut t = 0.0;
        let kind = loop {
            t += 10.0;
            update(&mut game, &mut sv, t);
            if let Some(kind) = game.pair_in_zone() {
                break kind;
            }
        };
        press(&mut game, &mut sv, t, wrong_of(kind));
        assert_eq!(game.mistakes(), 1);
        assert_eq!(game.hits(), 0);
        assert!(game.pair_in_zone().is_none());
    }

    #[test]
    fn test_pair_passing_the_zone_counts_as_miss() {
        let mut sv = Services::new(5);
        let mut game = started(&mut sv);
        let mut t = 0.0;
        while game.mistakes() == 0 {
            t += 10.0;
            update(&mut game, &mut sv, t);
            assert!(t < 10_000.0);
        }
        assert_eq!(game.mistakes(), 1);
        assert!(game.pairs().iter().all(|p| p.offset >= -130.0));
    }

    #[test]
    fn test_unrecognized_input_is_ignored() {
        let mut sv = Services::new(1);
        let mut game = started(&mut sv);
        // Pre-roll: arrows are ignored
        press(&mut game, &mut sv, 100.0, Direction::Left);
        update(&mut game, &mut sv, 600.0);
        game.handle_input(InputEvent::Pressed(Key::Symbol('A')), &mut Ctx::new(600.0, &mut sv));
        game.handle_input(InputEvent::Pressed(Key::Other), &mut Ctx::new(600.0, &mut sv));
        game.handle_input(
            InputEvent::Released(Key::Arrow(Direction::Up)),
            &mut Ctx::new(600.0, &mut sv),
        );
        assert_eq!(game.mistakes(), 0);
    }

    #[test]
    fn test_hit_animates_mascot_and_finale_hides_it() {
        let hud = RecordingHud::new();
        let mut sv = Services::new(9).with_hud(hud.clone());
        let mut game = started(&mut sv);
        let mut t = 0.0;
        hit_next(&mut game, &mut sv, &mut t);
        assert_eq!(hud.mascot_moves().len(), 1);

        hit_next(&mut game, &mut sv, &mut t);
        hit_next(&mut game, &mut sv, &mut t);
        run_until_finished(&mut game, &mut sv, &mut t);
        assert!(hud.calls().contains(&"hide_mascot"));
    }

    #[test]
    fn test_resize_moves_zone_not_markers() {
        let mut sv = Services::new(2);
        let mut game = started(&mut sv);
        let mut t = 0.0;
        while game.pairs().is_empty() {
            t += 10.0;
            update(&mut game, &mut sv, t);
        }
        let before = game.pairs().to_vec();
        game.on_resize(1600.0, 900.0);
        assert_eq!(game.pairs(), before.as_slice());
        assert_eq!(game.zone_center(), Vec2::new(800.0, 800.0));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let audio = ScriptedAudio::new();
        let mut sv = Services::new(1).with_audio(audio.clone());
        let mut game = started(&mut sv);
        assert!(audio.is_playing(Cue::TimingMusic));
        game.cleanup(&mut Ctx::new(10.0, &mut sv));
        game.cleanup(&mut Ctx::new(20.0, &mut sv));
        assert!(!audio.is_playing(Cue::TimingMusic));
        assert!(audio.was_paused(Cue::TimingMusic));
    }

    #[test]
    fn test_restart_resets_round_state() {
        let mut sv = Services::new(4);
        let mut game = started(&mut sv);
        update(&mut game, &mut sv, 600.0);
        press(&mut game, &mut sv, 600.0, Direction::Left);
        assert_eq!(game.mistakes(), 1);

        game.start(1.44, &mut Ctx::new(700.0, &mut sv));
        assert_eq!(game.mistakes(), 0);
        assert_eq!(game.round_score(), 0);
        assert!(game.phase().is_waiting());
    }

    #[test]
    fn test_fallback_rendering_without_assets() {
        let mut sv = Services::new(8);
        let mut game = started(&mut sv);
        let mut t = 0.0;
        while game.pairs().is_empty() {
            t += 10.0;
            update(&mut game, &mut sv, t);
        }
        let mut list = DrawList::new(&NoAssets);
        game.draw(&mut list);
        assert_eq!(list.count(|c| matches!(c, DrawCmd::Sprite { .. })), 0);
        assert!(list.has_text("←"));
        assert!(list.has_text("→"));
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(score_for_mistakes(0), 100);
        assert_eq!(score_for_mistakes(1), 70);
        assert_eq!(score_for_mistakes(2), 40);
        assert_eq!(score_for_mistakes(5), 0);
    }

    #[test]
    fn test_autopilot_wins() {
        let mut sv = Services::new(21);
        let mut game = started(&mut sv);
        let mut t = 0.0;
        let mut inputs = Vec::new();
        while !game.is_finished() {
            t += 16.0;
            update(&mut game, &mut sv, t);
            inputs.clear();
            game.autopilot(t, &mut inputs);
            for event in inputs.drain(..) {
                game.handle_input(event, &mut Ctx::new(t, &mut sv));
            }
            assert!(t < 60_000.0);
        }
        assert_eq!(game.outcome(), Some(Resolution::Won));
        assert_eq!(game.round_score(), 100);
    }
}
