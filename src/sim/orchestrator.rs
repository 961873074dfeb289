//! Session orchestrator
//!
//! Owns the ordered minigame list and the session tallies: lives, cumulative
//! score, perfect rounds and the difficulty multiplier. Exactly one unit is
//! live while the session is active; its `finished` flag drives every
//! transition.

use super::clock::{Clock, Millis};
use super::input::InputEvent;
use super::minigame::Minigame;
use super::navigation::NavigationGame;
use super::phase::Resolution;
use super::reaction::ReactionGame;
use super::services::{Ctx, Services};
use super::timing::TimingGame;
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, DIFFICULTY_GROWTH, MAX_LIVES};
use crate::error::{Error, Result};
use crate::renderer::{DrawList, Rgba};
use crate::summary::{SessionSummary, Summary};
use crate::tuning::Tuning;

/// Session transitions the host may react to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SessionStarted,
    RoundWon { unit: &'static str, score: u32 },
    RoundLost { unit: &'static str, lives: u32 },
    /// Every unit played once; difficulty went up
    CycleCompleted { difficulty: f32 },
    GameOver(SessionSummary),
}

pub struct Orchestrator {
    units: Vec<Box<dyn Minigame>>,
    services: Services,
    clock: Box<dyn Clock>,
    unit_index: usize,
    lives: u32,
    difficulty: f32,
    cumulative_score: u64,
    perfect_rounds: u32,
    active: bool,
    started_at: Millis,
    summary: Option<Summary>,
    events: Vec<SessionEvent>,
    viewport: (f32, f32),
}

impl Orchestrator {
    /// Wire a session over the given units (played in order)
    pub fn new(
        units: Vec<Box<dyn Minigame>>,
        services: Services,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        if units.is_empty() {
            return Err(Error::NoMinigames);
        }
        Ok(Self::assemble(units, services, clock))
    }

    /// The shipped line-up: timing, reaction, navigation
    pub fn standard(services: Services, clock: Box<dyn Clock>, tuning: &Tuning) -> Self {
        let units: Vec<Box<dyn Minigame>> = vec![
            Box::new(TimingGame::new(tuning.timing.clone())),
            Box::new(ReactionGame::new(tuning.reaction.clone())),
            Box::new(NavigationGame::new(tuning.navigation.clone())),
        ];
        Self::assemble(units, services, clock)
    }

    fn assemble(units: Vec<Box<dyn Minigame>>, services: Services, clock: Box<dyn Clock>) -> Self {
        log::debug!("Orchestrator wired with {} minigames", units.len());
        Self {
            units,
            services,
            clock,
            unit_index: 0,
            lives: MAX_LIVES,
            difficulty: 1.0,
            cumulative_score: 0,
            perfect_rounds: 0,
            active: false,
            started_at: 0.0,
            summary: None,
            events: Vec::new(),
            viewport: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }

    /// Begin (or begin again) a session from the first unit
    pub fn start_session(&mut self) {
        let now = self.clock.now_ms();
        let mut cx = Ctx::new(now, &mut self.services);

        if self.active {
            self.units[self.unit_index].cleanup(&mut cx);
        }
        if let Some(summary) = self.summary.take() {
            summary.cleanup(cx.sv);
        }

        self.active = true;
        self.lives = MAX_LIVES;
        self.difficulty = 1.0;
        self.unit_index = 0;
        self.cumulative_score = 0;
        self.perfect_rounds = 0;
        self.started_at = now;

        cx.sv.on_hud(|h| {
            h.show_lives();
            h.update_lives(MAX_LIVES);
        });
        self.units[0].start(self.difficulty, &mut cx);
        self.sync_mascot();

        self.events.push(SessionEvent::SessionStarted);
        log::info!("Session started ({} minigames)", self.units.len());
    }

    /// `start_session` under the name the host's "play again" uses
    pub fn restart(&mut self) {
        self.start_session();
    }

    /// Advance the live unit and settle its outcome if it just finished
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.tick_at(now);
    }

    fn tick_at(&mut self, now: Millis) {
        if !self.active {
            return;
        }

        let unit = &mut self.units[self.unit_index];
        unit.update(&mut Ctx::new(now, &mut self.services));
        let Some(outcome) = unit.outcome() else {
            return;
        };
        let name = unit.name();

        match outcome {
            Resolution::Lost => {
                self.lives = self.lives.saturating_sub(1);
                let lives = self.lives;
                self.services.on_hud(|h| h.update_lives(lives));
                self.events.push(SessionEvent::RoundLost { unit: name, lives });
                log::info!("Round lost in {}, {} lives left", name, lives);

                if self.lives == 0 {
                    self.game_over(now);
                    return;
                }
            }
            Resolution::Won => {
                let score = unit.round_score();
                self.perfect_rounds += 1;
                self.cumulative_score += score as u64;
                self.events.push(SessionEvent::RoundWon { unit: name, score });
                log::info!(
                    "Round won in {} (+{}), total {}",
                    name,
                    score,
                    self.cumulative_score
                );
            }
        }

        self.advance(now);
    }

    /// Move to the next unit, wrapping and escalating after the last one
    fn advance(&mut self, now: Millis) {
        let finished = self.unit_index;
        self.unit_index += 1;
        if self.unit_index == self.units.len() {
            self.unit_index = 0;
            self.difficulty *= DIFFICULTY_GROWTH;
            self.events.push(SessionEvent::CycleCompleted {
                difficulty: self.difficulty,
            });
            log::info!("Cycle completed, difficulty now {:.2}", self.difficulty);
        }

        // Outgoing unit goes quiet before the next one makes a sound
        let mut cx = Ctx::new(now, &mut self.services);
        self.units[finished].cleanup(&mut cx);
        self.units[self.unit_index].start(self.difficulty, &mut cx);
        self.sync_mascot();
    }

    fn sync_mascot(&mut self) {
        let shows = self.units[self.unit_index].shows_mascot();
        self.services.on_hud(|h| {
            if shows {
                h.show_mascot();
                h.reset_mascot_idle();
            } else {
                h.hide_mascot();
            }
        });
    }

    fn game_over(&mut self, now: Millis) {
        self.active = false;
        self.units[self.unit_index].cleanup(&mut Ctx::new(now, &mut self.services));
        self.services.on_hud(|h| {
            h.hide_lives();
            h.hide_mascot();
        });

        let payload = SessionSummary {
            lives_lost: MAX_LIVES - self.lives,
            total_score: self.cumulative_score,
            elapsed_ms: (now - self.started_at).max(0.0) as u64,
            perfect_rounds: self.perfect_rounds,
        };
        log::info!(
            "Game over: score {}, {} perfect rounds, {} ms",
            payload.total_score,
            payload.perfect_rounds,
            payload.elapsed_ms
        );

        let mut summary = Summary::new(payload, now, &mut self.services);
        summary.on_resize(self.viewport.0, self.viewport.1);
        self.summary = Some(summary);
        self.events.push(SessionEvent::GameOver(payload));
    }

    /// End the session on the spot with the current tallies
    pub fn force_game_over(&mut self) {
        if !self.active {
            return;
        }
        let now = self.clock.now_ms();
        log::info!("Game over forced");
        self.game_over(now);
    }

    /// Draw the live unit, or the summary once the session is over
    pub fn draw(&self, out: &mut DrawList<'_>) {
        if self.active {
            self.units[self.unit_index].draw(out);
        } else if let Some(summary) = &self.summary {
            summary.draw(self.clock.now_ms(), out);
        } else {
            out.clear(Rgba::BACKDROP);
        }
    }

    /// Route input to the live unit; ignored outside a session
    pub fn handle_input(&mut self, event: InputEvent) {
        if !self.active {
            return;
        }
        let now = self.clock.now_ms();
        self.units[self.unit_index].handle_input(event, &mut Ctx::new(now, &mut self.services));
    }

    /// Viewport changed; every unit relayouts, the live one included
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        for unit in &mut self.units {
            unit.on_resize(width, height);
        }
        if let Some(summary) = &mut self.summary {
            summary.on_resize(width, height);
        }
    }

    /// What a competent player would press right now
    pub fn autopilot_inputs(&self) -> Vec<InputEvent> {
        let mut out = Vec::new();
        if self.active {
            self.units[self.unit_index].autopilot(self.clock.now_ms(), &mut out);
        }
        out
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn unit_index(&self) -> usize {
        self.unit_index
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn current_unit(&self) -> &dyn Minigame {
        self.units[self.unit_index].as_ref()
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn cumulative_score(&self) -> u64 {
        self.cumulative_score
    }

    pub fn perfect_rounds(&self) -> u32 {
        self.perfect_rounds
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::renderer::NoAssets;
    use crate::sim::clock::ManualClock;
    use crate::sim::input::{Direction, Key};
    use crate::sim::testkit::{RecordingHud, ScriptedAudio};

    type Log = Rc<RefCell<Vec<String>>>;
    type Script = Rc<RefCell<VecDeque<bool>>>;

    /// Finishes on its second update; outcome taken from a shared script
    struct ScriptedUnit {
        name: &'static str,
        mascot: bool,
        log: Log,
        script: Script,
        updates: u32,
        lose: bool,
    }

    impl ScriptedUnit {
        fn boxed(name: &'static str, log: &Log, script: &Script) -> Box<dyn Minigame> {
            Box::new(Self {
                name,
                mascot: false,
                log: log.clone(),
                script: script.clone(),
                updates: 0,
                lose: false,
            })
        }
    }

    impl Minigame for ScriptedUnit {
        fn name(&self) -> &'static str {
            self.name
        }

        fn start(&mut self, speed: f32, _cx: &mut Ctx<'_>) {
            self.updates = 0;
            self.lose = self.script.borrow_mut().pop_front().unwrap_or(false);
            self.log.borrow_mut().push(format!("start:{}:{:.3}", self.name, speed));
        }

        fn update(&mut self, _cx: &mut Ctx<'_>) {
            self.updates += 1;
        }

        fn draw(&self, out: &mut DrawList<'_>) {
            out.text(self.name, glam::Vec2::ZERO, 10.0, Rgba::WHITE);
        }

        fn handle_input(&mut self, _event: InputEvent, _cx: &mut Ctx<'_>) {
            self.log.borrow_mut().push(format!("input:{}", self.name));
        }

        fn cleanup(&mut self, _cx: &mut Ctx<'_>) {
            self.log.borrow_mut().push(format!("cleanup:{}", self.name));
        }

        fn on_resize(&mut self, width: f32, _height: f32) {
            self.log.borrow_mut().push(format!("resize:{}:{}", self.name, width));
        }

        fn is_finished(&self) -> bool {
            self.updates >= 2
        }

        fn mistakes(&self) -> u32 {
            if self.lose { 3 } else { 0 }
        }

        fn mistake_limit(&self) -> u32 {
            3
        }

        fn round_score(&self) -> u32 {
            if self.lose { 0 } else { 50 }
        }

        fn shows_mascot(&self) -> bool {
            self.mascot
        }
    }

    struct Rig {
        orch: Orchestrator,
        clock: ManualClock,
        log: Log,
        script: Script,
    }

    fn rig(names: &[&'static str], services: Services) -> Rig {
        let log: Log = Rc::default();
        let script: Script = Rc::default();
        let units = names.iter().map(|n| ScriptedUnit::boxed(*n, &log, &script)).collect();
        let clock = ManualClock::new(0.0);
        let orch = Orchestrator::new(units, services, Box::new(clock.clone())).unwrap();
        Rig {
            orch,
            clock,
            log,
            script,
        }
    }

    impl Rig {
        /// Queue outcomes for upcoming rounds (true = loss)
        fn script(&self, losses: &[bool]) {
            self.script.borrow_mut().extend(losses.iter().copied());
        }

        /// Tick until one round resolves
        fn play_round(&mut self) {
            for _ in 0..2 {
                self.clock.advance(16.0);
                self.orch.tick();
            }
        }

        fn entries(&self, prefix: &str) -> Vec<String> {
            self.log
                .borrow()
                .iter()
                .filter(|e| e.starts_with(prefix))
                .cloned()
                .collect()
        }
    }

    #[test]
    fn test_new_rejects_empty_lineup() {
        let result = Orchestrator::new(
            Vec::new(),
            Services::new(1),
            Box::new(ManualClock::new(0.0)),
        );
        assert!(matches!(result, Err(Error::NoMinigames)));
    }

    #[test]
    fn test_start_session_resets_and_shows_hud() {
        let hud = RecordingHud::new();
        let mut r = rig(&["a", "b"], Services::new(1).with_hud(hud.clone()));
        r.orch.start_session();

        assert!(r.orch.is_active());
        assert_eq!(r.orch.lives(), MAX_LIVES);
        assert_eq!(r.orch.unit_index(), 0);
        assert_eq!(r.orch.difficulty(), 1.0);
        assert!(hud.lives_visible());
        assert_eq!(hud.lives(), Some(MAX_LIVES));
        assert_eq!(r.entries("start"), vec!["start:a:1.000"]);
        assert_eq!(r.orch.drain_events(), vec![SessionEvent::SessionStarted]);
    }

    #[test]
    fn test_tick_is_noop_before_session() {
        let mut r = rig(&["a"], Services::new(1));
        r.play_round();
        assert!(r.log.borrow().is_empty());
        assert!(r.orch.drain_events().is_empty());
    }

    #[test]
    fn test_won_round_scores_and_advances() {
        let mut r = rig(&["a", "b"], Services::new(1));
        r.orch.start_session();
        r.orch.drain_events();
        r.play_round();

        assert_eq!(r.orch.unit_index(), 1);
        assert_eq!(r.orch.perfect_rounds(), 1);
        assert_eq!(r.orch.cumulative_score(), 50);
        assert_eq!(r.orch.lives(), MAX_LIVES);
        assert_eq!(
            r.orch.drain_events(),
            vec![SessionEvent::RoundWon { unit: "a", score: 50 }]
        );
    }

    #[test]
    fn test_lost_round_costs_a_life() {
        let hud = RecordingHud::new();
        let mut r = rig(&["a", "b"], Services::new(1).with_hud(hud.clone()));
        r.script(&[true]);
        r.orch.start_session();
        r.play_round();

        assert_eq!(r.orch.lives(), MAX_LIVES - 1);
        assert_eq!(hud.lives(), Some(MAX_LIVES - 1));
        assert_eq!(r.orch.perfect_rounds(), 0);
        assert_eq!(r.orch.cumulative_score(), 0);
        // A loss still moves on
        assert_eq!(r.orch.unit_index(), 1);
    }

    #[test]
    fn test_cleanup_precedes_next_start() {
        let mut r = rig(&["a", "b"], Services::new(1));
        r.orch.start_session();
        r.play_round();
        let log = r.log.borrow().clone();
        assert_eq!(log, vec!["start:a:1.000", "cleanup:a", "start:b:1.000"]);
    }

    #[test]
    fn test_difficulty_grows_once_per_cycle() {
        let mut r = rig(&["a", "b", "c"], Services::new(1));
        r.orch.start_session();
        for _ in 0..3 {
            r.play_round();
        }
        assert_eq!(r.orch.unit_index(), 0);
        assert!((r.orch.difficulty() - 1.2).abs() < 1e-6);
        assert_eq!(r.entries("start:a").last().unwrap(), "start:a:1.200");

        for _ in 0..3 {
            r.play_round();
        }
        assert!((r.orch.difficulty() - 1.44).abs() < 1e-5);
        let cycles = r
            .orch
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::CycleCompleted { .. }))
            .count();
        assert_eq!(cycles, 2);
    }

    #[test]
    fn test_single_unit_wraps_every_round() {
        let mut r = rig(&["solo"], Services::new(1));
        r.orch.start_session();
        r.play_round();
        r.play_round();
        assert_eq!(r.orch.unit_index(), 0);
        assert!((r.orch.difficulty() - 1.44).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_after_four_losses() {
        let hud = RecordingHud::new();
        let mut r = rig(&["a", "b", "c"], Services::new(1).with_hud(hud.clone()));
        r.script(&[true, false, true, true, false, true]);
        r.orch.start_session();

        for _ in 0..6 {
            assert!(r.orch.is_active());
            r.play_round();
        }
        assert!(!r.orch.is_active());
        assert_eq!(r.orch.lives(), 0);
        assert!(!hud.lives_visible());
        assert!(!hud.mascot_visible());

        // The finishing unit was cleaned up and nothing else started
        let log = r.log.borrow().clone();
        assert_eq!(log.last().map(String::as_str), Some("cleanup:c"));

        // Further ticks change nothing
        r.play_round();
        let events = r.orch.drain_events();
        let summaries: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::GameOver(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].lives_lost, MAX_LIVES);
        assert_eq!(summaries[0].total_score, 100);
        assert_eq!(summaries[0].perfect_rounds, 2);
        assert_eq!(summaries[0].elapsed_ms, 6 * 32);
        assert_eq!(r.orch.summary().map(|s| *s.payload()), Some(summaries[0]));
    }

    #[test]
    fn test_input_only_reaches_live_unit() {
        let mut r = rig(&["a", "b"], Services::new(1));
        r.orch.handle_input(InputEvent::Pressed(Key::Other));
        r.orch.start_session();
        r.orch.handle_input(InputEvent::Pressed(Key::Other));
        r.play_round();
        r.orch.handle_input(InputEvent::Pressed(Key::Other));
        assert_eq!(r.entries("input"), vec!["input:a", "input:b"]);

        r.orch.force_game_over();
        r.orch.handle_input(InputEvent::Pressed(Key::Other));
        assert_eq!(r.entries("input").len(), 2);
    }

    #[test]
    fn test_resize_reaches_every_unit() {
        let mut r = rig(&["a", "b", "c"], Services::new(1));
        r.orch.start_session();
        r.orch.on_resize(1024.0, 768.0);
        assert_eq!(
            r.entries("resize"),
            vec!["resize:a:1024", "resize:b:1024", "resize:c:1024"]
        );
    }

    #[test]
    fn test_force_game_over_emits_once() {
        let audio = ScriptedAudio::new();
        let mut r = rig(&["a", "b"], Services::new(1).with_audio(audio.clone()));
        r.orch.start_session();
        r.play_round();
        r.orch.force_game_over();
        r.orch.force_game_over();

        let overs = r
            .orch
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SessionEvent::GameOver(_)))
            .count();
        assert_eq!(overs, 1);
        assert_eq!(r.orch.summary().map(|s| s.payload().lives_lost), Some(0));
        assert_eq!(r.orch.summary().map(|s| s.payload().total_score), Some(50));
        assert!(audio.is_playing(crate::sim::services::Cue::GameOver));
    }

    #[test]
    fn test_restart_after_game_over() {
        let audio = ScriptedAudio::new();
        let mut r = rig(&["a", "b"], Services::new(1).with_audio(audio.clone()));
        r.orch.start_session();
        r.play_round();
        r.orch.force_game_over();
        r.orch.restart();

        assert!(r.orch.is_active());
        assert!(r.orch.summary().is_none());
        assert_eq!(r.orch.cumulative_score(), 0);
        assert_eq!(r.orch.perfect_rounds(), 0);
        assert_eq!(r.orch.unit_index(), 0);
        assert!(audio.was_paused(crate::sim::services::Cue::GameOver));
    }

    #[test]
    fn test_mascot_follows_live_unit() {
        let hud = RecordingHud::new();
        let log: Log = Rc::default();
        let script: Script = Rc::default();
        let units: Vec<Box<dyn Minigame>> = vec![
            Box::new(ScriptedUnit {
                name: "dancer",
                mascot: true,
                log: log.clone(),
                script: script.clone(),
                updates: 0,
                lose: false,
            }),
            ScriptedUnit::boxed("plain", &log, &script),
        ];
        let clock = ManualClock::new(0.0);
        let mut orch = Orchestrator::new(
            units,
            Services::new(1).with_hud(hud.clone()),
            Box::new(clock.clone()),
        )
        .unwrap();

        orch.start_session();
        assert!(hud.mascot_visible());
        for _ in 0..2 {
            clock.advance(16.0);
            orch.tick();
        }
        assert!(!hud.mascot_visible());
        for _ in 0..2 {
            clock.advance(16.0);
            orch.tick();
        }
        assert!(hud.mascot_visible());
    }

    #[test]
    fn test_draw_switches_to_summary() {
        let mut r = rig(&["a"], Services::new(1));
        r.orch.start_session();
        let mut list = DrawList::new(&NoAssets);
        r.orch.draw(&mut list);
        assert!(list.has_text("a"));

        r.orch.force_game_over();
        let mut list = DrawList::new(&NoAssets);
        r.orch.draw(&mut list);
        assert!(list.has_text("GAME OVER"));
    }

    #[test]
    fn test_timing_loss_costs_a_life() {
        let clock = ManualClock::new(0.0);
        let mut orch = Orchestrator::standard(
            Services::new(3),
            Box::new(clock.clone()),
            &Tuning::default(),
        );
        orch.start_session();
        clock.advance(600.0);
        orch.tick();
        for _ in 0..3 {
            orch.handle_input(InputEvent::Pressed(Key::Arrow(Direction::Left)));
        }
        while orch.unit_index() == 0 {
            clock.advance(16.0);
            orch.tick();
            assert!(clock.now_ms() < 10_000.0);
        }
        assert_eq!(orch.lives(), MAX_LIVES - 1);
        assert_eq!(orch.current_unit().name(), "reaction");
    }

    #[test]
    fn test_autopilot_clears_a_full_cycle_without_collaborators() {
        let clock = ManualClock::new(0.0);
        let mut orch = Orchestrator::standard(
            Services::new(11),
            Box::new(clock.clone()),
            &Tuning::default(),
        );
        orch.on_resize(800.0, 600.0);
        orch.start_session();

        while orch.difficulty() == 1.0 {
            clock.advance(16.0);
            orch.tick();
            for event in orch.autopilot_inputs() {
                orch.handle_input(event);
            }
            assert!(clock.now_ms() < 120_000.0, "cycle never completed");
        }
        assert_eq!(orch.lives(), MAX_LIVES);
        assert_eq!(orch.perfect_rounds(), 3);
        assert!(orch.cumulative_score() >= 100 + 100 + 20);
    }

    proptest! {
        #[test]
        fn test_session_invariants(
            unit_count in 1usize..5,
            outcomes in proptest::collection::vec(any::<bool>(), 1..40),
        ) {
            let names = ["a", "b", "c", "d"];
            let mut r = rig(&names[..unit_count], Services::new(1));
            r.script(&outcomes);
            r.orch.start_session();

            let mut last_difficulty = r.orch.difficulty();
            let mut last_index = r.orch.unit_index();
            let mut game_overs = 0;
            for _ in 0..outcomes.len() + 5 {
                r.play_round();
                let d = r.orch.difficulty();
                prop_assert!(r.orch.lives() <= MAX_LIVES);
                prop_assert!(d >= last_difficulty);

                if r.orch.is_active() {
                    prop_assert!(r.orch.unit_index() < unit_count);
                    let wrapped = r.orch.unit_index() == 0
                        && (unit_count == 1 || last_index == unit_count - 1);
                    if wrapped {
                        prop_assert!((d / last_difficulty - DIFFICULTY_GROWTH).abs() < 1e-4);
                    } else {
                        prop_assert_eq!(d, last_difficulty);
                    }
                }
                game_overs += r
                    .orch
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, SessionEvent::GameOver(_)))
                    .count();
                last_difficulty = d;
                last_index = r.orch.unit_index();
            }

            let losses = outcomes.iter().filter(|l| **l).count();
            prop_assert_eq!(game_overs, usize::from(losses >= MAX_LIVES as usize));
            prop_assert_eq!(r.orch.is_active(), losses < MAX_LIVES as usize);
        }
    }
}
