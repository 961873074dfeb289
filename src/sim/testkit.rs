//! Test doubles for the collaborator seams

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::input::Direction;
use super::services::{AudioBackend, Cue, Hud};

#[derive(Debug, Default)]
struct HudLog {
    lives_visible: bool,
    lives: Option<u32>,
    mascot_visible: bool,
    mascot_moves: Vec<Direction>,
    calls: Vec<&'static str>,
}

/// HUD that remembers what it was told
#[derive(Debug, Clone, Default)]
pub struct RecordingHud(Rc<RefCell<HudLog>>);

impl RecordingHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lives(&self) -> Option<u32> {
        self.0.borrow().lives
    }

    pub fn lives_visible(&self) -> bool {
        self.0.borrow().lives_visible
    }

    pub fn mascot_visible(&self) -> bool {
        self.0.borrow().mascot_visible
    }

    pub fn mascot_moves(&self) -> Vec<Direction> {
        self.0.borrow().mascot_moves.clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.borrow().calls.clone()
    }
}

impl Hud for RecordingHud {
    fn show_lives(&mut self) {
        let mut log = self.0.borrow_mut();
        log.lives_visible = true;
        log.calls.push("show_lives");
    }

    fn hide_lives(&mut self) {
        let mut log = self.0.borrow_mut();
        log.lives_visible = false;
        log.calls.push("hide_lives");
    }

    fn update_lives(&mut self, count: u32) {
        let mut log = self.0.borrow_mut();
        log.lives = Some(count);
        log.calls.push("update_lives");
    }

    fn show_mascot(&mut self) {
        let mut log = self.0.borrow_mut();
        log.mascot_visible = true;
        log.calls.push("show_mascot");
    }

    fn hide_mascot(&mut self) {
        let mut log = self.0.borrow_mut();
        log.mascot_visible = false;
        log.calls.push("hide_mascot");
    }

    fn animate_mascot(&mut self, direction: Direction) {
        let mut log = self.0.borrow_mut();
        log.mascot_moves.push(direction);
        log.calls.push("animate_mascot");
    }

    fn reset_mascot_idle(&mut self) {
        self.0.borrow_mut().calls.push("reset_mascot_idle");
    }
}

#[derive(Debug, Default)]
struct AudioLog {
    playing: HashSet<Cue>,
    paused: HashSet<Cue>,
    volumes: HashMap<Cue, f32>,
    plays: Vec<Cue>,
}

/// Audio whose cues only end when a test says so
#[derive(Debug, Clone, Default)]
pub struct ScriptedAudio(Rc<RefCell<AudioLog>>);

impl ScriptedAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let a playing cue reach its end
    pub fn finish(&self, cue: Cue) {
        self.0.borrow_mut().playing.remove(&cue);
    }

    pub fn is_playing(&self, cue: Cue) -> bool {
        self.0.borrow().playing.contains(&cue)
    }

    pub fn was_paused(&self, cue: Cue) -> bool {
        self.0.borrow().paused.contains(&cue)
    }

    pub fn play_count(&self, cue: Cue) -> usize {
        self.0.borrow().plays.iter().filter(|c| **c == cue).count()
    }

    pub fn last_volume(&self, cue: Cue) -> Option<f32> {
        self.0.borrow().volumes.get(&cue).copied()
    }
}

impl AudioBackend for ScriptedAudio {
    fn play(&mut self, cue: Cue, volume: f32) {
        let mut log = self.0.borrow_mut();
        log.playing.insert(cue);
        log.paused.remove(&cue);
        log.volumes.insert(cue, volume);
        log.plays.push(cue);
    }

    fn pause(&mut self, cue: Cue) {
        let mut log = self.0.borrow_mut();
        if log.playing.remove(&cue) {
            log.paused.insert(cue);
        }
    }

    fn has_ended(&self, cue: Cue) -> bool {
        // A paused cue never reaches its end on its own
        !self.0.borrow().playing.contains(&cue)
    }
}
