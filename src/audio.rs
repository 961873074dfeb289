//! Audio backend using the Web Audio API
//!
//! Procedurally generated cues - no sound files needed. Every started cue
//! remembers when it stops so the game can poll `has_ended`; music and
//! ambience drones run until paused.

use std::collections::HashMap;

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::input::Direction;
use crate::sim::services::{AudioBackend, Cue};

/// One oscillator burst, relative to the cue start (seconds)
#[derive(Debug, Clone, Copy)]
struct Note {
    freq: f32,
    wave: OscillatorType,
    at: f64,
    len: f64,
    level: f32,
    /// Exponential glide target over the note
    glide_to: Option<f32>,
}

const fn note(freq: f32, wave: OscillatorType, at: f64, len: f64, level: f32) -> Note {
    Note {
        freq,
        wave,
        at,
        len,
        level,
        glide_to: None,
    }
}

const fn glide(freq: f32, to: f32, wave: OscillatorType, at: f64, len: f64, level: f32) -> Note {
    Note {
        freq,
        wave,
        at,
        len,
        level,
        glide_to: Some(to),
    }
}

/// Oscillators of a playing cue and when the last one stops
struct Voice {
    nodes: Vec<OscillatorNode>,
    ends_at: f64,
}

/// Audio manager for the game
pub struct WebAudio {
    ctx: Option<AudioContext>,
    voices: HashMap<Cue, Voice>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            voices: HashMap::new(),
        }
    }

    /// Handle on the context for suspend/resume from the host
    pub fn context(&self) -> Option<AudioContext> {
        self.ctx.clone()
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Schedule a one-shot phrase; returns its nodes
    fn schedule(ctx: &AudioContext, notes: &[Note], vol: f32) -> Vec<OscillatorNode> {
        let t0 = ctx.current_time();
        let mut nodes = Vec::with_capacity(notes.len());
        for n in notes {
            let Some((osc, gain)) = Self::create_osc(ctx, n.freq, n.wave) else {
                continue;
            };
            let t = t0 + n.at;
            gain.gain().set_value_at_time((vol * n.level).max(0.0001), t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t + n.len)
                .ok();
            if let Some(to) = n.glide_to {
                osc.frequency().set_value_at_time(n.freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + n.len)
                    .ok();
            }
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + n.len + 0.05).ok();
            nodes.push(osc);
        }
        nodes
    }

    /// Sustained drone that runs until stopped
    fn drone(
        ctx: &AudioContext,
        tones: &[(f32, OscillatorType, f32)],
        vol: f32,
    ) -> Vec<OscillatorNode> {
        let t = ctx.current_time();
        tones
            .iter()
            .filter_map(|&(freq, wave, level)| {
                let (osc, gain) = Self::create_osc(ctx, freq, wave)?;
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(vol * level, t + 0.4)
                    .ok();
                osc.start().ok();
                Some(osc)
            })
            .collect()
    }

    fn phrase(cue: Cue) -> Vec<Note> {
        use OscillatorType::{Sawtooth, Sine, Square, Triangle};
        match cue {
            Cue::TimingHit(dir) => {
                let freq = match dir {
                    Direction::Left => 523.0,
                    Direction::Down => 587.0,
                    Direction::Up => 659.0,
                    Direction::Right => 784.0,
                };
                vec![note(freq, Triangle, 0.0, 0.15, 0.5)]
            }
            Cue::TimingWrong => vec![
                note(110.0, Square, 0.0, 0.25, 0.35),
                note(104.0, Sawtooth, 0.0, 0.25, 0.2),
            ],
            Cue::TimingWin => [523.0, 659.0, 784.0, 1047.0]
                .iter()
                .enumerate()
                .map(|(i, f)| note(*f, Triangle, i as f64 * 0.15, 0.4, 0.35))
                .collect(),
            Cue::TimingLose => [392.0, 349.0, 311.0, 262.0]
                .iter()
                .enumerate()
                .map(|(i, f)| note(*f, Sine, i as f64 * 0.25, 0.35, 0.35))
                .collect(),
            Cue::ReactionFootstep => vec![glide(90.0, 45.0, Sine, 0.0, 0.12, 0.7)],
            Cue::ReactionGrowl => vec![
                glide(80.0, 50.0, Sawtooth, 0.0, 1.2, 0.5),
                glide(120.0, 70.0, Square, 0.05, 1.0, 0.2),
            ],
            Cue::ReactionPunch => vec![
                glide(150.0, 40.0, Sine, 0.0, 0.3, 0.8),
                note(1500.0, Square, 0.0, 0.08, 0.2),
                note(880.0, Triangle, 0.35, 0.5, 0.3),
            ],
            Cue::MazeJumpscare => vec![
                glide(1800.0, 300.0, Sawtooth, 0.0, 0.9, 0.6),
                note(60.0, Square, 0.0, 1.0, 0.4),
            ],
            Cue::MazeWin => [392.0, 523.0, 659.0, 784.0, 1047.0]
                .iter()
                .enumerate()
                .map(|(i, f)| note(*f, Triangle, i as f64 * 0.1, 0.3, 0.3))
                .collect(),
            Cue::GameOver => [400.0, 350.0, 300.0, 200.0]
                .iter()
                .enumerate()
                .map(|(i, f)| note(*f, Sine, i as f64 * 0.2, 0.3, 0.3))
                .collect(),
            // Loops are drones, see `drone_tones`
            Cue::TimingMusic | Cue::ReactionWaiting | Cue::MazeAmbient => Vec::new(),
        }
    }

    fn drone_tones(cue: Cue) -> &'static [(f32, OscillatorType, f32)] {
        match cue {
            Cue::TimingMusic => &[
                (131.0, OscillatorType::Triangle, 0.3),
                (196.0, OscillatorType::Sine, 0.2),
            ],
            Cue::ReactionWaiting => &[
                (55.0, OscillatorType::Sine, 0.4),
                (58.0, OscillatorType::Sine, 0.3),
            ],
            Cue::MazeAmbient => &[
                (73.0, OscillatorType::Sawtooth, 0.08),
                (110.0, OscillatorType::Sine, 0.2),
            ],
            _ => &[],
        }
    }

    fn stop_voice(&mut self, cue: Cue) {
        if let Some(voice) = self.voices.remove(&cue) {
            for osc in voice.nodes {
                osc.stop().ok();
            }
        }
    }
}

impl AudioBackend for WebAudio {
    fn play(&mut self, cue: Cue, volume: f32) {
        self.stop_voice(cue);
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let voice = if cue.is_looping() {
            Voice {
                nodes: Self::drone(ctx, Self::drone_tones(cue), volume),
                ends_at: f64::INFINITY,
            }
        } else {
            let notes = Self::phrase(cue);
            let span = notes.iter().map(|n| n.at + n.len).fold(0.0, f64::max);
            Voice {
                nodes: Self::schedule(ctx, &notes, volume),
                ends_at: ctx.current_time() + span,
            }
        };
        self.voices.insert(cue, voice);
    }

    fn pause(&mut self, cue: Cue) {
        self.stop_voice(cue);
    }

    fn has_ended(&self, cue: Cue) -> bool {
        match (&self.ctx, self.voices.get(&cue)) {
            // A suspended context's clock stands still (autoplay policy, blur)
            (Some(ctx), Some(_)) if ctx.state() != web_sys::AudioContextState::Running => true,
            (Some(ctx), Some(voice)) => ctx.current_time() >= voice.ends_at,
            _ => true,
        }
    }
}
