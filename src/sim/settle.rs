//! End-of-round animation timing
//!
//! A round settles only when its frame sequence has run out AND its terminal
//! cue has finished, whichever comes last.

use super::clock::Millis;

/// Fixed-interval frame animation
#[derive(Debug, Clone)]
pub struct FrameSequence {
    frames: &'static [u8],
    interval: Millis,
    step: usize,
    last_switch: Millis,
}

impl FrameSequence {
    pub fn new(frames: &'static [u8], interval: Millis, now: Millis) -> Self {
        Self {
            frames,
            interval: interval.max(1.0),
            step: 0,
            last_switch: now,
        }
    }

    /// Advance one frame per elapsed interval, catching up after slow ticks
    pub fn advance(&mut self, now: Millis) {
        while self.step < self.frames.len() && now - self.last_switch >= self.interval {
            self.step += 1;
            self.last_switch += self.interval;
        }
    }

    /// Frame to show (the last one is held once exhausted)
    pub fn current(&self) -> Option<u8> {
        if self.frames.is_empty() {
            return None;
        }
        Some(self.frames[self.step.min(self.frames.len() - 1)])
    }

    /// Frames shown so far, including the current one
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Every frame has been on screen for a full interval
    pub fn is_exhausted(&self) -> bool {
        self.step >= self.frames.len()
    }

    /// Progress through the sequence in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.frames.is_empty() {
            return 1.0;
        }
        (self.step as f32 / self.frames.len() as f32).min(1.0)
    }
}

/// Join of two completion signals (animation, audio)
///
/// Both flags are sticky: once observed they stay set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleBarrier {
    animation_done: bool,
    audio_done: bool,
}

impl SettleBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_animation_done(&mut self) {
        self.animation_done = true;
    }

    pub fn mark_audio_done(&mut self) {
        self.audio_done = true;
    }

    /// Record the latest observations and report whether both are done
    pub fn poll(&mut self, animation_done: bool, audio_done: bool) -> bool {
        self.animation_done |= animation_done;
        self.audio_done |= audio_done;
        self.is_open()
    }

    pub fn is_open(&self) -> bool {
        self.animation_done && self.audio_done
    }
}
