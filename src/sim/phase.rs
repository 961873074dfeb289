//! Round lifecycle shared by every minigame
//!
//! `Waiting -> Active -> Resolving -> Settling -> Finished`. The active payload
//! is minigame-specific; the terminal half is driven here for all of them.

use super::clock::Millis;
use super::services::{Ctx, Cue};
use super::settle::{FrameSequence, SettleBarrier};

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Won,
    Lost,
}

/// Terminal cue and animation for one outcome
#[derive(Debug, Clone, Copy)]
pub struct Finale {
    pub cue: Cue,
    pub frames: &'static [u8],
    pub interval: Millis,
}

/// Round state with state-specific payload
#[derive(Debug, Clone)]
pub enum Phase<A> {
    /// Pre-roll: time-gated, no input
    Waiting { until: Millis },
    /// The challenge itself
    Active(A),
    /// Grace period before the finale starts
    Resolving {
        outcome: Resolution,
        until: Millis,
        /// Cue that must end before the finale (e.g. the last mistake's buzz)
        awaiting: Option<Cue>,
    },
    /// Finale playing
    Settling {
        outcome: Resolution,
        frames: FrameSequence,
        barrier: SettleBarrier,
        cue: Cue,
    },
    Finished(Resolution),
}

/// What `step_terminal` did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStep {
    /// Not in Resolving/Settling
    NotTerminal,
    /// Still resolving or settling
    Pending,
    /// Finale just started
    Settling(Resolution),
    /// Round just finished
    Finished(Resolution),
}

impl<A> Phase<A> {
    pub fn waiting(now: Millis, preroll: Millis) -> Self {
        Phase::Waiting {
            until: now + preroll.max(0.0),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Finished(_))
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Phase::Waiting { .. })
    }

    pub fn active(&self) -> Option<&A> {
        match self {
            Phase::Active(a) => Some(a),
            _ => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut A> {
        match self {
            Phase::Active(a) => Some(a),
            _ => None,
        }
    }

    /// Outcome once decided (Resolving onward)
    pub fn outcome(&self) -> Option<Resolution> {
        match self {
            Phase::Resolving { outcome, .. } | Phase::Settling { outcome, .. } => Some(*outcome),
            Phase::Finished(outcome) => Some(*outcome),
            _ => None,
        }
    }

    /// Current finale frame while settling
    pub fn finale_frame(&self) -> Option<u8> {
        match self {
            Phase::Settling { frames, .. } => frames.current(),
            _ => None,
        }
    }

    /// Finale progress in [0, 1] while settling
    pub fn finale_progress(&self) -> Option<f32> {
        match self {
            Phase::Settling { frames, .. } => Some(frames.progress()),
            _ => None,
        }
    }

    /// Leave Waiting once its deadline has passed; true on the transition
    pub fn activate_when_due(&mut self, now: Millis, make: impl FnOnce() -> A) -> bool {
        match self {
            Phase::Waiting { until } if now >= *until => {
                *self = Phase::Active(make());
                true
            }
            _ => false,
        }
    }

    /// Active -> Resolving
    pub fn resolve(&mut self, outcome: Resolution, until: Millis, awaiting: Option<Cue>) {
        *self = Phase::Resolving {
            outcome,
            until,
            awaiting,
        };
    }

    /// Drive Resolving and Settling forward
    pub fn step_terminal(
        &mut self,
        cx: &mut Ctx<'_>,
        finale: impl FnOnce(Resolution) -> Finale,
    ) -> TerminalStep {
        match self {
            Phase::Resolving {
                outcome,
                until,
                awaiting,
            } => {
                let awaited_done = awaiting.is_none_or(|cue| cx.sv.cue_ended(cue));
                if cx.now < *until || !awaited_done {
                    return TerminalStep::Pending;
                }
                let outcome = *outcome;
                let f = finale(outcome);
                cx.sv.play(f.cue);
                *self = Phase::Settling {
                    outcome,
                    frames: FrameSequence::new(f.frames, f.interval, cx.now),
                    barrier: SettleBarrier::new(),
                    cue: f.cue,
                };
                TerminalStep::Settling(outcome)
            }
            Phase::Settling {
                outcome,
                frames,
                barrier,
                cue,
            } => {
                frames.advance(cx.now);
                if !barrier.poll(frames.is_exhausted(), cx.sv.cue_ended(*cue)) {
                    return TerminalStep::Pending;
                }
                let outcome = *outcome;
                *self = Phase::Finished(outcome);
                TerminalStep::Finished(outcome)
            }
            _ => TerminalStep::NotTerminal,
        }
    }
}
