//! The uniform contract every minigame implements

use super::clock::Millis;
use super::input::InputEvent;
use super::phase::Resolution;
use super::services::Ctx;
use crate::renderer::DrawList;

/// A minigame unit
///
/// Units are built once and reused: `start` must reset every piece of
/// per-attempt state.
pub trait Minigame {
    /// Short name for logs and events
    fn name(&self) -> &'static str;

    /// Begin a fresh attempt at the given difficulty
    fn start(&mut self, speed: f32, cx: &mut Ctx<'_>);

    /// Advance one host frame
    fn update(&mut self, cx: &mut Ctx<'_>);

    fn draw(&self, out: &mut DrawList<'_>);

    fn handle_input(&mut self, event: InputEvent, cx: &mut Ctx<'_>);

    /// Stop anything still audible; safe to call repeatedly
    fn cleanup(&mut self, cx: &mut Ctx<'_>);

    /// Viewport changed; recompute layout without touching round state
    fn on_resize(&mut self, _width: f32, _height: f32) {}

    /// True once the round (finale included) is over
    fn is_finished(&self) -> bool;

    fn mistakes(&self) -> u32;

    fn mistake_limit(&self) -> u32;

    /// Score earned; meaningful only for a won round
    fn round_score(&self) -> u32;

    /// Whether the dancing mascot belongs on screen during this unit
    fn shows_mascot(&self) -> bool {
        false
    }

    /// Inputs a competent player would send right now (demo/idle mode)
    fn autopilot(&self, _now: Millis, _out: &mut Vec<InputEvent>) {}

    /// Outcome as the orchestrator judges it, once finished
    fn outcome(&self) -> Option<Resolution> {
        if !self.is_finished() {
            return None;
        }
        if self.mistakes() >= self.mistake_limit() {
            Some(Resolution::Lost)
        } else {
            Some(Resolution::Won)
        }
    }
}
