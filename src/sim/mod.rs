//! Game logic module
//!
//! Everything that decides outcomes lives here. It stays free of platform
//! dependencies:
//! - Time comes in as a sampled `now`, never read from a global clock
//! - Randomness comes from the seeded session RNG
//! - Output is a draw list and calls on the collaborator seams

pub mod clock;
pub mod input;
pub mod maze;
pub mod minigame;
pub mod navigation;
pub mod orchestrator;
pub mod phase;
pub mod reaction;
pub mod services;
pub mod settle;
pub mod timing;

#[cfg(test)]
pub(crate) mod testkit;

pub use clock::{Clock, ManualClock, Millis, MonotonicClock};
pub use input::{CheatBuffer, Direction, InputEvent, Key};
pub use maze::Maze;
pub use minigame::Minigame;
pub use navigation::NavigationGame;
pub use orchestrator::{Orchestrator, SessionEvent};
pub use phase::{Phase, Resolution};
pub use reaction::ReactionGame;
pub use services::{AudioBackend, Ctx, Cue, Hud, Services};
pub use timing::TimingGame;
