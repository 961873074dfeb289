//! Optional collaborators of a session
//!
//! HUD, audio and profile storage are wired once into `Services`; call sites
//! go through helpers that turn a missing collaborator into a no-op.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::Millis;
use super::input::Direction;
use crate::profiles::{Profile, ProfileStore};
use crate::settings::{Settings, VolumeChannel};

/// Heads-up display living outside the game canvas
///
/// Every method is fire-and-forget; implementors override what they support.
pub trait Hud {
    fn show_lives(&mut self) {}
    fn hide_lives(&mut self) {}
    fn update_lives(&mut self, _count: u32) {}
    fn show_mascot(&mut self) {}
    fn hide_mascot(&mut self) {}
    fn animate_mascot(&mut self, _direction: Direction) {}
    fn reset_mascot_idle(&mut self) {}
}

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    TimingMusic,
    TimingHit(Direction),
    TimingWrong,
    TimingWin,
    TimingLose,
    ReactionWaiting,
    ReactionFootstep,
    ReactionGrowl,
    ReactionPunch,
    MazeAmbient,
    MazeJumpscare,
    MazeWin,
    GameOver,
}

impl Cue {
    /// Mix level relative to its channel
    pub fn base_volume(&self) -> f32 {
        match self {
            Cue::TimingMusic => 0.3,
            Cue::TimingHit(_) => 0.7,
            Cue::TimingWrong => 0.4,
            Cue::TimingWin => 1.0,
            Cue::TimingLose => 0.7,
            Cue::ReactionWaiting => 0.5,
            Cue::ReactionFootstep => 0.6,
            Cue::ReactionGrowl => 1.0,
            Cue::ReactionPunch => 0.8,
            Cue::MazeAmbient => 0.4,
            Cue::MazeJumpscare => 0.8,
            Cue::MazeWin => 0.7,
            Cue::GameOver => 0.6,
        }
    }

    pub fn channel(&self) -> VolumeChannel {
        match self {
            Cue::TimingMusic | Cue::ReactionWaiting | Cue::MazeAmbient => VolumeChannel::Music,
            _ => VolumeChannel::Sfx,
        }
    }

    /// Loops until paused
    pub fn is_looping(&self) -> bool {
        matches!(self, Cue::TimingMusic | Cue::ReactionWaiting | Cue::MazeAmbient)
    }
}

/// Audio playback, polled rather than awaited
pub trait AudioBackend {
    /// Play a cue from its beginning
    fn play(&mut self, cue: Cue, volume: f32);
    fn pause(&mut self, cue: Cue);
    /// True unless the cue is still sounding
    ///
    /// A cue that played to its end, was paused, or was never started has
    /// ended. Settling waits on this, so a paused cue must never hold a round.
    fn has_ended(&self, cue: Cue) -> bool;
}

/// Explicit context for a session: collaborators, preferences and randomness
pub struct Services {
    hud: Option<Box<dyn Hud>>,
    audio: Option<Box<dyn AudioBackend>>,
    profiles: Option<Box<dyn ProfileStore>>,
    pub settings: Settings,
    pub rng: Pcg32,
}

impl Services {
    /// Bare services: no HUD, no audio, no profiles
    pub fn new(seed: u64) -> Self {
        Self {
            hud: None,
            audio: None,
            profiles: None,
            settings: Settings::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn with_hud(mut self, hud: impl Hud + 'static) -> Self {
        self.hud = Some(Box::new(hud));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioBackend + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_profiles(mut self, profiles: impl ProfileStore + 'static) -> Self {
        self.profiles = Some(Box::new(profiles));
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Run `f` against the HUD if one is wired
    pub fn on_hud(&mut self, f: impl FnOnce(&mut dyn Hud)) {
        if let Some(hud) = self.hud.as_deref_mut() {
            f(hud);
        }
    }

    /// Start a cue at its mixed volume
    pub fn play(&mut self, cue: Cue) {
        let volume = cue.base_volume() * self.settings.channel_volume(cue.channel());
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.play(cue, volume);
        }
    }

    pub fn pause(&mut self, cue: Cue) {
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.pause(cue);
        }
    }

    /// Whether a cue has finished; a session without audio never waits
    pub fn cue_ended(&self, cue: Cue) -> bool {
        self.audio.as_deref().is_none_or(|a| a.has_ended(cue))
    }

    pub fn current_profile(&self) -> Option<Profile> {
        self.profiles.as_deref().and_then(|p| p.current_profile())
    }

    /// Report a final score; false when no profile store is wired
    pub fn update_highscore(&mut self, score: u64) -> bool {
        self.profiles
            .as_deref_mut()
            .is_some_and(|p| p.update_highscore(score))
    }
}

/// What a minigame sees during one call: the sampled time and the services
pub struct Ctx<'a> {
    pub now: Millis,
    pub sv: &'a mut Services,
}

impl<'a> Ctx<'a> {
    pub fn new(now: Millis, sv: &'a mut Services) -> Self {
        Self { now, sv }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testkit::{RecordingHud, ScriptedAudio};

    #[test]
    fn test_missing_collaborators_are_noops() {
        let mut sv = Services::new(1);
        sv.on_hud(|h| h.update_lives(2));
        sv.play(Cue::TimingWin);
        sv.pause(Cue::TimingWin);
        assert!(sv.cue_ended(Cue::TimingWin));
        assert!(sv.current_profile().is_none());
        assert!(!sv.update_highscore(100));
    }

    #[test]
    fn test_play_uses_mixed_volume() {
        let audio = ScriptedAudio::new();
        let mut sv = Services::new(1).with_audio(audio.clone());
        sv.play(Cue::TimingWin);
        // 1.0 base x master 0.5 x sfx 0.7
        let played = audio.last_volume(Cue::TimingWin).unwrap();
        assert!((played - 0.35).abs() < 1e-6);
        assert!(!sv.cue_ended(Cue::TimingWin));
        audio.finish(Cue::TimingWin);
        assert!(sv.cue_ended(Cue::TimingWin));
    }

    #[test]
    fn test_paused_cue_counts_as_ended() {
        let audio = ScriptedAudio::new();
        let mut sv = Services::new(1).with_audio(audio.clone());
        sv.play(Cue::MazeAmbient);
        assert!(!sv.cue_ended(Cue::MazeAmbient));
        sv.pause(Cue::MazeAmbient);
        assert!(audio.was_paused(Cue::MazeAmbient));
        assert!(sv.cue_ended(Cue::MazeAmbient));
        // Replaying makes it sound again
        sv.play(Cue::MazeAmbient);
        assert!(!sv.cue_ended(Cue::MazeAmbient));
    }

    #[test]
    fn test_hud_receives_calls() {
        let hud = RecordingHud::new();
        let mut sv = Services::new(1).with_hud(hud.clone());
        sv.on_hud(|h| h.update_lives(3));
        assert_eq!(hud.lives(), Some(3));
    }

    #[test]
    fn test_music_cues_loop() {
        assert!(Cue::MazeAmbient.is_looping());
        assert_eq!(Cue::MazeAmbient.channel(), VolumeChannel::Music);
        assert!(!Cue::MazeWin.is_looping());
    }
}
