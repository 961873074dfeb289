//! Player preferences
//!
//! Persisted per profile, falling back to a global entry when nobody is logged in.

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Volume category a cue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeChannel {
    Music,
    Sfx,
}

impl VolumeChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeChannel::Music => "Music",
            VolumeChannel::Sfx => "Sfx",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music and ambience volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no jumpscare flicker, static end frames)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            music_volume: 0.4,
            sfx_volume: 0.7,
            muted: false,
            mute_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Global storage key
    const STORAGE_KEY: &'static str = "plugie_settings";

    /// Storage key for a profile (or the global one)
    pub fn storage_key(profile: Option<&str>) -> String {
        match profile {
            Some(name) => format!("{}_{}", Self::STORAGE_KEY, name),
            None => Self::STORAGE_KEY.to_string(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Effective gain for a channel (master x channel, 0 when muted)
    pub fn channel_volume(&self, channel: VolumeChannel) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = match channel {
            VolumeChannel::Music => self.music_volume,
            VolumeChannel::Sfx => self.sfx_volume,
        };
        (self.master_volume * channel).clamp(0.0, 1.0)
    }

    /// Load settings for a profile, falling back to the global entry, then defaults
    pub fn load(profile: Option<&str>) -> Self {
        if let Some(settings) = persistence::load_or_warn(&Self::storage_key(profile)) {
            log::info!("Loaded settings for {}", profile.unwrap_or("<global>"));
            return settings;
        }
        if profile.is_some() {
            if let Some(settings) = persistence::load_or_warn(Self::STORAGE_KEY) {
                log::info!("Loaded global settings");
                return settings;
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings for a profile (or globally)
    pub fn save(&self, profile: Option<&str>) {
        persistence::save_or_warn(&Self::storage_key(profile), self);
        log::info!("Settings saved");
    }
}
