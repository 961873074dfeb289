//! Player profiles and highscores
//!
//! Persisted to LocalStorage on web. The summary view only ever sees the
//! narrow `ProfileStore` seam.

use serde::{Deserialize, Serialize};

use crate::persistence;

/// A single player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name (trimmed, unique case-insensitively)
    pub name: String,
    /// Best session score
    pub highscore: u64,
    /// Unix timestamp (ms) when created
    pub created_at: f64,
}

/// What the summary view needs from persistence
pub trait ProfileStore {
    /// The logged-in profile, if any
    fn current_profile(&self) -> Option<Profile>;
    /// Record a finished session; true when it beats the current highscore
    fn update_highscore(&mut self, score: u64) -> bool;
}

/// All known profiles plus the selected one
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profiles {
    pub users: Vec<Profile>,
    #[serde(skip)]
    current: Option<String>,
}

impl Profiles {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "plugie_profiles";

    /// Create an empty profile list
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            current: None,
        }
    }

    /// Create (or reuse, ignoring case) a profile and select it
    pub fn create_user(&mut self, name: &str, now: f64) -> Option<Profile> {
        let clean = name.trim();
        if clean.is_empty() {
            return None;
        }

        let existing = self
            .users
            .iter()
            .position(|u| u.name.to_lowercase() == clean.to_lowercase());
        let idx = match existing {
            Some(i) => i,
            None => {
                self.users.push(Profile {
                    name: clean.to_string(),
                    highscore: 0,
                    created_at: now,
                });
                self.save();
                self.users.len() - 1
            }
        };

        self.current = Some(self.users[idx].name.clone());
        Some(self.users[idx].clone())
    }

    /// Select an existing profile by exact name
    pub fn select_user(&mut self, name: &str) -> Option<Profile> {
        let user = self.users.iter().find(|u| u.name == name)?.clone();
        self.current = Some(user.name.clone());
        Some(user)
    }

    /// Delete a profile (deselecting it if it was current)
    pub fn delete_user(&mut self, name: &str) {
        self.users.retain(|u| u.name != name);
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        self.save();
    }

    /// Profiles sorted by highscore, best first
    pub fn ranking(&self) -> Vec<Profile> {
        let mut users = self.users.clone();
        users.sort_by(|a, b| b.highscore.cmp(&a.highscore));
        users
    }

    /// Name of the selected profile
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Check if there are no profiles
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Load profiles from storage (empty list when nothing is stored)
    pub fn load() -> Self {
        match persistence::load_or_warn::<Profiles>(Self::STORAGE_KEY) {
            Some(profiles) => {
                log::info!("Loaded {} profiles", profiles.users.len());
                profiles
            }
            None => {
                log::info!("No profiles found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save profiles to storage
    pub fn save(&self) {
        persistence::save_or_warn(Self::STORAGE_KEY, self);
        log::debug!("Profiles saved ({} entries)", self.users.len());
    }
}

impl ProfileStore for Profiles {
    fn current_profile(&self) -> Option<Profile> {
        let name = self.current.as_deref()?;
        self.users.iter().find(|u| u.name == name).cloned()
    }

    fn update_highscore(&mut self, score: u64) -> bool {
        let Some(name) = self.current.clone() else {
            return false;
        };
        let Some(user) = self.users.iter_mut().find(|u| u.name == name) else {
            return false;
        };
        if score <= user.highscore {
            return false;
        }

        user.highscore = score;
        log::info!("New highscore for {}: {}", name, score);
        self.save();
        true
    }
}
