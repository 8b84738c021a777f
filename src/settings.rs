//! Game settings and preferences
//!
//! Persisted separately from the sandbox snapshot. Missing or corrupt
//! settings fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::platform::KvStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects on/off
    pub sfx: bool,
    /// Effect volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx: true,
            volume: 0.8,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "dont_fall_settings";

    pub fn load(store: &dyn KvStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("settings unreadable ({err}), using defaults");
                    Self::default()
                }
            },
            None => {
                log::info!("using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn KvStore) {
        match serde_json::to_string(self) {
            Ok(json) => store.set(Self::STORAGE_KEY, &json),
            Err(err) => log::warn!("failed to encode settings: {err}"),
        }
    }

    /// Effective playback volume with the toggle applied
    pub fn effective_volume(&self) -> f32 {
        if self.sfx {
            self.volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
