//! Persisted high score
//!
//! A single monotone integer: read once at startup, written at most once per
//! session, at termination, and only when the final score beats it.

use serde::{Deserialize, Serialize};

use crate::platform::KvStore;

/// Storage key for the high score value
const STORAGE_KEY: &str = "dont_fall_highscore";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// Load from storage; an absent or unreadable value defaults to zero.
    pub fn load(store: &dyn KvStore) -> Self {
        match store.get(STORAGE_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(high) => high,
                Err(err) => {
                    log::warn!("high score unreadable ({err}), starting at 0");
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Fold a finished session's score in: `best = max(best, score)`.
    /// Persists only on improvement; returns true when the record changed.
    pub fn submit(&mut self, score: u32, store: &dyn KvStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save(store);
        true
    }

    pub fn save(&self, store: &dyn KvStore) {
        match serde_json::to_string(self) {
            Ok(json) => store.set(STORAGE_KEY, &json),
            Err(err) => log::warn!("failed to encode high score: {err}"),
        }
    }
}
