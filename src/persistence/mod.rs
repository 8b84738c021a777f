//! Sandbox snapshot persistence
//!
//! Snapshots are stored as JSON inside a versioned envelope. A missing,
//! corrupt, or wrong-version envelope loads as `None`; the caller starts a
//! fresh world instead of crashing on stale data.

use serde::{Deserialize, Serialize};

use crate::platform::KvStore;
use crate::sandbox::Snapshot;

/// Bump when the snapshot layout changes incompatibly
const VERSION: u32 = 1;
const STORAGE_KEY: &str = "dont_fall_sandbox";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    snapshot: Snapshot,
}

/// Write a snapshot to storage. Encoding failures are logged and dropped;
/// losing an autosave is not worth interrupting play.
pub fn save_snapshot(snapshot: &Snapshot, store: &dyn KvStore) {
    let envelope = Envelope {
        version: VERSION,
        snapshot: snapshot.clone(),
    };
    match serde_json::to_string(&envelope) {
        Ok(json) => store.set(STORAGE_KEY, &json),
        Err(err) => log::warn!("failed to encode snapshot: {err}"),
    }
}

/// Read the stored snapshot, if there is a usable one.
pub fn load_snapshot(store: &dyn KvStore) -> Option<Snapshot> {
    let raw = store.get(STORAGE_KEY)?;
    let envelope: Envelope = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            log::warn!("snapshot unreadable ({err}), starting fresh");
            return None;
        }
    };
    if envelope.version != VERSION {
        log::warn!(
            "snapshot version {} unsupported (want {VERSION}), starting fresh",
            envelope.version
        );
        return None;
    }
    Some(envelope.snapshot)
}

/// Discard the stored snapshot.
pub fn clear_snapshot(store: &dyn KvStore) {
    store.remove(STORAGE_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use crate::sandbox::SandboxState;

    #[test]
    fn test_round_trip() {
        let store = MemoryStore::new();
        let mut state = SandboxState::new(7);
        state.score = 42;
        state.inventory.stone = 3;

        save_snapshot(&state.snapshot(), &store);
        let loaded = load_snapshot(&store).expect("snapshot should load");
        assert_eq!(loaded.score, 42);
        assert_eq!(loaded.inventory.stone, 3);
    }

    #[test]
    fn test_absent_loads_none() {
        let store = MemoryStore::new();
        assert!(load_snapshot(&store).is_none());
    }

    #[test]
    fn test_corrupt_loads_none() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{definitely not json");
        assert!(load_snapshot(&store).is_none());
    }

    #[test]
    fn test_version_mismatch_loads_none() {
        let store = MemoryStore::new();
        let state = SandboxState::new(7);
        save_snapshot(&state.snapshot(), &store);

        // Rewrite the envelope with a future version
        let raw = store.get(STORAGE_KEY).expect("saved");
        let bumped = raw.replacen("\"version\":1", "\"version\":2", 1);
        assert_ne!(raw, bumped);
        store.set(STORAGE_KEY, &bumped);

        assert!(load_snapshot(&store).is_none());
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let store = MemoryStore::new();
        let state = SandboxState::new(7);
        save_snapshot(&state.snapshot(), &store);
        clear_snapshot(&store);
        assert!(load_snapshot(&store).is_none());
    }
}
