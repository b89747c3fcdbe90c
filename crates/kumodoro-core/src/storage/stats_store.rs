//! JSON-backed stats persistence, one file at `stats.json`.

use std::path::PathBuf;

use crate::error::CoreError;
use crate::stats::StatsTracker;

pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    /// Store at the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, std::io::Error> {
        Ok(Self::at(super::data_dir()?.join("stats.json")))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the tracker, falling back to an empty one when the file is
    /// absent or malformed. Stats loss is never fatal.
    pub fn load_or_default(&self) -> StatsTracker {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Persist the tracker.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, tracker: &StatsTracker) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(tracker)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatsStore::at(dir.path().join("stats.json"));
        let mut tracker = store.load_or_default();
        assert_eq!(tracker.record().total_sessions, 0);

        tracker.on_work_session_completed(25, Utc::now());
        store.save(&tracker).unwrap();
        assert_eq!(store.load_or_default(), tracker);
    }

    #[test]
    fn malformed_file_loads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "[oops").unwrap();
        let store = StatsStore::at(path);
        assert_eq!(store.load_or_default(), StatsTracker::default());
    }
}
