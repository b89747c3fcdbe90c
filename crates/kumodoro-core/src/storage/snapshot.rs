//! Session snapshot persistence and startup recovery.
//!
//! A snapshot is written after every session mutation and read exactly
//! once, at startup. The write path must never fail visibly: storage
//! errors are swallowed and the in-memory session stays authoritative for
//! the current run. The read path degrades to a fresh default session on
//! any missing or malformed data.
//!
//! Recovery reconciles against elapsed wall-clock time. A countdown that
//! would have expired while the process was closed is abandoned, not
//! fast-forwarded: no phantom phase transitions, no completions logged
//! after the fact.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::timer::{Durations, Phase, Session};

/// Point-in-time copy of the session plus a save timestamp.
///
/// Field names follow the persisted JSON record:
/// `{ phase, timeLeftSeconds, isRunning, completedWorkSessions,
///    workMinutes, shortBreakMinutes, longBreakMinutes, savedAtTimestamp }`
/// with `savedAtTimestamp` in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: Phase,
    pub time_left_seconds: u64,
    pub is_running: bool,
    pub completed_work_sessions: u32,
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub saved_at_timestamp: i64,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        Self::capture_at(session, Utc::now().timestamp_millis())
    }

    pub fn capture_at(session: &Session, saved_at_ms: i64) -> Self {
        let durations = session.durations();
        Self {
            phase: session.phase(),
            time_left_seconds: session.remaining_secs(),
            is_running: session.is_running(),
            completed_work_sessions: session.completed_work_sessions(),
            work_minutes: durations.work_min,
            short_break_minutes: durations.short_break_min,
            long_break_minutes: durations.long_break_min,
            saved_at_timestamp: saved_at_ms,
        }
    }

    fn durations(&self) -> Result<Durations, crate::error::ValidationError> {
        Durations::new(self.work_minutes, self.short_break_minutes, self.long_break_minutes)
    }

    /// Reconcile this snapshot against the current wall clock.
    ///
    /// Phase, durations and the completed-session counter are restored
    /// unconditionally. The countdown itself resumes only when the
    /// snapshot was running and real time has not consumed it; otherwise
    /// the phase falls back to its full duration, paused. A clock that
    /// appears to have run backward counts as zero elapsed time.
    ///
    /// Pure over `(self, now_ms)`, so recovering twice from the same
    /// snapshot yields the same session.
    pub fn recover(&self, now_ms: i64, auto_start_next: bool) -> Session {
        let durations = match self.durations() {
            Ok(d) => d,
            // A snapshot carrying impossible durations is malformed.
            Err(_) => return Session::new(Durations::default(), auto_start_next),
        };
        let elapsed_secs = (now_ms.saturating_sub(self.saved_at_timestamp).max(0) / 1000) as u64;
        let candidate = self.time_left_seconds.saturating_sub(elapsed_secs);
        let (time_left, is_running) = if self.is_running && candidate > 0 {
            (candidate, true)
        } else {
            (durations.phase_secs(self.phase), false)
        };
        Session::from_restored(
            self.phase,
            time_left,
            is_running,
            self.completed_work_sessions,
            durations,
            auto_start_next,
        )
    }
}

/// File-backed snapshot store, one JSON record at `session.json`.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store at the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, std::io::Error> {
        Ok(Self::at(super::data_dir()?.join("session.json")))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist a snapshot. Storage errors are swallowed: the in-memory
    /// session stays authoritative and the worst outcome of a failed
    /// write is losing the in-progress interval at the next startup.
    pub fn save(&self, snapshot: &Snapshot) {
        if let Ok(json) = serde_json::to_string(snapshot) {
            let _ = std::fs::write(&self.path, json);
        }
    }

    /// Load the persisted snapshot, or None when absent or malformed.
    pub fn load(&self) -> Option<Snapshot> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// One-time startup recovery: load, reconcile, or fall back to a
    /// fresh session with the configured durations.
    pub fn recover_session(&self, defaults: Durations, auto_start_next: bool) -> Session {
        match self.load() {
            Some(snapshot) => snapshot.recover(Utc::now().timestamp_millis(), auto_start_next),
            None => Session::new(defaults, auto_start_next),
        }
    }
}
