use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the timer produces an Event.
/// The CLI prints them as JSON; a GUI layer would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and the cycle controller moved to the
    /// next phase. `completed == Work` means a work session finished and
    /// the stats tracker should record it.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        next_duration_secs: u64,
        completed_work_sessions: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    DurationsChanged {
        work_min: u32,
        short_break_min: u32,
        long_break_min: u32,
        at: DateTime<Utc>,
    },
    /// Read-only projection of the live session for collaborators.
    Status {
        phase: Phase,
        phase_label: String,
        remaining: String,
        remaining_secs: u64,
        is_running: bool,
        completed_work_sessions: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}
