//! Statistics and streak bookkeeping.
//!
//! The tracker reacts to work-session completion events only. Break
//! phases and abandoned intervals never reach it. Totals and the history
//! are append-only/increment-only except through [`StatsTracker::reset_all`],
//! which is gated behind an explicit user confirmation at the CLI.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The session history keeps the most recent entries only.
pub const HISTORY_CAP: usize = 50;

/// Cumulative completion totals and the consecutive-day streak.
///
/// `last_active` is a calendar date, not a timestamp: the streak is
/// evaluated per day, and only on a completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub streak_days: u32,
    pub last_active: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
}

/// One completed work session, most-recent-first in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub occurred_at: DateTime<Utc>,
    pub duration_min: u32,
    pub kind: SessionKind,
}

/// Single-record stats export for the external CSV consumer.
#[derive(Debug, Clone, Serialize)]
pub struct StatsExport {
    pub date: NaiveDate,
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub streak_days: u32,
}

impl StatsExport {
    pub fn to_csv(&self) -> String {
        format!(
            "Date,Total Sessions,Total Minutes,Current Streak\n{},{},{},{}\n",
            self.date.format("%Y-%m-%d"),
            self.total_sessions,
            self.total_minutes,
            self.streak_days
        )
    }
}

/// Stats & streak tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTracker {
    #[serde(default)]
    record: StatsRecord,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

impl StatsTracker {
    pub fn record(&self) -> &StatsRecord {
        &self.record
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Record a completed work session: prepend a history entry (trimmed
    /// to the most recent [`HISTORY_CAP`]), bump the totals and
    /// re-evaluate the streak against the completion's calendar date.
    pub fn on_work_session_completed(&mut self, duration_min: u32, completed_at: DateTime<Utc>) {
        self.history.insert(
            0,
            HistoryEntry {
                occurred_at: completed_at,
                duration_min,
                kind: SessionKind::Work,
            },
        );
        self.history.truncate(HISTORY_CAP);
        self.record.total_sessions += 1;
        self.record.total_minutes += u64::from(duration_min);
        self.bump_streak(completed_at.date_naive());
    }

    /// Streak rule: a completion on a day not yet marked active extends
    /// the streak when yesterday was active, otherwise restarts it at 1.
    /// A day with no completions is never evaluated, so it neither
    /// increments nor resets anything until the next completion.
    fn bump_streak(&mut self, today: NaiveDate) {
        if self.record.last_active == Some(today) {
            return;
        }
        let yesterday = today.pred_opt();
        self.record.streak_days = if self.record.last_active.is_some() && self.record.last_active == yesterday {
            self.record.streak_days + 1
        } else {
            1
        };
        self.record.last_active = Some(today);
    }

    /// Count of today's completed work sessions, for the daily goal.
    pub fn today_sessions(&self, today: NaiveDate) -> usize {
        self.history
            .iter()
            .filter(|entry| entry.kind == SessionKind::Work && entry.occurred_at.date_naive() == today)
            .count()
    }

    /// Zero everything. The only operation allowed to shrink the
    /// monotonic counters.
    pub fn reset_all(&mut self) {
        self.record = StatsRecord::default();
        self.history.clear();
    }

    pub fn export(&self, on: NaiveDate) -> StatsExport {
        StatsExport {
            date: on,
            total_sessions: self.record.total_sessions,
            total_minutes: self.record.total_minutes,
            streak_days: self.record.streak_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(date: &str, hour: u32) -> DateTime<Utc> {
        let day: NaiveDate = date.parse().unwrap();
        Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
    }

    #[test]
    fn completion_updates_totals_and_history() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-29", 9));
        tracker.on_work_session_completed(50, at("2026-08-29", 11));

        assert_eq!(tracker.record().total_sessions, 2);
        assert_eq!(tracker.record().total_minutes, 75);
        // Most recent first.
        assert_eq!(tracker.history()[0].duration_min, 50);
        assert_eq!(tracker.history()[1].duration_min, 25);
    }

    #[test]
    fn history_is_capped_at_50() {
        let mut tracker = StatsTracker::default();
        for i in 0..60u32 {
            tracker.on_work_session_completed(i + 1, at("2026-08-29", 0));
        }
        assert_eq!(tracker.history().len(), HISTORY_CAP);
        // Oldest discarded first: the newest entry has duration 60.
        assert_eq!(tracker.history()[0].duration_min, 60);
        assert_eq!(tracker.history()[49].duration_min, 11);
        // Totals are not capped.
        assert_eq!(tracker.record().total_sessions, 60);
    }

    #[test]
    fn first_completion_starts_streak_at_one() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-29", 9));
        assert_eq!(tracker.record().streak_days, 1);
        assert_eq!(tracker.record().last_active, Some("2026-08-29".parse().unwrap()));
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-28", 9));
        tracker.on_work_session_completed(25, at("2026-08-29", 9));
        assert_eq!(tracker.record().streak_days, 2);
    }

    #[test]
    fn same_day_completions_do_not_stack_the_streak() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-29", 9));
        tracker.on_work_session_completed(25, at("2026-08-29", 15));
        assert_eq!(tracker.record().streak_days, 1);
    }

    #[test]
    fn a_skipped_day_resets_the_streak_on_next_completion() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-27", 9));
        // Nothing on the 28th.
        tracker.on_work_session_completed(25, at("2026-08-29", 9));
        assert_eq!(tracker.record().streak_days, 1);
    }

    #[test]
    fn today_sessions_counts_only_today() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-28", 23));
        tracker.on_work_session_completed(25, at("2026-08-29", 1));
        tracker.on_work_session_completed(25, at("2026-08-29", 8));
        assert_eq!(tracker.today_sessions("2026-08-29".parse().unwrap()), 2);
        assert_eq!(tracker.today_sessions("2026-08-28".parse().unwrap()), 1);
    }

    #[test]
    fn reset_all_behaves_like_a_fresh_tracker() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-28", 9));
        tracker.on_work_session_completed(25, at("2026-08-29", 9));
        tracker.reset_all();

        assert_eq!(tracker, StatsTracker::default());

        // A later completion starts over from streak 0, even on a day
        // adjacent to the old last_active.
        tracker.on_work_session_completed(25, at("2026-08-30", 9));
        assert_eq!(tracker.record().streak_days, 1);
        assert_eq!(tracker.record().total_sessions, 1);
    }

    #[test]
    fn csv_export_format() {
        let mut tracker = StatsTracker::default();
        tracker.on_work_session_completed(25, at("2026-08-29", 9));
        let csv = tracker.export("2026-08-29".parse().unwrap()).to_csv();
        assert_eq!(
            csv,
            "Date,Total Sessions,Total Minutes,Current Streak\n2026-08-29,1,25,1\n"
        );
    }
}
