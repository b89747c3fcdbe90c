//! Timer session state machine.
//!
//! The session is a caller-ticked countdown over the work/break cycle. It
//! does not use internal threads and it does not touch storage - the caller
//! drives it with `tick()` once per second and persists a snapshot after
//! every mutation.
//!
//! ## Cycle
//!
//! ```text
//! Work -> ShortBreak -> Work -> ShortBreak -> Work -> ShortBreak -> Work -> LongBreak -> Work ...
//! ```
//!
//! Every 4th completed work session leads into a long break; the check is
//! a strict modulo on the running total, which is never reset by phase
//! transitions or duration changes.

use chrono::Utc;

use super::phase::{Durations, Phase, LONG_BREAK_EVERY};
use crate::error::ValidationError;
use crate::events::Event;

/// Core timer session: countdown state plus the phase cycle controller.
///
/// Invariants: `time_left_secs` never goes negative (it is unsigned and
/// only ever decremented when above zero); phase transitions happen only
/// on the tick that reaches zero; `completed_work_sessions` only grows,
/// except through [`Session::reset_completed_sessions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: Phase,
    time_left_secs: u64,
    is_running: bool,
    completed_work_sessions: u32,
    durations: Durations,
    /// Whether the next interval starts counting immediately after a
    /// phase transition. Comes from configuration, not persisted state.
    auto_start_next: bool,
}

impl Session {
    /// Fresh session: Work phase, full work duration, paused.
    pub fn new(durations: Durations, auto_start_next: bool) -> Self {
        Self {
            phase: Phase::Work,
            time_left_secs: durations.phase_secs(Phase::Work),
            is_running: false,
            completed_work_sessions: 0,
            durations,
            auto_start_next,
        }
    }

    /// Rebuild a session from recovered state. Only the snapshot recovery
    /// path uses this; it has already applied the resume-or-discard rule.
    pub(crate) fn from_restored(
        phase: Phase,
        time_left_secs: u64,
        is_running: bool,
        completed_work_sessions: u32,
        durations: Durations,
        auto_start_next: bool,
    ) -> Self {
        Self {
            phase,
            time_left_secs,
            is_running,
            completed_work_sessions,
            durations,
            auto_start_next,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn auto_start_next(&self) -> bool {
        self.auto_start_next
    }

    /// Full duration of the current phase, in seconds.
    pub fn phase_duration_secs(&self) -> u64 {
        self.durations.phase_secs(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_duration_secs();
        if total == 0 {
            return 0.0;
        }
        (total.saturating_sub(self.time_left_secs)) as f64 / total as f64
    }

    /// Remaining time formatted as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.time_left_secs / 60, self.time_left_secs % 60)
    }

    /// Build the read-only projection event for collaborators.
    pub fn status(&self) -> Event {
        Event::Status {
            phase: self.phase,
            phase_label: self.phase.label().to_string(),
            remaining: self.format_remaining(),
            remaining_secs: self.time_left_secs,
            is_running: self.is_running,
            completed_work_sessions: self.completed_work_sessions,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.is_running = true;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Play/pause toggle.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to a paused Work phase at full duration. Does not touch the
    /// completed session counter.
    pub fn reset(&mut self) -> Event {
        self.phase = Phase::Work;
        self.time_left_secs = self.durations.phase_secs(Phase::Work);
        self.is_running = false;
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance the countdown by one second.
    ///
    /// No-op while paused or already at zero. The tick that reaches zero
    /// runs the phase transition immediately and reports it, so the
    /// expiry fires exactly once per crossing.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running || self.time_left_secs == 0 {
            return None;
        }
        self.time_left_secs -= 1;
        if self.time_left_secs == 0 {
            return Some(self.advance_phase());
        }
        None
    }

    /// Apply a `work:short` preset. Always resets to a paused Work phase;
    /// an in-progress break is never preserved.
    pub fn change_preset(&mut self, work_min: u32, short_break_min: u32) -> Result<Event, ValidationError> {
        let durations = Durations::new(work_min, short_break_min, self.durations.long_break_min)?;
        Ok(self.apply_durations(durations))
    }

    /// Apply fully custom durations, resetting to a paused Work phase.
    pub fn apply_custom(&mut self, durations: Durations) -> Result<Event, ValidationError> {
        durations.validate()?;
        Ok(self.apply_durations(durations))
    }

    pub fn set_auto_start_next(&mut self, auto_start_next: bool) {
        self.auto_start_next = auto_start_next;
    }

    /// Zero the completed session counter. Only the explicit
    /// reset-all-statistics action may call this.
    pub fn reset_completed_sessions(&mut self) {
        self.completed_work_sessions = 0;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_durations(&mut self, durations: Durations) -> Event {
        self.durations = durations;
        self.phase = Phase::Work;
        self.time_left_secs = durations.phase_secs(Phase::Work);
        self.is_running = false;
        Event::DurationsChanged {
            work_min: durations.work_min,
            short_break_min: durations.short_break_min,
            long_break_min: durations.long_break_min,
            at: Utc::now(),
        }
    }

    /// Interval-expired transition. Work counts toward the session total
    /// and leads into a break (long on every 4th); breaks lead back to
    /// Work without touching the counter.
    fn advance_phase(&mut self) -> Event {
        let completed = self.phase;
        let next = match completed {
            Phase::Work => {
                self.completed_work_sessions += 1;
                if self.completed_work_sessions % LONG_BREAK_EVERY == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.phase = next;
        self.time_left_secs = self.durations.phase_secs(next);
        self.is_running = self.auto_start_next;
        Event::PhaseCompleted {
            completed,
            next,
            next_duration_secs: self.time_left_secs,
            completed_work_sessions: self.completed_work_sessions,
            auto_started: self.is_running,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn session() -> Session {
        Session::new(Durations::new(25, 5, 15).unwrap(), false)
    }

    /// Run a full phase to expiry, returning the completion event.
    fn complete_phase(s: &mut Session) -> Event {
        s.start();
        for _ in 0..s.remaining_secs() - 1 {
            assert!(s.tick().is_none());
        }
        s.tick().expect("final tick should complete the phase")
    }

    #[test]
    fn initial_state() {
        let s = session();
        assert_eq!(s.phase(), Phase::Work);
        assert_eq!(s.remaining_secs(), 25 * 60);
        assert!(!s.is_running());
        assert_eq!(s.completed_work_sessions(), 0);
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let mut s = session();
        assert!(s.tick().is_none());
        assert_eq!(s.remaining_secs(), 25 * 60);
    }

    #[test]
    fn tick_decrements_by_exactly_one() {
        let mut s = session();
        s.start();
        s.tick();
        assert_eq!(s.remaining_secs(), 25 * 60 - 1);
        s.tick();
        assert_eq!(s.remaining_secs(), 25 * 60 - 2);
    }

    #[test]
    fn start_and_pause_do_not_touch_time() {
        let mut s = session();
        assert!(s.start().is_some());
        assert!(s.start().is_none()); // already running
        s.tick();
        let left = s.remaining_secs();
        assert!(s.pause().is_some());
        assert!(s.pause().is_none()); // already paused
        assert_eq!(s.remaining_secs(), left);
    }

    #[test]
    fn toggle_flips_running() {
        let mut s = session();
        s.toggle();
        assert!(s.is_running());
        s.toggle();
        assert!(!s.is_running());
    }

    #[test]
    fn work_expiry_moves_to_short_break() {
        let mut s = session();
        let event = complete_phase(&mut s);
        match event {
            Event::PhaseCompleted {
                completed,
                next,
                completed_work_sessions,
                ..
            } => {
                assert_eq!(completed, Phase::Work);
                assert_eq!(next, Phase::ShortBreak);
                assert_eq!(completed_work_sessions, 1);
            }
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(s.phase(), Phase::ShortBreak);
        assert_eq!(s.remaining_secs(), 5 * 60);
        assert!(!s.is_running());
    }

    #[test]
    fn break_expiry_returns_to_work_without_counting() {
        let mut s = session();
        complete_phase(&mut s);
        assert_eq!(s.completed_work_sessions(), 1);
        complete_phase(&mut s);
        assert_eq!(s.phase(), Phase::Work);
        assert_eq!(s.remaining_secs(), 25 * 60);
        assert_eq!(s.completed_work_sessions(), 1);
    }

    #[test]
    fn fourth_work_session_triggers_long_break() {
        let mut s = session();
        let mut phases = vec![s.phase()];
        // 4 work sessions plus the breaks between them
        for _ in 0..7 {
            complete_phase(&mut s);
            phases.push(s.phase());
        }
        assert_eq!(
            phases,
            vec![
                Phase::Work,
                Phase::ShortBreak,
                Phase::Work,
                Phase::ShortBreak,
                Phase::Work,
                Phase::ShortBreak,
                Phase::Work,
                Phase::LongBreak,
            ]
        );
        assert_eq!(s.remaining_secs(), 15 * 60);
    }

    #[test]
    fn eighth_work_session_triggers_long_break_again() {
        let mut s = session();
        for n in 1..=8u32 {
            complete_phase(&mut s); // work
            if n % 4 == 0 {
                assert_eq!(s.phase(), Phase::LongBreak, "session {n}");
            } else {
                assert_eq!(s.phase(), Phase::ShortBreak, "session {n}");
            }
            complete_phase(&mut s); // break
        }
        assert_eq!(s.completed_work_sessions(), 8);
    }

    #[test]
    fn auto_start_next_keeps_counting() {
        let mut s = Session::new(Durations::new(1, 1, 1).unwrap(), true);
        let event = complete_phase(&mut s);
        match event {
            Event::PhaseCompleted { auto_started, .. } => assert!(auto_started),
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
        assert!(s.is_running());
        // Next tick advances the break countdown.
        assert!(s.tick().is_none());
        assert_eq!(s.remaining_secs(), 59);
    }

    #[test]
    fn reset_returns_to_work_but_keeps_counter() {
        let mut s = session();
        complete_phase(&mut s);
        s.start();
        s.tick();
        s.reset();
        assert_eq!(s.phase(), Phase::Work);
        assert_eq!(s.remaining_secs(), 25 * 60);
        assert!(!s.is_running());
        assert_eq!(s.completed_work_sessions(), 1);
    }

    #[test]
    fn preset_change_abandons_break_in_progress() {
        let mut s = session();
        complete_phase(&mut s); // now in ShortBreak
        s.start();
        s.tick();
        s.change_preset(35, 10).unwrap();
        assert_eq!(s.phase(), Phase::Work);
        assert_eq!(s.remaining_secs(), 35 * 60);
        assert!(!s.is_running());
        assert_eq!(s.completed_work_sessions(), 1);
        // Long break minutes untouched by a preset.
        assert_eq!(s.durations().long_break_min, 15);
    }

    #[test]
    fn preset_rejects_zero_duration() {
        let mut s = session();
        assert!(s.change_preset(0, 5).is_err());
        assert_eq!(s.durations().work_min, 25);
    }

    #[test]
    fn changing_durations_mid_cycle_keeps_counter() {
        let mut s = session();
        for _ in 0..6 {
            complete_phase(&mut s);
        }
        assert_eq!(s.completed_work_sessions(), 3);
        s.apply_custom(Durations::new(50, 10, 30).unwrap()).unwrap();
        assert_eq!(s.completed_work_sessions(), 3);
        // The 4th completion still lands on the long break.
        complete_phase(&mut s);
        assert_eq!(s.phase(), Phase::LongBreak);
        assert_eq!(s.remaining_secs(), 30 * 60);
    }

    #[test]
    fn format_remaining_is_mm_ss() {
        let mut s = session();
        assert_eq!(s.format_remaining(), "25:00");
        s.start();
        s.tick();
        assert_eq!(s.format_remaining(), "24:59");
    }

    #[test]
    fn progress_fraction() {
        let mut s = Session::new(Durations::new(1, 1, 1).unwrap(), false);
        assert_eq!(s.progress(), 0.0);
        s.start();
        for _ in 0..30 {
            s.tick();
        }
        assert!((s.progress() - 0.5).abs() < 1e-9);
    }

    proptest! {
        /// The n-th completed work session leads to LongBreak iff n % 4 == 0.
        #[test]
        fn long_break_cadence(total in 1u32..24) {
            let mut s = Session::new(Durations::new(1, 1, 1).unwrap(), false);
            for n in 1..=total {
                complete_phase(&mut s);
                let expected = if n % 4 == 0 { Phase::LongBreak } else { Phase::ShortBreak };
                prop_assert_eq!(s.phase(), expected);
                complete_phase(&mut s);
                prop_assert_eq!(s.phase(), Phase::Work);
            }
            prop_assert_eq!(s.completed_work_sessions(), total);
        }
    }
}
