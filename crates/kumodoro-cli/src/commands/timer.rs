//! Timer commands.
//!
//! Each invocation is a fresh process: the session is recovered from the
//! persisted snapshot before anything else runs, the command is applied,
//! and a new snapshot is written. Between invocations the countdown
//! "advances" purely through the recovery reconciliation; a session that
//! expired while nobody was watching is abandoned, not replayed.

use std::io::Write;

use clap::Subcommand;
use kumodoro_core::storage::{Snapshot, SnapshotStore, StatsStore};
use kumodoro_core::timer::{run_while_running, Durations, Phase, Session};
use kumodoro_core::{Config, Event};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (resume) the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Play/pause toggle
    Toggle,
    /// Back to a paused Work phase at full duration
    Reset,
    /// Print the current timer state as JSON
    Status,
    /// Apply a work:short preset, e.g. "25:5"
    Preset {
        /// Minutes as "work:short" (the long break is unaffected)
        preset: String,
    },
    /// Apply custom durations
    Custom {
        /// Work minutes
        #[arg(long)]
        work: u32,
        /// Short break minutes
        #[arg(long)]
        short_break: u32,
        /// Long break minutes (kept as-is when omitted)
        #[arg(long)]
        long_break: Option<u32>,
    },
    /// Run the one-second ticker in the foreground until the timer stops
    Watch,
}

fn open_session(config: &Config) -> Result<(SnapshotStore, Session), Box<dyn std::error::Error>> {
    let store = SnapshotStore::open()?;
    let session = store.recover_session(config.durations()?, config.auto_start_next);
    Ok((store, session))
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Persist the session when the command mutated it and print its event;
/// reads and no-op commands print the status projection without writing.
/// Re-saving on a read would re-baseline `savedAtTimestamp` and drop the
/// sub-second remainder that recovery floors away, so polling faster
/// than once per second would stall a running countdown.
fn finish(
    store: &SnapshotStore,
    session: &Session,
    event: Option<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => {
            store.save(&Snapshot::capture(session));
            print_event(&event)
        }
        None => print_event(&session.status()),
    }
}

/// Record a completed work session with the stats tracker.
fn record_completion(session: &Session) {
    let stats = match StatsStore::open() {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("stats unavailable: {e}");
            return;
        }
    };
    let mut tracker = stats.load_or_default();
    tracker.on_work_session_completed(session.durations().work_min, chrono::Utc::now());
    if let Err(e) = stats.save(&tracker) {
        eprintln!("stats not saved: {e}");
    }
}

fn watch(store: &SnapshotStore, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    if session.start().is_some() {
        store.save(&Snapshot::capture(session));
    }
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_while_running(session, store, |session, event| {
        print!("\r{} {}   ", session.phase().label(), session.format_remaining());
        let _ = std::io::stdout().flush();
        if let Some(event) = event {
            println!();
            if let Ok(json) = serde_json::to_string_pretty(event) {
                println!("{json}");
            }
            if let Event::PhaseCompleted {
                completed: Phase::Work,
                ..
            } = event
            {
                record_completion(session);
            }
        }
    }));
    println!();
    print_event(&session.status())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (store, mut session) = open_session(&config)?;

    match action {
        TimerAction::Start => {
            let event = session.start();
            finish(&store, &session, event)
        }
        TimerAction::Pause => {
            let event = session.pause();
            finish(&store, &session, event)
        }
        TimerAction::Toggle => {
            let event = session.toggle();
            finish(&store, &session, event)
        }
        TimerAction::Reset => {
            let event = session.reset();
            finish(&store, &session, Some(event))
        }
        TimerAction::Status => finish(&store, &session, None),
        TimerAction::Preset { preset } => {
            let (work, short_break) = Durations::parse_preset(&preset)?;
            let event = session.change_preset(work, short_break)?;
            finish(&store, &session, Some(event))
        }
        TimerAction::Custom {
            work,
            short_break,
            long_break,
        } => {
            let long_break = long_break.unwrap_or(session.durations().long_break_min);
            let event = session.apply_custom(Durations::new(work, short_break, long_break)?)?;
            finish(&store, &session, Some(event))
        }
        TimerAction::Watch => watch(&store, &mut session),
    }
}
