//! Statistics commands.

use std::path::PathBuf;

use clap::Subcommand;
use kumodoro_core::storage::{Snapshot, SnapshotStore, StatsStore};
use kumodoro_core::Config;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals, streak and today's progress toward the daily goal
    Show,
    /// Recent completed work sessions (most recent first, capped at 50)
    History,
    /// Export totals as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Zero all statistics, the history and the session counter
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let stats = StatsStore::open()?;
    let tracker = stats.load_or_default();

    match action {
        StatsAction::Show => {
            let config = Config::load_or_default();
            let today = chrono::Utc::now().date_naive();
            let today_sessions = tracker.today_sessions(today) as u32;
            let record = tracker.record();
            let goal_pct = if config.daily_goal > 0 {
                (f64::from(today_sessions) / f64::from(config.daily_goal) * 100.0).min(100.0)
            } else {
                0.0
            };
            let summary = serde_json::json!({
                "total_sessions": record.total_sessions,
                "total_minutes": record.total_minutes,
                "streak_days": record.streak_days,
                "last_active": record.last_active,
                "today_sessions": today_sessions,
                "daily_goal": config.daily_goal,
                "goal_progress_pct": goal_pct,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::History => {
            println!("{}", serde_json::to_string_pretty(tracker.history())?);
        }
        StatsAction::Export { out } => {
            let csv = tracker.export(chrono::Utc::now().date_naive()).to_csv();
            match out {
                Some(path) => {
                    std::fs::write(&path, csv)?;
                    println!("exported to {}", path.display());
                }
                None => print!("{csv}"),
            }
        }
        StatsAction::Reset { yes } => {
            if !yes {
                eprintln!("this zeroes all statistics and history; re-run with --yes to confirm");
                std::process::exit(1);
            }
            let mut tracker = tracker;
            tracker.reset_all();
            stats.save(&tracker)?;

            // The completed-session counter in the live timer resets too.
            let config = Config::load_or_default();
            let store = SnapshotStore::open()?;
            let mut session = store.recover_session(config.durations()?, config.auto_start_next);
            session.reset_completed_sessions();
            store.save(&Snapshot::capture(&session));
            println!("statistics reset");
        }
    }
    Ok(())
}
