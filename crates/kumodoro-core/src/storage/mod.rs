mod config;
mod snapshot;
mod stats_store;

pub use config::Config;
pub use snapshot::{Snapshot, SnapshotStore};
pub use stats_store::StatsStore;

use std::path::PathBuf;

/// Returns the data directory, `~/.config/kumodoro/` by default.
///
/// Set KUMODORO_DATA_DIR to relocate it (tests point this at a temp dir).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("KUMODORO_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("kumodoro"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
