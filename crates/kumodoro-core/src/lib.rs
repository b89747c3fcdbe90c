//! # Kumodoro Core Library
//!
//! Core business logic for the Kumodoro productivity timer. The CLI binary
//! is a thin layer over this crate; anything that renders, plays audio or
//! draws a progress ring lives elsewhere and only consumes the projections
//! exported here.
//!
//! ## Architecture
//!
//! - **Session state machine**: a caller-ticked countdown plus the
//!   work/short-break/long-break cycle controller
//! - **Snapshot/recovery**: a JSON snapshot written after every mutation
//!   and reconciled against elapsed wall-clock time at startup
//! - **Stats & streak tracker**: completion totals, capped session history
//!   and a consecutive-calendar-day streak
//! - **Storage**: JSON snapshot/stats files and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Session`]: timer state machine
//! - [`SnapshotStore`] / [`Snapshot`]: persistence and startup recovery
//! - [`StatsTracker`]: statistics bookkeeping
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use stats::{HistoryEntry, StatsExport, StatsRecord, StatsTracker};
pub use storage::{Config, Snapshot, SnapshotStore, StatsStore};
pub use timer::{Durations, Phase, Session};
