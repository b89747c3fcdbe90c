//! TOML-based application configuration.
//!
//! Stores the durations used for fresh sessions, the auto-start-next
//! flag and the daily session goal. Configuration is stored at
//! `~/.config/kumodoro/config.toml`.
//!
//! This is the validation boundary for durations: zero minutes are
//! rejected here (and by the preset/custom commands), so the timer can
//! assume positivity.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, CoreError, ValidationError};
use crate::timer::Durations;

/// Timer duration defaults, in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/kumodoro/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    /// Continue counting into the next interval after a phase transition.
    #[serde(default)]
    pub auto_start_next: bool,
    /// Target number of completed work sessions per day.
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_daily_goal() -> u32 {
    8
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            auto_start_next: false,
            daily_goal: default_daily_goal(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be parsed, carries
    /// invalid durations, or the defaults cannot be written.
    pub fn load() -> Result<Self, CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                cfg.durations()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Validated durations for fresh sessions.
    pub fn durations(&self) -> Result<Durations, ValidationError> {
        Durations::new(
            self.timer.work_minutes,
            self.timer.short_break_minutes,
            self.timer.long_break_minutes,
        )
    }

    /// Get a config value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "timer.work_minutes" => self.timer.work_minutes.to_string(),
            "timer.short_break_minutes" => self.timer.short_break_minutes.to_string(),
            "timer.long_break_minutes" => self.timer.long_break_minutes.to_string(),
            "auto_start_next" => self.auto_start_next.to_string(),
            "daily_goal" => self.daily_goal.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    /// Returns an error for unknown keys, values that fail validation,
    /// or a failed save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "timer.work_minutes" => self.timer.work_minutes = parse_minutes(key, value)?,
            "timer.short_break_minutes" => self.timer.short_break_minutes = parse_minutes(key, value)?,
            "timer.long_break_minutes" => self.timer.long_break_minutes = parse_minutes(key, value)?,
            "auto_start_next" => {
                self.auto_start_next = value
                    .parse()
                    .map_err(|_| ValidationError::invalid(key, "expected true or false"))?;
            }
            "daily_goal" => {
                let goal: u32 = value
                    .parse()
                    .map_err(|_| ValidationError::invalid(key, "expected a positive integer"))?;
                if goal == 0 {
                    return Err(ValidationError::invalid(key, "goal must be at least 1").into());
                }
                self.daily_goal = goal;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
        self.save()?;
        Ok(())
    }
}

fn parse_minutes(key: &str, value: &str) -> Result<u32, ValidationError> {
    let minutes: u32 = value
        .parse()
        .map_err(|_| ValidationError::invalid(key, "expected a positive integer"))?;
    if minutes == 0 {
        return Err(ValidationError::invalid(key, "duration must be at least 1 minute"));
    }
    Ok(minutes)
}
