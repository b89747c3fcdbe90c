use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of completed work sessions between long breaks.
pub const LONG_BREAK_EVERY: u32 = 4;

/// The currently active interval kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }
}

/// Configured interval lengths, in minutes.
///
/// Mutated only by explicit user configuration actions (presets, custom
/// durations); the timer never changes them on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_min: 25,
            short_break_min: 5,
            long_break_min: 15,
        }
    }
}

impl Durations {
    /// Build validated durations. Zero minutes are rejected here so the
    /// timer can assume positivity everywhere else.
    pub fn new(work_min: u32, short_break_min: u32, long_break_min: u32) -> Result<Self, ValidationError> {
        let d = Self {
            work_min,
            short_break_min,
            long_break_min,
        };
        d.validate()?;
        Ok(d)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("work_min", self.work_min),
            ("short_break_min", self.short_break_min),
            ("long_break_min", self.long_break_min),
        ] {
            if value == 0 {
                return Err(ValidationError::invalid(field, "duration must be at least 1 minute"));
            }
        }
        Ok(())
    }

    /// Full duration of a phase, in seconds.
    pub fn phase_secs(&self, phase: Phase) -> u64 {
        let min = match phase {
            Phase::Work => self.work_min,
            Phase::ShortBreak => self.short_break_min,
            Phase::LongBreak => self.long_break_min,
        };
        u64::from(min).saturating_mul(60)
    }

    /// Parse a `work:short` preset string such as `"25:5"`.
    ///
    /// The long break duration is not part of a preset and is kept as-is
    /// by callers.
    pub fn parse_preset(preset: &str) -> Result<(u32, u32), ValidationError> {
        let invalid = || ValidationError::invalid("preset", format!("expected 'work:short' minutes, got '{preset}'"));
        let (work, short) = preset.split_once(':').ok_or_else(invalid)?;
        let work: u32 = work.trim().parse().map_err(|_| invalid())?;
        let short: u32 = short.trim().parse().map_err(|_| invalid())?;
        if work == 0 || short == 0 {
            return Err(ValidationError::invalid("preset", "durations must be at least 1 minute"));
        }
        Ok((work, short))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let d = Durations::default();
        assert_eq!(d.work_min, 25);
        assert_eq!(d.short_break_min, 5);
        assert_eq!(d.long_break_min, 15);
    }

    #[test]
    fn phase_secs_uses_the_right_field() {
        let d = Durations::new(25, 5, 15).unwrap();
        assert_eq!(d.phase_secs(Phase::Work), 25 * 60);
        assert_eq!(d.phase_secs(Phase::ShortBreak), 5 * 60);
        assert_eq!(d.phase_secs(Phase::LongBreak), 15 * 60);
    }

    #[test]
    fn zero_duration_rejected() {
        assert!(Durations::new(0, 5, 15).is_err());
        assert!(Durations::new(25, 0, 15).is_err());
        assert!(Durations::new(25, 5, 0).is_err());
    }

    #[test]
    fn preset_parsing() {
        assert_eq!(Durations::parse_preset("25:5").unwrap(), (25, 5));
        assert_eq!(Durations::parse_preset("35:10").unwrap(), (35, 10));
        assert!(Durations::parse_preset("25").is_err());
        assert!(Durations::parse_preset("0:5").is_err());
        assert!(Durations::parse_preset("a:b").is_err());
    }

    #[test]
    fn phase_serializes_as_pascal_case() {
        assert_eq!(serde_json::to_string(&Phase::ShortBreak).unwrap(), "\"ShortBreak\"");
    }
}
