use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Valid range for every phase duration, in seconds.
pub const PHASE_SECS_RANGE: std::ops::RangeInclusive<u32> = 1..=999;
/// Valid range for the number of sets.
pub const TOTAL_SETS_RANGE: std::ops::RangeInclusive<u32> = 1..=99;
/// Set count used by the menu variant when no exercise is named.
pub const DEFAULT_TOTAL_SETS: u32 = 9;

/// How a set boundary behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RestMode {
    /// Work -> Rest -> Work, using `rest_secs`.
    #[default]
    Timed,
    /// Work -> Work; the set counter bumps at the boundary.
    Immediate,
    /// Rest is entered and left within the same tick.
    Skipped,
}

impl RestMode {
    pub fn has_timed_rest(self) -> bool {
        self == RestMode::Timed
    }
}

/// Feature switches that replace the near-duplicate timer variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerFeatures {
    #[serde(default = "default_true")]
    pub prepare: bool,
    #[serde(default)]
    pub rest: RestMode,
    /// Set count follows the configured exercise list.
    #[serde(default)]
    pub menu: bool,
    #[serde(default = "default_true")]
    pub audio: bool,
}

impl Default for TimerFeatures {
    fn default() -> Self {
        Self {
            prepare: true,
            rest: RestMode::Timed,
            menu: false,
            audio: true,
        }
    }
}

/// User-editable timer settings, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_secs")]
    pub work_secs: u32,
    #[serde(default = "default_rest_secs")]
    pub rest_secs: u32,
    #[serde(default = "default_prepare_secs")]
    pub prepare_secs: u32,
    #[serde(default = "default_total_sets")]
    pub total_sets: u32,
    #[serde(default)]
    pub exercise_names: Vec<String>,
    #[serde(default = "default_true")]
    pub audio_enabled: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_true() -> bool {
    true
}
fn default_work_secs() -> u32 {
    20
}
fn default_rest_secs() -> u32 {
    10
}
fn default_prepare_secs() -> u32 {
    10
}
fn default_total_sets() -> u32 {
    DEFAULT_TOTAL_SETS
}
fn default_volume() -> f32 {
    0.7
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: default_work_secs(),
            rest_secs: default_rest_secs(),
            prepare_secs: default_prepare_secs(),
            total_sets: default_total_sets(),
            exercise_names: Vec::new(),
            audio_enabled: true,
            volume: default_volume(),
        }
    }
}

impl TimerConfig {
    /// Check every field against the ranges the enabled features need and
    /// return the config the engine should run with.
    ///
    /// In menu mode the set count is derived from the non-empty exercise
    /// names, falling back to [`DEFAULT_TOTAL_SETS`].
    pub fn validated(mut self, features: &TimerFeatures) -> Result<Self, TimerError> {
        check_secs("work_secs", self.work_secs)?;
        if features.prepare {
            check_secs("prepare_secs", self.prepare_secs)?;
        }
        if features.rest.has_timed_rest() {
            check_secs("rest_secs", self.rest_secs)?;
        }

        if features.menu {
            self.exercise_names = self
                .exercise_names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect();
            self.total_sets = match self.exercise_names.len() {
                0 => DEFAULT_TOTAL_SETS,
                n => u32::try_from(n).unwrap_or(u32::MAX),
            };
        }
        if !TOTAL_SETS_RANGE.contains(&self.total_sets) {
            return Err(TimerError::invalid(
                "total_sets",
                format!(
                    "must be between {} and {}",
                    TOTAL_SETS_RANGE.start(),
                    TOTAL_SETS_RANGE.end()
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.volume) {
            return Err(TimerError::invalid("volume", "must be between 0.0 and 1.0"));
        }
        Ok(self)
    }

    /// Duration of the first phase a fresh session shows.
    pub fn initial_secs(&self, features: &TimerFeatures) -> u32 {
        if features.prepare {
            self.prepare_secs
        } else {
            self.work_secs
        }
    }

    /// Wall time of a full run, in seconds.
    pub fn total_duration_secs(&self, features: &TimerFeatures) -> u64 {
        let sets = u64::from(self.total_sets);
        let prepare = if features.prepare {
            u64::from(self.prepare_secs)
        } else {
            0
        };
        let rest = if features.rest.has_timed_rest() {
            u64::from(self.rest_secs) * sets.saturating_sub(1)
        } else {
            0
        };
        prepare + sets * u64::from(self.work_secs) + rest
    }
}

fn check_secs(field: &str, value: u32) -> Result<(), TimerError> {
    if PHASE_SECS_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(TimerError::invalid(
            field,
            format!(
                "must be between {} and {}",
                PHASE_SECS_RANGE.start(),
                PHASE_SECS_RANGE.end()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = TimerConfig::default();
        assert!(cfg.validated(&TimerFeatures::default()).is_ok());
    }

    #[test]
    fn zero_work_is_rejected() {
        let cfg = TimerConfig {
            work_secs: 0,
            ..TimerConfig::default()
        };
        let err = cfg.validated(&TimerFeatures::default()).unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfig { ref field, .. } if field == "work_secs"));
    }

    #[test]
    fn rest_only_checked_when_timed() {
        let cfg = TimerConfig {
            rest_secs: 0,
            ..TimerConfig::default()
        };
        assert!(cfg.clone().validated(&TimerFeatures::default()).is_err());

        let features = TimerFeatures {
            rest: RestMode::Immediate,
            ..TimerFeatures::default()
        };
        assert!(cfg.validated(&features).is_ok());
    }

    #[test]
    fn sets_out_of_range() {
        for sets in [0, 100] {
            let cfg = TimerConfig {
                total_sets: sets,
                ..TimerConfig::default()
            };
            assert!(cfg.validated(&TimerFeatures::default()).is_err());
        }
    }

    #[test]
    fn menu_derives_sets_from_names() {
        let features = TimerFeatures {
            menu: true,
            ..TimerFeatures::default()
        };
        let cfg = TimerConfig {
            total_sets: 42,
            exercise_names: vec!["Squat".into(), "  ".into(), " Burpee ".into(), String::new()],
            ..TimerConfig::default()
        };
        let cfg = cfg.validated(&features).unwrap();
        assert_eq!(cfg.total_sets, 2);
        assert_eq!(cfg.exercise_names, vec!["Squat", "Burpee"]);
    }

    #[test]
    fn menu_without_names_falls_back() {
        let features = TimerFeatures {
            menu: true,
            ..TimerFeatures::default()
        };
        let cfg = TimerConfig {
            total_sets: 3,
            ..TimerConfig::default()
        }
        .validated(&features)
        .unwrap();
        assert_eq!(cfg.total_sets, DEFAULT_TOTAL_SETS);
    }

    #[test]
    fn total_duration() {
        let cfg = TimerConfig::default();
        assert_eq!(cfg.total_duration_secs(&TimerFeatures::default()), 10 + 9 * 20 + 8 * 10);

        let no_rest = TimerFeatures {
            prepare: false,
            rest: RestMode::Immediate,
            ..TimerFeatures::default()
        };
        assert_eq!(cfg.total_duration_secs(&no_rest), 9 * 20);
    }
}
