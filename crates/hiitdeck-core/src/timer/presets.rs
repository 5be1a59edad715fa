//! Built-in and user-saved timer presets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::{TimerConfig, TimerFeatures};
use crate::error::TimerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(flatten)]
    pub config: TimerConfig,
}

impl Preset {
    fn builtin(name: &str, work_secs: u32, rest_secs: u32, total_sets: u32) -> Self {
        Self {
            name: name.to_string(),
            config: TimerConfig {
                work_secs,
                rest_secs,
                total_sets,
                ..TimerConfig::default()
            },
        }
    }
}

pub const BUILTIN_KEYS: [&str; 3] = ["tabata", "emom", "beginner"];

pub fn builtin(key: &str) -> Option<Preset> {
    match key {
        "tabata" => Some(Preset::builtin("Tabata", 20, 10, 9)),
        "emom" => Some(Preset::builtin("EMOM", 45, 15, 10)),
        "beginner" => Some(Preset::builtin("Beginner", 15, 15, 6)),
        _ => None,
    }
}

/// User-saved presets, keyed by a short slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetBook {
    custom: BTreeMap<String, Preset>,
}

impl PresetBook {
    pub fn get(&self, key: &str) -> Option<Preset> {
        builtin(key).or_else(|| self.custom.get(key).cloned())
    }

    /// Built-ins first, then custom presets in key order.
    pub fn list(&self) -> Vec<(String, Preset, bool)> {
        let mut all: Vec<(String, Preset, bool)> = BUILTIN_KEYS
            .iter()
            .filter_map(|k| builtin(k).map(|p| (k.to_string(), p, true)))
            .collect();
        all.extend(
            self.custom
                .iter()
                .map(|(k, p)| (k.clone(), p.clone(), false)),
        );
        all
    }

    pub fn custom(&self) -> &BTreeMap<String, Preset> {
        &self.custom
    }

    /// Save or overwrite a custom preset after validating its config.
    pub fn save(
        &mut self,
        key: &str,
        preset: Preset,
        features: &TimerFeatures,
    ) -> Result<(), TimerError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(TimerError::invalid("key", "must not be empty"));
        }
        if builtin(key).is_some() {
            return Err(TimerError::invalid(
                "key",
                format!("'{key}' is a built-in preset"),
            ));
        }
        if preset.name.trim().is_empty() {
            return Err(TimerError::invalid("name", "must not be empty"));
        }
        let config = preset.config.validated(features)?;
        self.custom.insert(
            key.to_string(),
            Preset {
                name: preset.name,
                config,
            },
        );
        Ok(())
    }

    /// Remove a custom preset. Returns whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.custom.remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(name: &str, work: u32) -> Preset {
        Preset {
            name: name.into(),
            config: TimerConfig {
                work_secs: work,
                ..TimerConfig::default()
            },
        }
    }

    #[test]
    fn builtins_match_known_workouts() {
        let tabata = builtin("tabata").unwrap();
        assert_eq!(
            (tabata.config.work_secs, tabata.config.rest_secs, tabata.config.total_sets),
            (20, 10, 9)
        );
        let emom = builtin("emom").unwrap();
        assert_eq!(emom.config.total_sets, 10);
        assert!(builtin("nope").is_none());
    }

    #[test]
    fn save_get_delete() {
        let mut book = PresetBook::default();
        book.save("legs", custom("Leg day", 30), &TimerFeatures::default())
            .unwrap();
        assert_eq!(book.get("legs").unwrap().config.work_secs, 30);
        assert_eq!(book.list().len(), 4);
        assert!(book.delete("legs"));
        assert!(!book.delete("legs"));
        assert!(book.get("legs").is_none());
    }

    #[test]
    fn cannot_shadow_builtin() {
        let mut book = PresetBook::default();
        let err = book
            .save("tabata", custom("Mine", 30), &TimerFeatures::default())
            .unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfig { .. }));
    }

    #[test]
    fn invalid_preset_rejected() {
        let mut book = PresetBook::default();
        assert!(book
            .save("bad", custom("Bad", 1000), &TimerFeatures::default())
            .is_err());
        assert!(book.custom().is_empty());
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut book = PresetBook::default();
        book.save("legs", custom("Leg day", 30), &TimerFeatures::default())
            .unwrap();
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["legs"]["name"], "Leg day");
        assert_eq!(json["legs"]["work_secs"], 30);
    }
}
