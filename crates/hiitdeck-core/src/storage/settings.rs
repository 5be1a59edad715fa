//! Timer settings and custom presets on top of a [`KvStore`].
//!
//! Reads never fail: a missing or corrupt entry falls back to defaults.
//! Writes after a successful `apply` are best effort.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::database::KvStore;
use crate::error::{Result, TimerError};
use crate::events::Event;
use crate::timer::{IntervalTimer, PresetBook, TimerConfig, TimerFeatures};

pub const TIMER_SETTINGS_KEY: &str = "timer_settings";
pub const CUSTOM_PRESETS_KEY: &str = "custom_presets";

pub struct Settings<'a, S: KvStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KvStore + ?Sized> Settings<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn timer_config(&self) -> TimerConfig {
        self.read(TIMER_SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_timer_config(&self, config: &TimerConfig) -> Result<()> {
        self.write(TIMER_SETTINGS_KEY, config)
    }

    pub fn presets(&self) -> PresetBook {
        self.read(CUSTOM_PRESETS_KEY).unwrap_or_default()
    }

    pub fn save_presets(&self, presets: &PresetBook) -> Result<()> {
        self.write(CUSTOM_PRESETS_KEY, presets)
    }

    /// An idle timer built from the stored settings. Settings that no longer
    /// validate under `features` are replaced by defaults.
    pub fn load_timer(&self, features: TimerFeatures) -> IntervalTimer {
        match IntervalTimer::new(self.timer_config(), features) {
            Ok(timer) => timer,
            Err(e) => {
                tracing::warn!("stored timer settings rejected, using defaults: {e}");
                IntervalTimer::new(TimerConfig::default(), features).unwrap_or_default()
            }
        }
    }

    /// Apply `config` to `timer` and persist it on success.
    pub fn apply(
        &self,
        timer: &mut IntervalTimer,
        config: TimerConfig,
    ) -> std::result::Result<Event, TimerError> {
        let event = timer.apply_config(config)?;
        if let Err(e) = self.save_timer_config(timer.config()) {
            tracing::warn!("failed to persist timer settings: {e}");
        }
        Ok(event)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.kv_get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, "failed to read setting: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, "ignoring corrupt setting: {e}");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.kv_set(key, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use crate::timer::{Phase, Preset};

    struct ReadOnly;

    impl KvStore for ReadOnly {
        fn kv_get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn kv_set(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let store = MemoryStore::default();
        assert_eq!(Settings::new(&store).timer_config(), TimerConfig::default());
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let store = MemoryStore::default();
        store.kv_set(TIMER_SETTINGS_KEY, "{not json").unwrap();
        store.kv_set(CUSTOM_PRESETS_KEY, "[1,2,3]").unwrap();
        let settings = Settings::new(&store);
        assert_eq!(settings.timer_config(), TimerConfig::default());
        assert!(settings.presets().custom().is_empty());
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let store = MemoryStore::default();
        store.kv_set(TIMER_SETTINGS_KEY, r#"{"work_secs": 45}"#).unwrap();
        let cfg = Settings::new(&store).timer_config();
        assert_eq!(cfg.work_secs, 45);
        assert_eq!(cfg.rest_secs, 10);
    }

    #[test]
    fn apply_persists_on_success_only() {
        let store = MemoryStore::default();
        let settings = Settings::new(&store);
        let mut timer = settings.load_timer(TimerFeatures::default());

        let bad = TimerConfig {
            work_secs: 0,
            ..TimerConfig::default()
        };
        assert!(settings.apply(&mut timer, bad).is_err());
        assert!(store.kv_get(TIMER_SETTINGS_KEY).unwrap().is_none());

        let good = TimerConfig {
            work_secs: 30,
            ..TimerConfig::default()
        };
        settings.apply(&mut timer, good).unwrap();
        assert_eq!(settings.timer_config().work_secs, 30);
        assert_eq!(timer.phase(), Phase::Idle);
    }

    #[test]
    fn persistence_failure_does_not_fail_apply() {
        let settings = Settings::new(&ReadOnly);
        let mut timer = IntervalTimer::default();
        let cfg = TimerConfig {
            total_sets: 3,
            ..TimerConfig::default()
        };
        assert!(settings.apply(&mut timer, cfg).is_ok());
        assert_eq!(timer.total_sets(), 3);
    }

    #[test]
    fn stale_settings_replaced_by_defaults() {
        let store = MemoryStore::default();
        store
            .kv_set(TIMER_SETTINGS_KEY, r#"{"work_secs": 5000}"#)
            .unwrap();
        let timer = Settings::new(&store).load_timer(TimerFeatures::default());
        assert_eq!(timer.config().work_secs, TimerConfig::default().work_secs);
    }

    #[test]
    fn presets_roundtrip_through_store() {
        let store = MemoryStore::default();
        let settings = Settings::new(&store);
        let mut book = settings.presets();
        book.save(
            "core",
            Preset {
                name: "Core".into(),
                config: TimerConfig::default(),
            },
            &TimerFeatures::default(),
        )
        .unwrap();
        settings.save_presets(&book).unwrap();
        assert_eq!(settings.presets(), book);
    }
}
