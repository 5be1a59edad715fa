//! Integration tests for settings persistence across database reopen.

use hiitdeck_core::storage::TIMER_SETTINGS_KEY;
use hiitdeck_core::timer::builtin_preset;
use hiitdeck_core::{
    AppConfig, Database, IntervalTimer, KvStore, Phase, Preset, RestMode, Settings, TimerConfig,
    TimerError, TimerFeatures,
};

#[test]
fn test_applied_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hiitdeck.db");

    {
        let db = Database::open_at(&path).unwrap();
        let settings = Settings::new(&db);
        let mut timer = settings.load_timer(TimerFeatures::default());
        let cfg = TimerConfig {
            work_secs: 40,
            rest_secs: 20,
            total_sets: 5,
            ..TimerConfig::default()
        };
        settings.apply(&mut timer, cfg).unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let timer = Settings::new(&db).load_timer(TimerFeatures::default());
    assert_eq!(timer.config().work_secs, 40);
    assert_eq!(timer.total_sets(), 5);
    assert_eq!(timer.phase(), Phase::Idle);
    assert_eq!(timer.seconds_remaining(), 10);
}

#[test]
fn test_apply_rejected_while_running() {
    let db = Database::open_memory().unwrap();
    let settings = Settings::new(&db);
    let mut timer = IntervalTimer::default();
    timer.start();
    let err = settings
        .apply(&mut timer, TimerConfig::default())
        .unwrap_err();
    assert_eq!(err, TimerError::ConfigLocked);
    assert!(db.kv_get(TIMER_SETTINGS_KEY).unwrap().is_none());
}

#[test]
fn test_custom_preset_workflow() {
    let db = Database::open_memory().unwrap();
    let settings = Settings::new(&db);
    let features = TimerFeatures::default();

    let mut book = settings.presets();
    assert_eq!(book.list().len(), 3);

    let legs = Preset {
        name: "Leg day".into(),
        config: TimerConfig {
            work_secs: 30,
            rest_secs: 30,
            total_sets: 4,
            ..TimerConfig::default()
        },
    };
    book.save("legs", legs.clone(), &features).unwrap();
    assert!(book.save("tabata", legs.clone(), &features).is_err());
    settings.save_presets(&book).unwrap();

    let book = settings.presets();
    assert_eq!(book.get("legs"), Some(legs.clone()));
    assert_eq!(book.get("tabata"), builtin_preset("tabata"));

    let mut timer = settings.load_timer(features);
    settings.apply(&mut timer, legs.config).unwrap();
    assert_eq!(settings.timer_config().work_secs, 30);
}

#[test]
fn test_app_config_drives_timer_features() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut cfg = AppConfig::load_from(&path).unwrap();
    cfg.set("timer.rest", "immediate").unwrap();
    cfg.set("timer.prepare", "false").unwrap();
    cfg.save_to(&path).unwrap();

    let features = AppConfig::load_from(&path).unwrap().timer;
    assert_eq!(features.rest, RestMode::Immediate);

    let db = Database::open_memory().unwrap();
    let timer = Settings::new(&db).load_timer(features);
    assert_eq!(timer.seconds_remaining(), timer.config().work_secs);
    assert_eq!(
        timer.total_duration_secs(),
        u64::from(timer.config().work_secs) * u64::from(timer.total_sets())
    );
}
