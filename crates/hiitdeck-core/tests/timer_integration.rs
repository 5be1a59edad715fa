//! Integration tests for the interval timer.
//!
//! Runs whole workouts tick by tick and checks the counts, cue sequence and
//! progress against the configured plan.

use hiitdeck_core::{Cue, Event, IntervalTimer, Phase, RestMode, TimerConfig, TimerFeatures};
use proptest::prelude::*;

struct Run {
    ticks: u64,
    cues: Vec<Cue>,
    events: Vec<Event>,
}

fn run_to_end(timer: &mut IntervalTimer) -> Run {
    let start = timer.start();
    let mut run = Run {
        ticks: 0,
        cues: start.cues,
        events: start.events,
    };
    let mut last_set = timer.set_index();
    let mut last_progress = timer.progress();

    while timer.phase() != Phase::Finished {
        let out = timer.tick();
        run.ticks += 1;
        run.cues.extend(out.cues);
        run.events.extend(out.events);

        assert!(timer.set_index() >= last_set, "set index went backwards");
        assert!(timer.set_index() <= timer.total_sets());
        assert!(timer.progress() + 1e-9 >= last_progress, "progress went backwards");
        last_set = timer.set_index();
        last_progress = timer.progress();

        assert!(run.ticks < 1_000_000, "timer never finished");
    }
    run
}

fn count(cues: &[Cue], cue: Cue) -> usize {
    cues.iter().filter(|&&c| c == cue).count()
}

fn config(work: u32, rest: u32, prepare: u32, sets: u32) -> TimerConfig {
    TimerConfig {
        work_secs: work,
        rest_secs: rest,
        prepare_secs: prepare,
        total_sets: sets,
        ..TimerConfig::default()
    }
}

#[test]
fn test_tabata_workout_end_to_end() {
    let mut timer = IntervalTimer::new(config(20, 10, 10, 9), TimerFeatures::default()).unwrap();
    let run = run_to_end(&mut timer);

    assert_eq!(run.ticks, 10 + 9 * 20 + 8 * 10);
    assert_eq!(run.ticks, timer.total_duration_secs());
    assert_eq!(timer.elapsed_secs(), run.ticks);
    assert!(!timer.is_running());
    assert_eq!(timer.progress(), 1.0);

    assert_eq!(count(&run.cues, Cue::WorkStart), 9);
    assert_eq!(count(&run.cues, Cue::RestStart), 8);
    assert_eq!(count(&run.cues, Cue::HalfTime), 9);
    assert_eq!(count(&run.cues, Cue::Finish), 1);
    assert_eq!(run.cues.last(), Some(&Cue::Finish));

    let finished = run
        .events
        .iter()
        .filter(|e| matches!(e, Event::TimerFinished { .. }))
        .count();
    assert_eq!(finished, 1);
}

#[test]
fn test_prepare_countdown_then_work() {
    let mut timer = IntervalTimer::new(config(5, 5, 5, 1), TimerFeatures::default()).unwrap();
    timer.start();

    let mut cues = Vec::new();
    for _ in 0..5 {
        cues.extend(timer.tick().cues);
    }
    assert_eq!(
        cues,
        vec![Cue::Countdown, Cue::Countdown, Cue::Countdown, Cue::WorkStart]
    );
    assert_eq!(timer.phase(), Phase::Work);
    assert_eq!(timer.set_index(), 1);
}

#[test]
fn test_stop_and_resume_midway() {
    let mut timer = IntervalTimer::new(config(6, 3, 2, 2), TimerFeatures::default()).unwrap();
    timer.start();
    for _ in 0..4 {
        timer.tick();
    }
    let before = (timer.phase(), timer.seconds_remaining(), timer.set_index());

    assert!(timer.stop().is_some());
    for _ in 0..10 {
        assert!(timer.tick().is_empty());
    }
    assert_eq!(
        (timer.phase(), timer.seconds_remaining(), timer.set_index()),
        before
    );

    let resumed = timer.start();
    assert!(matches!(resumed.events[0], Event::TimerResumed { .. }));
    let rest = run_to_end(&mut timer);
    assert_eq!(4 + rest.ticks, timer.total_duration_secs());
}

#[test]
fn test_restart_after_finish() {
    let mut timer = IntervalTimer::new(config(2, 1, 1, 2), TimerFeatures::default()).unwrap();
    let first = run_to_end(&mut timer);
    let second = run_to_end(&mut timer);
    assert_eq!(first.ticks, second.ticks);
    assert_eq!(first.cues, second.cues);
}

#[test]
fn test_menu_workout_names_each_set() {
    let features = TimerFeatures {
        menu: true,
        ..TimerFeatures::default()
    };
    let cfg = TimerConfig {
        work_secs: 2,
        rest_secs: 1,
        prepare_secs: 1,
        exercise_names: vec!["Squats".into(), " ".into(), "Burpees".into()],
        ..TimerConfig::default()
    };
    let mut timer = IntervalTimer::new(cfg, features).unwrap();
    assert_eq!(timer.total_sets(), 2);

    timer.start();
    timer.tick();
    assert_eq!(timer.current_exercise(), Some("Squats"));
    for _ in 0..3 {
        timer.tick();
    }
    assert_eq!(timer.phase(), Phase::Work);
    assert_eq!(timer.current_exercise(), Some("Burpees"));
}

#[test]
fn test_json_snapshot_shape() {
    let timer = IntervalTimer::default();
    let json = serde_json::to_value(timer.snapshot()).unwrap();
    assert_eq!(json["type"], "TimerSnapshot");
    assert_eq!(json["phase"], "idle");
    assert_eq!(json["seconds_remaining"], 10);
    assert_eq!(json["running"], false);
}

fn rest_mode() -> impl Strategy<Value = RestMode> {
    prop_oneof![
        Just(RestMode::Timed),
        Just(RestMode::Immediate),
        Just(RestMode::Skipped),
    ]
}

proptest! {
    #[test]
    fn prop_tick_count_matches_plan(
        work in 1u32..=20,
        rest in 1u32..=10,
        prepare in 1u32..=10,
        sets in 1u32..=6,
        with_prepare in any::<bool>(),
        mode in rest_mode(),
    ) {
        let features = TimerFeatures {
            prepare: with_prepare,
            rest: mode,
            ..TimerFeatures::default()
        };
        let mut timer = IntervalTimer::new(config(work, rest, prepare, sets), features).unwrap();
        let run = run_to_end(&mut timer);

        let prep = if with_prepare { u64::from(prepare) } else { 0 };
        let rests = if mode == RestMode::Timed { u64::from(rest) * u64::from(sets - 1) } else { 0 };
        prop_assert_eq!(run.ticks, prep + u64::from(work) * u64::from(sets) + rests);
        prop_assert_eq!(run.ticks, timer.total_duration_secs());

        prop_assert_eq!(count(&run.cues, Cue::WorkStart), sets as usize);
        prop_assert_eq!(count(&run.cues, Cue::Finish), 1);
        let expected_rests = if mode == RestMode::Immediate { 0 } else { sets as usize - 1 };
        prop_assert_eq!(count(&run.cues, Cue::RestStart), expected_rests);
        let expected_half = if work >= 2 { sets as usize } else { 0 };
        prop_assert_eq!(count(&run.cues, Cue::HalfTime), expected_half);
        prop_assert_eq!(timer.set_index(), sets);
    }

    #[test]
    fn prop_reset_always_returns_to_idle(ticks in 0usize..60) {
        let mut timer = IntervalTimer::new(config(5, 3, 4, 3), TimerFeatures::default()).unwrap();
        timer.start();
        for _ in 0..ticks {
            timer.tick();
        }
        timer.reset();
        prop_assert_eq!(timer.phase(), Phase::Idle);
        prop_assert!(!timer.is_running());
        prop_assert_eq!(timer.set_index(), 1);
        prop_assert_eq!(timer.seconds_remaining(), 4);
        prop_assert_eq!(timer.elapsed_secs(), 0);
    }
}
