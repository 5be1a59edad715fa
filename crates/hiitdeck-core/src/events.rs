use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{Cell, GameStatus, Mark};
use crate::timer::{Phase, RestMode};

/// Every state change in the system produces an Event.
/// Renderers poll snapshots or consume events as they are returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        set_index: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerFinished {
        total_sets: u32,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    ConfigApplied {
        total_sets: u32,
        rest_mode: RestMode,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        phase: Phase,
        running: bool,
        seconds_remaining: u32,
        set_index: u32,
        total_sets: u32,
        progress: f64,
        phase_progress: f64,
        elapsed_secs: u64,
        exercise: Option<String>,
        at: DateTime<Utc>,
    },
    MarkPlaced {
        index: usize,
        mark: Mark,
        by_ai: bool,
        at: DateTime<Utc>,
    },
    GameEnded {
        status: GameStatus,
        at: DateTime<Utc>,
    },
    GameReset {
        at: DateTime<Utc>,
    },
    GameSnapshot {
        cells: [Cell; 9],
        turn: Mark,
        status: GameStatus,
        ai_thinking: bool,
        at: DateTime<Utc>,
    },
}
