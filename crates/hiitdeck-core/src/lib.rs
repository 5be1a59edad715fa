//! # Hiitdeck Core Library
//!
//! Core logic for hiitdeck: an interval-training timer and a tic-tac-toe
//! game. Everything runs headless; the CLI binary is a thin layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine (Prepare, Work, Rest,
//!   Finished). Each `tick()` is one second of the workout and returns the
//!   audio cues and events it produced
//! - **Game Engine**: Board rules, win/draw detection and a heuristic AI
//! - **Drivers**: tokio tasks that tick the timer and delay the AI reply,
//!   with cancellation on stop, reset and mode switch
//! - **Storage**: SQLite key-value settings and TOML application config
//!
//! ## Key Components
//!
//! - [`IntervalTimer`]: Timer state machine
//! - [`TimerDriver`]: Periodic ticking with cue playback
//! - [`Board`] and [`choose_move`]: Game rules and AI
//! - [`GameDriver`]: Game session with a delayed AI reply
//! - [`Database`]: Settings persistence
//! - [`AppConfig`]: Application configuration management

pub mod error;
pub mod events;
pub mod game;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, GameError, StorageError, TimerError};
pub use events::Event;
pub use game::{choose_move, Board, GameDriver, GameMode, GameSession, GameStatus, Mark};
pub use storage::{AppConfig, Database, KvStore, MemoryStore, Settings};
pub use timer::{
    Cue, CuePlayer, IntervalTimer, Phase, Preset, PresetBook, RestMode, TimerConfig,
    TimerDriver, TimerFeatures, ToneSink,
};
