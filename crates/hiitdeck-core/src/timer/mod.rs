mod config;
mod cue;
mod driver;
mod engine;
mod presets;

pub use config::{
    RestMode, TimerConfig, TimerFeatures, DEFAULT_TOTAL_SETS, PHASE_SECS_RANGE, TOTAL_SETS_RANGE,
};
pub use cue::{Cue, CuePlayer, Silent, Tone, ToneSink};
pub use driver::{TimerDriver, TICK_PERIOD};
pub use engine::{format_clock, IntervalTimer, NextAction, Outcome, Phase};
pub use presets::{builtin as builtin_preset, Preset, PresetBook, BUILTIN_KEYS};
