//! Interval timer engine.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads - the caller (usually [`super::TimerDriver`]) calls `tick()` once
//! per second while the session is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Prepare -> Work -> Rest -> Work -> ... -> Work -> Finished
//! ```
//!
//! Prepare is skipped when the prepare feature is off, and the set boundary
//! follows [`RestMode`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = IntervalTimer::new(TimerConfig::default(), TimerFeatures::default())?;
//! timer.start();
//! // Once per second:
//! let outcome = timer.tick(); // cues to play, phase changes to render
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::{RestMode, TimerConfig, TimerFeatures};
use super::cue::Cue;
use crate::error::TimerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Prepare,
    Work,
    Rest,
    Finished,
}

impl Phase {
    /// Phases in which the countdown moves.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Prepare | Phase::Work | Phase::Rest)
    }
}

/// The hint shown under the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "set", rename_all = "snake_case")]
pub enum NextAction {
    PressStart,
    GetReady,
    NextSet(u32),
    Finish,
    Done,
}

/// Side effects produced by `start()` or `tick()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub cues: Vec<Cue>,
    pub events: Vec<Event>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty() && self.events.is_empty()
    }

    pub fn finished(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, Event::TimerFinished { .. }))
    }
}

/// Interval timer session.
#[derive(Debug, Clone, Serialize)]
pub struct IntervalTimer {
    config: TimerConfig,
    features: TimerFeatures,
    phase: Phase,
    seconds_remaining: u32,
    /// 1-based; 0 while preparing.
    set_index: u32,
    running: bool,
    elapsed_secs: u64,
    half_time_fired: bool,
}

impl Default for IntervalTimer {
    fn default() -> Self {
        let config = TimerConfig::default();
        let features = TimerFeatures::default();
        let seconds_remaining = config.initial_secs(&features);
        Self {
            config,
            features,
            phase: Phase::Idle,
            seconds_remaining,
            set_index: 1,
            running: false,
            elapsed_secs: 0,
            half_time_fired: false,
        }
    }
}

impl IntervalTimer {
    /// Create an idle session after validating `config` against `features`.
    pub fn new(config: TimerConfig, features: TimerFeatures) -> Result<Self, TimerError> {
        let config = config.validated(&features)?;
        let mut timer = Self {
            config,
            features,
            ..Self::default()
        };
        timer.reset();
        Ok(timer)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn set_index(&self) -> u32 {
        self.set_index
    }

    pub fn total_sets(&self) -> u32 {
        self.config.total_sets
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn features(&self) -> &TimerFeatures {
        &self.features
    }

    /// Full length of `phase` under the current config.
    pub fn phase_duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Idle => self.config.initial_secs(&self.features),
            Phase::Prepare => self.config.prepare_secs,
            Phase::Work => self.config.work_secs,
            Phase::Rest if self.features.rest.has_timed_rest() => self.config.rest_secs,
            Phase::Rest | Phase::Finished => 0,
        }
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.config.total_duration_secs(&self.features)
    }

    /// 0.0 .. 1.0 completion of the whole workout.
    ///
    /// A set counts as completed once its work phase is over, so the value
    /// does not fall back when a rest phase begins.
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.config.total_sets.max(1));
        let completed = match self.phase {
            Phase::Finished => self.config.total_sets,
            Phase::Idle | Phase::Prepare => 0,
            Phase::Work => self.set_index.saturating_sub(1),
            Phase::Rest => self.set_index,
        };
        let current = if self.phase == Phase::Work {
            self.phase_progress()
        } else {
            0.0
        };
        ((f64::from(completed) + current) / total).clamp(0.0, 1.0)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        if self.phase == Phase::Finished {
            return 1.0;
        }
        let total = self.phase_duration(self.phase);
        if total == 0 || self.phase == Phase::Idle {
            return 0.0;
        }
        1.0 - f64::from(self.seconds_remaining) / f64::from(total)
    }

    pub fn next_action(&self) -> NextAction {
        match self.phase {
            Phase::Idle => NextAction::PressStart,
            Phase::Prepare => NextAction::GetReady,
            Phase::Work | Phase::Rest if self.set_index < self.config.total_sets => {
                NextAction::NextSet(self.set_index + 1)
            }
            Phase::Work | Phase::Rest => NextAction::Finish,
            Phase::Finished => NextAction::Done,
        }
    }

    /// Name of the exercise for the current set, when running from a menu.
    pub fn current_exercise(&self) -> Option<&str> {
        if !self.features.menu || !matches!(self.phase, Phase::Work | Phase::Rest) {
            return None;
        }
        let idx = usize::try_from(self.set_index.checked_sub(1)?).ok()?;
        self.config.exercise_names.get(idx).map(String::as_str)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            phase: self.phase,
            running: self.running,
            seconds_remaining: self.seconds_remaining,
            set_index: self.set_index,
            total_sets: self.config.total_sets,
            progress: self.progress(),
            phase_progress: self.phase_progress(),
            elapsed_secs: self.elapsed_secs,
            exercise: self.current_exercise().map(str::to_string),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh run from Idle/Finished, or resume a stopped one.
    /// Does nothing while already running.
    pub fn start(&mut self) -> Outcome {
        let mut out = Outcome::default();
        if self.running {
            return out;
        }
        self.running = true;

        match self.phase {
            Phase::Idle | Phase::Finished => {
                self.elapsed_secs = 0;
                self.half_time_fired = false;
                if self.features.prepare {
                    self.set_index = 0;
                    self.phase = Phase::Prepare;
                    self.seconds_remaining = self.config.prepare_secs;
                } else {
                    self.set_index = 1;
                    self.phase = Phase::Work;
                    self.seconds_remaining = self.config.work_secs;
                    out.cues.push(Cue::WorkStart);
                }
                out.events.push(Event::TimerStarted {
                    phase: self.phase,
                    seconds_remaining: self.seconds_remaining,
                    at: Utc::now(),
                });
            }
            Phase::Prepare | Phase::Work | Phase::Rest => {
                out.events.push(Event::TimerResumed {
                    phase: self.phase,
                    seconds_remaining: self.seconds_remaining,
                    at: Utc::now(),
                });
            }
        }
        out
    }

    pub fn stop(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerStopped {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.phase = Phase::Idle;
        self.set_index = 1;
        self.seconds_remaining = self.config.initial_secs(&self.features);
        self.elapsed_secs = 0;
        self.half_time_fired = false;
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance the countdown by one second. No-op unless running.
    pub fn tick(&mut self) -> Outcome {
        let mut out = Outcome::default();
        if !self.running || !self.phase.is_active() {
            return out;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.elapsed_secs += 1;
        let remaining = self.seconds_remaining;

        if self.phase == Phase::Work && !self.half_time_fired {
            let halfway = self.config.work_secs / 2;
            if halfway > 0 && remaining == halfway {
                self.half_time_fired = true;
                out.cues.push(Cue::HalfTime);
            }
        }
        if (1..=3).contains(&remaining) {
            out.cues.push(Cue::Countdown);
        }
        if remaining == 0 {
            self.advance(&mut out);
        }
        out
    }

    /// Replace the settings. Only allowed while stopped; resets the session.
    pub fn apply_config(&mut self, config: TimerConfig) -> Result<Event, TimerError> {
        if self.running {
            return Err(TimerError::ConfigLocked);
        }
        self.config = config.validated(&self.features)?;
        self.reset();
        tracing::debug!(
            total_sets = self.config.total_sets,
            work_secs = self.config.work_secs,
            "timer config applied"
        );
        Ok(Event::ConfigApplied {
            total_sets: self.config.total_sets,
            rest_mode: self.features.rest,
            at: Utc::now(),
        })
    }

    /// Switch variant features. The current config is re-validated under them.
    pub fn set_features(&mut self, features: TimerFeatures) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::ConfigLocked);
        }
        self.config = self.config.clone().validated(&features)?;
        self.features = features;
        self.reset();
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, out: &mut Outcome) {
        match self.phase {
            Phase::Prepare => {
                self.set_index = 1;
                self.enter(Phase::Work, out);
            }
            Phase::Work if self.set_index >= self.config.total_sets => self.finish(out),
            Phase::Work => match self.features.rest {
                RestMode::Timed => self.enter(Phase::Rest, out),
                RestMode::Immediate => {
                    self.set_index += 1;
                    self.enter(Phase::Work, out);
                }
                RestMode::Skipped => {
                    self.enter(Phase::Rest, out);
                    self.set_index += 1;
                    self.enter(Phase::Work, out);
                }
            },
            Phase::Rest => {
                self.set_index += 1;
                self.enter(Phase::Work, out);
            }
            Phase::Idle | Phase::Finished => {}
        }
    }

    fn enter(&mut self, to: Phase, out: &mut Outcome) {
        let from = self.phase;
        let duration = self.phase_duration(to);
        self.phase = to;
        self.seconds_remaining = duration;
        match to {
            Phase::Work => {
                self.half_time_fired = false;
                out.cues.push(Cue::WorkStart);
            }
            Phase::Rest => out.cues.push(Cue::RestStart),
            _ => {}
        }
        tracing::debug!(?from, ?to, set = self.set_index, "phase changed");
        out.events.push(Event::PhaseChanged {
            from,
            to,
            set_index: self.set_index,
            duration_secs: duration,
            at: Utc::now(),
        });
    }

    fn finish(&mut self, out: &mut Outcome) {
        let from = self.phase;
        self.phase = Phase::Finished;
        self.seconds_remaining = 0;
        self.running = false;
        out.cues.push(Cue::Finish);
        out.events.push(Event::PhaseChanged {
            from,
            to: Phase::Finished,
            set_index: self.set_index,
            duration_secs: 0,
            at: Utc::now(),
        });
        out.events.push(Event::TimerFinished {
            total_sets: self.config.total_sets,
            elapsed_secs: self.elapsed_secs,
            at: Utc::now(),
        });
    }
}

/// Render seconds as `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
