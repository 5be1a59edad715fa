//! Once-per-second scheduler for an [`IntervalTimer`].
//!
//! The driver owns the timer behind a mutex and spawns at most one tokio task
//! that ticks it. A generation counter is bumped under the same lock by
//! `stop()`/`reset()`, so once either returns no further tick is applied even
//! if the interval has already fired.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use super::config::TimerConfig;
use super::cue::CuePlayer;
use super::engine::{IntervalTimer, Outcome};
use crate::error::TimerError;
use crate::events::Event;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
const MIN_PERIOD: Duration = Duration::from_millis(1);

type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

struct Shared {
    timer: IntervalTimer,
    generation: u64,
    /// A ticker task for the current generation exists.
    live: bool,
}

pub struct TimerDriver {
    shared: Arc<Mutex<Shared>>,
    player: CuePlayer,
    listener: Listener,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl TimerDriver {
    pub fn new(timer: IntervalTimer, player: CuePlayer) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                timer,
                generation: 0,
                live: false,
            })),
            player,
            listener: Arc::new(|_: &Event| {}),
            period: TICK_PERIOD,
            handle: None,
        }
    }

    /// Called with the events of every mutation, followed by a snapshot.
    pub fn on_update(mut self, listener: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.listener = Arc::new(listener);
        self
    }

    /// Length of one timer second. Clamped to at least one millisecond.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period.max(MIN_PERIOD);
        self
    }

    /// Start or resume. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Outcome {
        let (outcome, snapshot, generation, spawn) = {
            let mut s = lock(&self.shared);
            let outcome = s.timer.start();
            let spawn = s.timer.is_running() && !s.live;
            if spawn {
                s.live = true;
            }
            (outcome, s.timer.snapshot(), s.generation, spawn)
        };
        self.dispatch(&outcome, &snapshot);

        if spawn {
            let shared = Arc::clone(&self.shared);
            let player = self.player.clone();
            let listener = Arc::clone(&self.listener);
            let period = self.period;
            self.handle = Some(tokio::spawn(async move {
                run_ticker(shared, player, listener, period, generation).await;
            }));
        }
        outcome
    }

    pub fn stop(&mut self) -> Option<Event> {
        let (event, snapshot) = {
            let mut s = lock(&self.shared);
            s.generation += 1;
            s.live = false;
            (s.timer.stop(), s.timer.snapshot())
        };
        self.cancel();
        if let Some(event) = &event {
            (self.listener)(event);
            (self.listener)(&snapshot);
        }
        event
    }

    pub fn reset(&mut self) -> Event {
        let (event, snapshot) = {
            let mut s = lock(&self.shared);
            s.generation += 1;
            s.live = false;
            (s.timer.reset(), s.timer.snapshot())
        };
        self.cancel();
        (self.listener)(&event);
        (self.listener)(&snapshot);
        event
    }

    /// Replace the settings while stopped. Listeners get the
    /// `ConfigApplied` event and a snapshot of the reset timer.
    pub fn apply_config(&self, config: TimerConfig) -> Result<Event, TimerError> {
        let (event, snapshot) = {
            let mut s = lock(&self.shared);
            let event = s.timer.apply_config(config)?;
            (event, s.timer.snapshot())
        };
        (self.listener)(&event);
        (self.listener)(&snapshot);
        Ok(event)
    }

    pub fn snapshot(&self) -> Event {
        lock(&self.shared).timer.snapshot()
    }

    /// Read the timer under the lock.
    pub fn with_timer<R>(&self, f: impl FnOnce(&IntervalTimer) -> R) -> R {
        f(&lock(&self.shared).timer)
    }

    pub fn is_running(&self) -> bool {
        lock(&self.shared).timer.is_running()
    }

    /// Resolves once the current run has finished or been stopped.
    pub async fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("timer task failed: {e}");
                }
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn dispatch(&self, outcome: &Outcome, snapshot: &Event) {
        dispatch(&self.shared, &self.player, &self.listener, outcome, snapshot, false);
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_ticker(
    shared: Arc<Mutex<Shared>>,
    player: CuePlayer,
    listener: Listener,
    period: Duration,
    generation: u64,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        let (outcome, snapshot, running) = {
            let mut s = lock(&shared);
            if s.generation != generation {
                return;
            }
            let outcome = s.timer.tick();
            let running = s.timer.is_running();
            if !running {
                s.live = false;
            }
            (outcome, s.timer.snapshot(), running)
        };
        // Every tick moves the clock, so listeners always get a snapshot.
        dispatch(&shared, &player, &listener, &outcome, &snapshot, true);
        if !running {
            return;
        }
    }
}

/// Play the cues of `outcome` and hand its events to the listener. The
/// snapshot follows when something happened or `always_snapshot` is set.
fn dispatch(
    shared: &Mutex<Shared>,
    player: &CuePlayer,
    listener: &Listener,
    outcome: &Outcome,
    snapshot: &Event,
    always_snapshot: bool,
) {
    if !outcome.cues.is_empty() {
        let (audible, volume) = {
            let s = lock(shared);
            (
                s.timer.features().audio && s.timer.config().audio_enabled,
                s.timer.config().volume,
            )
        };
        if audible {
            for cue in &outcome.cues {
                player.play(*cue, volume);
            }
        }
    }
    for event in &outcome.events {
        listener(event);
    }
    if always_snapshot || !outcome.is_empty() {
        listener(snapshot);
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
