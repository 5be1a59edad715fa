//! Audio cues and the tone capability they are played through.
//!
//! The engine only decides *which* cue is due; turning a cue into sound is the
//! job of a [`ToneSink`]. Sinks are fire-and-forget and their failures never
//! reach the timer.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// 3, 2, 1 before a phase ends.
    Countdown,
    /// Halfway through a work phase.
    HalfTime,
    WorkStart,
    RestStart,
    Finish,
}

/// One beep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_secs: f32,
    /// Delay after the cue fires before this tone starts.
    pub offset: Duration,
}

impl Tone {
    const fn new(frequency_hz: f32, duration_secs: f32, offset_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_secs,
            offset: Duration::from_millis(offset_ms),
        }
    }
}

const COUNTDOWN: [Tone; 1] = [Tone::new(880.0, 0.1, 0)];
const WORK_START: [Tone; 1] = [Tone::new(880.0, 0.3, 0)];
const REST_START: [Tone; 1] = [Tone::new(440.0, 0.3, 0)];
const FINISH: [Tone; 2] = [Tone::new(880.0, 0.3, 0), Tone::new(1100.0, 0.3, 300)];

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Countdown | Cue::HalfTime => &COUNTDOWN,
            Cue::WorkStart => &WORK_START,
            Cue::RestStart => &REST_START,
            Cue::Finish => &FINISH,
        }
    }
}

/// Something that can play a sine beep.
pub trait ToneSink: Send + Sync {
    fn play_tone(
        &self,
        frequency_hz: f32,
        duration_secs: f32,
        volume: f32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// A sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ToneSink for Silent {
    fn play_tone(
        &self,
        _frequency_hz: f32,
        _duration_secs: f32,
        _volume: f32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// Plays cues through a sink, swallowing sink failures.
#[derive(Clone)]
pub struct CuePlayer {
    sink: Arc<dyn ToneSink>,
}

impl CuePlayer {
    pub fn new(sink: Arc<dyn ToneSink>) -> Self {
        Self { sink }
    }

    pub fn silent() -> Self {
        Self::new(Arc::new(Silent))
    }

    /// Play every tone of `cue`. Delayed tones are scheduled on the current
    /// tokio runtime when there is one and played immediately otherwise.
    pub fn play(&self, cue: Cue, volume: f32) {
        for tone in cue.tones() {
            if tone.offset.is_zero() {
                play_one(self.sink.as_ref(), cue, tone, volume);
                continue;
            }
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let sink = Arc::clone(&self.sink);
                    let tone = *tone;
                    handle.spawn(async move {
                        tokio::time::sleep(tone.offset).await;
                        play_one(sink.as_ref(), cue, &tone, volume);
                    });
                }
                Err(_) => play_one(self.sink.as_ref(), cue, tone, volume),
            }
        }
    }
}

impl std::fmt::Debug for CuePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CuePlayer").finish_non_exhaustive()
    }
}

fn play_one(sink: &dyn ToneSink, cue: Cue, tone: &Tone, volume: f32) {
    if let Err(e) = sink.play_tone(tone.frequency_hz, tone.duration_secs, volume) {
        tracing::warn!(?cue, "audio playback failed: {e}");
    }
}
