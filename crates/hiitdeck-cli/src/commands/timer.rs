use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use hiitdeck_core::timer::{format_clock, TICK_PERIOD};
use hiitdeck_core::{
    AppConfig, CuePlayer, Database, Event, IntervalTimer, Phase, RestMode, Settings, TimerDriver,
    ToneSink,
};

use super::CmdResult;

/// Room for the last tone of the finish cue before the process exits.
const FINISH_TAIL: Duration = Duration::from_millis(400);

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a workout, printing one JSON event per line
    Run {
        /// Length of one timer second in milliseconds
        #[arg(long, default_value_t = TICK_PERIOD.as_millis() as u64)]
        interval_ms: u64,
        /// Run a preset instead of the stored settings
        #[arg(long)]
        preset: Option<String>,
        /// No audio cues
        #[arg(long)]
        quiet: bool,
    },
    /// Print the phase plan of a workout
    Plan {
        #[arg(long)]
        preset: Option<String>,
    },
}

/// Rings the terminal bell for every tone.
struct Bell;

impl ToneSink for Bell {
    fn play_tone(
        &self,
        _frequency_hz: f32,
        _duration_secs: f32,
        volume: f32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if volume <= 0.0 {
            return Ok(());
        }
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

fn load_timer(preset: Option<&str>) -> Result<IntervalTimer, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let settings = Settings::new(&db);
    let features = AppConfig::load_or_default().timer;
    match preset {
        Some(key) => {
            let preset = settings
                .presets()
                .get(key)
                .ok_or_else(|| format!("unknown preset: {key}"))?;
            Ok(IntervalTimer::new(preset.config, features)?)
        }
        None => Ok(settings.load_timer(features)),
    }
}

fn print_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!("failed to serialize event: {e}"),
    }
}

pub fn run(action: TimerAction) -> CmdResult {
    match action {
        TimerAction::Run {
            interval_ms,
            preset,
            quiet,
        } => {
            let timer = load_timer(preset.as_deref())?;
            let player = if quiet {
                CuePlayer::silent()
            } else {
                CuePlayer::new(Arc::new(Bell))
            };
            let period = Duration::from_millis(interval_ms.max(1));

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async move {
                let mut driver = TimerDriver::new(timer, player)
                    .with_period(period)
                    .on_update(print_event);
                driver.start();
                driver.wait().await;
                if !quiet {
                    tokio::time::sleep(FINISH_TAIL).await;
                }
            });
        }
        TimerAction::Plan { preset } => {
            let timer = load_timer(preset.as_deref())?;
            print_plan(&timer);
        }
    }
    Ok(())
}

fn print_plan(timer: &IntervalTimer) {
    let features = timer.features();
    let config = timer.config();
    if features.prepare {
        println!("{:<16} {}", "prepare", format_clock(config.prepare_secs.into()));
    }
    for set in 1..=timer.total_sets() {
        let name = config
            .exercise_names
            .get(set as usize - 1)
            .filter(|_| features.menu)
            .map(String::as_str)
            .unwrap_or("");
        println!(
            "{:<16} {} {name}",
            format!("set {set} work"),
            format_clock(config.work_secs.into())
        );
        if set < timer.total_sets() && features.rest == RestMode::Timed {
            println!(
                "{:<16} {}",
                format!("set {set} rest"),
                format_clock(timer.phase_duration(Phase::Rest).into())
            );
        }
    }
    println!("{:<16} {}", "total", format_clock(timer.total_duration_secs()));
}
