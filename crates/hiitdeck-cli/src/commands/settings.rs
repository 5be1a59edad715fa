use clap::{Args, Subcommand};
use hiitdeck_core::{AppConfig, Database, Settings, TimerConfig};

use super::CmdResult;

/// Overrides for individual timer settings. Unset fields keep their value.
#[derive(Args, Debug, Default)]
pub struct TimerArgs {
    /// Work phase length in seconds
    #[arg(long)]
    pub work: Option<u32>,
    /// Rest phase length in seconds
    #[arg(long)]
    pub rest: Option<u32>,
    /// Prepare phase length in seconds
    #[arg(long)]
    pub prepare: Option<u32>,
    /// Number of sets
    #[arg(long)]
    pub sets: Option<u32>,
    /// Exercise name, repeat once per set (menu mode)
    #[arg(long = "exercise")]
    pub exercises: Vec<String>,
    /// Cue volume between 0.0 and 1.0
    #[arg(long)]
    pub volume: Option<f32>,
    /// Turn audio cues on or off
    #[arg(long)]
    pub audio: Option<bool>,
}

impl TimerArgs {
    pub fn merge(self, mut base: TimerConfig) -> TimerConfig {
        if let Some(v) = self.work {
            base.work_secs = v;
        }
        if let Some(v) = self.rest {
            base.rest_secs = v;
        }
        if let Some(v) = self.prepare {
            base.prepare_secs = v;
        }
        if let Some(v) = self.sets {
            base.total_sets = v;
        }
        if !self.exercises.is_empty() {
            base.exercise_names = self.exercises;
        }
        if let Some(v) = self.volume {
            base.volume = v;
        }
        if let Some(v) = self.audio {
            base.audio_enabled = v;
        }
        base
    }
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the stored timer settings as JSON
    Show,
    /// Validate and store new timer settings
    Apply {
        #[command(flatten)]
        args: TimerArgs,
    },
}

pub fn run(action: SettingsAction) -> CmdResult {
    let db = Database::open()?;
    let settings = Settings::new(&db);

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings.timer_config())?);
        }
        SettingsAction::Apply { args } => {
            let features = AppConfig::load_or_default().timer;
            let mut timer = settings.load_timer(features);
            let config = args.merge(timer.config().clone());
            let event = settings.apply(&mut timer, config)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let args = TimerArgs {
            work: Some(45),
            exercises: vec!["Plank".into()],
            ..TimerArgs::default()
        };
        let merged = args.merge(TimerConfig::default());
        assert_eq!(merged.work_secs, 45);
        assert_eq!(merged.rest_secs, TimerConfig::default().rest_secs);
        assert_eq!(merged.exercise_names, vec!["Plank".to_string()]);
    }
}
