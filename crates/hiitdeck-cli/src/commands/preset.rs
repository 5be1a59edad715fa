use clap::Subcommand;
use hiitdeck_core::timer::format_clock;
use hiitdeck_core::{AppConfig, Database, Preset, Settings};

use super::settings::TimerArgs;
use super::CmdResult;

#[derive(Subcommand)]
pub enum PresetAction {
    /// List built-in and custom presets
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one preset as JSON
    Show { key: String },
    /// Save a custom preset, starting from the stored settings
    Save {
        key: String,
        /// Display name (defaults to the key)
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        args: TimerArgs,
    },
    /// Delete a custom preset
    Delete { key: String },
    /// Apply a preset to the stored timer settings
    Use { key: String },
}

pub fn run(action: PresetAction) -> CmdResult {
    let db = Database::open()?;
    let settings = Settings::new(&db);
    let features = AppConfig::load_or_default().timer;
    let mut book = settings.presets();

    match action {
        PresetAction::List { json } => {
            let all = book.list();
            if json {
                let rows: Vec<serde_json::Value> = all
                    .iter()
                    .map(|(key, preset, builtin)| {
                        serde_json::json!({
                            "key": key,
                            "builtin": builtin,
                            "preset": preset,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (key, preset, builtin) in all {
                    let cfg = &preset.config;
                    println!(
                        "{key:<12} {:<16} {}s/{}s x{} ({}){}",
                        preset.name,
                        cfg.work_secs,
                        cfg.rest_secs,
                        cfg.total_sets,
                        format_clock(cfg.total_duration_secs(&features)),
                        if builtin { "" } else { " *" },
                    );
                }
            }
        }
        PresetAction::Show { key } => {
            let preset = book.get(&key).ok_or_else(|| format!("unknown preset: {key}"))?;
            println!("{}", serde_json::to_string_pretty(&preset)?);
        }
        PresetAction::Save { key, name, args } => {
            let preset = Preset {
                name: name.unwrap_or_else(|| key.clone()),
                config: args.merge(settings.timer_config()),
            };
            book.save(&key, preset, &features)?;
            settings.save_presets(&book)?;
            println!("preset saved: {key}");
        }
        PresetAction::Delete { key } => {
            if !book.delete(&key) {
                return Err(format!("no custom preset named {key}").into());
            }
            settings.save_presets(&book)?;
            println!("preset deleted: {key}");
        }
        PresetAction::Use { key } => {
            let preset = book.get(&key).ok_or_else(|| format!("unknown preset: {key}"))?;
            let mut timer = settings.load_timer(features);
            let event = settings.apply(&mut timer, preset.config)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
