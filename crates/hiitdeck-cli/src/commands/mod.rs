pub mod config;
pub mod game;
pub mod preset;
pub mod settings;
pub mod timer;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;
