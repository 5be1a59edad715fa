use std::io::BufRead;

use clap::{Subcommand, ValueEnum};
use hiitdeck_core::game::{rng_from_seed, RandomSource};
use hiitdeck_core::{
    choose_move, AppConfig, Board, Event, GameDriver, GameError, GameMode, GameStatus, Mark,
};

use super::CmdResult;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MarkArg {
    X,
    O,
}

impl From<MarkArg> for Mark {
    fn from(m: MarkArg) -> Self {
        match m {
            MarkArg::X => Mark::X,
            MarkArg::O => Mark::O,
        }
    }
}

#[derive(Subcommand)]
pub enum GameAction {
    /// Play in the terminal. Enter a cell 0-8, "r" to restart, "q" to quit
    Play {
        /// Play against the AI (overrides game.mode)
        #[arg(long)]
        ai: bool,
        /// Seed for the AI's random choices
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the AI's move for a board as JSON
    Suggest {
        /// Nine cells of X, O and '.', row by row
        #[arg(long)]
        board: String,
        /// Mark the AI plays
        #[arg(long, value_enum)]
        mark: MarkArg,
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: GameAction) -> CmdResult {
    match action {
        GameAction::Play { ai, seed } => play(ai, seed),
        GameAction::Suggest { board, mark, seed } => {
            let board: Board = board.parse()?;
            if board.is_over() {
                return Err(GameError::GameOver.into());
            }
            let index = choose_move(&board, mark.into(), &mut rng_from_seed(seed))?;
            println!("{}", serde_json::json!({ "index": index }));
            Ok(())
        }
    }
}

fn status_line(board: &Board) -> String {
    match board.status() {
        GameStatus::InProgress => format!("{} to move", board.turn()),
        GameStatus::Won(mark) => format!("{mark} wins"),
        GameStatus::Draw => "draw".to_string(),
    }
}

fn show<R: RandomSource + Send + 'static>(driver: &GameDriver<R>) {
    driver.with_session(|s| {
        println!("\n{}{}", s.board(), status_line(s.board()));
    });
}

fn play(ai: bool, seed: Option<u64>) -> CmdResult {
    let config = AppConfig::load_or_default().game;
    let mode = if ai { GameMode::VsAi } else { config.mode };
    let rng = rng_from_seed(seed.or(config.ai_seed));

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();
    let mut driver = GameDriver::new(mode, rng)
        .with_delay(config.ai_delay())
        .on_update(|event| {
            if let Event::MarkPlaced {
                index, by_ai: true, ..
            } = event
            {
                println!("AI plays {index}");
            }
        });

    show(&driver);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "q" | "quit" => break,
            "r" | "reset" => driver.reset(),
            input => match input.parse::<usize>() {
                Ok(index) => {
                    driver.click(index);
                    rt.block_on(driver.settle());
                }
                Err(_) => {
                    eprintln!("enter a cell 0-8, r or q");
                    continue;
                }
            },
        }
        show(&driver);
    }
    Ok(())
}
