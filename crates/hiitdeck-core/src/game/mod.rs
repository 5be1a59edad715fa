mod ai;
mod board;
mod driver;
mod session;

pub use ai::{choose_move, rng_from_seed, RandomSource, ScriptedRandom};
pub use board::{
    completes_triple, winner, Board, Cell, GameStatus, Mark, BOARD_SIZE, CENTER, CORNERS, EDGES,
    TRIPLES,
};
pub use driver::{GameDriver, AI_DELAY};
pub use session::{AiTicket, GameMode, GameSession};
