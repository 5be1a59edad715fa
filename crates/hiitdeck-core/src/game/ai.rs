//! Heuristic tic-tac-toe opponent.
//!
//! Not a search: the first rule that yields a cell wins.
//!
//! 1. complete a triple for the AI
//! 2. block a triple for the opponent
//! 3. center
//! 4. a random empty corner
//! 5. a random empty edge
//! 6. any random empty cell

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

use super::board::{completes_triple, Board, Mark, CENTER, CORNERS, EDGES};
use crate::error::GameError;

/// Source of tie-break choices.
pub trait RandomSource {
    /// An index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl RandomSource for Mcg128Xsl64 {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Seeded PCG generator, or one seeded from entropy when `seed` is `None`.
pub fn rng_from_seed(seed: Option<u64>) -> Mcg128Xsl64 {
    match seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}

/// Replays a fixed list of picks, wrapping around. Handy for tests.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    picks: Vec<usize>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let value = self.picks[self.next % self.picks.len()];
        self.next += 1;
        value % len
    }
}

/// Pick the AI's next cell on `board`.
pub fn choose_move(
    board: &Board,
    ai: Mark,
    rng: &mut impl RandomSource,
) -> Result<usize, GameError> {
    let cells = board.cells();
    let empty: Vec<usize> = board.empty_cells().collect();
    if empty.is_empty() {
        return Err(GameError::NoLegalMove);
    }

    if let Some(&win) = empty.iter().find(|&&i| completes_triple(cells, i, ai)) {
        return Ok(win);
    }
    if let Some(&block) = empty
        .iter()
        .find(|&&i| completes_triple(cells, i, ai.opponent()))
    {
        return Ok(block);
    }
    if cells[CENTER].is_none() {
        return Ok(CENTER);
    }

    let corners: Vec<usize> = CORNERS.into_iter().filter(|&i| cells[i].is_none()).collect();
    if !corners.is_empty() {
        return Ok(corners[rng.pick(corners.len())]);
    }
    let edges: Vec<usize> = EDGES.into_iter().filter(|&i| cells[i].is_none()).collect();
    if !edges.is_empty() {
        return Ok(edges[rng.pick(edges.len())]);
    }
    Ok(empty[rng.pick(empty.len())])
}
