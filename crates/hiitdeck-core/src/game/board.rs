use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const BOARD_SIZE: usize = 9;
pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];
pub const EDGES: [usize; 4] = [1, 3, 5, 7];

/// The eight lines that win the game.
pub const TRIPLES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

/// `None` is an empty cell.
pub type Cell = Option<Mark>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won(Mark),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
    turn: Mark,
    status: GameStatus,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            turn: Mark::X,
            status: GameStatus::InProgress,
        }
    }
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }

    /// Put the current player's mark on `index`, then evaluate the board.
    pub fn place_mark(&mut self, index: usize) -> Result<GameStatus, GameError> {
        if index >= BOARD_SIZE {
            return Err(GameError::OutOfBounds(index));
        }
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.cells[index].is_some() {
            return Err(GameError::CellOccupied(index));
        }
        self.cells[index] = Some(self.turn);
        Ok(self.evaluate())
    }

    /// Settle the status after a placement: a completed triple wins, a full
    /// board draws, otherwise the turn passes.
    pub fn evaluate(&mut self) -> GameStatus {
        if let Some(winner) = winner(&self.cells) {
            self.status = GameStatus::Won(winner);
        } else if self.cells.iter().all(Option::is_some) {
            self.status = GameStatus::Draw;
        } else {
            self.turn = self.turn.opponent();
            self.status = GameStatus::InProgress;
        }
        self.status
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The mark holding a complete triple, if any.
pub fn winner(cells: &[Cell; BOARD_SIZE]) -> Option<Mark> {
    TRIPLES.iter().find_map(|&[a, b, c]| match cells[a] {
        Some(m) if cells[b] == Some(m) && cells[c] == Some(m) => Some(m),
        _ => None,
    })
}

/// Whether putting `mark` on the empty cell `index` completes a triple.
pub fn completes_triple(cells: &[Cell; BOARD_SIZE], index: usize, mark: Mark) -> bool {
    TRIPLES
        .iter()
        .filter(|t| t.contains(&index))
        .any(|t| t.iter().all(|&i| i == index || cells[i] == Some(mark)))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let line: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(col, c)| match c {
                    Some(m) => format!(" {m} "),
                    None => format!(" {} ", row * 3 + col),
                })
                .collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Board {
    type Err = GameError;

    /// Parse nine characters of `X`, `O` and `.`/`-`/`_` (empty). The turn
    /// is derived from the mark counts and the status is evaluated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != BOARD_SIZE {
            return Err(GameError::InvalidBoard("expected nine cells"));
        }
        let mut cells = [None; BOARD_SIZE];
        for (i, ch) in chars.iter().enumerate() {
            cells[i] = match ch.to_ascii_uppercase() {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                '.' | '-' | '_' => None,
                _ => return Err(GameError::InvalidBoard("cells must be X, O or .")),
            };
        }
        let xs = cells.iter().filter(|c| **c == Some(Mark::X)).count();
        let os = cells.iter().filter(|c| **c == Some(Mark::O)).count();
        if xs < os || xs - os > 1 {
            return Err(GameError::InvalidBoard("X must lead O by zero or one mark"));
        }
        let has_triple = |mark: Mark| {
            TRIPLES
                .iter()
                .any(|t| t.iter().all(|&i| cells[i] == Some(mark)))
        };
        match (has_triple(Mark::X), has_triple(Mark::O)) {
            (true, true) => return Err(GameError::InvalidBoard("both marks hold a triple")),
            (true, false) if xs != os + 1 => {
                return Err(GameError::InvalidBoard("X won but O moved afterwards"))
            }
            (false, true) if xs != os => {
                return Err(GameError::InvalidBoard("O won but X moved afterwards"))
            }
            _ => {}
        }
        let turn = if xs == os { Mark::X } else { Mark::O };
        let status = match winner(&cells) {
            Some(m) => GameStatus::Won(m),
            None if xs + os == BOARD_SIZE => GameStatus::Draw,
            None => GameStatus::InProgress,
        };
        Ok(Self {
            cells,
            turn,
            status,
        })
    }
}
