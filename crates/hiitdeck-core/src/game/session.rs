//! A tic-tac-toe game as the player sees it: board, mode and the AI's
//! pending reply.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ai::{choose_move, RandomSource};
use super::board::{Board, GameStatus, Mark};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    TwoPlayer,
    /// The human plays X; the AI answers as O.
    VsAi,
}

impl GameMode {
    pub const AI_MARK: Mark = Mark::O;
}

/// Identifies one pending AI reply. Stale tickets are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct GameSession {
    board: Board,
    mode: GameMode,
    /// Source of ticket ids; bumped per ticket and on reset.
    epoch: u64,
    pending: Option<AiTicket>,
}

impl GameSession {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn ai_thinking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn snapshot(&self) -> Event {
        Event::GameSnapshot {
            cells: *self.board.cells(),
            turn: self.board.turn(),
            status: self.board.status(),
            ai_thinking: self.ai_thinking(),
            at: Utc::now(),
        }
    }

    /// A human click on `index`.
    ///
    /// Rejected moves (occupied cell, finished game, bad index, AI still
    /// thinking) are ignored and produce no events. When the AI should answer,
    /// the returned ticket must be passed to [`Self::resolve_ai`].
    pub fn click(&mut self, index: usize) -> (Vec<Event>, Option<AiTicket>) {
        if self.pending.is_some() {
            tracing::debug!(index, "click ignored while the AI is thinking");
            return (Vec::new(), None);
        }
        if self.mode == GameMode::VsAi && self.board.turn() == GameMode::AI_MARK {
            tracing::debug!(index, "click ignored on the AI's turn");
            return (Vec::new(), None);
        }
        let events = self.place(index, false);
        if events.is_empty() {
            return (events, None);
        }

        let ticket = if self.mode == GameMode::VsAi
            && !self.board.is_over()
            && self.board.turn() == GameMode::AI_MARK
        {
            self.epoch += 1;
            let ticket = AiTicket(self.epoch);
            self.pending = Some(ticket);
            Some(ticket)
        } else {
            None
        };
        (events, ticket)
    }

    /// Play the AI's reply for `ticket` if it is still current.
    pub fn resolve_ai(&mut self, ticket: AiTicket, rng: &mut impl RandomSource) -> Vec<Event> {
        if self.pending != Some(ticket) {
            tracing::debug!(?ticket, "stale AI move dropped");
            return Vec::new();
        }
        self.pending = None;
        if self.board.is_over() {
            return Vec::new();
        }
        match choose_move(&self.board, GameMode::AI_MARK, rng) {
            Ok(index) => self.place(index, true),
            Err(e) => {
                tracing::error!("AI could not move: {e}");
                Vec::new()
            }
        }
    }

    pub fn reset(&mut self) -> Event {
        self.epoch += 1;
        self.pending = None;
        self.board.reset();
        Event::GameReset { at: Utc::now() }
    }

    /// Switch mode; restarts the game only when the mode changes.
    pub fn set_mode(&mut self, mode: GameMode) -> Option<Event> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        Some(self.reset())
    }

    fn place(&mut self, index: usize, by_ai: bool) -> Vec<Event> {
        let mark = self.board.turn();
        match self.board.place_mark(index) {
            Ok(status) => {
                let mut events = vec![Event::MarkPlaced {
                    index,
                    mark,
                    by_ai,
                    at: Utc::now(),
                }];
                if status != GameStatus::InProgress {
                    events.push(Event::GameEnded {
                        status,
                        at: Utc::now(),
                    });
                }
                events
            }
            Err(e) => {
                tracing::debug!(index, "move ignored: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ai::ScriptedRandom;

    #[test]
    fn two_player_alternates_without_ai() {
        let mut game = GameSession::new(GameMode::TwoPlayer);
        let (events, ticket) = game.click(0);
        assert_eq!(events.len(), 1);
        assert!(ticket.is_none());
        assert_eq!(game.board().turn(), Mark::O);
        game.click(4);
        assert_eq!(game.board().turn(), Mark::X);
    }

    #[test]
    fn ignored_moves_are_silent() {
        let mut game = GameSession::new(GameMode::TwoPlayer);
        game.click(0);
        let (events, _) = game.click(0);
        assert!(events.is_empty());
        let (events, _) = game.click(42);
        assert!(events.is_empty());
        assert_eq!(game.board().turn(), Mark::O);
    }

    #[test]
    fn ai_replies_with_ticket() {
        let mut game = GameSession::new(GameMode::VsAi);
        let (_, ticket) = game.click(0);
        let ticket = ticket.expect("AI should be asked to move");
        assert!(game.ai_thinking());

        // human clicks while the AI thinks are dropped
        let (events, _) = game.click(1);
        assert!(events.is_empty());

        let events = game.resolve_ai(ticket, &mut ScriptedRandom::new(vec![0]));
        assert!(matches!(
            events[0],
            Event::MarkPlaced {
                index: 4,
                mark: Mark::O,
                by_ai: true,
                ..
            }
        ));
        assert!(!game.ai_thinking());
        assert_eq!(game.board().turn(), Mark::X);
    }

    #[test]
    fn reset_drops_pending_ai_move() {
        let mut game = GameSession::new(GameMode::VsAi);
        let (_, ticket) = game.click(0);
        game.reset();
        let events = game.resolve_ai(ticket.unwrap(), &mut ScriptedRandom::new(vec![0]));
        assert!(events.is_empty());
        assert_eq!(*game.board(), Board::new());
    }

    #[test]
    fn mode_switch_drops_pending_ai_move() {
        let mut game = GameSession::new(GameMode::VsAi);
        let (_, ticket) = game.click(0);
        assert!(game.set_mode(GameMode::TwoPlayer).is_some());
        assert!(game.set_mode(GameMode::TwoPlayer).is_none());
        assert!(game
            .resolve_ai(ticket.unwrap(), &mut ScriptedRandom::new(vec![0]))
            .is_empty());
    }

    #[test]
    fn winning_human_move_gets_no_ai_reply() {
        let mut game = GameSession::new(GameMode::VsAi);
        let mut rng = ScriptedRandom::new(vec![0]);
        let (_, t) = game.click(0);
        game.resolve_ai(t.unwrap(), &mut rng);
        assert_eq!(game.board().cell(4), Some(Some(Mark::O)));
        let (_, t) = game.click(8);
        game.resolve_ai(t.unwrap(), &mut rng);
        assert_eq!(game.board().cell(2), Some(Some(Mark::O)));
        // X takes 6, threatening both 3 and 7; O can only block one.
        let (_, t) = game.click(6);
        game.resolve_ai(t.unwrap(), &mut rng);
        assert_eq!(game.board().cell(3), Some(Some(Mark::O)));
        // X wins on the bottom row.
        let (events, t) = game.click(7);
        assert!(t.is_none());
        assert!(matches!(
            events.last(),
            Some(Event::GameEnded {
                status: GameStatus::Won(Mark::X),
                ..
            })
        ));
    }
}
