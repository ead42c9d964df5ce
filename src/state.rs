//! Game state handed to a turn's search: board, history, taboo set, scores.
//!
//! The state is data-only. The match driver owns it and mutates it between
//! turns; the search gets a read-only view and clones whatever it explores.

use crate::board::{Board, BoardError, Move, TabooMove};

#[derive(Clone)]
pub struct GameState {
    /// Current board
    pub board: Board,
    /// Moves played so far, in order
    pub moves: Vec<Move>,
    /// Moves the oracle ruled out, in order of discovery
    pub taboo_moves: Vec<TabooMove>,
    /// Cumulative points per player, index 0 for the player who moved first
    pub scores: [i32; 2],
}

impl GameState {
    /// Fresh game on the given board.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            moves: Vec::new(),
            taboo_moves: Vec::new(),
            scores: [0, 0],
        }
    }

    /// Build a state from the driver's external representation: block
    /// dimensions, row-major cells, move history, taboo list, score pair.
    pub fn from_parts(
        m: usize,
        n: usize,
        cells: Vec<u8>,
        moves: Vec<Move>,
        taboo_moves: Vec<TabooMove>,
        scores: [i32; 2],
    ) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::from_cells(m, n, cells)?,
            moves,
            taboo_moves,
            scores,
        })
    }

    /// Index (0 or 1) of the player to move, from history parity.
    pub fn current_player(&self) -> usize {
        self.moves.len() % 2
    }

    /// Mover's score minus the opponent's.
    pub fn score_diff(&self) -> i32 {
        let me = self.current_player();
        self.scores[me] - self.scores[1 - me]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_and_diff_follow_history() {
        let mut state = GameState::new(Board::new(2, 2).unwrap());
        state.scores = [3, 1];
        assert_eq!(state.current_player(), 0);
        assert_eq!(state.score_diff(), 2);

        state.moves.push(Move::new(0, 0, 1));
        assert_eq!(state.current_player(), 1);
        assert_eq!(state.score_diff(), -2);
    }
}
