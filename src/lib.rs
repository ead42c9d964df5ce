//! Sudoku-Duel: an anytime search engine for competitive Sudoku.
//!
//! Two players alternately fill empty cells; completing a row, column, or
//! block earns 0/1/3/7 points for 0..=3 regions completed by one move, and
//! some moves are retroactively ruled out ("taboo") by an external oracle.
//! Each turn, the engine keeps improving its proposed move for as long as
//! the wall-clock budget allows, then hands off whatever it found last.
//!
//! ## Modules
//!
//! - [`board`] - Grid state, moves, legal-move enumeration
//! - [`score`] - The points table and the speculative move heuristic
//! - [`state`] - The per-turn game state handed to a search
//! - [`strategy`] - The interface all search strategies implement
//! - [`minimax`] - Plain and alpha-beta depth-bounded search
//! - [`deepening`] - Iterative-deepening driver
//! - [`mcts`] - Monte Carlo Tree Search with UCT
//! - [`executor`] - Deadline-bounded execution and the proposal slot
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use sudoku_duel::board::Board;
//! use sudoku_duel::deepening::IterativeDeepening;
//! use sudoku_duel::executor::AnytimeExecutor;
//! use sudoku_duel::state::GameState;
//!
//! let board = Board::new(2, 2).unwrap();
//! let state = GameState::new(board);
//!
//! // Search for 50 ms, then collect the best move found.
//! let executor = AnytimeExecutor::new(Duration::from_millis(50));
//! let best = executor.run(Box::new(IterativeDeepening::new()), state);
//! assert!(best.is_some());
//! ```

pub mod board;
pub mod deepening;
pub mod executor;
pub mod mcts;
pub mod minimax;
pub mod score;
pub mod state;
pub mod strategy;
