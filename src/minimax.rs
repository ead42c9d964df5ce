//! Depth-bounded adversarial search: plain minimax and alpha-beta.
//!
//! Both searches share one value convention: a node's value is the
//! maximizer's accumulated points minus the minimizer's, measured at the
//! horizon (board full, no legal move, or depth exhausted). Points are
//! threaded down as two running totals; the board is explored in place with
//! a single-cell write and undo per node, never copied.
//!
//! Alpha-beta prunes but must return exactly the value minimax would.

use crate::board::{Board, Move, TabooMove};
use crate::executor::{CancelToken, ProposalSlot};
use crate::score::points_for;
use crate::state::GameState;
use crate::strategy::{SearchEnd, SearchStrategy};

/// Minimax value of the position at the given remaining depth.
///
/// `maximizing` is true when the mover whose score is `my_score` is to play.
///
/// The token is polled at every node; once it is raised the search unwinds
/// within one node and its return value carries no meaning. With the token
/// never raised the recursion is unaffected.
pub fn minimax(
    board: &mut Board,
    taboo: &[TabooMove],
    depth: u32,
    maximizing: bool,
    my_score: i32,
    their_score: i32,
    cancel: &CancelToken,
) -> i32 {
    if cancel.is_cancelled() || depth == 0 || board.is_full() {
        return my_score - their_score;
    }
    let moves = board.legal_moves(taboo);
    if moves.is_empty() {
        // Dead end: nobody can move, treat as terminal.
        return my_score - their_score;
    }

    if maximizing {
        let mut value = i32::MIN;
        for mv in moves {
            board.put(mv.row, mv.col, mv.value);
            let points = points_for(board.regions_completed(mv.row, mv.col));
            let v = minimax(
                board,
                taboo,
                depth - 1,
                false,
                my_score + points,
                their_score,
                cancel,
            );
            board.clear(mv.row, mv.col);
            value = value.max(v);
        }
        value
    } else {
        let mut value = i32::MAX;
        for mv in moves {
            board.put(mv.row, mv.col, mv.value);
            let points = points_for(board.regions_completed(mv.row, mv.col));
            let v = minimax(
                board,
                taboo,
                depth - 1,
                true,
                my_score,
                their_score + points,
                cancel,
            );
            board.clear(mv.row, mv.col);
            value = value.min(v);
        }
        value
    }
}

/// Alpha-beta pruned minimax. Identical value to [`minimax`] for any fixed
/// depth and board; pruning changes only the nodes visited.
///
/// Callers start with `alpha = i32::MIN, beta = i32::MAX`. The bounds
/// tighten on the way down; `alpha < beta` holds on every entry.
///
/// Polls the token at every node, same as [`minimax`].
#[allow(clippy::too_many_arguments)]
pub fn alpha_beta(
    board: &mut Board,
    taboo: &[TabooMove],
    depth: u32,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    my_score: i32,
    their_score: i32,
    cancel: &CancelToken,
) -> i32 {
    debug_assert!(alpha < beta);
    if cancel.is_cancelled() || depth == 0 || board.is_full() {
        return my_score - their_score;
    }
    let moves = board.legal_moves(taboo);
    if moves.is_empty() {
        return my_score - their_score;
    }

    if maximizing {
        let mut value = i32::MIN;
        for mv in moves {
            board.put(mv.row, mv.col, mv.value);
            let points = points_for(board.regions_completed(mv.row, mv.col));
            let v = alpha_beta(
                board,
                taboo,
                depth - 1,
                false,
                alpha,
                beta,
                my_score + points,
                their_score,
                cancel,
            );
            board.clear(mv.row, mv.col);
            value = value.max(v);
            if value >= beta {
                break;
            }
            alpha = alpha.max(value);
        }
        value
    } else {
        let mut value = i32::MAX;
        for mv in moves {
            board.put(mv.row, mv.col, mv.value);
            let points = points_for(board.regions_completed(mv.row, mv.col));
            let v = alpha_beta(
                board,
                taboo,
                depth - 1,
                true,
                alpha,
                beta,
                my_score,
                their_score + points,
                cancel,
            );
            board.clear(mv.row, mv.col);
            value = value.min(v);
            if value <= alpha {
                break;
            }
            beta = beta.min(value);
        }
        value
    }
}

/// Single fixed-depth minimax pass over the root moves.
///
/// Scores every root move once at the configured depth, proposing each
/// strict improvement, then exhausts. The deepening driver is the strategy
/// that keeps going.
pub struct FixedDepthMinimax {
    depth: u32,
    best: Option<Move>,
    best_value: i32,
}

impl FixedDepthMinimax {
    pub fn new(depth: u32) -> Self {
        Self {
            depth: depth.max(1),
            best: None,
            best_value: i32::MIN,
        }
    }
}

impl SearchStrategy for FixedDepthMinimax {
    fn name(&self) -> &'static str {
        "fixed-depth minimax"
    }

    fn run(&mut self, state: &GameState, slot: &ProposalSlot, cancel: &CancelToken) -> SearchEnd {
        let mut board = state.board.clone();
        let taboo = &state.taboo_moves;
        let moves = board.legal_moves(taboo);
        for mv in moves {
            board.put(mv.row, mv.col, mv.value);
            let points = points_for(board.regions_completed(mv.row, mv.col));
            let value = minimax(&mut board, taboo, self.depth - 1, false, points, 0, cancel);
            board.clear(mv.row, mv.col);
            if cancel.is_cancelled() {
                // An interrupted search returns early with a junk value.
                return SearchEnd::Cancelled;
            }
            if value > self.best_value {
                self.best_value = value;
                self.best = Some(mv);
                slot.propose(mv);
            }
        }
        if cancel.is_cancelled() {
            SearchEnd::Cancelled
        } else {
            SearchEnd::Exhausted
        }
    }

    fn best_move_so_far(&self) -> Option<Move> {
        self.best
    }
}
