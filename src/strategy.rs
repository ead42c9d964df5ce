//! The common interface all search strategies implement.

use crate::board::Move;
use crate::executor::{CancelToken, ProposalSlot};
use crate::state::GameState;

/// How a strategy run ended.
///
/// Only the fixed-depth search finishes on its own; the deepening and UCT
/// strategies loop until they observe the cancel token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEnd {
    /// The strategy ran out of work at its fixed bound.
    Exhausted,
    /// The strategy observed the executor's cancellation.
    Cancelled,
}

/// One interchangeable move-search algorithm.
///
/// [`run`](SearchStrategy::run) is driven by the executor on a worker
/// thread. The strategy reads `state`, publishes every improvement through
/// `slot`, and polls `cancel` at its loop boundaries. It must never mutate
/// anything outside its own clones.
pub trait SearchStrategy: Send {
    /// Short name for log lines.
    fn name(&self) -> &'static str;

    /// Search until done or cancelled, proposing along the way.
    fn run(&mut self, state: &GameState, slot: &ProposalSlot, cancel: &CancelToken) -> SearchEnd;

    /// The best move this strategy has found so far, if any.
    fn best_move_so_far(&self) -> Option<Move>;
}
