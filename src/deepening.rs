//! Iterative-deepening driver wrapping the depth-bounded searches.
//!
//! Runs the wrapped search at depth 1, 2, 3, ... without bound, re-scoring
//! the full root move set at every depth. The argmax of a completed depth
//! replaces the standing best only when its value strictly improves, or
//! when it ties and came from a strictly deeper search; every replacement
//! is proposed. Depth 1 doubles as the initial greedy proposal, so a move
//! is on offer almost immediately.
//!
//! A sacrifice candidate (a move expected to come back taboo, forfeiting
//! the turn) competes with the real moves under the same replace rule; on a
//! value tie against a real move it is preferred only when the number of
//! empty cells is odd, which leaves the opponent holding the eventual
//! forced bad move. The parity preference is a policy, not a rule of the
//! game, and can be switched off.

use log::debug;

use crate::board::{Board, Move, TabooMove};
use crate::executor::{CancelToken, ProposalSlot};
use crate::minimax::{alpha_beta, minimax};
use crate::score::points_for;
use crate::state::GameState;
use crate::strategy::{SearchEnd, SearchStrategy};

/// One published proposal: the move, its value, and the depth that scored it.
#[derive(Debug, Clone, Copy)]
pub struct Proposal {
    pub mv: Move,
    pub value: i32,
    pub depth: u32,
}

/// One root candidate scored at the current depth.
#[derive(Clone, Copy)]
struct Scored {
    mv: Move,
    value: i32,
    sacrifice: bool,
}

pub struct IterativeDeepening {
    prune: bool,
    sacrifice_policy: bool,
    best: Option<Proposal>,
    history: Vec<Proposal>,
}

impl Default for IterativeDeepening {
    fn default() -> Self {
        Self::new()
    }
}

impl IterativeDeepening {
    /// Alpha-beta backed deepening with the sacrifice policy enabled.
    pub fn new() -> Self {
        Self {
            prune: true,
            sacrifice_policy: true,
            best: None,
            history: Vec::new(),
        }
    }

    /// Use plain minimax below the root instead of alpha-beta.
    pub fn without_pruning() -> Self {
        Self {
            prune: false,
            ..Self::new()
        }
    }

    /// Enable or disable the sacrifice candidate.
    pub fn with_sacrifice_policy(mut self, enabled: bool) -> Self {
        self.sacrifice_policy = enabled;
        self
    }

    /// Every proposal this strategy has published, in publish order.
    pub fn proposals(&self) -> &[Proposal] {
        &self.history
    }

    /// Value of the position for the opponent's reply, `depth` plies deep,
    /// with `my_points` already banked by the root move. Junk once `cancel`
    /// is raised.
    fn reply_value(
        &self,
        board: &mut Board,
        taboo: &[TabooMove],
        depth: u32,
        my_points: i32,
        cancel: &CancelToken,
    ) -> i32 {
        if self.prune {
            alpha_beta(
                board,
                taboo,
                depth,
                false,
                i32::MIN,
                i32::MAX,
                my_points,
                0,
                cancel,
            )
        } else {
            minimax(board, taboo, depth, false, my_points, 0, cancel)
        }
    }

    /// Keep the better of two candidates scored at the same depth. Ties go
    /// to the sacrifice exactly when `prefer_sacrifice` holds, otherwise to
    /// the real move; between two real moves the incumbent stays.
    fn pick(incumbent: Option<Scored>, challenger: Scored, prefer_sacrifice: bool) -> Option<Scored> {
        let Some(held) = incumbent else {
            return Some(challenger);
        };
        let replace = challenger.value > held.value
            || (challenger.value == held.value
                && challenger.sacrifice != held.sacrifice
                && (challenger.sacrifice == prefer_sacrifice));
        Some(if replace { challenger } else { held })
    }
}

impl SearchStrategy for IterativeDeepening {
    fn name(&self) -> &'static str {
        "iterative deepening"
    }

    fn run(&mut self, state: &GameState, slot: &ProposalSlot, cancel: &CancelToken) -> SearchEnd {
        let mut board = state.board.clone();
        let taboo = &state.taboo_moves;
        let moves = board.legal_moves(taboo);
        let sacrifice = if self.sacrifice_policy {
            board.find_sacrifice_move(taboo)
        } else {
            None
        };
        if moves.is_empty() && sacrifice.is_none() {
            debug!("nothing to search, board is closed");
            return SearchEnd::Exhausted;
        }
        let prefer_sacrifice = board.empty_count() % 2 == 1;

        let mut depth = 1u32;
        loop {
            let mut round: Option<Scored> = None;
            for &mv in &moves {
                board.put(mv.row, mv.col, mv.value);
                let points = points_for(board.regions_completed(mv.row, mv.col));
                let value = self.reply_value(&mut board, taboo, depth - 1, points, cancel);
                board.clear(mv.row, mv.col);
                if cancel.is_cancelled() {
                    // An interrupted search returns early with a junk value.
                    return SearchEnd::Cancelled;
                }
                round = Self::pick(
                    round,
                    Scored {
                        mv,
                        value,
                        sacrifice: false,
                    },
                    prefer_sacrifice,
                );
            }
            if let Some(mv) = sacrifice {
                // The turn passes: same board, opponent to move, no points.
                let value = self.reply_value(&mut board, taboo, depth - 1, 0, cancel);
                if cancel.is_cancelled() {
                    return SearchEnd::Cancelled;
                }
                round = Self::pick(
                    round,
                    Scored {
                        mv,
                        value,
                        sacrifice: true,
                    },
                    prefer_sacrifice,
                );
            }

            if let Some(scored) = round {
                let replace = match self.best {
                    None => true,
                    Some(held) => {
                        scored.value > held.value
                            || (scored.value == held.value && depth > held.depth)
                    }
                };
                if replace {
                    let proposal = Proposal {
                        mv: scored.mv,
                        value: scored.value,
                        depth,
                    };
                    self.best = Some(proposal);
                    self.history.push(proposal);
                    debug!(
                        "depth {depth}: proposing {} (value {})",
                        scored.mv, scored.value
                    );
                    slot.propose(scored.mv);
                }
            }
            depth += 1;
        }
    }

    fn best_move_so_far(&self) -> Option<Move> {
        self.best.map(|b| b.mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_prefers_strictly_better_value() {
        let a = Scored {
            mv: Move::new(0, 0, 1),
            value: 3,
            sacrifice: false,
        };
        let b = Scored {
            mv: Move::new(1, 1, 2),
            value: 5,
            sacrifice: false,
        };
        let held = IterativeDeepening::pick(Some(a), b, false).unwrap();
        assert_eq!(held.mv, b.mv);
        // A worse challenger never displaces the incumbent.
        let held = IterativeDeepening::pick(Some(b), a, false);
        assert_eq!(held.unwrap().mv, b.mv);
        // Neither does an equal-valued real move.
        let c = Scored {
            mv: Move::new(2, 2, 3),
            value: 5,
            sacrifice: false,
        };
        let held = IterativeDeepening::pick(Some(b), c, true);
        assert_eq!(held.unwrap().mv, b.mv);
    }

    #[test]
    fn sacrifice_tie_follows_parity() {
        let real = Scored {
            mv: Move::new(0, 0, 1),
            value: 2,
            sacrifice: false,
        };
        let pass = Scored {
            mv: Move::new(1, 1, 2),
            value: 2,
            sacrifice: true,
        };
        // Odd empty count: the sacrifice wins the tie.
        let held = IterativeDeepening::pick(Some(real), pass, true).unwrap();
        assert!(held.sacrifice);
        // Even empty count: the real move wins it.
        let held = IterativeDeepening::pick(Some(pass), real, false).unwrap();
        assert!(!held.sacrifice);
    }
}
