//! Integration tests for sudoku-duel.
//!
//! These exercise the engine end to end: the scoring scenarios on 4x4
//! boards, the anytime executor's hand-off guarantees, and each search
//! strategy producing a sensible move under a real deadline.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sudoku_duel::board::{Board, Move, TabooMove};
use sudoku_duel::deepening::IterativeDeepening;
use sudoku_duel::executor::{AnytimeExecutor, CancelToken, ProposalSlot};
use sudoku_duel::mcts::MctsStrategy;
use sudoku_duel::minimax::{FixedDepthMinimax, alpha_beta, minimax};
use sudoku_duel::score::points_for;
use sudoku_duel::state::GameState;
use sudoku_duel::strategy::{SearchEnd, SearchStrategy};

// =============================================================================
// Helpers
// =============================================================================

/// Fully solved 4x4 board (2x2 blocks).
fn solved_board() -> Board {
    Board::from_cells(
        2,
        2,
        vec![
            1, 2, 3, 4, //
            3, 4, 1, 2, //
            2, 1, 4, 3, //
            4, 3, 2, 1,
        ],
    )
    .unwrap()
}

/// The solved board with the given cells emptied.
fn board_without(cells: &[(usize, usize)]) -> Board {
    let mut board = solved_board();
    for &(r, c) in cells {
        board.clear(r, c);
    }
    board
}

fn state_on(board: Board) -> GameState {
    GameState::new(board)
}

// =============================================================================
// Scoring scenarios
// =============================================================================

#[test]
fn full_completion_move_scores_seven() {
    // One empty cell whose row, column, and block are otherwise complete.
    let mut board = board_without(&[(3, 3)]);
    let moves = board.legal_moves(&[]);
    assert_eq!(moves, vec![Move::new(3, 3, 1)]);

    board.put(3, 3, 1);
    let completed = board.regions_completed(3, 3);
    assert_eq!(completed, 3);
    assert_eq!(points_for(completed), 7);
}

#[test]
fn single_region_move_scores_one() {
    // Filling (0,3) closes row 0 only: its column and block each keep
    // another empty cell.
    let mut board = Board::from_cells(
        2,
        2,
        vec![
            1, 2, 3, 0, //
            3, 4, 0, 2, //
            2, 1, 4, 0, //
            4, 3, 2, 1,
        ],
    )
    .unwrap();
    board.put(0, 3, 4);
    let completed = board.regions_completed(0, 3);
    assert_eq!(completed, 1);
    assert_eq!(points_for(completed), 1);
}

// =============================================================================
// Search equivalence and legality
// =============================================================================

#[test]
fn alpha_beta_matches_minimax_with_taboo_moves() {
    let cells: &[(usize, usize)] = &[(0, 0), (1, 1), (2, 2), (3, 3)];
    let taboo = vec![TabooMove(Move::new(0, 0, 1))];
    let cancel = CancelToken::new();
    for depth in 1..=4 {
        for maximizing in [true, false] {
            let mut a = board_without(cells);
            let mut b = board_without(cells);
            assert_eq!(
                minimax(&mut a, &taboo, depth, maximizing, 0, 0, &cancel),
                alpha_beta(
                    &mut b,
                    &taboo,
                    depth,
                    maximizing,
                    i32::MIN,
                    i32::MAX,
                    0,
                    0,
                    &cancel
                ),
                "depth={depth} maximizing={maximizing}"
            );
        }
    }
}

#[test]
fn legal_moves_never_target_filled_cells() {
    let board = board_without(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let taboo = vec![TabooMove(Move::new(0, 1, 2))];
    let legal = board.legal_moves(&taboo);
    assert!(!legal.is_empty());
    for mv in &legal {
        assert_eq!(board.get(mv.row, mv.col), 0);
        assert_ne!((mv.row, mv.col, mv.value), (0, 1, 2));
    }
    for row in 0..board.size() {
        for col in 0..board.size() {
            if board.get(row, col) != 0 {
                assert!(legal.iter().all(|m| (m.row, m.col) != (row, col)));
            }
        }
    }
}

// =============================================================================
// Strategies under the executor
// =============================================================================

#[test]
fn fixed_depth_minimax_finds_the_only_move() {
    let executor = AnytimeExecutor::new(Duration::from_millis(100));
    let best = executor.run(
        Box::new(FixedDepthMinimax::new(2)),
        state_on(board_without(&[(3, 3)])),
    );
    assert_eq!(best, Some(Move::new(3, 3, 1)));
}

#[test]
fn deepening_finds_the_only_move() {
    let executor = AnytimeExecutor::new(Duration::from_millis(100));
    let best = executor.run(
        Box::new(IterativeDeepening::new()),
        state_on(board_without(&[(3, 3)])),
    );
    assert_eq!(best, Some(Move::new(3, 3, 1)));
}

#[test]
fn mcts_finds_the_only_move() {
    let executor = AnytimeExecutor::new(Duration::from_millis(100));
    let best = executor.run(
        Box::new(MctsStrategy::with_seed(42)),
        state_on(board_without(&[(3, 3)])),
    );
    assert_eq!(best, Some(Move::new(3, 3, 1)));
}

#[test]
fn deepening_handles_a_sacrifice_position() {
    // (0,3) is forced; the sacrifice policy may offer the turn away, but a
    // proposal must still arrive in time.
    let board = Board::from_cells(
        2,
        2,
        vec![
            1, 2, 3, 0, //
            3, 0, 0, 0, //
            2, 0, 0, 0, //
            4, 0, 0, 0,
        ],
    )
    .unwrap();
    let executor = AnytimeExecutor::new(Duration::from_millis(200));
    let best = executor.run(Box::new(IterativeDeepening::new()), state_on(board));
    assert!(best.is_some());
}

#[test]
fn closed_board_forfeits_the_turn() {
    // No empty cell: the strategy exhausts without proposing, the executor
    // reports no move, and the driver records the turn as forfeited.
    let executor = AnytimeExecutor::new(Duration::from_millis(50));
    let best = executor.run(Box::new(FixedDepthMinimax::new(2)), state_on(solved_board()));
    assert_eq!(best, None);
}

// =============================================================================
// Anytime protocol
// =============================================================================

/// Publishes two alternating moves as fast as it can, forever.
struct Chattering;

impl SearchStrategy for Chattering {
    fn name(&self) -> &'static str {
        "chattering"
    }

    fn run(&mut self, _: &GameState, slot: &ProposalSlot, cancel: &CancelToken) -> SearchEnd {
        let a = Move::new(0, 0, 1);
        let b = Move::new(3, 3, 4);
        while !cancel.is_cancelled() {
            slot.propose(a);
            slot.propose(b);
        }
        SearchEnd::Cancelled
    }

    fn best_move_so_far(&self) -> Option<Move> {
        None
    }
}

#[test]
fn handoff_returns_a_fully_published_move() {
    // Cancellation races against a worker that writes the slot in a tight
    // loop; the result must always be one of the two published moves.
    for _ in 0..10 {
        let executor = AnytimeExecutor::new(Duration::from_millis(10));
        let best = executor.run(Box::new(Chattering), state_on(solved_board()));
        assert!(
            best == Some(Move::new(0, 0, 1)) || best == Some(Move::new(3, 3, 4)),
            "got {best:?}"
        );
    }
}

#[test]
fn deepening_proposals_grow_version_by_version() {
    // Drive the strategy by hand and sample the slot while it runs: the
    // version only climbs, and every sampled proposal is a legal move.
    let board = board_without(&[(0, 0), (1, 1), (2, 2), (3, 3)]);
    let legal = board.legal_moves(&[]);
    let state = state_on(board);

    let slot = Arc::new(ProposalSlot::new());
    let cancel = Arc::new(CancelToken::new());
    let worker = {
        let slot = Arc::clone(&slot);
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || IterativeDeepening::new().run(&state, &slot, &cancel))
    };

    let mut last_version = 0;
    for _ in 0..50 {
        thread::sleep(Duration::from_millis(1));
        let version = slot.version();
        assert!(version >= last_version);
        last_version = version;
        if let Some(mv) = slot.best() {
            assert!(legal.contains(&mv), "proposed {mv} is not legal");
        }
    }
    cancel.cancel();
    assert_eq!(worker.join().unwrap(), SearchEnd::Cancelled);
    assert!(last_version >= 1, "at least one proposal expected");
}

#[test]
fn deepening_proposal_values_never_decrease() {
    // Each published proposal must hold a value at least as good as the one
    // it superseded, found at a strictly greater depth.
    let board = board_without(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
    let state = state_on(board);

    let slot = Arc::new(ProposalSlot::new());
    let cancel = Arc::new(CancelToken::new());
    let worker = {
        let slot = Arc::clone(&slot);
        let cancel = Arc::clone(&cancel);
        thread::spawn(move || {
            let mut strategy = IterativeDeepening::new();
            strategy.run(&state, &slot, &cancel);
            strategy
        })
    };

    thread::sleep(Duration::from_millis(30));
    cancel.cancel();
    let strategy = worker.join().unwrap();

    let proposals = strategy.proposals();
    assert!(!proposals.is_empty());
    for pair in proposals.windows(2) {
        assert!(
            pair[1].value >= pair[0].value,
            "{} (value {}) superseded {} (value {})",
            pair[1].mv,
            pair[1].value,
            pair[0].mv,
            pair[0].value
        );
        assert!(pair[1].depth > pair[0].depth);
    }
    assert_eq!(strategy.best_move_so_far(), slot.best());
}
