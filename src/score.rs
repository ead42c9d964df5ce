//! Scoring: the fixed points table and the speculative move heuristic.

use crate::board::{Board, Move};

/// Points awarded for completing 0, 1, 2, or 3 regions with one move.
/// This is the literal game rule, not a tunable.
pub const SCORE_TABLE: [i32; 4] = [0, 1, 3, 7];

/// Points for a move that completed `regions` of its row/column/block.
#[inline]
pub fn points_for(regions: usize) -> i32 {
    SCORE_TABLE[regions]
}

/// Heuristic value of `mv` on `board`: the raw points plus a speculative
/// bonus or penalty for each region the move touches.
///
/// For each of the three regions, the number of cells still empty after the
/// move predicts who completes it: an even count means the opponent is
/// expected to finish it (penalty), an odd count the mover (bonus), each
/// scaled by `1 / count`. The bonus and penalty region tallies are mapped
/// through [`SCORE_TABLE`] and only the largest scale on each side is kept.
///
/// This is a single-move estimate, an alternative to tree search rather
/// than part of it. The board is written and restored in place.
pub fn evaluate(board: &mut Board, mv: Move) -> f64 {
    board.put(mv.row, mv.col, mv.value);
    let raw = points_for(board.regions_completed(mv.row, mv.col));

    let remaining = [
        board.row_empty_count(mv.row),
        board.col_empty_count(mv.col),
        board.block_empty_count(mv.row, mv.col),
    ];
    let mut bonus_regions = 0;
    let mut bonus_scale = 0.0f64;
    let mut penalty_regions = 0;
    let mut penalty_scale = 0.0f64;
    for count in remaining {
        if count == 0 {
            continue; // completed, already in the raw points
        }
        let scale = 1.0 / count as f64;
        if count % 2 == 0 {
            penalty_regions += 1;
            penalty_scale = penalty_scale.max(scale);
        } else {
            bonus_regions += 1;
            bonus_scale = bonus_scale.max(scale);
        }
    }
    board.clear(mv.row, mv.col);

    raw as f64 + points_for(bonus_regions) as f64 * bonus_scale
        - points_for(penalty_regions) as f64 * penalty_scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn table_is_exact_and_strictly_increasing() {
        assert_eq!(SCORE_TABLE, [0, 1, 3, 7]);
        for c in 0..3 {
            assert!(points_for(c) < points_for(c + 1));
        }
    }

    #[test]
    fn evaluate_restores_the_board() {
        let mut board = Board::new(2, 2).unwrap();
        let before = board.clone();
        evaluate(&mut board, Move::new(0, 0, 1));
        assert!(board == before);
    }

    #[test]
    fn evaluate_rewards_completion() {
        // One empty cell left; filling it closes row, column, and block.
        let mut board = Board::from_cells(
            2,
            2,
            vec![
                1, 2, 3, 4, //
                3, 4, 1, 2, //
                2, 1, 4, 3, //
                4, 3, 2, 0,
            ],
        )
        .unwrap();
        let value = evaluate(&mut board, Move::new(3, 3, 1));
        assert_eq!(value, 7.0);
    }

    #[test]
    fn evaluate_penalizes_leaving_even_regions() {
        // On an empty 4x4 board a first move leaves 3 empty cells in each
        // region: all three are odd (mover's favor), so the value is the
        // bonus alone.
        let mut board = Board::new(2, 2).unwrap();
        let value = evaluate(&mut board, Move::new(0, 0, 1));
        assert!(value > 0.0);
        // points_for(3) * (1/3), no raw points, no penalty
        assert!((value - 7.0 / 3.0).abs() < 1e-9);
    }
}
