//! Sudoku board representation and legal-move enumeration.
//!
//! The board is an `N x N` grid (`N = m * n`) of cells holding `0` (empty)
//! or a value in `1..=N`. Blocks are the `m x n` rectangles tiling the grid.
//! Candidate values per cell are kept as `u64` bitmasks, which caps the
//! supported side length at 64 (competitive boards use at most 4x4 blocks).
//!
//! Legality of a filled board is maintained by only ever writing moves that
//! came out of [`Board::legal_moves`]; it is never re-checked afterwards.

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// A single move: write `value` into the empty cell at `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

impl Move {
    pub fn new(row: usize, col: usize, value: u8) -> Self {
        Self { row, col, value }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}) -> {}", self.row, self.col, self.value)
    }
}

/// A move the oracle has shown to leave the puzzle unsolvable.
///
/// Structurally identical to [`Move`], but permanently illegal to repeat
/// for the remainder of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabooMove(pub Move);

impl From<Move> for TabooMove {
    fn from(mv: Move) -> Self {
        Self(mv)
    }
}

impl fmt::Display for TabooMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "taboo {}", self.0)
    }
}

/// Errors constructing a board from an external cell sequence.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("block dimensions {m}x{n} give side {side}, supported side is 1..=64")]
    UnsupportedSize { m: usize, n: usize, side: usize },
    #[error("expected {expected} cells for side {side}, got {got}")]
    WrongCellCount { side: usize, expected: usize, got: usize },
    #[error("cell ({row},{col}) holds {value}, valid values are 0..={max}")]
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: u8,
        max: usize,
    },
}

/// Sudoku board state.
///
/// Cloning produces an independent value copy; hypothetical exploration
/// either clones or uses the `put`/`clear` pair to write and undo a single
/// cell in place.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// Block height
    m: usize,
    /// Block width
    n: usize,
    /// Side length, `m * n`
    size: usize,
    /// Row-major cell values, `0` = empty
    cells: Vec<u8>,
}

impl Board {
    /// Create an empty board with `m x n` blocks.
    pub fn new(m: usize, n: usize) -> Result<Self, BoardError> {
        let side = m * n;
        if side == 0 || side > 64 {
            return Err(BoardError::UnsupportedSize { m, n, side });
        }
        Ok(Self {
            m,
            n,
            size: side,
            cells: vec![0; side * side],
        })
    }

    /// Create a board from the external row-major cell sequence (`0` = empty).
    pub fn from_cells(m: usize, n: usize, cells: Vec<u8>) -> Result<Self, BoardError> {
        let mut board = Self::new(m, n)?;
        let side = board.size;
        if cells.len() != side * side {
            return Err(BoardError::WrongCellCount {
                side,
                expected: side * side,
                got: cells.len(),
            });
        }
        if let Some(k) = cells.iter().position(|&v| v as usize > side) {
            return Err(BoardError::ValueOutOfRange {
                row: k / side,
                col: k % side,
                value: cells[k],
                max: side,
            });
        }
        board.cells = cells;
        Ok(board)
    }

    /// Side length `N = m * n`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Block dimensions `(m, n)` = (height, width).
    #[inline]
    pub fn block_dims(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Value at `(row, col)`, `0` if empty.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[self.idx(row, col)]
    }

    /// Write `value` at `(row, col)`. The caller guarantees legality.
    #[inline]
    pub fn put(&mut self, row: usize, col: usize, value: u8) {
        debug_assert!(value >= 1 && value as usize <= self.size);
        debug_assert_eq!(self.get(row, col), 0, "cell must be empty");
        let i = self.idx(row, col);
        self.cells[i] = value;
    }

    /// Undo of [`Board::put`]: empty the cell at `(row, col)`.
    #[inline]
    pub fn clear(&mut self, row: usize, col: usize) {
        let i = self.idx(row, col);
        self.cells[i] = 0;
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Coordinates of all empty cells, row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(k, _)| (k / size, k % size))
            .collect()
    }

    /// Top-left corner of the block containing `(row, col)`.
    #[inline]
    fn block_origin(&self, row: usize, col: usize) -> (usize, usize) {
        (row / self.m * self.m, col / self.n * self.n)
    }

    /// Bitmask of values present in the cell's row, column, and block.
    /// Bit `v - 1` is set when value `v` occurs.
    fn used_mask(&self, row: usize, col: usize) -> u64 {
        let mut used = 0u64;
        for k in 0..self.size {
            let r = self.get(row, k);
            if r != 0 {
                used |= 1 << (r - 1);
            }
            let c = self.get(k, col);
            if c != 0 {
                used |= 1 << (c - 1);
            }
        }
        let (br, bc) = self.block_origin(row, col);
        for r in br..br + self.m {
            for c in bc..bc + self.n {
                let v = self.get(r, c);
                if v != 0 {
                    used |= 1 << (v - 1);
                }
            }
        }
        used
    }

    /// Bitmask of values that may be written at `(row, col)`: every value
    /// absent from the cell's row, column, and block. Zero for filled cells.
    pub fn candidates(&self, row: usize, col: usize) -> u64 {
        if self.get(row, col) != 0 {
            return 0;
        }
        let full = if self.size == 64 {
            u64::MAX
        } else {
            (1u64 << self.size) - 1
        };
        full & !self.used_mask(row, col)
    }

    /// Candidates with taboo values for this cell removed as well.
    fn open_values(&self, row: usize, col: usize, taboo: &HashSet<Move>) -> u64 {
        let mut mask = self.candidates(row, col);
        let mut rest = mask;
        while rest != 0 {
            let value = rest.trailing_zeros() as u8 + 1;
            rest &= rest - 1;
            if taboo.contains(&Move::new(row, col, value)) {
                mask &= !(1u64 << (value - 1));
            }
        }
        mask
    }

    pub fn row_empty_count(&self, row: usize) -> usize {
        (0..self.size).filter(|&c| self.get(row, c) == 0).count()
    }

    pub fn col_empty_count(&self, col: usize) -> usize {
        (0..self.size).filter(|&r| self.get(r, col) == 0).count()
    }

    pub fn block_empty_count(&self, row: usize, col: usize) -> usize {
        let (br, bc) = self.block_origin(row, col);
        let mut empty = 0;
        for r in br..br + self.m {
            for c in bc..bc + self.n {
                if self.get(r, c) == 0 {
                    empty += 1;
                }
            }
        }
        empty
    }

    /// Number of the cell's row, column, and block that are fully filled,
    /// checked on the board as it stands (call after `put`). In `0..=3`.
    pub fn regions_completed(&self, row: usize, col: usize) -> usize {
        let mut count = 0;
        if self.row_empty_count(row) == 0 {
            count += 1;
        }
        if self.col_empty_count(col) == 0 {
            count += 1;
        }
        if self.block_empty_count(row, col) == 0 {
            count += 1;
        }
        count
    }

    /// Whether two cells share a row, column, or block.
    fn shares_region(&self, a: (usize, usize), b: (usize, usize)) -> bool {
        a.0 == b.0 || a.1 == b.1 || self.block_origin(a.0, a.1) == self.block_origin(b.0, b.1)
    }

    /// Enumerate all legal, non-taboo moves.
    ///
    /// Cells whose candidate set shrinks to exactly one value ("naked
    /// singles") are committed to a scratch copy and re-derived to fixpoint;
    /// the committed singles come first in the returned list, followed by
    /// the remaining moves of the propagated board. Callers only observe a
    /// smaller, ordered move list.
    pub fn legal_moves(&self, taboo: &[TabooMove]) -> Vec<Move> {
        let taboo: HashSet<Move> = taboo.iter().map(|t| t.0).collect();
        let mut scratch = self.clone();
        let mut moves = Vec::new();

        loop {
            let mut committed = false;
            for (row, col) in scratch.empty_cells() {
                let mask = scratch.open_values(row, col, &taboo);
                if mask.count_ones() == 1 {
                    let value = mask.trailing_zeros() as u8 + 1;
                    scratch.put(row, col, value);
                    moves.push(Move::new(row, col, value));
                    committed = true;
                }
            }
            if !committed {
                break;
            }
        }

        for (row, col) in scratch.empty_cells() {
            let mut mask = scratch.open_values(row, col, &taboo);
            while mask != 0 {
                let value = mask.trailing_zeros() as u8 + 1;
                mask &= mask - 1;
                moves.push(Move::new(row, col, value));
            }
        }
        moves
    }

    /// Find a move expected to draw an "unsolvable" verdict from the oracle.
    ///
    /// If some empty cell has exactly one remaining candidate, writing that
    /// value into a different empty cell of a shared region leaves the first
    /// cell with no candidate at all. The move is value-legal, so the oracle
    /// accepts it only to rule it taboo, which sacrifices the turn. Returns
    /// `None` when the board offers no such move.
    pub fn find_sacrifice_move(&self, taboo: &[TabooMove]) -> Option<Move> {
        let taboo: HashSet<Move> = taboo.iter().map(|t| t.0).collect();
        let empties = self.empty_cells();
        for &(row, col) in &empties {
            let mask = self.open_values(row, col, &taboo);
            if mask.count_ones() != 1 {
                continue;
            }
            let value = mask.trailing_zeros() as u8 + 1;
            let bit = 1u64 << (value - 1);
            for &(r2, c2) in &empties {
                if (r2, c2) == (row, col) || !self.shares_region((row, col), (r2, c2)) {
                    continue;
                }
                if self.open_values(r2, c2, &taboo) & bit != 0 {
                    return Some(Move::new(r2, c2, value));
                }
            }
        }
        None
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                match self.get(row, col) {
                    0 => write!(f, " .")?,
                    v => write!(f, "{v:2}")?,
                }
                if col + 1 < self.size {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
