use smallvec::{smallvec, SmallVec};

use super::ScoringFeature;
use crate::alpha_beta_searcher::Score;
use crate::board::{Board, Side};
use crate::move_generator::count_placements;

/// Legal placements Horizontal has minus those Vertical has.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenPlacements;

impl ScoringFeature for OpenPlacements {
    fn name(&self) -> &'static str {
        "open_placements"
    }

    fn score(&self, board: &Board) -> Score {
        count_placements(board, Side::Horizontal) as Score
            - count_placements(board, Side::Vertical) as Score
    }
}

/// Placements the opponent can never take away, Horizontal's minus
/// Vertical's.
///
/// A horizontal slot is reserved when, for both of its cells, the cells
/// directly above and below are blocked: no vertical tile can ever touch it.
/// Vertical slots are the transpose. Overlapping reserved slots are counted
/// once per disjoint pair, scanning each row (or column) from the start.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReservedPlacements;

impl ScoringFeature for ReservedPlacements {
    fn name(&self) -> &'static str {
        "reserved_placements"
    }

    fn score(&self, board: &Board) -> Score {
        reserved_count(board, Side::Horizontal) as Score
            - reserved_count(board, Side::Vertical) as Score
    }
}

/// Bitset of cells already claimed by a counted slot.
struct Claimed {
    cols: usize,
    bits: SmallVec<[u64; 4]>,
}

impl Claimed {
    fn new(rows: usize, cols: usize) -> Self {
        let words = (rows * cols + 63) / 64;
        Self {
            cols,
            bits: smallvec![0; words],
        }
    }

    fn contains(&self, row: usize, col: usize) -> bool {
        let index = row * self.cols + col;
        self.bits[index / 64] & (1 << (index % 64)) != 0
    }

    fn insert(&mut self, row: usize, col: usize) {
        let index = row * self.cols + col;
        self.bits[index / 64] |= 1 << (index % 64);
    }
}

/// An empty cell `side` could fill without the other side ever being able
/// to cover it: both neighbours across the side's orientation are blocked.
fn is_sheltered(board: &Board, side: Side, row: usize, col: usize) -> bool {
    if !board.is_empty_cell(row, col) {
        return false;
    }
    let (row, col) = (row as isize, col as isize);
    match side {
        Side::Horizontal => board.is_blocked(row - 1, col) && board.is_blocked(row + 1, col),
        Side::Vertical => board.is_blocked(row, col - 1) && board.is_blocked(row, col + 1),
    }
}

fn reserved_count(board: &Board, side: Side) -> usize {
    let (row_step, col_step) = side.offset();
    let mut claimed = Claimed::new(board.rows(), board.cols());
    let mut count = 0;

    let (outer, inner) = match side {
        Side::Horizontal => (board.rows(), board.cols()),
        Side::Vertical => (board.cols(), board.rows()),
    };

    // Scan along the tile's orientation so greedy pairing works run by run.
    for line in 0..outer {
        for step in 0..inner.saturating_sub(1) {
            let (row, col) = match side {
                Side::Horizontal => (line, step),
                Side::Vertical => (step, line),
            };
            let (next_row, next_col) = (row + row_step, col + col_step);

            if claimed.contains(row, col)
                || !is_sheltered(board, side, row, col)
                || !is_sheltered(board, side, next_row, next_col)
            {
                continue;
            }

            claimed.insert(row, col);
            claimed.insert(next_row, next_col);
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Symmetry;
    use crate::domineering_position;

    #[test]
    fn test_open_placements_on_empty_board() {
        let board = Board::new(3, 5).unwrap();
        // 3 rows of 4 horizontal slots, 2 rows of 5 vertical slots
        assert_eq!(OpenPlacements.score(&board), 12 - 10);
    }

    #[test]
    fn test_reserved_row_between_walls() {
        let board = domineering_position! {
            V V V V V /
            V V V V V /
            . . . . . /
            V V V V V /
            V V V V V
        };
        // a sheltered run of 5 cells holds two disjoint horizontal tiles
        assert_eq!(reserved_count(&board, Side::Horizontal), 2);
        assert_eq!(reserved_count(&board, Side::Vertical), 0);
        assert_eq!(ReservedPlacements.score(&board), 2);
    }

    #[test]
    fn test_reserved_column_for_vertical() {
        let board = domineering_position! {
            H H . H H /
            H H . H H /
            H H . H H /
            H H . H H
        };
        assert_eq!(reserved_count(&board, Side::Vertical), 2);
        assert_eq!(reserved_count(&board, Side::Horizontal), 0);
        assert_eq!(ReservedPlacements.score(&board), -2);
    }

    #[test]
    fn test_exposed_cells_are_not_reserved() {
        let board = domineering_position! {
            V V V . /
            V V V . /
            . . . . /
            H H . .
        };
        // only (2,0)-(2,1) is walled in above and below on both halves
        assert_eq!(reserved_count(&board, Side::Horizontal), 1);
    }

    #[test]
    fn test_reserved_is_mirror_invariant() {
        let board = domineering_position! {
            V . . . . /
            V H H . V /
            . . . . V /
            H H . H H /
            . . . . .
        };
        let expected = ReservedPlacements.score(&board);
        for symmetry in Symmetry::ALL.iter() {
            assert_eq!(ReservedPlacements.score(&board.mirrored(*symmetry)), expected);
        }
    }
}
