//! Legal placement generation.

use smallvec::SmallVec;

use crate::board::{Board, Side};
use crate::placement::Placement;

/// Fits every placement on boards up to 8×8 without spilling to the heap.
pub type PlacementList = SmallVec<[Placement; 64]>;

/// Every legal placement for `side`, in row-major order of the tile's first
/// cell. An empty list means `side` has lost if it is their turn.
pub fn generate_placements(board: &Board, side: Side) -> PlacementList {
    let mut placements = PlacementList::new();
    for_each_candidate(board, side, |placement| {
        placements.push(placement);
        true
    });
    placements
}

/// Stops at the first legal placement found.
pub fn has_legal_placement(board: &Board, side: Side) -> bool {
    let mut found = false;
    for_each_candidate(board, side, |_| {
        found = true;
        false
    });
    found
}

pub fn count_placements(board: &Board, side: Side) -> usize {
    let mut count = 0;
    for_each_candidate(board, side, |_| {
        count += 1;
        true
    });
    count
}

/// Walks the legal placements for `side`; `visit` returns false to stop.
fn for_each_candidate<F>(board: &Board, side: Side, mut visit: F)
where
    F: FnMut(Placement) -> bool,
{
    let (row_step, col_step) = side.offset();
    let last_row = board.rows().saturating_sub(row_step);
    let last_col = board.cols().saturating_sub(col_step);

    for row in 0..last_row {
        for col in 0..last_col {
            let placement = Placement::for_side(side, row as u8, col as u8);
            if board.is_legal(&placement, side) && !visit(placement) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domineering_position;

    #[test]
    fn test_empty_board_counts() {
        let board = Board::new(4, 5).unwrap();
        // 4 rows of 4 horizontal slots, 3 rows of 5 vertical slots
        assert_eq!(generate_placements(&board, Side::Horizontal).len(), 16);
        assert_eq!(generate_placements(&board, Side::Vertical).len(), 15);
    }

    #[test]
    fn test_single_row_board() {
        let board = Board::new(1, 2).unwrap();
        let horizontal = generate_placements(&board, Side::Horizontal);
        assert_eq!(horizontal.as_slice(), &[Placement::horizontal(0, 0)]);
        assert!(generate_placements(&board, Side::Vertical).is_empty());
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let board = domineering_position! {
            H H V /
            V V V /
            V V H
        };
        for side in Side::ALL.iter() {
            assert!(generate_placements(&board, *side).is_empty());
            assert!(!has_legal_placement(&board, *side));
        }
    }

    #[test]
    fn test_generation_skips_occupied_cells() {
        let board = domineering_position! {
            . H H . /
            . . . . 
        };
        let horizontal = generate_placements(&board, Side::Horizontal);
        assert_eq!(horizontal.len(), 3);
        assert!(horizontal.iter().all(|p| p.r1 == 1));

        let vertical = generate_placements(&board, Side::Vertical);
        assert_eq!(
            vertical.as_slice(),
            &[Placement::vertical(0, 0), Placement::vertical(0, 3)]
        );
        assert_eq!(count_placements(&board, Side::Vertical), 2);
    }

    #[test]
    fn test_every_generated_placement_is_legal() {
        let board = domineering_position! {
            . . V . . /
            H H V . . /
            . . . . V /
            . . . . V
        };
        for side in Side::ALL.iter() {
            for placement in generate_placements(&board, *side).iter() {
                assert!(board.is_legal(placement, *side));
            }
        }
    }
}
