//! Transposition keys and the mirror symmetries used to canonicalize them.

use smallvec::{smallvec, SmallVec};

use super::Side;

/// The reflections of a rectangular board that keep horizontal tiles
/// horizontal and vertical tiles vertical. Quarter turns would swap the two
/// sides' roles, so they are not part of the group.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Symmetry {
    Identity,
    MirrorRows,
    MirrorColumns,
    Rotate180,
}

impl Symmetry {
    pub const ALL: [Symmetry; 4] = [
        Symmetry::Identity,
        Symmetry::MirrorRows,
        Symmetry::MirrorColumns,
        Symmetry::Rotate180,
    ];

    /// The cell of the original board that lands on `(row, col)`.
    #[inline]
    pub fn source(&self, row: usize, col: usize, rows: usize, cols: usize) -> (usize, usize) {
        match self {
            Symmetry::Identity => (row, col),
            Symmetry::MirrorRows => (rows - 1 - row, col),
            Symmetry::MirrorColumns => (row, cols - 1 - col),
            Symmetry::Rotate180 => (rows - 1 - row, cols - 1 - col),
        }
    }
}

/// Occupancy bitset plus dimensions and side to move. Tile owners are left
/// out: two positions with the same empty cells play identically.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct BoardKey {
    rows: u8,
    cols: u8,
    turn: Side,
    occupancy: SmallVec<[u64; 4]>,
}

impl BoardKey {
    pub(crate) fn empty(rows: usize, cols: usize, turn: Side) -> Self {
        let words = (rows * cols + 63) / 64;
        Self {
            rows: rows as u8,
            cols: cols as u8,
            turn,
            occupancy: smallvec![0; words],
        }
    }

    #[inline]
    pub(crate) fn mark(&mut self, index: usize) {
        self.occupancy[index / 64] |= 1u64 << (index % 64);
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn occupied_count(&self) -> u32 {
        self.occupancy.iter().map(|word| word.count_ones()).sum()
    }
}
