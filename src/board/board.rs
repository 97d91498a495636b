//! Domineering board state representation.

use smallvec::SmallVec;

use crate::move_generator;
use crate::placement::Placement;

use super::{error::BoardError, key::BoardKey, key::Symmetry, Side};

/// Largest supported row or column count.
pub const MAX_DIMENSION: usize = 32;

/// The contents of one grid cell. Occupied cells remember which side's tile
/// covers them, although only occupancy matters to play.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Horizontal,
    Vertical,
}

impl Cell {
    pub fn owned_by(side: Side) -> Self {
        match side {
            Side::Horizontal => Cell::Horizontal,
            Side::Vertical => Cell::Vertical,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn owner(&self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Horizontal => Some(Side::Horizontal),
            Cell::Vertical => Some(Side::Vertical),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Horizontal => 'H',
            Cell::Vertical => 'V',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Cell::Empty),
            'H' | 'h' => Some(Cell::Horizontal),
            'V' | 'v' => Some(Cell::Vertical),
            _ => None,
        }
    }
}

/// Represents the state of a Domineering board: an R×C grid, the side to
/// move, and the number of tiles placed so far.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    turn: Side,
    move_count: u16,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            cells: vec![Cell::Empty; 64],
            turn: Side::Horizontal,
            move_count: 0,
        }
    }
}

impl Board {
    /// An empty board with Horizontal to move.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 || rows > MAX_DIMENSION || cols > MAX_DIMENSION {
            return Err(BoardError::InvalidDimensionsError {
                rows,
                cols,
                max: MAX_DIMENSION,
            });
        }

        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
            turn: Side::Horizontal,
            move_count: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if !self.in_bounds(row, col) {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<Cell, BoardError> {
        if !self.in_bounds(row, col) {
            return Err(BoardError::OutOfBoundsError { row, col });
        }
        let index = row * self.cols + col;
        Ok(std::mem::replace(&mut self.cells[index], cell))
    }

    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.get(row, col).map_or(false, |cell| cell.is_empty())
    }

    /// True for occupied cells and for coordinates off the board. Signed so
    /// that neighbour lookups can step past the edges.
    pub fn is_blocked(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 {
            return true;
        }
        !self.is_empty_cell(row as usize, col as usize)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn toggle_turn(&mut self) -> Side {
        self.turn = self.turn.opposite();
        self.turn
    }

    pub fn set_turn(&mut self, turn: Side) -> Side {
        self.turn = turn;
        turn
    }

    pub fn move_count(&self) -> u16 {
        self.move_count
    }

    pub(crate) fn set_move_count(&mut self, move_count: u16) {
        self.move_count = move_count;
    }

    /// True if `side` may lay `placement` now: correct orientation, both
    /// cells on the board and empty.
    pub fn is_legal(&self, placement: &Placement, side: Side) -> bool {
        placement.orientation() == Some(side)
            && placement
                .cells()
                .iter()
                .all(|&(row, col)| self.is_empty_cell(row, col))
    }

    /// Lays a tile for the side to move. The turn is not toggled; callers
    /// pair this with `toggle_turn` the same way the search does.
    pub fn place(&mut self, placement: &Placement) -> Result<(), BoardError> {
        let side = placement
            .orientation()
            .ok_or(BoardError::NotAdjacentError {
                placement: *placement,
            })?;
        if side != self.turn {
            return Err(BoardError::WrongOrientationError {
                placement: *placement,
            });
        }
        for &(row, col) in placement.cells().iter() {
            match self.get(row, col) {
                None => return Err(BoardError::OutOfBoundsError { row, col }),
                Some(cell) if !cell.is_empty() => {
                    return Err(BoardError::CellOccupiedError {
                        placement: *placement,
                    })
                }
                _ => {}
            }
        }

        // The owner follows from the tile's orientation, i.e. the side that
        // actually made the move.
        let owner = Cell::owned_by(side);
        for &(row, col) in placement.cells().iter() {
            self.set(row, col, owner)?;
        }
        self.move_count += 1;
        Ok(())
    }

    /// Lifts a tile previously laid with `place`.
    pub fn remove(&mut self, placement: &Placement) -> Result<(), BoardError> {
        let side = placement
            .orientation()
            .ok_or(BoardError::NotAdjacentError {
                placement: *placement,
            })?;
        let owner = Cell::owned_by(side);
        if placement
            .cells()
            .iter()
            .any(|&(row, col)| self.get(row, col) != Some(owner))
        {
            return Err(BoardError::TileMissingUndoError {
                placement: *placement,
            });
        }

        for &(row, col) in placement.cells().iter() {
            self.set(row, col, Cell::Empty)?;
        }
        self.move_count = self.move_count.saturating_sub(1);
        Ok(())
    }

    /// The winner, if the side to move has no legal placement left.
    pub fn winner(&self) -> Option<Side> {
        if move_generator::has_legal_placement(self, self.turn) {
            None
        } else {
            Some(self.turn.opposite())
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Cache key of this exact position.
    pub fn position_key(&self) -> BoardKey {
        self.transformed_key(Symmetry::Identity)
    }

    /// Cache key of this position viewed through `symmetry`. The board itself
    /// is never touched.
    pub fn transformed_key(&self, symmetry: Symmetry) -> BoardKey {
        let mut key = BoardKey::empty(self.rows, self.cols, self.turn);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (src_row, src_col) = symmetry.source(row, col, self.rows, self.cols);
                if !self.cells[src_row * self.cols + src_col].is_empty() {
                    key.mark(row * self.cols + col);
                }
            }
        }
        key
    }

    /// Keys of every symmetry-equivalent position, identity first.
    pub fn symmetric_keys(&self) -> SmallVec<[BoardKey; 4]> {
        Symmetry::ALL
            .iter()
            .map(|&symmetry| self.transformed_key(symmetry))
            .collect()
    }

    /// A copy of this board mirrored through `symmetry`.
    pub fn mirrored(&self, symmetry: Symmetry) -> Board {
        let mut mirrored = self.clone();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (src_row, src_col) = symmetry.source(row, col, self.rows, self.cols);
                mirrored.cells[row * self.cols + col] = self.cells[src_row * self.cols + src_col];
            }
        }
        mirrored
    }
}
