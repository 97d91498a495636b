use thiserror::Error;

use crate::placement::Placement;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Board dimensions must be between 1x1 and {max}x{max}, got {rows}x{cols}")]
    InvalidDimensionsError { rows: usize, cols: usize, max: usize },
    #[error("Cell ({row}, {col}) is outside of the board")]
    OutOfBoundsError { row: usize, col: usize },
    #[error("Cannot place a tile on {placement}, a cell is already occupied")]
    CellOccupiedError { placement: Placement },
    #[error("Cannot place {placement}, the cells are not adjacent")]
    NotAdjacentError { placement: Placement },
    #[error("Cannot place {placement}, it is not oriented for the side to move")]
    WrongOrientationError { placement: Placement },
    #[error("Cannot remove {placement}, the cells do not hold that tile")]
    TileMissingUndoError { placement: Placement },
    #[error("Invalid board text: {msg}")]
    BoardParseError { msg: String },
}
