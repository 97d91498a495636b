pub mod board;
pub mod error;
pub mod key;
pub mod side;

mod display;

pub use board::{Board, Cell, MAX_DIMENSION};
pub use error::BoardError;
pub use key::{BoardKey, Symmetry};
pub use side::Side;
