use std::fmt;
use std::str::FromStr;

use super::{Board, BoardError, Cell};

impl Board {
    /// Compact one-line form, rows separated by `/`.
    pub fn to_text(&self) -> String {
        (0..self.rows())
            .map(|row| {
                (0..self.cols())
                    .map(|col| self.get(row, col).unwrap_or_default().symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.cols() {
            write!(f, "{:>2}", col)?;
        }
        writeln!(f)?;

        for row in 0..self.rows() {
            write!(f, "{:>2} ", row)?;
            for col in 0..self.cols() {
                write!(f, " {}", self.get(row, col).unwrap_or_default().symbol())?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.turn())
    }
}

/// Parses rows of `.`, `H` and `V` separated by `/` or newlines. Horizontal
/// is to move; the move counter is derived from the occupied cells.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<Cell>> = text
            .split(|c| c == '/' || c == '\n')
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<String>())
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|symbol| {
                        Cell::from_symbol(symbol).ok_or_else(|| BoardError::BoardParseError {
                            msg: format!("unexpected symbol `{}`", symbol),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;

        let cols = rows.first().map_or(0, |row| row.len());
        if rows.iter().any(|row| row.len() != cols) {
            return Err(BoardError::BoardParseError {
                msg: "rows must all have the same length".to_string(),
            });
        }

        let mut board = Board::new(rows.len(), cols)?;
        for (row, cells) in rows.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                board.set(row, col, cell)?;
            }
        }
        let tiles = board.occupied_count() / 2;
        board.set_move_count(tiles as u16);
        Ok(board)
    }
}

/// Builds a `Board` from a grid of `.`, `H` and `V` tokens with rows
/// separated by `/`, e.g.
///
/// ```ignore
/// let board = domineering_position! {
///     H H . . /
///     . . V . /
///     . . V .
/// };
/// ```
#[macro_export]
macro_rules! domineering_position {
    ($($cell:tt)+) => {{
        let text: String = ::std::stringify!($($cell)+)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        <$crate::board::Board as ::std::str::FromStr>::from_str(&text)
            .expect("invalid domineering_position! grid")
    }};
}
