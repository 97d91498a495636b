use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;

/// One of the two Domineering players. Horizontal lays tiles along a row,
/// Vertical lays them down a column.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Horizontal = 0,
    Vertical = 1,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Horizontal, Side::Vertical];

    pub fn opposite(&self) -> Self {
        match self {
            Side::Horizontal => Side::Vertical,
            Side::Vertical => Side::Horizontal,
        }
    }

    /// Horizontal is the maximizing side; every score in the crate is
    /// reported from its point of view.
    pub fn maximize_score(&self) -> bool {
        match self {
            Side::Horizontal => true,
            Side::Vertical => false,
        }
    }

    /// Offset from the first cell of a tile to its second cell.
    pub fn offset(&self) -> (usize, usize) {
        match self {
            Side::Horizontal => (0, 1),
            Side::Vertical => (1, 0),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Side::Horizontal => 'H',
            Side::Vertical => 'V',
        }
    }

    pub fn random() -> Self {
        *Self::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&Side::Horizontal)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side_str = match self {
            Side::Horizontal => "horizontal",
            Side::Vertical => "vertical",
        };
        write!(f, "{}", side_str)
    }
}

// used for parsing cli args
type ParseError = &'static str;
impl FromStr for Side {
    type Err = ParseError;
    fn from_str(side: &str) -> Result<Self, Self::Err> {
        match side {
            "horizontal" | "h" | "H" => Ok(Side::Horizontal),
            "vertical" | "v" | "V" => Ok(Side::Vertical),
            "random" => Ok(Side::random()),
            _ => Err("invalid side; options are: horizontal, vertical, random"),
        }
    }
}
