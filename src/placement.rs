//! A single Domineering tile placement.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::board::error::BoardError;
use crate::board::Side;

static PLACEMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*,\s*(\d+)\s*[-\s]\s*(\d+)\s*,\s*(\d+)\s*$")
        .expect("placement regex is valid")
});

/// The two cells covered by one tile, stored as `(r1, c1)` and `(r2, c2)`.
/// The first cell is always the top/left one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct Placement {
    pub r1: u8,
    pub c1: u8,
    pub r2: u8,
    pub c2: u8,
}

impl Placement {
    pub fn new(r1: u8, c1: u8, r2: u8, c2: u8) -> Self {
        Self { r1, c1, r2, c2 }
    }

    pub fn horizontal(row: u8, col: u8) -> Self {
        Self::new(row, col, row, col + 1)
    }

    pub fn vertical(row: u8, col: u8) -> Self {
        Self::new(row, col, row + 1, col)
    }

    /// The placement anchored at `(row, col)` in the orientation `side` plays.
    pub fn for_side(side: Side, row: u8, col: u8) -> Self {
        match side {
            Side::Horizontal => Self::horizontal(row, col),
            Side::Vertical => Self::vertical(row, col),
        }
    }

    /// Which side is allowed to play this tile, or `None` if the two cells
    /// are not an adjacent top/left-first pair.
    pub fn orientation(&self) -> Option<Side> {
        if self.r1 == self.r2 && self.c1.checked_add(1) == Some(self.c2) {
            Some(Side::Horizontal)
        } else if self.c1 == self.c2 && self.r1.checked_add(1) == Some(self.r2) {
            Some(Side::Vertical)
        } else {
            None
        }
    }

    pub fn cells(&self) -> [(usize, usize); 2] {
        [
            (self.r1 as usize, self.c1 as usize),
            (self.r2 as usize, self.c2 as usize),
        ]
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}-{},{}", self.r1, self.c1, self.r2, self.c2)
    }
}

impl FromStr for Placement {
    type Err = BoardError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let caps = PLACEMENT_REGEX
            .captures(input)
            .ok_or_else(|| BoardError::BoardParseError {
                msg: format!("`{}` is not of the form r1,c1-r2,c2", input),
            })?;

        let mut coords = [0u8; 4];
        for (i, coord) in coords.iter_mut().enumerate() {
            *coord = caps[i + 1]
                .parse()
                .map_err(|_| BoardError::BoardParseError {
                    msg: format!("coordinate `{}` is out of range", &caps[i + 1]),
                })?;
        }

        let placement = Placement::new(coords[0], coords[1], coords[2], coords[3]);
        match placement.orientation() {
            Some(_) => Ok(placement),
            None => Err(BoardError::NotAdjacentError { placement }),
        }
    }
}
