//! Generic alpha-beta search over two-player games where a player with no
//! legal move loses.

pub mod bounds;
mod move_ordering;
pub mod node;
mod search;
mod traits;
pub mod transposition_table;

#[cfg(test)]
mod tests;

pub use bounds::{AlphaBeta, Score, NEG_INF, POS_INF};
pub use move_ordering::{BackgroundMoveOrderer, OrderedMoves, ScoredLists};
pub use node::{Envelope, SearchNode};
pub use search::{alpha_beta_search, SearchContext, SearchError};
pub use traits::{Evaluator, GameMove, GameState, MoveCollection, MoveGenerator};
pub use transposition_table::{CacheEntry, TranspositionTable};
