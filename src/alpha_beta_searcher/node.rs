//! Search-tree nodes and the bound envelopes they carry.

use std::hash::{Hash, Hasher};

use super::bounds::{Score, NEG_INF, POS_INF};
use super::transposition_table::CacheEntry;

/// One ply of the search tree: who acts here, how deep it is, the move that
/// led here and what the search learned about its value.
///
/// `lower ≤ true value ≤ upper` holds for every node the search returns. The
/// score is the fail-soft value used for comparisons; it lies inside the
/// envelope and equals the true value only when the node is exact.
#[derive(Clone, Debug)]
pub struct SearchNode<M> {
    pub maximizing: bool,
    pub depth: u8,
    pub parent_move: Option<M>,
    pub lower: Score,
    pub upper: Score,
    pub nodes_searched: u64,
    score: Option<Score>,
    terminal: bool,
}

impl<M> SearchNode<M> {
    pub fn new(maximizing: bool, depth: u8, parent_move: Option<M>) -> Self {
        Self {
            maximizing,
            depth,
            parent_move,
            lower: NEG_INF,
            upper: POS_INF,
            // counts itself
            nodes_searched: 1,
            score: None,
            terminal: false,
        }
    }

    pub fn root(maximizing: bool) -> Self {
        Self::new(maximizing, 0, None)
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn is_unset(&self) -> bool {
        self.score.is_none()
    }

    pub fn set_score(&mut self, score: Score) {
        self.score = Some(score);
    }

    /// Records a fully known value.
    pub fn set_exact(&mut self, score: Score) {
        self.score = Some(score);
        self.lower = score;
        self.upper = score;
    }

    /// The side to move here has no legal move and loses.
    pub fn set_as_terminal(&mut self, score: Score) {
        self.terminal = true;
        self.set_exact(score);
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_exact(&self) -> bool {
        self.score.is_some() && self.lower == self.upper
    }

    /// Adopts a cached envelope without expanding the node. The score is the
    /// bound facing the side to move: the lower limit for the maximizer, the
    /// upper limit for the minimizer.
    pub fn adopt_entry(&mut self, entry: &CacheEntry) {
        self.lower = entry.lower_limit;
        self.upper = entry.upper_limit;
        self.score = Some(if self.maximizing {
            entry.lower_limit
        } else {
            entry.upper_limit
        });
    }

    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.lower = envelope.lower;
        self.upper = envelope.upper;
    }

    pub fn to_cache_entry(&self) -> CacheEntry {
        CacheEntry::new(self.lower, self.upper, self.nodes_searched)
    }
}

// Identity is (mover, move, depth): the same move at the same depth for the
// same side is one entry regardless of the path that reached it.
impl<M: PartialEq> PartialEq for SearchNode<M> {
    fn eq(&self, other: &Self) -> bool {
        self.maximizing == other.maximizing
            && self.parent_move == other.parent_move
            && self.depth == other.depth
    }
}

impl<M: Eq> Eq for SearchNode<M> {}

impl<M: Hash> Hash for SearchNode<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.maximizing.hash(state);
        self.parent_move.hash(state);
        self.depth.hash(state);
    }
}

/// Running `[lower, upper]` aggregate over the children of one node.
///
/// For a maximizing node both limits are maxima over the children seen so
/// far; for a minimizing node both are minima. If iteration stops early the
/// unexplored children could still move the limit on the mover's side, so
/// that limit is reopened to the sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Envelope {
    pub lower: Score,
    pub upper: Score,
    maximizing: bool,
}

impl Envelope {
    pub fn start(maximizing: bool) -> Self {
        let seed = if maximizing { NEG_INF } else { POS_INF };
        Self {
            lower: seed,
            upper: seed,
            maximizing,
        }
    }

    pub fn fold<M>(&mut self, child: &SearchNode<M>) {
        if self.maximizing {
            self.lower = self.lower.max(child.lower);
            self.upper = self.upper.max(child.upper);
        } else {
            self.lower = self.lower.min(child.lower);
            self.upper = self.upper.min(child.upper);
        }
    }

    /// Widens the envelope to cover children that were never searched.
    pub fn cut_off(mut self) -> Self {
        if self.maximizing {
            self.upper = POS_INF;
        } else {
            self.lower = NEG_INF;
        }
        self
    }
}
