//! The alpha-beta window carried down one search path.

use super::transposition_table::CacheEntry;

pub type Score = i32;

/// Forced win for the maximizing side. Only decided games produce it.
pub const POS_INF: Score = Score::MAX;
/// Forced win for the minimizing side. Only decided games produce it.
pub const NEG_INF: Score = Score::MIN;

/// The score of a decided game, from the maximizer's point of view, when
/// `maximizing_player` is the side that has just run out of moves.
#[inline]
pub fn loss_for(maximizing_player: bool) -> Score {
    if maximizing_player {
        NEG_INF
    } else {
        POS_INF
    }
}

#[inline]
pub fn is_decided(score: Score) -> bool {
    score == POS_INF || score == NEG_INF
}

/// `alpha` is the best score the maximizer can already guarantee along the
/// current path, `beta` the best the minimizer can. The window only ever
/// narrows while descending.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlphaBeta {
    pub alpha: Score,
    pub beta: Score,
}

impl Default for AlphaBeta {
    fn default() -> Self {
        Self {
            alpha: NEG_INF,
            beta: POS_INF,
        }
    }
}

impl AlphaBeta {
    pub fn new(alpha: Score, beta: Score) -> Self {
        Self { alpha, beta }
    }

    /// Raises alpha (maximizer) or lowers beta (minimizer) if `score` is an
    /// improvement; otherwise leaves the window alone.
    #[inline]
    pub fn update_if_needed(&mut self, score: Score, maximizing_player: bool) {
        if maximizing_player {
            self.alpha = self.alpha.max(score);
        } else {
            self.beta = self.beta.min(score);
        }
    }

    /// True once `score`, found for the side to move, makes the remaining
    /// siblings irrelevant.
    #[inline]
    pub fn can_prune(&self, score: Score, maximizing_player: bool) -> bool {
        if maximizing_player {
            score >= self.beta || score == POS_INF
        } else {
            score <= self.alpha || score == NEG_INF
        }
    }

    /// True if a cached bound already dominates the window, so the position
    /// need not be expanded.
    #[inline]
    pub fn can_prune_entry(&self, entry: &CacheEntry, maximizing_player: bool) -> bool {
        if maximizing_player {
            self.beta <= entry.lower_limit
        } else {
            self.alpha >= entry.upper_limit
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.alpha >= self.beta
    }
}
