//! Leaf scoring for positions at the search horizon.
//!
//! A position is scored as a weighted sum of features. Each feature reports
//! Horizontal's advantage, so positive totals favour Horizontal (the
//! maximizing side). Features only read the board.

use std::fmt;
use std::sync::Arc;

use crate::alpha_beta_searcher::{Score, NEG_INF, POS_INF};
use crate::board::Board;

mod features;

pub use features::{OpenPlacements, ReservedPlacements};

pub const DEFAULT_RESERVED_WEIGHT: Score = 3;
pub const DEFAULT_OPEN_WEIGHT: Score = 1;

/// Largest magnitude a total may reach; the sentinels stay reserved for
/// decided games.
pub const MAX_EVALUATION: Score = POS_INF - 1;
pub const MIN_EVALUATION: Score = NEG_INF + 1;

/// One component of the leaf score.
///
/// Implementations must give the same answer for a board and its row or
/// column mirror image, and must not depend on whose turn it is.
pub trait ScoringFeature: Send + Sync {
    fn name(&self) -> &'static str;

    /// Horizontal's advantage on `board`.
    fn score(&self, board: &Board) -> Score;
}

#[derive(Clone)]
pub struct WeightedEvaluator {
    features: Vec<(Arc<dyn ScoringFeature>, Score)>,
}

impl Default for WeightedEvaluator {
    fn default() -> Self {
        Self::with_weights(DEFAULT_RESERVED_WEIGHT, DEFAULT_OPEN_WEIGHT)
    }
}

impl fmt::Debug for WeightedEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.features
                    .iter()
                    .map(|(feature, weight)| (feature.name(), *weight)),
            )
            .finish()
    }
}

impl WeightedEvaluator {
    /// An evaluator with no features; it scores every position 0.
    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    /// The default feature set with the given weights.
    pub fn with_weights(reserved_weight: Score, open_weight: Score) -> Self {
        Self::empty()
            .with_feature(Arc::new(ReservedPlacements), reserved_weight)
            .with_feature(Arc::new(OpenPlacements), open_weight)
    }

    pub fn with_feature(mut self, feature: Arc<dyn ScoringFeature>, weight: Score) -> Self {
        self.features.push((feature, weight));
        self
    }

    pub fn features(&self) -> impl Iterator<Item = (&str, Score)> {
        self.features
            .iter()
            .map(|(feature, weight)| (feature.name(), *weight))
    }

    /// Weighted sum of every feature, clamped strictly inside the sentinels.
    pub fn score(&self, board: &Board) -> Score {
        let total = self
            .features
            .iter()
            .fold(0i64, |total, (feature, weight)| {
                total.saturating_add(i64::from(*weight) * i64::from(feature.score(board)))
            });

        total.clamp(i64::from(MIN_EVALUATION), i64::from(MAX_EVALUATION)) as Score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Symmetry;
    use crate::domineering_position;

    struct Constant(Score);

    impl ScoringFeature for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn score(&self, _board: &Board) -> Score {
            self.0
        }
    }

    #[test]
    fn test_empty_square_board_is_even() {
        let board = Board::new(6, 6).unwrap();
        assert_eq!(WeightedEvaluator::default().score(&board), 0);
    }

    #[test]
    fn test_weights_are_applied() {
        let evaluator = WeightedEvaluator::empty()
            .with_feature(Arc::new(Constant(2)), 3)
            .with_feature(Arc::new(Constant(-1)), 4);
        assert_eq!(evaluator.score(&Board::default()), 2);
    }

    #[test]
    fn test_default_weights() {
        // 1 row, 4 columns: 3 horizontal slots, two of them disjoint and safe
        let board = Board::new(1, 4).unwrap();
        assert_eq!(OpenPlacements.score(&board), 3);
        assert_eq!(ReservedPlacements.score(&board), 2);
        assert_eq!(WeightedEvaluator::default().score(&board), 3 * 2 + 3);
    }

    #[test]
    fn test_total_never_reaches_sentinels() {
        let evaluator = WeightedEvaluator::empty()
            .with_feature(Arc::new(Constant(POS_INF)), 10)
            .with_feature(Arc::new(Constant(POS_INF)), 10);
        assert_eq!(evaluator.score(&Board::default()), MAX_EVALUATION);

        let evaluator = WeightedEvaluator::empty().with_feature(Arc::new(Constant(NEG_INF)), 1);
        assert_eq!(evaluator.score(&Board::default()), MIN_EVALUATION);
    }

    #[test]
    fn test_score_is_mirror_invariant() {
        let board = domineering_position! {
            HH..V./
            ....V./
            .V.HH./
            .V..../
            ...HH.
        };
        let evaluator = WeightedEvaluator::default();
        let expected = evaluator.score(&board);

        for symmetry in Symmetry::ALL.iter() {
            assert_eq!(
                evaluator.score(&board.mirrored(*symmetry)),
                expected,
                "{:?}",
                symmetry
            );
        }
    }

    #[test]
    fn test_scoring_leaves_board_untouched() {
        let board = domineering_position! {
            H H . . /
            . . . V /
            . . . V /
            . . . .
        };
        let before = board.clone();
        let _ = WeightedEvaluator::default().score(&board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_debug_lists_features() {
        let text = format!("{:?}", WeightedEvaluator::default());
        assert!(text.contains("reserved_placements"));
        assert!(text.contains("open_placements"));
    }
}
