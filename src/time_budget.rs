//! Game clock and search depth selection.
//!
//! The budget tracks how much of the game clock is left and how many more
//! decisions it must cover. Each decision is bracketed by two calls to
//! [`TimeBudget::click`]; the second one charges the elapsed time. Depth is
//! chosen before a search starts by comparing the per-move allowance with a
//! table of predicted search times.

use std::time::{Duration, Instant};

use log::{debug, warn};
use once_cell::sync::Lazy;

/// Decisions the budget assumes are still to come in a fresh game.
pub const DEFAULT_MOVES_LEFT: u32 = 14;

pub const DEFAULT_TOTAL_TIME: Duration = Duration::from_secs(60);

const MAX_TABULATED_BRANCHING: usize = 64;
const MAX_TABULATED_DEPTH: usize = 12;
const NODES_PER_SECOND: f64 = 1_500_000.0;

/// Each ply removes roughly this many placements from the next mover.
const BRANCHING_DECAY_PER_PLY: f64 = 2.0;
/// Exponent applied to the raw branching factor to account for pruning.
const PRUNING_EXPONENT: f64 = 0.75;

static DEFAULT_PREDICTED_TIMES: Lazy<PredictedTimes> = Lazy::new(|| {
    PredictedTimes::estimated(MAX_TABULATED_BRANCHING, MAX_TABULATED_DEPTH, NODES_PER_SECOND)
});

/// Predicted search time in seconds, indexed `[branching][depth]`. Rows are
/// non-decreasing in depth; depth 0 costs nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictedTimes {
    rows: Vec<Vec<f64>>,
}

impl Default for PredictedTimes {
    fn default() -> Self {
        DEFAULT_PREDICTED_TIMES.clone()
    }
}

impl PredictedTimes {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Builds a table from a simple model: a search to depth `d` visits the
    /// product of the effective branching factors of each ply, summed over
    /// the plies, at `nodes_per_second`.
    pub fn estimated(max_branching: usize, max_depth: usize, nodes_per_second: f64) -> Self {
        let rows = (0..=max_branching)
            .map(|branching| {
                let mut row = Vec::with_capacity(max_depth + 1);
                let mut frontier = 1.0;
                let mut visited = 0.0;
                row.push(0.0);
                for ply in 0..max_depth {
                    let remaining =
                        (branching as f64 - BRANCHING_DECAY_PER_PLY * ply as f64).max(1.0);
                    frontier *= remaining.powf(PRUNING_EXPONENT);
                    visited += frontier;
                    row.push(visited / nodes_per_second);
                }
                row
            })
            .collect();

        Self { rows }
    }

    /// The row for `branching`, or the widest row if the table is narrower.
    pub fn row(&self, branching: usize) -> Option<&[f64]> {
        self.rows
            .get(branching)
            .or_else(|| self.rows.last())
            .map(Vec::as_slice)
    }

    pub fn max_depth(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.len().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug)]
pub struct TimeBudget {
    time_left: Duration,
    moves_left: u32,
    started: Option<Instant>,
    last_elapsed: Option<Duration>,
    total_elapsed: Duration,
    predicted: PredictedTimes,
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_TIME)
    }
}

impl TimeBudget {
    pub fn new(total_time: Duration) -> Self {
        Self::with_predicted_times(total_time, PredictedTimes::default())
    }

    pub fn with_predicted_times(total_time: Duration, predicted: PredictedTimes) -> Self {
        Self {
            time_left: total_time,
            moves_left: DEFAULT_MOVES_LEFT,
            started: None,
            last_elapsed: None,
            total_elapsed: Duration::ZERO,
            predicted,
        }
    }

    pub fn set_moves_left(&mut self, moves_left: u32) {
        self.moves_left = moves_left;
    }

    /// Starts timing if the clock is stopped, otherwise stops it and
    /// charges the elapsed time.
    pub fn click(&mut self) {
        match self.started.take() {
            None => {
                self.started = Some(Instant::now());
                self.last_elapsed = None;
            }
            Some(started) => self.record(started.elapsed()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Charges one decision that took `elapsed`.
    pub fn record(&mut self, elapsed: Duration) {
        let allowance = self.move_allowance();
        if elapsed > self.time_left {
            warn!(
                "move took {:?} with only {:?} left on the clock",
                elapsed, self.time_left
            );
        } else if elapsed > allowance {
            warn!(
                "move took {:?}, over its {:?} allowance",
                elapsed, allowance
            );
        }

        self.time_left = self.time_left.saturating_sub(elapsed);
        self.moves_left = self.moves_left.saturating_sub(1);
        self.last_elapsed = Some(elapsed);
        self.total_elapsed += elapsed;

        debug!(
            "clock: {:?} left for {} moves",
            self.time_left, self.moves_left
        );
    }

    pub fn time_left(&self) -> Duration {
        self.time_left
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    /// Duration of the last completed start/stop pair.
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }

    pub fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Share of the remaining clock for the next decision. Once the expected
    /// move count runs out every further move may use the whole clock.
    pub fn move_allowance(&self) -> Duration {
        self.time_left / self.moves_left.max(1)
    }

    /// The deepest search expected to finish within the move allowance at
    /// this branching factor: one level shallower than the first depth
    /// predicted to reach the allowance, never below 1. If no tabulated depth
    /// reaches it, the deepest tabulated depth.
    pub fn suggested_depth(&self, branching: usize) -> u8 {
        let row = match self.predicted.row(branching) {
            Some(row) if !row.is_empty() => row,
            _ => return 1,
        };
        let allowance = self.move_allowance().as_secs_f64();

        let depth = match row.iter().position(|&predicted| predicted >= allowance) {
            Some(depth) => depth.saturating_sub(1).max(1),
            None => (row.len() - 1).max(1),
        };

        debug!(
            "branching {} allowance {:.3}s: depth {}",
            branching, allowance, depth
        );
        depth.min(u8::MAX as usize) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PredictedTimes {
        PredictedTimes::new(vec![
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.1, 0.5, 2.0, 9.0],
            vec![0.0, 0.2, 1.0, 6.0, 40.0],
        ])
    }

    #[test]
    fn test_allowance_splits_remaining_time() {
        let budget = TimeBudget::with_predicted_times(Duration::from_secs(28), table());
        assert_eq!(budget.moves_left(), DEFAULT_MOVES_LEFT);
        assert_eq!(budget.move_allowance(), Duration::from_secs(2));
    }

    #[test]
    fn test_record_charges_clock() {
        let mut budget = TimeBudget::with_predicted_times(Duration::from_secs(28), table());
        budget.record(Duration::from_secs(3));

        assert_eq!(budget.time_left(), Duration::from_secs(25));
        assert_eq!(budget.moves_left(), DEFAULT_MOVES_LEFT - 1);
        assert_eq!(budget.last_elapsed(), Some(Duration::from_secs(3)));
        assert_eq!(budget.total_elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn test_clock_never_goes_negative() {
        let mut budget = TimeBudget::with_predicted_times(Duration::from_secs(1), table());
        budget.set_moves_left(1);
        budget.record(Duration::from_secs(5));
        budget.record(Duration::from_secs(5));

        assert_eq!(budget.time_left(), Duration::ZERO);
        assert_eq!(budget.moves_left(), 0);
        assert_eq!(budget.move_allowance(), Duration::ZERO);
    }

    #[test]
    fn test_click_alternates_start_and_stop() {
        let mut budget = TimeBudget::new(Duration::from_secs(10));
        assert!(!budget.is_running());

        budget.click();
        assert!(budget.is_running());
        assert_eq!(budget.last_elapsed(), None);

        budget.click();
        assert!(!budget.is_running());
        assert!(budget.last_elapsed().is_some());
        assert_eq!(budget.moves_left(), DEFAULT_MOVES_LEFT - 1);
        assert!(budget.time_left() <= Duration::from_secs(10));

        budget.click();
        assert!(budget.is_running());
        assert_eq!(budget.last_elapsed(), None);
    }

    #[test]
    fn test_suggested_depth_backs_off_one_level() {
        // allowance 2s: branching 1 first reaches it at depth 3
        let budget = TimeBudget::with_predicted_times(Duration::from_secs(28), table());
        assert_eq!(budget.suggested_depth(1), 2);
        // branching 2 first reaches it at depth 3 (6.0s)
        assert_eq!(budget.suggested_depth(2), 2);
    }

    #[test]
    fn test_suggested_depth_uses_deepest_when_affordable() {
        let budget = TimeBudget::with_predicted_times(Duration::from_secs(1400), table());
        // allowance 100s exceeds every prediction
        assert_eq!(budget.suggested_depth(1), 4);
        assert_eq!(budget.suggested_depth(0), 2);
    }

    #[test]
    fn test_suggested_depth_is_at_least_one() {
        let budget = TimeBudget::with_predicted_times(Duration::ZERO, table());
        assert_eq!(budget.suggested_depth(1), 1);
        assert_eq!(budget.suggested_depth(2), 1);
    }

    #[test]
    fn test_wide_branching_uses_last_row() {
        let budget = TimeBudget::with_predicted_times(Duration::from_secs(28), table());
        assert_eq!(budget.suggested_depth(50), budget.suggested_depth(2));
    }

    #[test]
    fn test_estimated_table_is_monotonic() {
        let predicted = PredictedTimes::default();
        assert_eq!(predicted.max_depth(), MAX_TABULATED_DEPTH);

        for branching in [1usize, 8, 24, 64].iter() {
            let row = predicted.row(*branching).unwrap();
            assert_eq!(row[0], 0.0);
            assert!(row.windows(2).all(|pair| pair[0] <= pair[1]));
        }

        // wider positions are never cheaper
        let narrow = predicted.row(10).unwrap();
        let wide = predicted.row(30).unwrap();
        assert!(narrow.iter().zip(wide.iter()).all(|(n, w)| n <= w));
    }

    #[test]
    fn test_more_time_allows_deeper_search() {
        let hurried = TimeBudget::new(Duration::from_secs(1));
        let relaxed = TimeBudget::new(Duration::from_secs(3600));
        assert!(hurried.suggested_depth(30) <= relaxed.suggested_depth(30));
        assert!(hurried.suggested_depth(30) >= 1);
    }
}
