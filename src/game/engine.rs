use std::time::Duration;

use log::info;
use thiserror::Error;

use crate::alpha_beta_searcher::{Score, SearchError};
use crate::board::error::BoardError;
use crate::board::{Board, Side};
use crate::domineering_search::{search_best_move_with, DomineeringContext};
use crate::evaluate::{WeightedEvaluator, DEFAULT_OPEN_WEIGHT, DEFAULT_RESERVED_WEIGHT};
use crate::move_generator::{self, PlacementList};
use crate::placement::Placement;
use crate::time_budget::{TimeBudget, DEFAULT_TOTAL_TIME};

pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLS: usize = 8;
pub const DEFAULT_CACHE_SIZE_MB: usize = 64;

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Fixed search depth. `None` lets the time budget pick one per move.
    pub search_depth: Option<u8>,
    pub total_time: Duration,
    pub cache_size_mb: usize,
    pub reserved_weight: Score,
    pub open_weight: Score,
    pub move_ordering: bool,
    /// Overrides `rows` and `cols` when set.
    pub starting_position: Option<Board>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            search_depth: Some(4),
            total_time: DEFAULT_TOTAL_TIME,
            cache_size_mb: DEFAULT_CACHE_SIZE_MB,
            reserved_weight: DEFAULT_RESERVED_WEIGHT,
            open_weight: DEFAULT_OPEN_WEIGHT,
            move_ordering: true,
            starting_position: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid move: {placement}")]
    InvalidMove { placement: Placement },
    #[error("Game is over, {winner} won")]
    GameOver { winner: Side },
    #[error("Board error: {error}")]
    BoardError { error: BoardError },
    #[error("Search error: {error}")]
    SearchError { error: SearchError },
}

/// Search performance statistics
#[derive(Debug, Clone)]
pub struct SearchStats {
    pub positions_searched: usize,
    pub depth: u8,
    pub last_score: Option<Score>,
    pub last_score_exact: bool,
    pub last_search_duration: Option<Duration>,
    pub cache_entries: usize,
}

/// Plays one game: owns the position, the search state and the clock.
pub struct Engine {
    board: Board,
    search_context: DomineeringContext,
    evaluator: WeightedEvaluator,
    time_budget: TimeBudget,
    fixed_depth: Option<u8>,
    move_history: Vec<Placement>,
    last_score: Option<Score>,
}

impl Engine {
    pub fn new() -> Result<Self, EngineError> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        let board = match config.starting_position {
            Some(board) => board,
            None => Board::new(config.rows, config.cols)
                .map_err(|error| EngineError::BoardError { error })?,
        };

        let mut search_context = DomineeringContext::with_cache_size(
            config.search_depth.unwrap_or(1),
            config.cache_size_mb,
        );
        search_context.set_move_ordering(config.move_ordering);

        Ok(Self {
            board,
            search_context,
            evaluator: WeightedEvaluator::with_weights(config.reserved_weight, config.open_weight),
            time_budget: TimeBudget::new(config.total_time),
            fixed_depth: config.search_depth,
            move_history: Vec::new(),
            last_score: None,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn valid_placements(&self) -> PlacementList {
        move_generator::generate_placements(&self.board, self.board.turn())
    }

    pub fn winner(&self) -> Option<Side> {
        self.board.winner()
    }

    pub fn last_move(&self) -> Option<Placement> {
        self.move_history.last().copied()
    }

    pub fn move_history(&self) -> &[Placement] {
        &self.move_history
    }

    /// Plays `placement` for the side to move and passes the turn.
    pub fn apply_placement(&mut self, placement: Placement) -> Result<(), EngineError> {
        if let Some(winner) = self.winner() {
            return Err(EngineError::GameOver { winner });
        }
        if !self.board.is_legal(&placement, self.board.turn()) {
            return Err(EngineError::InvalidMove { placement });
        }

        self.board
            .place(&placement)
            .map_err(|error| EngineError::BoardError { error })?;
        self.board.toggle_turn();
        self.move_history.push(placement);
        Ok(())
    }

    /// Searches the current position and returns the chosen placement
    /// without playing it. Time spent is charged to the clock.
    pub fn get_best_move(&mut self) -> Result<Placement, EngineError> {
        if let Some(winner) = self.winner() {
            return Err(EngineError::GameOver { winner });
        }

        self.time_budget.click();
        let depth = self.choose_depth();
        self.search_context.set_search_depth(depth);

        let result = search_best_move_with(
            &mut self.search_context,
            &mut self.board,
            &self.evaluator,
        );
        self.time_budget.click();

        let best_move = result.map_err(|error| EngineError::SearchError { error })?;
        self.last_score = self.search_context.last_score();

        info!(
            "{} plays {} at depth {} (score {:?}, {:?} left)",
            self.board.turn(),
            best_move,
            depth,
            self.last_score,
            self.time_budget.time_left()
        );

        Ok(best_move)
    }

    pub fn make_best_move(&mut self) -> Result<Placement, EngineError> {
        let best_move = self.get_best_move()?;
        self.apply_placement(best_move)?;
        Ok(best_move)
    }

    pub fn time_left(&self) -> Duration {
        self.time_budget.time_left()
    }

    pub fn time_budget(&self) -> &TimeBudget {
        &self.time_budget
    }

    pub fn last_score(&self) -> Option<Score> {
        self.last_score
    }

    pub fn get_search_stats(&self) -> SearchStats {
        SearchStats {
            positions_searched: self.search_context.searched_position_count(),
            depth: self.search_context.search_depth(),
            last_score: self.last_score,
            last_score_exact: self.search_context.last_score_exact(),
            last_search_duration: self.search_context.last_search_duration(),
            cache_entries: self.search_context.tt_size(),
        }
    }

    pub fn reset_cache(&mut self) {
        self.search_context.reset_cache();
    }

    /// Joins any background work. Call before dropping the engine at the end
    /// of a game.
    pub fn shutdown(&mut self) {
        self.search_context.shutdown();
    }

    fn choose_depth(&self) -> u8 {
        match self.fixed_depth {
            Some(depth) => depth.max(1),
            None => {
                let branching = move_generator::count_placements(&self.board, self.board.turn());
                self.time_budget.suggested_depth(branching)
            }
        }
    }
}
