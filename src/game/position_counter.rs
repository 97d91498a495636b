use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::alpha_beta_searcher::SearchError;
use crate::board::{Board, BoardError};
use crate::domineering_search::{search_best_move, DomineeringContext};
use crate::move_generator::generate_placements;

#[derive(Error, Debug, PartialEq)]
pub enum CountPositionsError {
    #[error("Board error: {error}")]
    BoardError { error: BoardError },
    #[error("Search error at depth {depth}: {error}")]
    SearchError { depth: u8, error: SearchError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountPositionsStrategy {
    All,
    AlphaBeta,
}

impl FromStr for CountPositionsStrategy {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(CountPositionsStrategy::All),
            "alpha-beta" => Ok(CountPositionsStrategy::AlphaBeta),
            _ => Err("invalid strategy; options are: all, alpha-beta"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthCount {
    pub depth: u8,
    pub positions: usize,
    pub duration: Duration,
}

/// Counts every position reachable in exactly `depth` plies. A position where
/// the mover is stuck ends its line early and is not counted at deeper plies.
pub fn count_positions(board: &mut Board, depth: u8) -> Result<usize, BoardError> {
    if depth == 0 {
        return Ok(1);
    }

    let mut count = 0;
    for placement in generate_placements(board, board.turn()) {
        board.place(&placement)?;
        board.toggle_turn();
        let below = count_positions(board, depth - 1);
        board.toggle_turn();
        board.remove(&placement)?;
        count += below?;
    }
    Ok(count)
}

pub fn count_positions_by_depth(
    board: &Board,
    depth: u8,
    strategy: CountPositionsStrategy,
) -> Result<Vec<DepthCount>, CountPositionsError> {
    (1..=depth)
        .map(|depth| {
            let mut board = board.clone();
            let started = Instant::now();
            let positions = match strategy {
                CountPositionsStrategy::All => count_positions(&mut board, depth)
                    .map_err(|error| CountPositionsError::BoardError { error })?,
                CountPositionsStrategy::AlphaBeta => {
                    let mut search_context = DomineeringContext::new(depth);
                    let result = search_best_move(&mut search_context, &mut board);
                    search_context.shutdown();
                    result.map_err(|error| CountPositionsError::SearchError { depth, error })?;
                    search_context.searched_position_count()
                }
            };
            Ok(DepthCount {
                depth,
                positions,
                duration: started.elapsed(),
            })
        })
        .collect()
}

pub fn run_count_positions(rows: usize, cols: usize, depth: u8, strategy: CountPositionsStrategy) {
    let board = match Board::new(rows, cols) {
        Ok(board) => board,
        Err(error) => {
            println!("error: {}", error);
            return;
        }
    };

    let mut total_positions = 0;
    let mut total_duration = Duration::from_secs(0);

    let counts = match count_positions_by_depth(&board, depth, strategy) {
        Ok(counts) => counts,
        Err(error) => {
            println!("error: {}", error);
            return;
        }
    };

    for count in counts {
        let positions_per_second = count.positions as f64 / count.duration.as_secs_f64();

        total_positions += count.positions;
        total_duration += count.duration;

        println!(
            "depth: {}, positions: {}, positions per second: {}",
            count.depth, count.positions, positions_per_second
        );
    }

    println!(
        "total positions: {}, total duration: {:?}, positions per second: {}",
        total_positions,
        total_duration,
        total_positions as f64 / total_duration.as_secs_f64()
    );
}
