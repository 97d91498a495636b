use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::Board;
use crate::move_generator::generate_placements;
use crate::placement::Placement;

/// Opponent that plays a uniformly random legal placement.
pub struct RandomPlayer {
    rng: StdRng,
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn choose(&mut self, board: &Board) -> Option<Placement> {
        generate_placements(board, board.turn())
            .choose(&mut self.rng)
            .copied()
    }
}
