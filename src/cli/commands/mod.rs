//! CLI command implementations.

pub trait Command {
    fn execute(self);
}

pub mod calculate_best_move;
pub mod count_positions;
pub mod watch;

// Shared engine options
pub(crate) mod util;
