//! CLI argument parsing using StructOpt.

use structopt::StructOpt;

use crate::cli::commands::{
    calculate_best_move::CalculateBestMoveArgs, count_positions::CountPositionsArgs,
    watch::WatchArgs,
};

#[derive(StructOpt)]
#[structopt(
    name = "domineering",
    about = "A Domineering engine using alpha-beta search with a shared transposition table"
)]
pub enum Domineering {
    #[structopt(
        name = "watch",
        about = "Watch the computer play against itself, or against a random player with `--opponent random`. The board is `--rows` by `--cols` (default: 8x8) unless a `--position` is given. Without `--depth` each move's depth is picked from the `--time` budget."
    )]
    Watch(WatchArgs),
    #[structopt(
        name = "calculate-best-move",
        about = "Determine the best placement for the side to move in a `--position` given as rows of `.`, `H` and `V` separated by `/` (required). The side to move defaults to horizontal and can be set with `--turn`."
    )]
    CalculateBestMove(CalculateBestMoveArgs),
    #[structopt(
        name = "count-positions",
        about = "Count the number of positions reachable at each depth up to `--depth` (default: 4) on an empty `--rows` by `--cols` board, and report the time it took to do so. The routine can be run with alpha-beta pruning by selecting `--strategy alpha-beta`."
    )]
    CountPositions(CountPositionsArgs),
}

impl crate::cli::commands::Command for Domineering {
    fn execute(self) {
        macro_rules! execute_command {
            ($($variant:ident($cmd:ident)),+ $(,)?) => {
                match self {
                    $(Self::$variant($cmd) => $cmd.execute(),)+
                }
            };
        }

        execute_command! {
            Watch(cmd),
            CalculateBestMove(cmd),
            CountPositions(cmd),
        }
    }
}
