//! Calculate best move command - determine the best placement from a position.

use domineering::board::{Board, Side};
use domineering::game::engine::Engine;
use structopt::StructOpt;

use super::util::{create_config, EngineArgs};
use super::Command;

#[derive(StructOpt)]
pub struct CalculateBestMoveArgs {
    #[structopt(long = "position")]
    pub starting_position: Board,
    #[structopt(long, default_value = "horizontal")]
    pub turn: Side,
    #[structopt(flatten)]
    pub engine: EngineArgs,
}

impl Command for CalculateBestMoveArgs {
    fn execute(mut self) {
        self.starting_position.set_turn(self.turn);
        let rows = self.starting_position.rows();
        let cols = self.starting_position.cols();
        let mut config = create_config(&self.engine, rows, cols, Some(self.starting_position));
        if config.search_depth.is_none() {
            config.search_depth = Some(4);
        }

        let mut engine = match Engine::with_config(config) {
            Ok(engine) => engine,
            Err(err) => {
                eprintln!("Failed to start engine: {}", err);
                return;
            }
        };

        if engine.valid_placements().is_empty() {
            eprintln!("There are no valid placements in the given position.");
            return;
        }

        match engine.get_best_move() {
            Ok(best_move) => println!("{}", best_move),
            Err(err) => eprintln!("Failed to calculate best move: {}", err),
        }
        engine.shutdown();
    }
}
