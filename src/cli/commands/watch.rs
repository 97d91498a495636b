//! Watch command - watch the computer play a full game.

use std::str::FromStr;

use domineering::board::Board;
use domineering::game::computer_vs_computer::{computer_vs_computer, play_game, Player};
use domineering::game::random_player::RandomPlayer;
use structopt::StructOpt;

use super::util::{create_config, EngineArgs};
use super::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    Computer,
    Random,
}

impl FromStr for Opponent {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "computer" => Ok(Opponent::Computer),
            "random" => Ok(Opponent::Random),
            _ => Err("invalid opponent; options are: computer, random"),
        }
    }
}

#[derive(StructOpt)]
pub struct WatchArgs {
    #[structopt(long, default_value = "8")]
    pub rows: usize,
    #[structopt(long, default_value = "8")]
    pub cols: usize,
    #[structopt(long = "position")]
    pub starting_position: Option<Board>,
    #[structopt(long, default_value = "computer", help = "Vertical player: computer or random")]
    pub opponent: Opponent,
    #[structopt(
        long = "delay",
        default_value = "0",
        help = "Delay between moves in milliseconds"
    )]
    pub delay_ms: u64,
    #[structopt(flatten)]
    pub engine: EngineArgs,
}

impl Command for WatchArgs {
    fn execute(self) {
        let config = create_config(&self.engine, self.rows, self.cols, self.starting_position);

        if self.opponent == Opponent::Computer {
            computer_vs_computer(config, self.delay_ms);
            return;
        }

        let board = match config.starting_position.clone() {
            Some(board) => Ok(board),
            None => Board::new(config.rows, config.cols),
        };
        let board = match board {
            Ok(board) => board,
            Err(err) => {
                eprintln!("{}", err);
                return;
            }
        };

        let mut horizontal = match Player::computer(config) {
            Ok(player) => player,
            Err(err) => {
                eprintln!("Failed to start engine: {}", err);
                return;
            }
        };
        let mut vertical = Player::Random(RandomPlayer::new());

        println!("{}\n", board);
        match play_game(board, &mut horizontal, &mut vertical, self.delay_ms, true) {
            Ok(record) => println!("{} wins after {} moves", record.winner, record.moves.len()),
            Err(err) => eprintln!("{}", err),
        }
    }
}
