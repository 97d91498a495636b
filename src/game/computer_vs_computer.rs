use std::thread::sleep;
use std::time::Duration;

use log::info;

use crate::board::{Board, Side};
use crate::game::engine::{Engine, EngineConfig, EngineError};
use crate::game::random_player::RandomPlayer;
use crate::placement::Placement;

/// Who plays a side in a watched game.
pub enum Player {
    Computer(Box<Engine>),
    Random(RandomPlayer),
}

impl Player {
    pub fn computer(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Player::Computer(Box::new(Engine::with_config(config)?)))
    }

    fn choose(&mut self, board: &Board) -> Result<Option<Placement>, EngineError> {
        match self {
            Player::Computer(engine) => engine.get_best_move().map(Some),
            Player::Random(random) => Ok(random.choose(board)),
        }
    }

    /// Keeps a computer player's own board in step with the game.
    fn observe(&mut self, placement: Placement) -> Result<(), EngineError> {
        match self {
            Player::Computer(engine) => engine.apply_placement(placement),
            Player::Random(_) => Ok(()),
        }
    }

    fn shutdown(&mut self) {
        if let Player::Computer(engine) = self {
            engine.shutdown();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub winner: Side,
    pub moves: Vec<Placement>,
    pub final_board: Board,
}

/// Plays `horizontal` against `vertical` from `board` until one side is
/// stuck. Both players see every placement.
pub fn play_game(
    mut board: Board,
    horizontal: &mut Player,
    vertical: &mut Player,
    sleep_between_turns_in_ms: u64,
    print_board: bool,
) -> Result<GameRecord, EngineError> {
    let mut moves = Vec::new();

    let winner = loop {
        if let Some(winner) = board.winner() {
            break winner;
        }

        let side = board.turn();
        let (mover, other) = match side {
            Side::Horizontal => (&mut *horizontal, &mut *vertical),
            Side::Vertical => (&mut *vertical, &mut *horizontal),
        };

        let placement = match mover.choose(&board)? {
            Some(placement) => placement,
            None => break side.opposite(),
        };

        if !board.is_legal(&placement, side) {
            return Err(EngineError::InvalidMove { placement });
        }
        board
            .place(&placement)
            .map_err(|error| EngineError::BoardError { error })?;
        board.toggle_turn();
        mover.observe(placement)?;
        other.observe(placement)?;
        moves.push(placement);

        info!("{} played {}", side, placement);
        if print_board {
            println!("{} played {}\n{}\n", side, placement, board);
        }
        if sleep_between_turns_in_ms > 0 {
            sleep(Duration::from_millis(sleep_between_turns_in_ms));
        }
    };

    horizontal.shutdown();
    vertical.shutdown();

    Ok(GameRecord {
        winner,
        moves,
        final_board: board,
    })
}

pub fn computer_vs_computer(config: EngineConfig, sleep_between_turns_in_ms: u64) {
    let board = match config.starting_position.clone() {
        Some(board) => Ok(board),
        None => Board::new(config.rows, config.cols),
    };
    let board = match board {
        Ok(board) => board,
        Err(error) => {
            println!("error: {}", error);
            return;
        }
    };

    let players = Player::computer(config.clone())
        .and_then(|horizontal| Ok((horizontal, Player::computer(config)?)));
    let (mut horizontal, mut vertical) = match players {
        Ok(players) => players,
        Err(error) => {
            println!("error: {}", error);
            return;
        }
    };

    println!("{}\n", board);
    match play_game(board, &mut horizontal, &mut vertical, sleep_between_turns_in_ms, true) {
        Ok(record) => println!("{} wins after {} moves", record.winner, record.moves.len()),
        Err(error) => println!("error: {}", error),
    }
}
