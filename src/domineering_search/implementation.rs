//! Domineering trait implementations for the alpha-beta search.

use smallvec::SmallVec;

use crate::alpha_beta_searcher::{
    alpha_beta_search, Evaluator, GameMove, GameState, MoveGenerator, Score, SearchContext,
    SearchError,
};
use crate::board::{error::BoardError, Board, BoardKey};
use crate::evaluate::WeightedEvaluator;
use crate::move_generator::{self, PlacementList};
use crate::placement::Placement;

pub type DomineeringContext = SearchContext<BoardKey, Placement>;

impl GameState for Board {
    type Key = BoardKey;

    #[inline]
    fn position_key(&self) -> BoardKey {
        Board::position_key(self)
    }

    #[inline]
    fn symmetric_keys(&self) -> SmallVec<[BoardKey; 4]> {
        Board::symmetric_keys(self)
    }

    #[inline]
    fn is_maximizing_player(&self) -> bool {
        self.turn().maximize_score()
    }

    #[inline]
    fn toggle_turn(&mut self) {
        Board::toggle_turn(self);
    }
}

impl GameMove for Placement {
    type State = Board;
    type Error = BoardError;

    #[inline]
    fn apply(&self, state: &mut Board) -> Result<(), BoardError> {
        state.place(self)
    }

    #[inline]
    fn undo(&self, state: &mut Board) -> Result<(), BoardError> {
        state.remove(self)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DomineeringMoveGenerator;

impl MoveGenerator<Board> for DomineeringMoveGenerator {
    type Move = Placement;
    type MoveList = PlacementList;

    #[inline]
    fn generate_moves(&self, state: &Board) -> PlacementList {
        move_generator::generate_placements(state, state.turn())
    }

    #[inline]
    fn has_moves(&self, state: &Board) -> bool {
        move_generator::has_legal_placement(state, state.turn())
    }
}

impl Evaluator<Board> for WeightedEvaluator {
    #[inline]
    fn evaluate(&self, state: &Board) -> Score {
        self.score(state)
    }
}

/// Searches for the best placement for the side to move, scoring leaves
/// with the default feature weights.
#[must_use = "search returns the best move found"]
pub fn search_best_move(
    context: &mut DomineeringContext,
    board: &mut Board,
) -> Result<Placement, SearchError> {
    search_best_move_with(context, board, &WeightedEvaluator::default())
}

#[must_use = "search returns the best move found"]
pub fn search_best_move_with(
    context: &mut DomineeringContext,
    board: &mut Board,
    evaluator: &WeightedEvaluator,
) -> Result<Placement, SearchError> {
    alpha_beta_search(context, board, &DomineeringMoveGenerator, evaluator)
}
