//! Domain-agnostic tests for the alpha-beta search algorithm using Nim.
//!
//! Test coverage:
//! - Basic search functionality (winning moves, losing positions, game completion)
//! - Error handling (zero depth, no moves, failing moves, reserved scores)
//! - Agreement with a plain minimax reference at several depth limits
//! - Transposition table use (hits, stored bounds)
//! - Background move ordering across consecutive searches

use super::*;

/// State of a Nim game: players take 1-3 objects, a player facing an empty
/// pile has no move and loses.
#[derive(Clone, Debug)]
struct NimState {
    pile: u8,
    is_player_one_turn: bool,
    moves_made: u8,
}

impl NimState {
    fn new(pile: u8) -> Self {
        Self {
            pile,
            is_player_one_turn: true,
            moves_made: 0,
        }
    }
}

impl GameState for NimState {
    type Key = (u8, bool, u8);

    fn position_key(&self) -> Self::Key {
        (self.pile, self.is_player_one_turn, self.moves_made)
    }

    fn is_maximizing_player(&self) -> bool {
        self.is_player_one_turn
    }

    fn toggle_turn(&mut self) {
        self.is_player_one_turn = !self.is_player_one_turn;
    }
}

#[derive(Clone, Debug, PartialEq)]
struct NimMove {
    take: u8,
}

impl GameMove for NimMove {
    type State = NimState;
    type Error = &'static str;

    fn apply(&self, state: &mut NimState) -> Result<(), Self::Error> {
        if self.take > state.pile || self.take == 0 || self.take > 3 {
            return Err("Invalid move");
        }
        state.pile -= self.take;
        state.moves_made += 1;
        Ok(())
    }

    fn undo(&self, state: &mut NimState) -> Result<(), Self::Error> {
        state.pile += self.take;
        state.moves_made -= 1;
        Ok(())
    }
}

#[derive(Clone)]
struct NimMoveGenerator;

impl MoveGenerator<NimState> for NimMoveGenerator {
    type Move = NimMove;
    type MoveList = Vec<NimMove>;

    fn generate_moves(&self, state: &NimState) -> Vec<NimMove> {
        (1..=std::cmp::min(3, state.pile))
            .map(|take| NimMove { take })
            .collect()
    }
}

/// Offers a move that can never be applied.
#[derive(Clone)]
struct OversizedMoveGenerator;

impl MoveGenerator<NimState> for OversizedMoveGenerator {
    type Move = NimMove;
    type MoveList = Vec<NimMove>;

    fn generate_moves(&self, state: &NimState) -> Vec<NimMove> {
        if state.pile == 0 {
            return vec![];
        }
        vec![NimMove { take: 4 }]
    }
}

#[derive(Clone)]
struct NimEvaluator;

impl Evaluator<NimState> for NimEvaluator {
    fn evaluate(&self, state: &NimState) -> Score {
        // pile % 4 == 0 is a losing position for the player to move
        let mover_is_losing = state.pile % 4 == 0;
        if mover_is_losing == state.is_player_one_turn {
            -100
        } else {
            100
        }
    }
}

#[derive(Clone)]
struct ReservedScoreEvaluator;

impl Evaluator<NimState> for ReservedScoreEvaluator {
    fn evaluate(&self, _state: &NimState) -> Score {
        POS_INF
    }
}

/// Plain minimax with the same horizon and terminal conventions as the
/// search. Returns the value and the number of nodes visited.
fn minimax(state: &mut NimState, depth: u8, limit: u8) -> (Score, usize) {
    let moves = NimMoveGenerator.generate_moves(state);
    let maximizing = state.is_maximizing_player();

    if moves.is_empty() {
        return (bounds::loss_for(maximizing), 1);
    }
    if depth >= limit {
        return (NimEvaluator.evaluate(state), 1);
    }

    let mut best = if maximizing { NEG_INF } else { POS_INF };
    let mut visited = 1;
    for game_move in moves.iter() {
        game_move.apply(state).unwrap();
        state.toggle_turn();
        let (score, count) = minimax(state, depth + 1, limit);
        state.toggle_turn();
        game_move.undo(state).unwrap();

        visited += count;
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    (best, visited)
}

fn search(context: &mut SearchContext<(u8, bool, u8), NimMove>, state: &mut NimState) -> NimMove {
    alpha_beta_search(context, state, &NimMoveGenerator, &NimEvaluator).unwrap()
}

#[test]
fn test_nim_finds_winning_move_from_5() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::new(10);

    let best_move = search(&mut context, &mut state);

    assert_eq!(
        best_move.take, 1,
        "From pile of 5, should take 1 to leave opponent with 4"
    );
    assert_eq!(context.last_score(), Some(POS_INF));
    assert!(context.last_score_exact());
}

#[test]
fn test_nim_finds_winning_move_from_6() {
    let mut state = NimState::new(6);
    let mut context = SearchContext::new(10);

    let best_move = search(&mut context, &mut state);

    assert_eq!(
        best_move.take, 2,
        "From pile of 6, should take 2 to leave opponent with 4"
    );
}

#[test]
fn test_nim_finds_winning_move_from_7() {
    let mut state = NimState::new(7);
    let mut context = SearchContext::new(10);

    let best_move = search(&mut context, &mut state);

    assert_eq!(
        best_move.take, 3,
        "From pile of 7, should take 3 to leave opponent with 4"
    );
}

#[test]
fn test_nim_losing_position() {
    let mut state = NimState::new(4);
    let mut context = SearchContext::new(10);

    let best_move = search(&mut context, &mut state);

    assert!(
        best_move.take >= 1 && best_move.take <= 3,
        "Move should be valid (1-3)"
    );
    assert_eq!(context.last_score(), Some(NEG_INF));
}

#[test]
fn test_nim_exhaustive_winning_positions() {
    for pile in 1..=15 {
        if pile % 4 == 0 {
            continue;
        }

        let mut state = NimState::new(pile);
        let mut context = SearchContext::new(20);

        let best_move = search(&mut context, &mut state);
        let remaining = pile - best_move.take;
        assert_eq!(
            remaining % 4,
            0,
            "From pile {}, taking {} leaves {} which should be a multiple of 4",
            pile,
            best_move.take,
            remaining
        );
    }
}

#[test]
fn test_nim_game_to_completion() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::new(12);
    let mut move_count = 0;

    while state.pile > 0 {
        let best_move = search(&mut context, &mut state);

        best_move.apply(&mut state).unwrap();
        state.toggle_turn();
        move_count += 1;

        assert!(move_count < 20, "Game should not exceed 20 moves");
    }

    assert!(
        !state.is_player_one_turn,
        "Player one should win from pile of 5"
    );
}

#[test]
fn test_search_returns_error_for_zero_depth() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::new(0);

    let result = alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator);

    assert_eq!(result, Err(SearchError::DepthTooLow));
}

#[test]
fn test_search_returns_error_for_no_moves() {
    let mut state = NimState::new(0);
    let mut context = SearchContext::new(5);

    let result = alpha_beta_search(&mut context, &mut state, &NimMoveGenerator, &NimEvaluator);

    assert_eq!(result, Err(SearchError::NoAvailableMoves));
}

#[test]
fn test_failed_move_application_is_reported() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::new(3);

    let result = alpha_beta_search(
        &mut context,
        &mut state,
        &OversizedMoveGenerator,
        &NimEvaluator,
    );

    assert!(matches!(result, Err(SearchError::MoveApplication(_))));
    assert_eq!(state.pile, 5);
    assert!(state.is_player_one_turn);
}

#[test]
#[should_panic(expected = "reserved score")]
fn test_reserved_evaluator_score_is_rejected() {
    let mut state = NimState::new(9);
    let mut context = SearchContext::new(1);

    let _ = alpha_beta_search(
        &mut context,
        &mut state,
        &NimMoveGenerator,
        &ReservedScoreEvaluator,
    );
}

#[test]
fn test_search_restores_state() {
    let mut state = NimState::new(11);
    let mut context = SearchContext::new(6);

    let _ = search(&mut context, &mut state);

    assert_eq!(state.pile, 11);
    assert!(state.is_player_one_turn);
    assert_eq!(state.moves_made, 0);
}

#[test]
fn test_root_score_matches_minimax() {
    for pile in 1..=11 {
        for limit in 1..=6 {
            for player_one in [true, false].iter() {
                let mut state = NimState::new(pile);
                state.is_player_one_turn = *player_one;
                let (expected, _) = minimax(&mut state, 0, limit);

                let mut context = SearchContext::new(limit);
                let _ = search(&mut context, &mut state);

                assert_eq!(
                    context.last_score(),
                    Some(expected),
                    "pile {} depth {} player one {}",
                    pile,
                    limit,
                    player_one
                );
                assert!(context.last_score_exact());
            }
        }
    }
}

#[test]
fn test_chosen_move_achieves_root_score() {
    for pile in 1..=10 {
        let limit = 5;
        let mut state = NimState::new(pile);
        let mut context = SearchContext::new(limit);
        let best_move = search(&mut context, &mut state);

        best_move.apply(&mut state).unwrap();
        state.toggle_turn();
        let (after_move, _) = minimax(&mut state, 1, limit);

        assert_eq!(context.last_score(), Some(after_move), "pile {}", pile);
    }
}

#[test]
fn test_pruning_visits_no_more_than_minimax() {
    let mut state = NimState::new(12);
    let limit = 8;
    let (_, minimax_nodes) = minimax(&mut state, 0, limit);

    let mut context = SearchContext::new(limit);
    let _ = search(&mut context, &mut state);

    assert!(context.searched_position_count() > 0);
    assert!(
        context.searched_position_count() <= minimax_nodes,
        "alpha-beta visited {} nodes, minimax {}",
        context.searched_position_count(),
        minimax_nodes
    );
}

#[test]
fn test_best_slot_holds_root_move() {
    let mut state = NimState::new(7);
    let mut context = SearchContext::new(8);

    let best_move = search(&mut context, &mut state);

    let root_slot = context.best_at_depth(0).expect("root slot should be set");
    assert_eq!(root_slot.parent_move.as_ref(), Some(&best_move));
    assert_eq!(root_slot.depth, 1);
    assert!(!root_slot.maximizing);
}

#[test]
fn test_transposition_table_is_used() {
    let mut state = NimState::new(10);
    let mut context = SearchContext::new(10);

    let _ = search(&mut context, &mut state);

    assert!(context.tt_size() > 0);
    assert!(context.transposition_table().hits() > 0);

    // every stored envelope is ordered
    let root_key = state.position_key();
    let entry = context
        .transposition_table()
        .get(&root_key)
        .expect("root should be stored");
    assert!(entry.lower_limit <= entry.upper_limit);
    assert!(entry.nodes_searched as usize <= context.searched_position_count());
}

#[test]
fn test_cache_is_cleared_between_searches() {
    let mut state = NimState::new(9);
    let mut context = SearchContext::new(6);

    let _ = search(&mut context, &mut state);
    let first_count = context.searched_position_count();
    let _ = search(&mut context, &mut state);

    assert_eq!(context.searched_position_count(), first_count);
}

#[test]
fn test_reset_cache_empties_table() {
    let mut state = NimState::new(9);
    let mut context = SearchContext::new(6);

    let _ = search(&mut context, &mut state);
    context.reset_cache();

    assert_eq!(context.tt_size(), 0);
    assert!(context.best_at_depth(0).is_none());
}

#[test]
fn test_background_ordering_feeds_next_root() {
    let mut state = NimState::new(12);
    let mut context = SearchContext::new(6);

    let _ = search(&mut context, &mut state);
    assert!(!context.root_was_preordered());

    // our move, then the opponent's reply
    NimMove { take: 1 }.apply(&mut state).unwrap();
    state.toggle_turn();
    NimMove { take: 1 }.apply(&mut state).unwrap();
    state.toggle_turn();

    let best_move = search(&mut context, &mut state);

    assert!(context.root_was_preordered());
    assert_eq!(best_move.take, 2, "From pile of 10, should take 2");
}

#[test]
fn test_stale_ordering_is_not_used() {
    let mut state = NimState::new(12);
    let mut context = SearchContext::new(6);

    let _ = search(&mut context, &mut state);

    // a position the previous search never reached two plies down
    let mut unrelated = NimState::new(3);
    let best_move = search(&mut context, &mut unrelated);

    assert!(!context.root_was_preordered());
    assert_eq!(best_move.take, 3);
}

#[test]
fn test_ordering_disabled_gives_same_result() {
    for pile in 5..=12 {
        let mut ordered_state = NimState::new(pile);
        let mut ordered = SearchContext::new(6);
        let mut plain_state = NimState::new(pile);
        let mut plain = SearchContext::new(6);
        plain.set_move_ordering(false);

        let _ = search(&mut ordered, &mut ordered_state);
        let _ = search(&mut plain, &mut plain_state);

        assert_eq!(ordered.last_score(), plain.last_score(), "pile {}", pile);
        assert!(!plain.root_was_preordered());
    }
}

#[test]
fn test_shutdown_discards_pending_ordering() {
    let mut state = NimState::new(12);
    let mut context = SearchContext::new(6);

    let _ = search(&mut context, &mut state);
    context.shutdown();

    NimMove { take: 1 }.apply(&mut state).unwrap();
    state.toggle_turn();
    NimMove { take: 1 }.apply(&mut state).unwrap();
    state.toggle_turn();

    let _ = search(&mut context, &mut state);
    assert!(!context.root_was_preordered());
}
