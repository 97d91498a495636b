//! Core traits for generic alpha-beta search.

use std::fmt::Debug;
use std::hash::Hash;

use smallvec::{smallvec, SmallVec};

use super::bounds::Score;

/// Represents the state of a two-player zero-sum game in which a player
/// with no legal move loses.
pub trait GameState: Clone + Send + Sync {
    /// Transposition key of a position.
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the key of this exact position. Cached results are reused
    /// across paths, so positions sharing a key must also share the number
    /// of moves played to reach them.
    fn position_key(&self) -> Self::Key;

    /// Returns the keys of every position equivalent to this one under the
    /// game's symmetries, starting with `position_key`. Must not mutate the
    /// state. Default implementation has no symmetries.
    fn symmetric_keys(&self) -> SmallVec<[Self::Key; 4]> {
        smallvec![self.position_key()]
    }

    /// Returns true if the current player is the maximizing player.
    fn is_maximizing_player(&self) -> bool;

    /// Switches to the next player's turn.
    fn toggle_turn(&mut self);
}

/// Represents an action that can be applied to and undone from a game state.
pub trait GameMove: Clone + Send + Sync + PartialEq + Debug + 'static {
    type State: GameState;
    type Error: Debug;

    /// Applies this move to the given state.
    fn apply(&self, state: &mut Self::State) -> Result<(), Self::Error>;

    /// Undoes this move on the given state.
    fn undo(&self, state: &mut Self::State) -> Result<(), Self::Error>;
}

/// Generates all legal moves from a given game state.
pub trait MoveGenerator<S: GameState>: Clone + Send + Sync {
    type Move: GameMove<State = S>;
    type MoveList: MoveCollection<Self::Move>;

    /// Generates all legal moves for the current player.
    fn generate_moves(&self, state: &S) -> Self::MoveList;

    /// Returns true if the current player has at least one legal move.
    fn has_moves(&self, state: &S) -> bool {
        !self.generate_moves(state).is_empty()
    }
}

/// Evaluates a game position and returns a score.
pub trait Evaluator<S: GameState>: Clone + Send + Sync {
    /// Evaluates the given state. Higher scores favor the maximizing player.
    /// Must stay strictly between `NEG_INF` and `POS_INF`; those values are
    /// reserved for decided games.
    fn evaluate(&self, state: &S) -> Score;
}

/// Abstraction over move collections (Vec, SmallVec, etc.)
pub trait MoveCollection<M>: AsRef<[M]> + AsMut<[M]> + Send {
    #[inline]
    fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_ref().len()
    }
}

impl<M: Send> MoveCollection<M> for Vec<M> {}

impl<A> MoveCollection<A::Item> for SmallVec<A>
where
    A: smallvec::Array + Send,
    A::Item: Send,
{
}
