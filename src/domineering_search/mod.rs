//! Domineering implementation of the alpha-beta search traits.

pub mod implementation;


pub use implementation::{
    search_best_move, search_best_move_with, DomineeringContext, DomineeringMoveGenerator,
};
