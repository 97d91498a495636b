pub mod alpha_beta_searcher;
pub mod board;
pub mod domineering_search;
pub mod evaluate;
pub mod game;
pub mod move_generator;
pub mod placement;
pub mod time_budget;
