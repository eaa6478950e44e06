//! Position search: find where to stand and aim so a smoke lands on target

mod config;
mod grid;
mod solution;
mod strategy;

pub use config::SearchConfig;
pub use grid::PositionSearcher;
pub use solution::{Angles, ConsoleCommands, SmokeSolution};
pub use strategy::SearchStrategy;
