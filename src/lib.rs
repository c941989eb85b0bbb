//! A Sokoban solver: breadth-first and A* search over board states, with an
//! assignment-based heuristic and push-deadlock pruning.

pub mod board;
pub mod deadlocks;
pub mod heuristic;
pub mod hungarian;
pub mod levels;
pub mod pqueue;
pub mod pruning;
pub mod search;
pub mod solutions;
pub mod solver;
pub mod zobrist;

pub use board::{ALL_ACTIONS, Action, Board, Cell, Position};
pub use levels::{LevelError, Levels};
pub use search::{Progress, SearchStatus};
pub use solutions::{SolutionBook, SolutionsError, SolvedLevel};
pub use solver::{Algorithm, SokobanProblem, Solution, solve};
