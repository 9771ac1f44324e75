//! Core Sudoku engine: board model, puzzle generation, and a backtracking
//! solver. Rendering and input handling live in the front-end crates.

mod generator;
mod grid;
mod solver;

pub use generator::{Generator, EMPTY_CELLS};
pub use grid::{Cell, Grid, Position};
pub use solver::Solver;
