//! Picross SAT Solver
//!
//! This library turns 2D nonogram hints and 3D stack clues into CNF formulas,
//! hands them to a SAT solver and decodes the models back into pictures.

pub mod config;
pub mod error;
pub mod puzzle;
pub mod sat;
pub mod solve;
pub mod utils;

pub use config::Settings;
pub use error::{PicrossError, PicrossResult};
pub use solve::{PicrossProblem, Solution, SolveOutcome};

use anyhow::Result;

/// Main entry point for solving picross puzzles
pub fn solve_puzzle(settings: Settings) -> Result<SolveOutcome> {
    let mut problem = PicrossProblem::new(settings)?;
    problem.solve()
}
