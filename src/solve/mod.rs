//! Picross problem definition and solution handling

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{PicrossProblem, SolveOutcome};
pub use solution::{Solution, SolutionMetadata};
pub use validator::{ClueViolation, SolutionValidator, ValidationResult};
