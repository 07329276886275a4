//! Error types shared by the encoder, the solver adapters and the decoder

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures that can occur while reading hints, talking to a solver or
/// decoding its answer. An unsatisfiable puzzle is not an error.
#[derive(Debug, Error)]
pub enum PicrossError {
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("solver executable `{}` could not be started: {source}", path.display())]
    SolverUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("solver exited with status {status} and no recognizable result: {stderr}")]
    SolverFailed { status: String, stderr: String },

    #[error("solver did not finish within {0:?}")]
    SolverTimeout(Duration),

    #[error("unexpected solver output: {0}")]
    UnexpectedOutput(String),

    #[error("truncated solution: expected values for {expected} cell variables, found {found}")]
    TruncatedSolution { expected: usize, found: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PicrossError {
    /// Shorthand for a parse error on a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        PicrossError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type PicrossResult<T> = std::result::Result<T, PicrossError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line() {
        let err = PicrossError::parse(4, "bad token `x`");
        assert_eq!(err.to_string(), "parse error on line 4: bad token `x`");
    }

    #[test]
    fn test_truncated_message() {
        let err = PicrossError::TruncatedSolution { expected: 9, found: 4 };
        assert!(err.to_string().contains("expected values for 9"));
    }
}
