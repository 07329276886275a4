//! Configuration management for the picross SAT solver

pub mod settings;

pub use settings::{
    Settings, PuzzleConfig, SolverConfig, EncodingConfig, OutputConfig,
    PuzzleKind, SolverBackend, PlainStrategy, OutputFormat, CliOverrides
};
