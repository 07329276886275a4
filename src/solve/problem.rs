//! Picross problem definition

use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::puzzle::{load_puzzle, Puzzle};
use crate::sat::encoder::{ComplexityEstimate, EncodingStatistics};
use crate::sat::{CnfDocument, LineReport, SatEncoder, SearchOutcome};
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::time::Instant;

/// Outcome of solving a puzzle. Unsatisfiability is an answer, not an error.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Solved {
        solutions: Vec<Solution>,
        /// The solver proved no further picture exists
        exhausted: bool,
    },
    Unsatisfiable,
}

impl SolveOutcome {
    pub fn solutions(&self) -> &[Solution] {
        match self {
            SolveOutcome::Solved { solutions, .. } => solutions,
            SolveOutcome::Unsatisfiable => &[],
        }
    }

    pub fn first(&self) -> Option<&Solution> {
        self.solutions().first()
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, SolveOutcome::Unsatisfiable)
    }
}

/// A loaded puzzle together with everything needed to solve it
pub struct PicrossProblem {
    settings: Settings,
    encoder: SatEncoder,
    validator: SolutionValidator,
}

impl PicrossProblem {
    /// Load the hint file named by the settings
    pub fn new(settings: Settings) -> Result<Self> {
        let puzzle = load_puzzle(&settings.puzzle.hint_file, settings.puzzle.kind)
            .context("Failed to load hint file")?;
        Self::with_puzzle(settings, puzzle)
    }

    /// Create a problem with an explicit puzzle (useful for testing)
    pub fn with_puzzle(settings: Settings, puzzle: Puzzle) -> Result<Self> {
        let validator = SolutionValidator::new(&settings);
        let encoder = SatEncoder::new(settings.clone(), puzzle)?;

        Ok(Self {
            settings,
            encoder,
            validator,
        })
    }

    /// Encode, solve, decode and re-check the puzzle
    pub fn solve(&mut self) -> Result<SolveOutcome> {
        let start_time = Instant::now();

        info!("Solving {} cell puzzle", self.puzzle().cell_count());
        debug!("{}", self.encoder.estimate_complexity());

        let outcome = self.encoder.solve()?;
        self.encoder.log_skipped_lines();

        let (found, exhausted) = match outcome {
            SearchOutcome::Unsatisfiable => {
                info!("No solution exists ({:.3}s)", start_time.elapsed().as_secs_f64());
                return Ok(SolveOutcome::Unsatisfiable);
            }
            SearchOutcome::Solved { solutions, exhausted } => (solutions, exhausted),
        };

        let unique = if exhausted {
            Some(found.len() == 1)
        } else if found.len() > 1 {
            Some(false)
        } else {
            None
        };

        let decoded = found.len();
        let mut solutions = Vec::with_capacity(decoded);
        for (i, candidate) in found.into_iter().enumerate() {
            let validation = self.validator.validate(self.puzzle(), &candidate.picture);
            if validation.is_valid {
                solutions.push(Solution::new(candidate.picture, i + 1, unique, candidate.solve_time));
            } else {
                error!(
                    "Solution {} failed validation: {}",
                    i + 1,
                    validation.error_message.unwrap_or_else(|| "Unknown error".to_string())
                );
            }
        }

        if solutions.is_empty() {
            anyhow::bail!("None of the {} decoded picture(s) satisfies the clues", decoded);
        }

        info!(
            "Found {} valid solution(s) in {:.3}s",
            solutions.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(SolveOutcome::Solved { solutions, exhausted })
    }

    /// Build the CNF document without solving
    pub fn encode_only(&mut self) -> Result<CnfDocument> {
        let document = self.encoder.encode()?;
        self.encoder.log_skipped_lines();
        Ok(document)
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.encoder.puzzle()
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get encoding statistics of the last encode
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        self.encoder.statistics()
    }

    /// Per-line outcome of the last encode
    pub fn line_reports(&self) -> &[LineReport] {
        self.encoder.line_reports()
    }

    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoder.estimate_complexity()
    }
}
