//! Constraint generation for picross SAT encoding

use super::line_encoder::encode_line;
use super::stack_encoder::{StackEncoder, StackEncoding};
use super::variables::{AuxAllocator, VariableManager};
use crate::config::EncodingConfig;
use crate::puzzle::{Face, Hint, Marker, Puzzle};
use anyhow::{Context, Result};
use log::{debug, warn};
use rayon::prelude::*;
use std::fmt;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Highest variable id mentioned by the clause
    pub fn max_variable(&self) -> usize {
        self.literals.iter().map(|l| l.unsigned_abs() as usize).max().unwrap_or(0)
    }

    /// Evaluate under an assignment given as a variable -> value function
    pub fn evaluate<F: Fn(i32) -> bool>(&self, value: F) -> bool {
        self.literals.iter().any(|&lit| value(lit.abs()) == (lit > 0))
    }
}

/// Which line of the puzzle a clue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLabel {
    Row(usize),
    Column(usize),
    Stack { face: Face, row: usize, col: usize },
}

impl fmt::Display for LineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineLabel::Row(r) => write!(f, "row {}", r + 1),
            LineLabel::Column(c) => write!(f, "column {}", c + 1),
            LineLabel::Stack { face, row, col } => write!(f, "{:?} face ({}, {})", face, row + 1, col + 1),
        }
    }
}

/// How a line ended up in the formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// One selector per placement
    Encoded { placements: usize },
    /// Clauses straight on the cells
    Direct,
    /// Every cell fixed
    Forced,
    /// The clue cannot fit; the line is unconstrained
    Skipped,
}

/// Outcome of encoding a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    pub label: LineLabel,
    pub clue: String,
    pub length: usize,
    pub status: LineStatus,
    pub clause_count: usize,
}

/// Everything the generator produces for one puzzle
#[derive(Debug, Clone, Default)]
pub struct GeneratedConstraints {
    pub clauses: Vec<Clause>,
    pub lines: Vec<LineReport>,
}

impl GeneratedConstraints {
    pub fn skipped(&self) -> impl Iterator<Item = &LineReport> {
        self.lines.iter().filter(|l| l.status == LineStatus::Skipped)
    }

    pub fn placement_count(&self) -> usize {
        self.lines
            .iter()
            .map(|l| match l.status {
                LineStatus::Encoded { placements } => placements,
                _ => 0,
            })
            .sum()
    }
}

enum LineClue<'a> {
    Hint(&'a Hint),
    Marker(Marker),
}

struct LineTask<'a> {
    label: LineLabel,
    clue: LineClue<'a>,
    cells: Vec<i32>,
}

/// Generates SAT constraints for a picross puzzle
pub struct ConstraintGenerator {
    puzzle: Puzzle,
    variable_manager: VariableManager,
    stack_encoder: StackEncoder,
    parallel: bool,
}

impl ConstraintGenerator {
    /// Create a new constraint generator
    pub fn new(puzzle: Puzzle, encoding: &EncodingConfig) -> Result<Self> {
        let variable_manager = VariableManager::for_puzzle(&puzzle)?;

        Ok(Self {
            puzzle,
            variable_manager,
            stack_encoder: StackEncoder::from_config(encoding),
            parallel: encoding.parallel,
        })
    }

    /// Generate all constraints for the puzzle.
    ///
    /// Clauses come out in line order (2D: rows then columns; 3D: face by
    /// face, row-major) whether or not lines are encoded in parallel.
    /// Auxiliary ids restart after the cells on every call.
    pub fn generate_all_constraints(&mut self) -> Result<GeneratedConstraints> {
        self.variable_manager =
            VariableManager::for_puzzle(&self.puzzle).context("Failed to allocate cell variables")?;

        let tasks = self.line_tasks()?;
        let aux = self.variable_manager.aux();
        let encoder = self.stack_encoder;

        let encoded: Vec<(LineReport, Vec<Clause>)> = if self.parallel {
            tasks.par_iter().map(|task| encode_task(task, &encoder, aux)).collect()
        } else {
            tasks.iter().map(|task| encode_task(task, &encoder, aux)).collect()
        };

        let mut generated = GeneratedConstraints::default();
        for (report, clauses) in encoded {
            if report.status == LineStatus::Skipped {
                warn!(
                    "Skipping {}: clue {} does not fit in {} cells",
                    report.label, report.clue, report.length
                );
            }
            generated.clauses.extend(clauses);
            generated.lines.push(report);
        }

        debug!(
            "Generated {} clauses over {} lines, {} selectors",
            generated.clauses.len(),
            generated.lines.len(),
            generated.placement_count()
        );
        Ok(generated)
    }

    fn line_tasks(&self) -> Result<Vec<LineTask<'_>>> {
        let vm = &self.variable_manager;
        let mut tasks = Vec::new();

        match &self.puzzle {
            Puzzle::TwoD(p) => {
                for (row, hint) in p.row_hints.iter().enumerate() {
                    let cells = (0..p.cols)
                        .map(|col| vm.grid_variable(row, col).context("row cell without variable"))
                        .collect::<Result<Vec<_>>>()?;
                    tasks.push(LineTask {
                        label: LineLabel::Row(row),
                        clue: LineClue::Hint(hint),
                        cells,
                    });
                }
                for (col, hint) in p.col_hints.iter().enumerate() {
                    let cells = (0..p.rows)
                        .map(|row| vm.grid_variable(row, col).context("column cell without variable"))
                        .collect::<Result<Vec<_>>>()?;
                    tasks.push(LineTask {
                        label: LineLabel::Column(col),
                        clue: LineClue::Hint(hint),
                        cells,
                    });
                }
            }
            Puzzle::ThreeD(p) => {
                for stack in p.stacks() {
                    let cells = stack
                        .cells
                        .iter()
                        .map(|&(x, y, z)| vm.voxel_variable(x, y, z).context("stack cell without variable"))
                        .collect::<Result<Vec<_>>>()?;
                    tasks.push(LineTask {
                        label: LineLabel::Stack {
                            face: stack.face,
                            row: stack.row,
                            col: stack.col,
                        },
                        clue: LineClue::Marker(stack.marker),
                        cells,
                    });
                }
            }
        }

        Ok(tasks)
    }

    /// Get the variable manager (for external access)
    pub fn variable_manager(&self) -> &VariableManager {
        &self.variable_manager
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Get constraint generation statistics
    pub fn statistics(&self) -> ConstraintStatistics {
        ConstraintStatistics {
            cell_variables: self.variable_manager.cell_count(),
            total_variables: self.variable_manager.variable_count(),
            parallel: self.parallel,
        }
    }
}

fn encode_task(task: &LineTask<'_>, encoder: &StackEncoder, aux: &AuxAllocator) -> (LineReport, Vec<Clause>) {
    let (clue, status, clauses) = match &task.clue {
        LineClue::Hint(hint) => match encode_line(&task.cells, hint, aux) {
            Some(encoding) => (
                hint.to_string(),
                LineStatus::Encoded {
                    placements: encoding.placements(),
                },
                encoding.clauses,
            ),
            None => (hint.to_string(), LineStatus::Skipped, Vec::new()),
        },
        LineClue::Marker(marker) => match encoder.encode(&task.cells, *marker, aux) {
            Some(encoding) => {
                let status = match &encoding {
                    StackEncoding::Forced(_) => LineStatus::Forced,
                    StackEncoding::Direct(_) => LineStatus::Direct,
                    StackEncoding::Runs(runs) => LineStatus::Encoded {
                        placements: runs.placements(),
                    },
                };
                (marker.to_string(), status, encoding.into_clauses())
            }
            None => (marker.to_string(), LineStatus::Skipped, Vec::new()),
        },
    };

    let report = LineReport {
        label: task.label,
        clue,
        length: task.cells.len(),
        status,
        clause_count: clauses.len(),
    };
    (report, clauses)
}

/// Statistics about constraint generation
#[derive(Debug, Clone)]
pub struct ConstraintStatistics {
    pub cell_variables: usize,
    pub total_variables: usize,
    pub parallel: bool,
}

impl std::fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Generation Statistics:")?;
        writeln!(f, "  Cell variables: {}", self.cell_variables)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Parallel: {}", self.parallel)?;
        Ok(())
    }
}
