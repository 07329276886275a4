//! SAT encoder for picross puzzles

use super::cnf::CnfDocument;
use super::constraints::{Clause, ConstraintGenerator, GeneratedConstraints, LineReport};
use super::decoder::decode_solution;
use super::intervals::{layout_count, slack_for};
use super::solver::{SatOutcome, SolverSolution};
use super::solver_factory::UnifiedSatSolver;
use crate::config::{PlainStrategy, Settings};
use crate::puzzle::{Marker, Picture, Puzzle};
use anyhow::{Context, Result};
use log::{info, warn};
use std::time::{Duration, Instant};

/// One decoded model
#[derive(Debug, Clone)]
pub struct FoundSolution {
    pub picture: Picture,
    pub solve_time: Duration,
}

/// Result of the solve loop
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// At least one picture. `exhausted` is set when the solver proved
    /// there are no further pictures.
    Solved {
        solutions: Vec<FoundSolution>,
        exhausted: bool,
    },
    Unsatisfiable,
}

impl SearchOutcome {
    pub fn solutions(&self) -> &[FoundSolution] {
        match self {
            SearchOutcome::Solved { solutions, .. } => solutions,
            SearchOutcome::Unsatisfiable => &[],
        }
    }

    /// True when exactly one picture exists
    pub fn is_unique(&self) -> bool {
        matches!(self, SearchOutcome::Solved { solutions, exhausted: true } if solutions.len() == 1)
    }
}

/// Main SAT encoder for picross puzzles
pub struct SatEncoder {
    settings: Settings,
    constraint_generator: ConstraintGenerator,
    generated: Option<GeneratedConstraints>,
    encode_time: Duration,
}

impl SatEncoder {
    /// Create a new SAT encoder with the given settings and puzzle
    pub fn new(settings: Settings, puzzle: Puzzle) -> Result<Self> {
        let constraint_generator = ConstraintGenerator::new(puzzle, &settings.encoding)
            .context("Failed to set up constraint generation")?;

        Ok(Self {
            settings,
            constraint_generator,
            generated: None,
            encode_time: Duration::ZERO,
        })
    }

    /// Build the CNF document. Lines whose clue cannot fit are left out.
    pub fn encode(&mut self) -> Result<CnfDocument> {
        let start = Instant::now();
        let generated = self
            .constraint_generator
            .generate_all_constraints()
            .context("Failed to generate SAT constraints")?;
        self.encode_time = start.elapsed();

        let variable_count = self.constraint_generator.variable_manager().variable_count();
        let document = CnfDocument::new(variable_count, generated.clauses.clone());

        info!(
            "Generated {} clauses with {} variables ({} skipped lines)",
            document.clause_count(),
            document.variable_count(),
            generated.skipped().count()
        );

        self.generated = Some(generated);
        Ok(document)
    }

    /// Encode, solve and decode up to `max_solutions` distinct pictures
    pub fn solve(&mut self) -> Result<SearchOutcome> {
        let document = self.encode()?;
        let mut solver = UnifiedSatSolver::new(&self.settings.solver);
        solver.add_document(&document);

        let max_solutions = self.settings.solver.max_solutions.max(1);
        let mut solutions = Vec::new();
        let mut exhausted = false;

        while solutions.len() < max_solutions {
            let outcome = match solver.solve() {
                Ok(outcome) => outcome,
                Err(e) if !solutions.is_empty() => {
                    warn!(
                        "Stopping the search after {} solution(s): {}",
                        solutions.len(),
                        e
                    );
                    break;
                }
                Err(e) => return Err(e).context("SAT solving failed"),
            };
            match outcome {
                SatOutcome::Satisfiable(solution) => {
                    let picture = self.decode(&solution)?;
                    solver.add_clause(&self.blocking_clause(&solution));
                    solutions.push(FoundSolution {
                        picture,
                        solve_time: solution.solve_time,
                    });
                }
                SatOutcome::Unsatisfiable => {
                    exhausted = true;
                    break;
                }
            }
        }

        info!("Found {} solution(s)", solutions.len());
        if solutions.is_empty() {
            Ok(SearchOutcome::Unsatisfiable)
        } else {
            Ok(SearchOutcome::Solved { solutions, exhausted })
        }
    }

    /// Map a model to its picture
    pub fn decode(&self, solution: &SolverSolution) -> Result<Picture> {
        decode_solution(solution, self.constraint_generator.variable_manager())
            .context("Failed to decode solver model")
    }

    /// Forbid the picture of `solution`; auxiliaries are left free so the
    /// next model is a different picture, not just a different selector choice
    fn blocking_clause(&self, solution: &SolverSolution) -> Clause {
        let cells = self.constraint_generator.variable_manager().cell_count() as i32;
        Clause::new(
            (1..=cells)
                .map(|var| if solution.value(var).unwrap_or(false) { -var } else { var })
                .collect(),
        )
    }

    /// Warn about lines that were left unconstrained
    pub fn log_skipped_lines(&self) {
        if let Some(generated) = &self.generated {
            for line in generated.skipped() {
                warn!("{} ({}) is unconstrained", line.label, line.clue);
            }
        }
    }

    /// Per-line outcome of the last `encode` call
    pub fn line_reports(&self) -> &[LineReport] {
        self.generated.as_ref().map(|g| g.lines.as_slice()).unwrap_or(&[])
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.constraint_generator.puzzle()
    }

    /// Get encoding statistics
    pub fn statistics(&self) -> EncodingStatistics {
        let vm = self.constraint_generator.variable_manager();
        let stats = vm.statistics();
        let (lines, skipped_lines, placements, total_clauses) = match &self.generated {
            Some(g) => (g.lines.len(), g.skipped().count(), g.placement_count(), g.clauses.len()),
            None => (0, 0, 0, 0),
        };

        EncodingStatistics {
            dimensions: describe(self.puzzle()),
            cell_variables: stats.cell_variables,
            auxiliary_variables: stats.auxiliary_variables,
            total_variables: stats.total_variables,
            total_clauses,
            lines,
            skipped_lines,
            placements,
            encode_time: self.encode_time,
        }
    }

    /// Predict the formula size without building it
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let square_max = self.settings.encoding.square_max_groups;
        let strategy = self.settings.encoding.plain_strategy;
        let mut selectors: u128 = 0;
        let mut clauses: u128 = 0;
        let mut infeasible_lines = 0;

        let mut add = |estimate: Option<(u128, u128)>| match estimate {
            Some((s, c)) => {
                selectors = selectors.saturating_add(s);
                clauses = clauses.saturating_add(c);
            }
            None => infeasible_lines += 1,
        };

        match self.puzzle() {
            Puzzle::TwoD(p) => {
                for hint in &p.row_hints {
                    add(estimate_runs(p.cols, &[hint.blocks().to_vec()]));
                }
                for hint in &p.col_hints {
                    add(estimate_runs(p.rows, &[hint.blocks().to_vec()]));
                }
            }
            Puzzle::ThreeD(p) => {
                for stack in p.stacks() {
                    add(estimate_stack(stack.cells.len(), stack.marker, strategy, square_max));
                }
            }
        }

        let cell_variables = self.puzzle().cell_count();
        let complexity_level = if clauses < 10_000 {
            ComplexityLevel::Low
        } else if clauses < 100_000 {
            ComplexityLevel::Medium
        } else if clauses < 1_000_000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        ComplexityEstimate {
            complexity_level,
            cell_variables,
            estimated_selectors: selectors,
            estimated_clauses: clauses,
            infeasible_lines,
        }
    }
}

/// (selectors, clauses) of the selector encoding, `None` when nothing fits
fn estimate_runs(length: usize, alternatives: &[Vec<usize>]) -> Option<(u128, u128)> {
    let placements: u128 = alternatives
        .iter()
        .filter_map(|blocks| slack_for(length, blocks).map(|slack| layout_count(blocks.len(), slack)))
        .sum();
    if placements == 0 {
        return None;
    }
    Some((placements, placements.saturating_mul(length as u128).saturating_add(1)))
}

fn estimate_stack(length: usize, marker: Marker, strategy: PlainStrategy, square_max: usize) -> Option<(u128, u128)> {
    let n = marker.count();
    if n > length {
        return None;
    }
    if n == 0 || n == length {
        return Some((0, length as u128));
    }
    match (marker, strategy) {
        (Marker::Plain(_), PlainStrategy::Direct) => {
            let len = length as u128;
            let n = n as u128;
            let pairs = (len - n) * (len - n + 1) / 2;
            Some((0, binomial(len, len - n + 1) + binomial(len, n + 1) + pairs))
        }
        _ => estimate_runs(length, &marker.run_patterns(length, square_max)),
    }
}

fn binomial(n: u128, k: u128) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u128, |acc, i| acc.saturating_mul(n - i) / (i + 1))
}

fn describe(puzzle: &Puzzle) -> String {
    match puzzle {
        Puzzle::TwoD(p) => format!("{}x{} grid", p.rows, p.cols),
        Puzzle::ThreeD(p) => format!("{}x{}x{} cube", p.width, p.height, p.depth),
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub dimensions: String,
    pub cell_variables: usize,
    pub auxiliary_variables: usize,
    pub total_variables: usize,
    pub total_clauses: usize,
    pub lines: usize,
    pub skipped_lines: usize,
    pub placements: usize,
    pub encode_time: Duration,
}

/// Complexity estimate for the problem
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub cell_variables: usize,
    pub estimated_selectors: u128,
    pub estimated_clauses: u128,
    pub infeasible_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Puzzle: {}", self.dimensions)?;
        writeln!(f, "  Cell variables: {}", self.cell_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.auxiliary_variables)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "  Lines encoded: {} ({} skipped)", self.lines, self.skipped_lines)?;
        writeln!(f, "  Placements: {}", self.placements)?;
        writeln!(f, "  Encode time: {:.3}s", self.encode_time.as_secs_f64())?;
        Ok(())
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Cell variables: {}", self.cell_variables)?;
        writeln!(f, "  Estimated selectors: {}", self.estimated_selectors)?;
        writeln!(f, "  Estimated clauses: {}", self.estimated_clauses)?;
        if self.infeasible_lines > 0 {
            writeln!(f, "  Infeasible lines: {}", self.infeasible_lines)?;
        }

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to encode and solve",
            ComplexityLevel::High => "Large formula, consider the direct plain strategy or a faster solver",
            ComplexityLevel::VeryHigh => "Very large formula, loose hints produce many placements",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;

        Ok(())
    }
}
