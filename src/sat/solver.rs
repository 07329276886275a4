//! In-process SAT solving using CaDiCaL

use super::cnf::CnfDocument;
use super::constraints::Clause;
use crate::error::{PicrossError, PicrossResult};
use cadical::Solver;
use log::debug;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    /// Highest variable handed to CaDiCaL through a clause
    max_literal: usize,
    /// Variables the caller expects a value for
    variable_count: usize,
    clause_count: usize,
    last_solve_time: Duration,
}

/// A satisfying assignment
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: HashMap<i32, bool>,
    pub solve_time: Duration,
}

impl SolverSolution {
    /// Build a solution from the literals of a model line
    pub fn from_literals<I: IntoIterator<Item = i32>>(literals: I, solve_time: Duration) -> Self {
        let assignment = literals
            .into_iter()
            .filter(|&lit| lit != 0)
            .map(|lit| (lit.abs(), lit > 0))
            .collect();
        Self { assignment, solve_time }
    }

    pub fn value(&self, var: i32) -> Option<bool> {
        self.assignment.get(&var).copied()
    }

    /// Variables assigned true, ascending
    pub fn true_variables(&self) -> Vec<i32> {
        let mut vars: Vec<i32> = self.assignment.iter().filter(|(_, v)| **v).map(|(k, _)| *k).collect();
        vars.sort_unstable();
        vars
    }
}

/// Answer of one solver call. Unsatisfiability is a result, not an error.
#[derive(Debug, Clone)]
pub enum SatOutcome {
    Satisfiable(SolverSolution),
    Unsatisfiable,
}

impl SatOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatOutcome::Satisfiable(_))
    }

    pub fn into_solution(self) -> Option<SolverSolution> {
        match self {
            SatOutcome::Satisfiable(solution) => Some(solution),
            SatOutcome::Unsatisfiable => None,
        }
    }
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            max_literal: 0,
            variable_count: 0,
            clause_count: 0,
            last_solve_time: Duration::ZERO,
        }
    }

    /// Make sure the model reports a value for variables `1..=count`,
    /// including ones that appear in no clause.
    pub fn declare_variables(&mut self, count: usize) {
        self.variable_count = self.variable_count.max(count);
    }

    /// Load a whole document
    pub fn add_document(&mut self, document: &CnfDocument) {
        self.declare_variables(document.variable_count());
        self.add_clauses(document.clauses());
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) {
        for clause in clauses {
            self.add_clause(clause);
        }
    }

    /// Add a single clause to the solver. An empty clause makes the formula unsatisfiable.
    pub fn add_clause(&mut self, clause: &Clause) {
        let max = clause.max_variable();
        self.max_literal = self.max_literal.max(max);
        self.variable_count = self.variable_count.max(max);

        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
    }

    /// Solve the formula loaded so far
    pub fn solve(&mut self) -> PicrossResult<SatOutcome> {
        let start_time = Instant::now();
        let result = self.solver.solve();
        self.last_solve_time = start_time.elapsed();

        debug!(
            "CaDiCaL finished in {:.3}s with {:?}",
            self.last_solve_time.as_secs_f64(),
            result
        );

        match result {
            Some(true) => Ok(SatOutcome::Satisfiable(SolverSolution {
                assignment: self.extract_assignment(),
                solve_time: self.last_solve_time,
            })),
            Some(false) => Ok(SatOutcome::Unsatisfiable),
            None => Err(PicrossError::UnexpectedOutput(
                "CaDiCaL stopped without deciding the formula".to_string(),
            )),
        }
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(&self) -> HashMap<i32, bool> {
        let mut assignment = HashMap::with_capacity(self.variable_count);

        for var in 1..=self.variable_count as i32 {
            // variables CaDiCaL never saw are unconstrained; report them empty
            let value = if var as usize <= self.max_literal {
                self.solver.value(var).unwrap_or(false)
            } else {
                false
            };
            assignment.insert(var, value);
        }

        assignment
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            solve_time: self.last_solve_time,
        }
    }

    /// Reset the solver (clear all clauses)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

impl std::fmt::Display for SolverSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solution:")?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Variables assigned: {}", self.assignment.len())?;

        // Show a few example assignments
        let mut vars: Vec<_> = self.assignment.keys().collect();
        vars.sort();

        write!(f, "  Sample assignments: ")?;
        for (i, &var) in vars.iter().take(10).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let value = self.assignment[var];
            write!(f, "{}={}", var, if value { "T" } else { "F" })?;
        }
        if vars.len() > 10 {
            write!(f, ", ...")?;
        }
        writeln!(f)?;

        Ok(())
    }
}
