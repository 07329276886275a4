//! Factory for creating SAT solver instances based on configuration

use super::cnf::CnfDocument;
use super::constraints::Clause;
use super::external_solver::ExternalSolver;
use super::solver::{SatOutcome, SatSolver, SolverStatistics};
use crate::config::{SolverBackend, SolverConfig};
use crate::error::PicrossResult;

/// Unified SAT solver interface that can use different backends
pub enum UnifiedSatSolver {
    Cadical(SatSolver),
    External(ExternalSolver),
}

impl UnifiedSatSolver {
    /// Create a new solver instance based on the configured backend
    pub fn new(config: &SolverConfig) -> Self {
        match config.backend {
            SolverBackend::Cadical => UnifiedSatSolver::Cadical(SatSolver::new()),
            SolverBackend::External => UnifiedSatSolver::External(ExternalSolver::from_config(config)),
        }
    }

    /// Load a complete document, header included
    pub fn add_document(&mut self, document: &CnfDocument) {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.add_document(document),
            UnifiedSatSolver::External(solver) => solver.add_document(document),
        }
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.add_clauses(clauses),
            UnifiedSatSolver::External(solver) => solver.add_clauses(clauses),
        }
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.add_clause(clause),
            UnifiedSatSolver::External(solver) => solver.add_clause(clause),
        }
    }

    /// Solve the formula loaded so far
    pub fn solve(&mut self) -> PicrossResult<SatOutcome> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.solve(),
            UnifiedSatSolver::External(solver) => solver.solve(),
        }
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.statistics(),
            UnifiedSatSolver::External(solver) => solver.statistics(),
        }
    }

    /// Reset the solver (clear all clauses)
    pub fn reset(&mut self) {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.reset(),
            UnifiedSatSolver::External(solver) => solver.reset(),
        }
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.statistics().clause_count
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSatSolver::External(_) => SolverBackend::External,
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::Cadical(SatSolver::new())
    }
}
