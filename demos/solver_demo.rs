//! Demonstration of the solver backends
//!
//! Runs a few tiny formulas and a small puzzle through the unified solver
//! interface. The external backend is tried only when `PICROSS_SOLVER` names
//! an executable.

use picross_sat::config::{Settings, SolverBackend};
use picross_sat::puzzle::io::parse_puzzle_2d;
use picross_sat::puzzle::Puzzle;
use picross_sat::sat::{Clause, SatOutcome, SatEncoder, UnifiedSatSolver};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== SAT Solver Backend Demonstration ===\n");

    let mut settings = Settings::default();
    settings.solver.backend = SolverBackend::Cadical;
    test_solver_backend(&settings)?;

    match std::env::var("PICROSS_SOLVER") {
        Ok(executable) => {
            settings.solver.backend = SolverBackend::External;
            settings.solver.executable = PathBuf::from(executable);
            settings.solver.timeout_seconds = 30;
            test_solver_backend(&settings)?;
        }
        Err(_) => println!("Skipping external backend (set PICROSS_SOLVER to try it)\n"),
    }

    println!("✅ All solver backends working correctly!");
    Ok(())
}

fn test_solver_backend(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    println!("Testing {:?} solver backend:", settings.solver.backend);

    // Test 1: Simple satisfiable problem
    println!("  Test 1: Simple satisfiable problem (x1)");
    let mut solver = UnifiedSatSolver::new(&settings.solver);
    solver.add_clause(&Clause::unit(1));
    match solver.solve()? {
        SatOutcome::Satisfiable(solution) => {
            println!("    ✅ SAT - Variable 1 = {:?}", solution.value(1));
            println!("    ⏱️  Solve time: {:.3}ms", solution.solve_time.as_secs_f64() * 1000.0);
        }
        SatOutcome::Unsatisfiable => return Err("Expected SAT but got UNSAT".into()),
    }

    // Test 2: Unsatisfiable problem
    println!("  Test 2: Unsatisfiable problem (x1 ∧ ¬x1)");
    solver.add_clause(&Clause::unit(-1));
    match solver.solve()? {
        SatOutcome::Satisfiable(_) => return Err("Expected UNSAT but got SAT".into()),
        SatOutcome::Unsatisfiable => println!("    ✅ UNSAT - Correctly detected contradiction"),
    }

    // Test 3: Enumerate models with blocking clauses
    println!("  Test 3: Multiple solutions (x1 ∨ x2)");
    solver.reset();
    solver.add_clause(&Clause::binary(1, 2));
    let mut found = 0;
    while let SatOutcome::Satisfiable(solution) = solver.solve()? {
        found += 1;
        let x1 = solution.value(1).unwrap_or(false);
        let x2 = solution.value(2).unwrap_or(false);
        println!("      Solution {}: x1={}, x2={}", found, x1, x2);
        solver.add_clause(&Clause::new(vec![if x1 { -1 } else { 1 }, if x2 { -2 } else { 2 }]));
    }
    if found != 3 {
        return Err(format!("Expected 3 solutions, found {}", found).into());
    }

    // Test 4: A whole puzzle
    println!("  Test 4: Picross bar (row 2, columns 1 1 0)");
    let puzzle = Puzzle::TwoD(parse_puzzle_2d("1\n3\n2\n1\n1\n0\n")?);
    let mut encoder = SatEncoder::new(settings.clone(), puzzle)?;
    let outcome = encoder.solve()?;
    match outcome.solutions().first() {
        Some(found) => print!("    ✅ Picture:\n    {}", found.picture),
        None => return Err("Expected the bar puzzle to be solvable".into()),
    }

    let stats = encoder.statistics();
    println!("  📊 Statistics:");
    println!("    Variables: {}", stats.total_variables);
    println!("    Clauses: {}", stats.total_clauses);

    println!("  ✅ {:?} backend tests completed successfully\n", settings.solver.backend);
    Ok(())
}
