//! SAT encoding, solving and decoding of picross puzzles

pub mod variables;
pub mod intervals;
pub mod line_encoder;
pub mod stack_encoder;
pub mod constraints;
pub mod cnf;
pub mod solver;
pub mod external_solver;
pub mod solver_factory;
pub mod decoder;
pub mod encoder;

pub use variables::{AuxAllocator, CellCoord, PictureShape, VariableManager};
pub use constraints::{Clause, ConstraintGenerator, GeneratedConstraints, LineLabel, LineReport, LineStatus};
pub use cnf::{parse_dimacs, CnfDocument};
pub use solver::{SatOutcome, SatSolver, SolverSolution};
pub use external_solver::{parse_solver_output, ExternalSolver};
pub use solver_factory::UnifiedSatSolver;
pub use decoder::decode_solution;
pub use encoder::{ComplexityEstimate, EncodingStatistics, FoundSolution, SatEncoder, SearchOutcome};
