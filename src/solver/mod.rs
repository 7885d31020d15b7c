pub mod constraint_solver;
pub mod pattern_builder;

pub use constraint_solver::{ConstraintSolver, SolverStats};
pub use pattern_builder::{IntConstraint, PatternBuilder};
