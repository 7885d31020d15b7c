mod constraint;
mod difficulty;
mod generation_params;
mod puzzle;
mod puzzle_type;
mod template;
mod value;
mod variable;

pub use constraint::{Assignment, Constraint, Predicate};
pub use difficulty::Difficulty;
pub use generation_params::GenerationParams;
pub use puzzle::{ElementState, Position, Puzzle, PuzzleElement};
pub use puzzle_type::PuzzleType;
pub use template::PuzzleTemplate;
pub use value::Value;
pub use variable::{VarId, Variable};
