//! Logic puzzles for dungeon rooms.
//!
//! `generate` turns a seed and the room's [`GenerationParams`] into a single
//! [`Puzzle`]: an archetype picked by depth and difficulty, its elements, and a
//! solution that references only those elements. The backtracking
//! [`ConstraintSolver`] and the integer [`PatternBuilder`] on top of it are
//! usable on their own.

pub mod error;
pub mod game;
pub mod model;
pub mod solver;

pub use error::{ConstraintError, PuzzleError, ValidationError};
pub use game::{generate, validate, PuzzleGenerator, Settings};
pub use model::{
    Assignment, Difficulty, ElementState, GenerationParams, Position, Puzzle, PuzzleElement,
    PuzzleTemplate, PuzzleType, Value, Variable,
};
pub use solver::{ConstraintSolver, PatternBuilder};

#[cfg(test)]
mod tests {
    use std::sync::Once;
    use test_context::TestContext;

    static INIT_LOGGER: Once = Once::new();

    pub struct UsingLogger;

    impl TestContext for UsingLogger {
        fn setup() -> UsingLogger {
            INIT_LOGGER.call_once(|| {
                let _ = env_logger::builder().is_test(true).try_init();
            });
            UsingLogger
        }

        fn teardown(self) {}
    }
}
