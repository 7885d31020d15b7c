use thiserror::Error;

/// Errors raised by the constraint solver and the pattern builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("variable {0:?} is already registered")]
    DuplicateVariable(String),

    #[error("constraint references unknown variable {0:?}")]
    UnknownVariable(String),

    #[error("{pattern} constraint needs at least {required} variables, got {given}")]
    InsufficientArguments {
        pattern: &'static str,
        required: usize,
        given: usize,
    },

    #[error("no assignment satisfies every constraint")]
    NoSolution,

    #[error("search gave up after visiting {0} nodes")]
    NodeLimitExceeded(u64),

    #[error("variable {0:?} resolved to a non-integer value")]
    NonIntegerValue(String),
}

/// A structural invariant a `Puzzle` failed to hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("puzzle id is empty")]
    EmptyId,

    #[error("puzzle has no elements")]
    NoElements,

    #[error("puzzle solution is empty")]
    EmptySolution,

    #[error("element count {declared} does not match {actual} elements")]
    ElementCountMismatch { declared: usize, actual: usize },

    #[error("element id {0:?} appears more than once")]
    DuplicateElement(String),

    #[error("solution references unknown element {0:?}")]
    UnknownSolutionElement(String),

    #[error("difficulty {0} is outside 1..=10")]
    DifficultyOutOfRange(u8),

    #[error("timed challenge has no time limit")]
    MissingTimeLimit,
}

/// Everything `generate` can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}
