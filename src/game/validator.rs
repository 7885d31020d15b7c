use std::collections::BTreeSet;

use log::warn;

use crate::{
    error::ValidationError,
    model::{Difficulty, Puzzle, PuzzleType},
};

/// Checks the structural invariants of a puzzle, wherever it came from.
pub fn validate(puzzle: &Puzzle) -> Result<(), ValidationError> {
    let result = check(puzzle);
    if let Err(e) = &result {
        warn!(target: "validator", "Puzzle {:?} is invalid: {}", puzzle.id, e);
    }
    result
}

fn check(puzzle: &Puzzle) -> Result<(), ValidationError> {
    if puzzle.id.is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if puzzle.element_count < 1 {
        return Err(ValidationError::NoElements);
    }
    if puzzle.solution.is_empty() {
        return Err(ValidationError::EmptySolution);
    }
    if puzzle.element_count != puzzle.elements.len() {
        return Err(ValidationError::ElementCountMismatch {
            declared: puzzle.element_count,
            actual: puzzle.elements.len(),
        });
    }

    let mut element_ids = BTreeSet::new();
    for element in &puzzle.elements {
        if !element_ids.insert(element.id.as_str()) {
            return Err(ValidationError::DuplicateElement(element.id.clone()));
        }
    }
    if let Some(missing) = puzzle
        .solution
        .iter()
        .find(|id| !element_ids.contains(id.as_str()))
    {
        return Err(ValidationError::UnknownSolutionElement(missing.clone()));
    }

    if !(Difficulty::MIN..=Difficulty::MAX).contains(&puzzle.difficulty) {
        return Err(ValidationError::DifficultyOutOfRange(puzzle.difficulty.value()));
    }
    if puzzle.puzzle_type == PuzzleType::TimedChallenge && puzzle.time_limit == 0 {
        return Err(ValidationError::MissingTimeLimit);
    }
    Ok(())
}
