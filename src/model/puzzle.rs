use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, game::validator};

use super::{Difficulty, PuzzleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Row-major placement of the `index`th element on a grid `width` cells wide.
    pub fn in_grid(index: usize, width: usize) -> Self {
        let width = width.max(1);
        Self::new((index % width) as i32, (index / width) as i32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementState {
    Bool(bool),
    /// A color or symbol name.
    Name(String),
    Map(BTreeMap<String, String>),
}

impl ElementState {
    pub fn name(&self) -> Option<&str> {
        match self {
            ElementState::Name(name) => Some(name),
            ElementState::Bool(_) | ElementState::Map(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleElement {
    pub id: String,
    pub element_type: String,
    pub position: Position,
    pub state: ElementState,
    pub interactable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub puzzle_type: PuzzleType,
    pub difficulty: Difficulty,
    /// Element ids; ordered for sequence puzzles.
    pub solution: Vec<String>,
    pub element_count: usize,
    pub elements: Vec<PuzzleElement>,
    /// Seconds, 0 = none.
    pub time_limit: u32,
    /// 0 = unlimited.
    pub max_attempts: u32,
    pub hint_text: String,
    pub description: String,
    pub reward_type: String,
    pub complexity: u32,
    pub seed: u64,
}

impl Puzzle {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validator::validate(self)
    }

    pub fn element(&self, id: &str) -> Option<&PuzzleElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements_of_type<'a>(
        &'a self,
        element_type: &'a str,
    ) -> impl Iterator<Item = &'a PuzzleElement> + 'a {
        self.elements
            .iter()
            .filter(move |e| e.element_type == element_type)
    }
}

impl std::fmt::Display for Puzzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] difficulty {} ({} elements, solution {})",
            self.id,
            self.puzzle_type,
            self.difficulty,
            self.element_count,
            self.solution.join(" ")
        )
    }
}
