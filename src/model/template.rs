use serde::{Deserialize, Serialize};

use super::PuzzleType;

/// Generation bounds for one archetype. All ranges are inclusive `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleTemplate {
    pub elements: (u32, u32),
    pub complexity: (u32, u32),
    pub time_limit: (u32, u32),
    pub max_attempts: (u32, u32),
}

impl PuzzleTemplate {
    /// Upper bound on elements per archetype accepted from settings.
    pub const MAX_ELEMENTS: u32 = 64;

    pub fn builtin(puzzle_type: PuzzleType) -> Self {
        match puzzle_type {
            PuzzleType::PressurePlate => Self {
                elements: (3, 8),
                complexity: (1, 5),
                time_limit: (0, 0),
                max_attempts: (0, 0),
            },
            PuzzleType::LeverSequence => Self {
                elements: (3, 8),
                complexity: (2, 6),
                time_limit: (0, 0),
                max_attempts: (5, 15),
            },
            PuzzleType::BlockPushing => Self {
                elements: (2, 5),
                complexity: (3, 8),
                time_limit: (0, 0),
                max_attempts: (0, 0),
            },
            PuzzleType::TimedChallenge => Self {
                elements: (3, 8),
                complexity: (3, 8),
                time_limit: (30, 120),
                max_attempts: (0, 0),
            },
            PuzzleType::MemoryPattern => Self {
                elements: (4, 9),
                complexity: (2, 7),
                time_limit: (0, 0),
                max_attempts: (3, 8),
            },
            PuzzleType::ColorMatching => Self {
                elements: (4, 10),
                complexity: (2, 7),
                time_limit: (0, 0),
                max_attempts: (0, 0),
            },
        }
    }

    /// Describes the first malformed range, if any.
    pub fn check(&self) -> Result<(), String> {
        let ranges = [
            ("elements", self.elements),
            ("complexity", self.complexity),
            ("time_limit", self.time_limit),
            ("max_attempts", self.max_attempts),
        ];
        for (name, (min, max)) in ranges {
            if min > max {
                return Err(format!("{} range {}..={} is inverted", name, min, max));
            }
        }
        if self.elements.0 == 0 {
            return Err("elements range must start at 1 or more".to_string());
        }
        if self.elements.1 > Self::MAX_ELEMENTS {
            return Err(format!(
                "elements range ends at {}, above the limit of {}",
                self.elements.1,
                Self::MAX_ELEMENTS
            ));
        }
        Ok(())
    }

    /// Clamps `value` into the max-attempts range, unless the range is unset.
    pub fn clamp_attempts(&self, value: u32) -> u32 {
        let (min, max) = self.max_attempts;
        if max == 0 {
            value
        } else {
            value.clamp(min, max)
        }
    }
}
