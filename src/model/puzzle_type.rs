use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleType {
    PressurePlate,
    LeverSequence,
    BlockPushing,
    TimedChallenge,
    MemoryPattern,
    ColorMatching,
}

impl PuzzleType {
    pub fn all() -> Vec<PuzzleType> {
        vec![
            PuzzleType::PressurePlate,
            PuzzleType::LeverSequence,
            PuzzleType::BlockPushing,
            PuzzleType::TimedChallenge,
            PuzzleType::MemoryPattern,
            PuzzleType::ColorMatching,
        ]
    }

    /// Types available in shallow or easy rooms.
    pub fn basic() -> Vec<PuzzleType> {
        vec![PuzzleType::PressurePlate, PuzzleType::LeverSequence]
    }

    /// Types available in mid-depth rooms.
    pub fn intermediate() -> Vec<PuzzleType> {
        vec![
            PuzzleType::PressurePlate,
            PuzzleType::LeverSequence,
            PuzzleType::MemoryPattern,
            PuzzleType::ColorMatching,
        ]
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PuzzleType::PressurePlate => "pressure_plate",
            PuzzleType::LeverSequence => "lever_sequence",
            PuzzleType::BlockPushing => "block_pushing",
            PuzzleType::TimedChallenge => "timed_challenge",
            PuzzleType::MemoryPattern => "memory_pattern",
            PuzzleType::ColorMatching => "color_matching",
        }
    }

    pub fn reward_type(&self) -> &'static str {
        match self {
            PuzzleType::PressurePlate => "treasure_chest",
            PuzzleType::LeverSequence => "secret_door",
            PuzzleType::BlockPushing => "hidden_passage",
            PuzzleType::TimedChallenge => "rare_item",
            PuzzleType::MemoryPattern => "magic_scroll",
            PuzzleType::ColorMatching => "gem_cache",
        }
    }
}

impl std::fmt::Display for PuzzleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
