use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inputs handed over by the dungeon generator for one puzzle slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Requested difficulty in `[0, 1]`.
    pub difficulty: f64,
    /// Dungeon depth of the room.
    pub depth: u32,
    #[serde(default)]
    pub genre_id: String,
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

impl GenerationParams {
    pub fn new(difficulty: f64, depth: u32) -> Self {
        Self {
            difficulty,
            depth,
            ..Default::default()
        }
    }

    /// Difficulty clamped into `[0, 1]`; NaN counts as 0.
    pub fn normalized_difficulty(&self) -> f64 {
        if self.difficulty.is_nan() {
            0.0
        } else {
            self.difficulty.clamp(0.0, 1.0)
        }
    }
}
