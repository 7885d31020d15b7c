use std::{collections::BTreeMap, fs, path::Path};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::PuzzleError,
    model::{PuzzleTemplate, PuzzleType},
};

const CURRENT_VERSION: u32 = 2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    /// Budget for solver-backed archetypes; `None` searches without limit.
    #[serde(default = "default_node_limit")]
    pub solver_node_limit: Option<u64>,

    /// Per-archetype overrides of the built-in templates.
    #[serde(default)]
    pub templates: BTreeMap<PuzzleType, PuzzleTemplate>,
}

// Helper functions for default values
fn default_version() -> u32 {
    CURRENT_VERSION
}
fn default_node_limit() -> Option<u64> {
    Some(100_000)
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: CURRENT_VERSION,
            solver_node_limit: default_node_limit(),
            templates: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_json(contents: &str) -> Result<Self, PuzzleError> {
        let mut settings: Settings =
            serde_json::from_str(contents).map_err(|e| PuzzleError::Settings(e.to_string()))?;
        settings.migrate();
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| PuzzleError::Settings(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_json(&contents)?;
        info!(target: "settings", "Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, PuzzleError> {
        serde_json::to_string_pretty(self).map_err(|e| PuzzleError::Settings(e.to_string()))
    }

    fn migrate(&mut self) {
        match self.version {
            // version 1 had no node budget and searched unbounded
            0 | 1 => {
                warn!(target: "settings", "Migrating settings from version {}", self.version);
                self.version = CURRENT_VERSION;
            }
            _ => (),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The override for `puzzle_type`, or its built-in template.
    pub fn template_for(&self, puzzle_type: PuzzleType) -> PuzzleTemplate {
        self.templates
            .get(&puzzle_type)
            .copied()
            .unwrap_or_else(|| PuzzleTemplate::builtin(puzzle_type))
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        for puzzle_type in PuzzleType::all() {
            self.template_for(puzzle_type)
                .check()
                .map_err(|e| PuzzleError::Configuration(format!("{} template: {}", puzzle_type, e)))?;
        }
        if self.template_for(PuzzleType::TimedChallenge).time_limit.0 == 0 {
            return Err(PuzzleError::Configuration(
                "timed_challenge template needs a positive minimum time limit".to_string(),
            ));
        }
        if self.solver_node_limit == Some(0) {
            return Err(PuzzleError::Configuration(
                "solver_node_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
