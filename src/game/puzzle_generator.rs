use log::{debug, info, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use uuid::Builder;

use crate::{
    error::PuzzleError,
    model::{Difficulty, GenerationParams, Puzzle, PuzzleTemplate, PuzzleType},
};

use super::{
    puzzle_variants::{
        ArchetypePolicy, BuiltArchetype, BLOCK_PUSHING, COLOR_MATCHING, LEVER_SEQUENCE,
        MEMORY_PATTERN, PRESSURE_PLATE,
    },
    settings::Settings,
};

const BASIC_DEPTH: u32 = 3;
const BASIC_DIFFICULTY: f64 = 0.3;
const INTERMEDIATE_DEPTH: u32 = 7;
const INTERMEDIATE_DIFFICULTY: f64 = 0.7;

/// Picks an archetype uniformly from the tier unlocked by depth and difficulty.
pub fn select_puzzle_type(params: &GenerationParams, rng: &mut impl Rng) -> PuzzleType {
    let difficulty = params.normalized_difficulty();
    let tier = if params.depth < BASIC_DEPTH || difficulty < BASIC_DIFFICULTY {
        PuzzleType::basic()
    } else if params.depth < INTERMEDIATE_DEPTH || difficulty < INTERMEDIATE_DIFFICULTY {
        PuzzleType::intermediate()
    } else {
        PuzzleType::all()
    };
    tier[rng.random_range(0..tier.len())]
}

/// Generates one puzzle with the built-in templates.
pub fn generate(seed: u64, params: &GenerationParams) -> Result<Puzzle, PuzzleError> {
    PuzzleGenerator::default().generate(seed, params)
}

#[derive(Debug, Clone, Default)]
pub struct PuzzleGenerator {
    settings: Settings,
}

impl PuzzleGenerator {
    pub fn new(settings: Settings) -> Result<Self, PuzzleError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Deterministic in `(seed, params)` for a given generator.
    pub fn generate(&self, seed: u64, params: &GenerationParams) -> Result<Puzzle, PuzzleError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let puzzle_type = select_puzzle_type(params, &mut rng);
        let difficulty = Difficulty::from_params(params);
        debug!(
            target: "puzzle_generator",
            "Seed {} with {:?}: {} at difficulty {}",
            seed,
            params,
            puzzle_type,
            difficulty
        );

        let id = puzzle_id(puzzle_type, &mut rng);
        let template = self.settings.template_for(puzzle_type);
        let (built, time_limit) = match puzzle_type {
            PuzzleType::TimedChallenge => self.build_timed(difficulty, &template, &mut rng)?,
            PuzzleType::PressurePlate => (self.build(&PRESSURE_PLATE, difficulty, &mut rng)?, 0),
            PuzzleType::LeverSequence => (self.build(&LEVER_SEQUENCE, difficulty, &mut rng)?, 0),
            PuzzleType::BlockPushing => (self.build(&BLOCK_PUSHING, difficulty, &mut rng)?, 0),
            PuzzleType::MemoryPattern => (self.build(&MEMORY_PATTERN, difficulty, &mut rng)?, 0),
            PuzzleType::ColorMatching => (self.build(&COLOR_MATCHING, difficulty, &mut rng)?, 0),
        };

        let puzzle = Puzzle {
            id,
            puzzle_type,
            difficulty,
            solution: built.solution,
            element_count: built.elements.len(),
            elements: built.elements,
            time_limit,
            max_attempts: built.max_attempts,
            hint_text: built.hint_text,
            description: built.description,
            reward_type: puzzle_type.reward_type().to_string(),
            complexity: difficulty.scale(template.complexity.0, template.complexity.1),
            seed,
        };
        puzzle.validate()?;

        info!(target: "puzzle_generator", "Generated {}", puzzle);
        trace!(target: "puzzle_generator", "Elements: {:?}", puzzle.elements);
        Ok(puzzle)
    }

    fn build(
        &self,
        policy: &ArchetypePolicy,
        difficulty: Difficulty,
        rng: &mut StdRng,
    ) -> Result<BuiltArchetype, PuzzleError> {
        let template = self.settings.template_for(policy.puzzle_type);
        let count = difficulty.scale(template.elements.0, template.elements.1) as usize;
        trace!(
            target: "puzzle_generator",
            "Building {} with {} elements",
            policy.puzzle_type,
            count
        );
        policy
            .build(count, difficulty, &template, rng, self.settings.solver_node_limit)
            .map_err(|e| {
                warn!(target: "puzzle_generator", "{} builder failed: {}", policy.puzzle_type, e);
                PuzzleError::from(e)
            })
    }

    /// A pressure-plate or lever puzzle against the clock.
    fn build_timed(
        &self,
        difficulty: Difficulty,
        template: &PuzzleTemplate,
        rng: &mut StdRng,
    ) -> Result<(BuiltArchetype, u32), PuzzleError> {
        let delegate = if rng.random_bool(0.5) {
            &PRESSURE_PLATE
        } else {
            &LEVER_SEQUENCE
        };
        let mut built = self.build(delegate, difficulty, rng)?;

        let (min, max) = template.time_limit;
        let sampled = rng.random_range(min..=max);
        let time_limit = scaled_time_limit(sampled, difficulty);
        trace!(
            target: "puzzle_generator",
            "Timed {}: sampled {}s, scaled to {}s",
            delegate.puzzle_type,
            sampled,
            time_limit
        );

        built.hint_text = format!(
            "Hurry, {} seconds on the clock! {}",
            time_limit, built.hint_text
        );
        built.description = format!(
            "{} Somewhere, sand is already running out.",
            built.description
        );
        Ok((built, time_limit))
    }
}

/// `sampled * (1 - difficulty / 20)`, truncated, never below one second.
fn scaled_time_limit(sampled: u32, difficulty: Difficulty) -> u32 {
    let scaled = sampled as f64 * (1.0 - difficulty.as_u32() as f64 / 20.0);
    (scaled.trunc() as u32).max(1)
}

/// Seeded, so the id is as reproducible as the rest of the puzzle.
fn puzzle_id(puzzle_type: PuzzleType, rng: &mut StdRng) -> String {
    let uuid = Builder::from_random_bytes(rng.random()).into_uuid();
    format!("{}_{}", puzzle_type.tag(), uuid.simple())
}
