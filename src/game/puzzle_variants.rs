use std::collections::BTreeMap;

use itertools::Itertools;
use log::trace;
use rand::{
    rngs::StdRng,
    seq::{index, SliceRandom},
    Rng,
};

use crate::{
    error::ConstraintError,
    model::{Difficulty, ElementState, Position, PuzzleElement, PuzzleTemplate, PuzzleType},
    solver::{ConstraintSolver, PatternBuilder},
};

pub const SYMBOLS: [&str; 9] = [
    "circle", "square", "triangle", "star", "moon", "sun", "diamond", "heart", "cross",
];

pub const COLORS: [&str; 8] = [
    "red", "blue", "green", "yellow", "purple", "orange", "white", "black",
];

/// `base + difficulty / divisor`, integer division.
#[derive(Debug, Clone, Copy)]
pub struct Scaling {
    pub base: u32,
    pub divisor: u32,
}

impl Scaling {
    const fn new(base: u32, divisor: u32) -> Self {
        Self { base, divisor }
    }

    pub fn at(&self, difficulty: Difficulty) -> u32 {
        self.base + difficulty.as_u32() / self.divisor.max(1)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum StateRule {
    /// Switched off.
    Off,
    /// Palette entry `index % len`.
    PaletteCycle(&'static [&'static str]),
    /// Uniformly random palette entry; repeats allowed.
    RandomPalette(&'static [&'static str]),
    /// Carries its own index for pairing with a target.
    Indexed,
}

impl StateRule {
    fn state_for(&self, index: usize, rng: &mut StdRng) -> ElementState {
        match self {
            StateRule::Off => ElementState::Bool(false),
            StateRule::PaletteCycle(palette) => {
                ElementState::Name(palette[index % palette.len()].to_string())
            }
            StateRule::RandomPalette(palette) => {
                ElementState::Name(palette[rng.random_range(0..palette.len())].to_string())
            }
            StateRule::Indexed => ElementState::Map(
                [("index".to_string(), index.to_string())]
                    .into_iter()
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum SolutionRule {
    /// Distinct elements in element order; order is irrelevant to the player.
    RandomSubset(Scaling),
    /// Distinct elements whose order is fixed by a uniqueness pattern solved
    /// over shuffled domains.
    SolvedSequence(Scaling),
    AllElements,
    /// Sequence drawn with replacement.
    WithReplacement(Scaling),
    /// Every element whose color is in a random target set of this size.
    MatchingColors(Scaling),
}

/// Everything that distinguishes one constructive archetype from another.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypePolicy {
    pub puzzle_type: PuzzleType,
    pub id_prefix: &'static str,
    pub element_type: &'static str,
    pub state: StateRule,
    pub solution: SolutionRule,
    pub attempts: Option<Scaling>,
    /// Adds one non-interactable target per element, laid out below them.
    pub paired_targets: bool,
    pub grid_width: usize,
}

pub const PRESSURE_PLATE: ArchetypePolicy = ArchetypePolicy {
    puzzle_type: PuzzleType::PressurePlate,
    id_prefix: "plate",
    element_type: "pressure_plate",
    state: StateRule::Off,
    solution: SolutionRule::RandomSubset(Scaling::new(1, 2)),
    attempts: None,
    paired_targets: false,
    grid_width: 4,
};

pub const LEVER_SEQUENCE: ArchetypePolicy = ArchetypePolicy {
    puzzle_type: PuzzleType::LeverSequence,
    id_prefix: "lever",
    element_type: "lever",
    state: StateRule::Off,
    solution: SolutionRule::SolvedSequence(Scaling::new(2, 2)),
    attempts: Some(Scaling::new(5, 1)),
    paired_targets: false,
    grid_width: 8,
};

pub const BLOCK_PUSHING: ArchetypePolicy = ArchetypePolicy {
    puzzle_type: PuzzleType::BlockPushing,
    id_prefix: "block",
    element_type: "block",
    state: StateRule::Indexed,
    solution: SolutionRule::AllElements,
    attempts: None,
    paired_targets: true,
    grid_width: 8,
};

pub const MEMORY_PATTERN: ArchetypePolicy = ArchetypePolicy {
    puzzle_type: PuzzleType::MemoryPattern,
    id_prefix: "symbol",
    element_type: "memory_symbol",
    state: StateRule::PaletteCycle(&SYMBOLS),
    solution: SolutionRule::WithReplacement(Scaling::new(2, 3)),
    attempts: Some(Scaling::new(3, 2)),
    paired_targets: false,
    grid_width: 3,
};

pub const COLOR_MATCHING: ArchetypePolicy = ArchetypePolicy {
    puzzle_type: PuzzleType::ColorMatching,
    id_prefix: "tile",
    element_type: "colored_tile",
    state: StateRule::RandomPalette(&COLORS),
    solution: SolutionRule::MatchingColors(Scaling::new(1, 3)),
    attempts: None,
    paired_targets: false,
    grid_width: 4,
};

#[derive(Debug, Clone)]
pub struct BuiltArchetype {
    pub elements: Vec<PuzzleElement>,
    pub solution: Vec<String>,
    pub max_attempts: u32,
    pub hint_text: String,
    pub description: String,
}

impl ArchetypePolicy {
    fn element_id(&self, index: usize) -> String {
        format!("{}_{}", self.id_prefix, index)
    }

    /// Builds `count` elements and a solution that references only them.
    pub fn build(
        &self,
        count: usize,
        difficulty: Difficulty,
        template: &PuzzleTemplate,
        rng: &mut StdRng,
        node_limit: Option<u64>,
    ) -> Result<BuiltArchetype, ConstraintError> {
        let count = count.max(1);
        let mut elements: Vec<PuzzleElement> = (0..count)
            .map(|i| PuzzleElement {
                id: self.element_id(i),
                element_type: self.element_type.to_string(),
                position: Position::in_grid(i, self.grid_width),
                state: self.state.state_for(i, rng),
                interactable: true,
            })
            .collect();

        let mut target_colors = Vec::new();
        let solution: Vec<String> = match self.solution {
            SolutionRule::RandomSubset(size) => {
                let k = (size.at(difficulty) as usize).min(count);
                let mut picked = index::sample(rng, count, k).into_vec();
                picked.sort_unstable();
                picked.into_iter().map(|i| elements[i].id.clone()).collect()
            }
            SolutionRule::SolvedSequence(size) => {
                let k = (size.at(difficulty) as usize).min(count);
                let picked = index::sample(rng, count, k).into_vec();
                solve_step_order(&picked, rng.random(), node_limit)?
                    .into_iter()
                    .map(|i| elements[i].id.clone())
                    .collect()
            }
            SolutionRule::AllElements => elements.iter().map(|e| e.id.clone()).collect(),
            SolutionRule::WithReplacement(size) => (0..size.at(difficulty))
                .map(|_| elements[rng.random_range(0..count)].id.clone())
                .collect(),
            SolutionRule::MatchingColors(size) => {
                let k = (size.at(difficulty) as usize).min(COLORS.len());
                let mut palette = COLORS.to_vec();
                palette.shuffle(rng);
                target_colors = palette.into_iter().take(k).map(String::from).collect();

                let mut matching: Vec<String> = elements
                    .iter()
                    .filter(|e| {
                        e.state
                            .name()
                            .is_some_and(|color| target_colors.iter().any(|t| t == color))
                    })
                    .map(|e| e.id.clone())
                    .collect();
                if matching.is_empty() {
                    // advertise the fallback tile's color so the hint stays truthful
                    let first = &elements[0];
                    trace!(
                        target: "puzzle_generator",
                        "No tile matches {:?}, falling back to {}",
                        target_colors,
                        first.id
                    );
                    if let Some(color) = first.state.name() {
                        target_colors.push(color.to_string());
                    }
                    matching.push(first.id.clone());
                }
                matching
            }
        };

        if self.paired_targets {
            let rows = count.div_ceil(self.grid_width.max(1)) as i32;
            for i in 0..count {
                let above = Position::in_grid(i, self.grid_width);
                elements.push(PuzzleElement {
                    id: format!("target_{}", i),
                    element_type: "target".to_string(),
                    position: Position::new(above.x, above.y + rows + 1),
                    state: ElementState::Map(BTreeMap::from([
                        ("index".to_string(), i.to_string()),
                        ("occupied".to_string(), "false".to_string()),
                    ])),
                    interactable: false,
                });
            }
        }

        let max_attempts = self
            .attempts
            .map(|a| template.clamp_attempts(a.at(difficulty)))
            .unwrap_or(0);

        Ok(BuiltArchetype {
            hint_text: self.hint_text(&solution, &target_colors),
            description: self.description(count),
            elements,
            solution,
            max_attempts,
        })
    }

    fn hint_text(&self, solution: &[String], target_colors: &[String]) -> String {
        match self.puzzle_type {
            PuzzleType::PressurePlate => format!(
                "Only {} of these plates hold the door open. Stand on the right ones.",
                solution.len()
            ),
            PuzzleType::LeverSequence => {
                format!("Pull {} levers, in the right order.", solution.len())
            }
            PuzzleType::BlockPushing => "Push every block onto its matching target.".to_string(),
            PuzzleType::MemoryPattern => format!(
                "Watch {} symbols light up, then repeat the pattern.",
                solution.len()
            ),
            PuzzleType::ColorMatching => format!(
                "Step on every tile colored {}.",
                target_colors.iter().join(" or ")
            ),
            PuzzleType::TimedChallenge => "Beat the clock.".to_string(),
        }
    }

    fn description(&self, count: usize) -> String {
        match self.puzzle_type {
            PuzzleType::PressurePlate => {
                format!("A floor of {} worn pressure plates.", count)
            }
            PuzzleType::LeverSequence => format!("A wall lined with {} rusty levers.", count),
            PuzzleType::BlockPushing => format!(
                "{} heavy stone blocks and as many marks on the floor.",
                count
            ),
            PuzzleType::MemoryPattern => {
                format!("{} glyphs carved into the wall, faintly glowing.", count)
            }
            PuzzleType::ColorMatching => format!("A mosaic of {} colored tiles.", count),
            PuzzleType::TimedChallenge => "A room that will not wait for you.".to_string(),
        }
    }
}

/// Orders `picked` element indices: one step variable per index, all steps
/// distinct, each domain shuffled by the solver's own RNG.
fn solve_step_order(
    picked: &[usize],
    seed: u64,
    node_limit: Option<u64>,
) -> Result<Vec<usize>, ConstraintError> {
    let names: Vec<String> = (0..picked.len()).map(|i| format!("step_{:02}", i)).collect();

    let mut solver = ConstraintSolver::new(seed);
    solver.set_node_limit(node_limit);
    let mut builder = PatternBuilder::with_solver(solver);
    for name in &names {
        builder.add_element(name.clone(), picked.iter().map(|&i| i as i64))?;
        builder.solver_mut().shuffle_domain(name)?;
    }
    if names.len() >= 2 {
        builder.add_uniqueness_constraint(&names)?;
    }

    let steps = builder.solve()?;
    trace!(target: "puzzle_generator", "Lever steps: {:?}", steps);
    Ok(names
        .iter()
        .filter_map(|name| steps.get(name))
        .map(|&i| i as usize)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;

    use super::*;

    fn build(policy: &ArchetypePolicy, difficulty: u8, seed: u64) -> BuiltArchetype {
        let template = PuzzleTemplate::builtin(policy.puzzle_type);
        let difficulty = Difficulty::new(difficulty);
        let count = difficulty.scale(template.elements.0, template.elements.1) as usize;
        let mut rng = StdRng::seed_from_u64(seed);
        policy
            .build(count, difficulty, &template, &mut rng, Some(10_000))
            .unwrap()
    }

    fn ids(built: &BuiltArchetype) -> BTreeSet<&str> {
        built.elements.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_pressure_plate_subset() {
        for difficulty in 1..=10 {
            let built = build(&PRESSURE_PLATE, difficulty, difficulty as u64);
            let expected = (1 + difficulty as usize / 2).min(built.elements.len());
            assert_eq!(built.solution.len(), expected);
            let unique: BTreeSet<&String> = built.solution.iter().collect();
            assert_eq!(unique.len(), built.solution.len());
            assert_eq!(built.max_attempts, 0);
            assert!(built
                .elements
                .iter()
                .all(|e| e.state == ElementState::Bool(false)));
        }
    }

    #[test]
    fn test_lever_sequence_is_distinct_and_ordered() {
        let built = build(&LEVER_SEQUENCE, 6, 99);
        assert_eq!(built.solution.len(), 5);
        let unique: BTreeSet<&String> = built.solution.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(built.solution.iter().all(|id| ids(&built).contains(id.as_str())));
        assert_eq!(built.max_attempts, 11);

        // same seed, same order
        assert_eq!(build(&LEVER_SEQUENCE, 6, 99).solution, built.solution);
    }

    #[test]
    fn test_block_pushing_pairs_targets() {
        let built = build(&BLOCK_PUSHING, 10, 5);
        let blocks = built.elements.iter().filter(|e| e.element_type == "block").count();
        let targets = built.elements.iter().filter(|e| e.element_type == "target").count();
        assert_eq!(blocks, 5);
        assert_eq!(targets, 5);
        assert_eq!(built.solution.len(), blocks);
        assert!(built.solution.iter().all(|id| id.starts_with("block_")));
        let positions: BTreeSet<Position> = built.elements.iter().map(|e| e.position).collect();
        assert_eq!(positions.len(), built.elements.len());
    }

    #[test]
    fn test_memory_pattern_cycles_symbols() {
        let built = build(&MEMORY_PATTERN, 10, 5);
        assert_eq!(built.elements.len(), 9);
        for (i, element) in built.elements.iter().enumerate() {
            assert_eq!(element.state.name(), Some(SYMBOLS[i % SYMBOLS.len()]));
        }
        assert_eq!(built.solution.len(), 2 + 10 / 3);
        assert_eq!(built.max_attempts, 8);
    }

    #[test]
    fn test_color_matching_solution_matches_hint() {
        for seed in 0..50 {
            let built = build(&COLOR_MATCHING, 4, seed);
            assert!(!built.solution.is_empty());
            for id in &built.solution {
                let element = built.elements.iter().find(|e| &e.id == id).unwrap();
                let color = element.state.name().unwrap();
                assert!(built.hint_text.contains(color), "{} not in {}", color, built.hint_text);
            }
        }
    }

    #[test]
    fn test_step_order_covers_picked() {
        let picked = vec![7, 2, 5, 0];
        let mut order = solve_step_order(&picked, 11, None).unwrap();
        assert_eq!(order.len(), 4);
        order.sort();
        assert_eq!(order, vec![0, 2, 5, 7]);
        assert_eq!(solve_step_order(&[3], 11, None).unwrap(), vec![3]);
    }

    #[test]
    fn test_scaling() {
        assert_eq!(Scaling::new(2, 3).at(Difficulty::new(10)), 5);
        assert_eq!(Scaling::new(5, 1).at(Difficulty::new(4)), 9);
        assert_eq!(Scaling::new(1, 0).at(Difficulty::new(4)), 5);
    }
}
