use serde::{Deserialize, Serialize};

use super::GenerationParams;

/// Integer puzzle difficulty in `1..=10`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Difficulty(u8);

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::MIN
    }
}

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(10);

    /// Deepest rooms add at most this much on top of the requested difficulty.
    const MAX_DEPTH_BONUS: f64 = 4.0;
    const DEPTH_WEIGHT: f64 = 0.3;
    const DIFFICULTY_WEIGHT: f64 = 6.0;

    pub fn new(value: u8) -> Self {
        Difficulty(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// `difficulty * 6 + min(depth * 0.3, 4) + 1`, truncated and clamped.
    pub fn from_params(params: &GenerationParams) -> Self {
        let requested = params.normalized_difficulty();
        let depth_bonus = (params.depth as f64 * Self::DEPTH_WEIGHT).min(Self::MAX_DEPTH_BONUS);
        let raw = (requested * Self::DIFFICULTY_WEIGHT + depth_bonus + 1.0).trunc();
        Difficulty::new(raw.clamp(Self::MIN.0 as f64, Self::MAX.0 as f64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn as_u32(&self) -> u32 {
        self.0 as u32
    }

    /// Interpolates within `min..=max` by difficulty tenths, truncating.
    pub fn scale(&self, min: u32, max: u32) -> u32 {
        let span = max.saturating_sub(min) as u64 * self.as_u32() as u64 / 10;
        (min as u64 + span).try_into().unwrap_or(max)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(difficulty: f64, depth: u32) -> GenerationParams {
        GenerationParams::new(difficulty, depth)
    }

    #[test]
    fn test_midpoint_truncates() {
        assert_eq!(Difficulty::from_params(&params(0.5, 5)).value(), 5);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(Difficulty::from_params(&params(0.0, 0)), Difficulty::MIN);
        assert_eq!(Difficulty::from_params(&params(1.0, 100)), Difficulty::MAX);
        assert_eq!(Difficulty::from_params(&params(1.0, 0)).value(), 7);
        assert_eq!(Difficulty::from_params(&params(0.0, 100)).value(), 5);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(Difficulty::from_params(&params(-3.0, 0)), Difficulty::MIN);
        assert_eq!(Difficulty::from_params(&params(f64::NAN, 0)), Difficulty::MIN);
        assert_eq!(Difficulty::from_params(&params(42.0, 0)).value(), 7);
    }

    #[test]
    fn test_scale() {
        assert_eq!(Difficulty::new(1).scale(3, 8), 3);
        assert_eq!(Difficulty::new(5).scale(3, 8), 5);
        assert_eq!(Difficulty::new(10).scale(3, 8), 8);
        assert_eq!(Difficulty::new(7).scale(4, 4), 4);
    }

    #[test]
    fn test_scale_wide_range() {
        assert_eq!(Difficulty::new(10).scale(1, 1_000_000_000), 1_000_000_000);
        assert_eq!(Difficulty::new(5).scale(0, u32::MAX), u32::MAX / 2);
        assert_eq!(Difficulty::new(10).scale(0, u32::MAX), u32::MAX);
    }
}
