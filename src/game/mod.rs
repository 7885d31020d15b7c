pub mod puzzle_generator;
pub mod puzzle_variants;
pub mod settings;
pub mod validator;

pub use puzzle_generator::{generate, select_puzzle_type, PuzzleGenerator};
pub use settings::Settings;
pub use validator::validate;
