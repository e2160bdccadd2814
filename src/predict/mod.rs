pub mod engine;
pub mod error;
pub mod formula;
pub mod normalizer;
pub mod selector;

pub use engine::PredictionEngine;
pub use formula::{FixedNoise, NoiseRange, NoiseSource, ScoreFormula, SeededNoise};
