pub mod generation;

pub use generation::{GenerationParams, NoiseParams};
