pub mod explanation;
pub mod providers;
pub mod recommendations;
pub mod scoring;

pub use recommendations::Recommender;
pub use scoring::{ScoringEngine, ScoringWeights};
