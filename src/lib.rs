//! TrueSkill Engine - Bayesian skill ratings for team matches
//!
//! This crate computes TrueSkill posterior ratings by message passing on a
//! Gaussian factor graph, supporting any number of teams, ties, and a
//! closed-form match quality estimate.

pub mod config;
pub mod error;
pub mod factor_graph;
pub mod metrics;
pub mod numerics;
pub mod rating;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use config::{GameInfo, InferenceConfig};
pub use factor_graph::ScheduleDiagnostics;
pub use rating::{
    FactorGraphTrueSkillCalculator, RatingCalculationResult, RatingCalculator, TrueSkillConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
