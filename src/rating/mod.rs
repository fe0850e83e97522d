//! Rating system built on TrueSkill factor graph inference
//!
//! This module provides the rating calculator interface, the factor graph
//! implementation, rank ordering and match quality.

pub mod calculator;
pub mod quality;
pub mod ranking;
pub mod trueskill;

// Re-export commonly used types
pub use calculator::{RatingCalculationResult, RatingCalculator};
pub use quality::match_quality;
pub use ranking::sort_by_rank;
pub use trueskill::{
    FactorGraphTrueSkillCalculator, TrueSkillConfig, PLAYERS_PER_TEAM_RANGE, TEAM_COUNT_RANGE,
};
