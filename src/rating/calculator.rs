//! Rating calculator trait
//!
//! This module defines the interface for rating calculations so callers can
//! hold any implementation behind `dyn RatingCalculator`.

use crate::factor_graph::ScheduleDiagnostics;
use crate::types::{PlayerRatings, Rating, Team};
use serde::{Deserialize, Serialize};

/// Result of a rating calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingCalculationResult {
    /// Posterior rating of every player, in the order the teams listed them
    pub ratings: PlayerRatings,
    /// Quality score of the match as played (0.0 to 1.0, higher is more even)
    pub match_quality: f64,
    /// How message passing went; `converged` is false when the iteration
    /// cap was hit and the ratings are best effort
    pub diagnostics: ScheduleDiagnostics,
}

/// Trait for calculating rating changes after games
pub trait RatingCalculator: Send + Sync {
    /// Calculate posterior ratings from a match result
    ///
    /// # Arguments
    /// * `teams` - Teams in any order, each listing its players' prior ratings
    /// * `ranks` - Rank of each team where 1 = first place; equal ranks tie
    ///
    /// # Returns
    /// Result containing posterior ratings, match quality and diagnostics
    fn calculate_new_ratings(
        &self,
        teams: &[Team],
        ranks: &[u32],
    ) -> crate::error::Result<RatingCalculationResult>;

    /// Estimate how evenly matched `teams` are before playing
    fn calculate_match_quality(&self, teams: &[Team]) -> crate::error::Result<f64>;

    /// Get the initial rating for new players
    fn get_initial_rating(&self) -> Rating;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}
