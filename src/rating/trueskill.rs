//! TrueSkill rating calculator backed by a factor graph
//!
//! Handles any number of teams of any size, with any mix of decisive
//! results and ties. Validation happens before anything is built; caller
//! data is only ever read.

use super::calculator::{RatingCalculationResult, RatingCalculator};
use super::quality::match_quality;
use super::ranking::sort_by_rank;
use crate::config::{GameInfo, InferenceConfig};
use crate::error::{RatingError, Result};
use crate::factor_graph::TrueSkillFactorGraph;
use crate::metrics::{MatchKind, MetricsCollector};
use crate::numerics::Range;
use crate::types::{PlayerRatings, Rating, Team};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Supported number of teams in a match
pub const TEAM_COUNT_RANGE: Range = Range::at_least(2);

/// Supported number of players on each team
pub const PLAYERS_PER_TEAM_RANGE: Range = Range::at_least(1);

/// Configuration of the factor graph calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrueSkillConfig {
    pub game: GameInfo,
    pub inference: InferenceConfig,
}

impl TrueSkillConfig {
    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.inference.validate()
    }
}

/// TrueSkill rating calculator using message passing on a factor graph
#[derive(Clone, Default)]
pub struct FactorGraphTrueSkillCalculator {
    config: TrueSkillConfig,
    metrics: Option<Arc<MetricsCollector>>,
}

impl std::fmt::Debug for FactorGraphTrueSkillCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactorGraphTrueSkillCalculator")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl FactorGraphTrueSkillCalculator {
    /// Create a new calculator after validating `config`
    pub fn new(config: TrueSkillConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: None,
        })
    }

    /// Record calculations on `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn game_info(&self) -> &GameInfo {
        &self.config.game
    }

    pub fn inference(&self) -> &InferenceConfig {
        &self.config.inference
    }

    fn validate_teams(&self, teams: &[Team]) -> Result<()> {
        if !TEAM_COUNT_RANGE.contains(teams.len()) {
            return Err(RatingError::invalid_argument(format!(
                "team count {} outside of range {}",
                teams.len(),
                TEAM_COUNT_RANGE
            ))
            .into());
        }

        let mut seen = HashSet::new();
        for (index, team) in teams.iter().enumerate() {
            if !PLAYERS_PER_TEAM_RANGE.contains(team.player_count()) {
                return Err(RatingError::invalid_argument(format!(
                    "team {} has {} players, outside of range {}",
                    index,
                    team.player_count(),
                    PLAYERS_PER_TEAM_RANGE
                ))
                .into());
            }

            for (player_id, rating) in team.iter() {
                if !seen.insert(player_id.as_str()) {
                    return Err(RatingError::invalid_argument(format!(
                        "player {player_id} appears more than once"
                    ))
                    .into());
                }

                if !rating.mean.is_finite() || !rating.stddev.is_finite() || rating.stddev <= 0.0 {
                    return Err(RatingError::invalid_argument(format!(
                        "player {player_id} has invalid rating {rating}"
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    fn validate_match(&self, teams: &[Team], ranks: &[u32]) -> Result<()> {
        self.validate_teams(teams)?;

        if ranks.len() != teams.len() {
            return Err(RatingError::invalid_argument(format!(
                "{} ranks given for {} teams",
                ranks.len(),
                teams.len()
            ))
            .into());
        }

        Ok(())
    }

    fn reject<T>(&self, err: anyhow::Error) -> Result<T> {
        if let Some(metrics) = &self.metrics {
            metrics.record_invalid_request();
        }
        debug!(error = %err, "rejected rating request");
        Err(err)
    }
}

impl RatingCalculator for FactorGraphTrueSkillCalculator {
    fn calculate_new_ratings(
        &self,
        teams: &[Team],
        ranks: &[u32],
    ) -> Result<RatingCalculationResult> {
        if let Err(err) = self.validate_match(teams, ranks) {
            return self.reject(err);
        }

        let timer = self.metrics.as_ref().map(|metrics| metrics.start_timer());

        let (sorted_teams, sorted_ranks) = sort_by_rank(teams, ranks)?;
        let mut graph = TrueSkillFactorGraph::new(
            &self.config.game,
            &self.config.inference,
            &sorted_teams,
            &sorted_ranks,
        )?;
        let diagnostics = graph.run_schedule()?;
        let posteriors = graph.updated_ratings();

        // Report players in the order the caller listed them
        let mut ratings = PlayerRatings::with_capacity(posteriors.len());
        for player_id in teams.iter().flat_map(|team| team.players()) {
            let rating = posteriors.get(player_id).copied().ok_or_else(|| {
                RatingError::InternalError {
                    message: format!("no posterior for player {player_id}"),
                }
            })?;
            ratings.insert(player_id.clone(), rating);
        }

        let match_quality = match_quality(teams, self.config.game.beta)?;

        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            metrics.record_rating_calculation(
                MatchKind::from_team_count(teams.len()),
                diagnostics.loop_iterations,
                diagnostics.converged,
                timer.stop(),
            );
        }

        debug!(
            teams = teams.len(),
            players = ratings.len(),
            match_quality,
            converged = diagnostics.converged,
            "calculated new ratings"
        );

        Ok(RatingCalculationResult {
            ratings,
            match_quality,
            diagnostics,
        })
    }

    fn calculate_match_quality(&self, teams: &[Team]) -> Result<f64> {
        if let Err(err) = self.validate_teams(teams) {
            return self.reject(err);
        }

        let quality = match_quality(teams, self.config.game.beta)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_match_quality();
        }

        Ok(quality)
    }

    fn get_initial_rating(&self) -> Rating {
        self.config.game.default_rating()
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let new_config: TrueSkillConfig = serde_json::from_value(config).map_err(|e| {
            RatingError::ConfigurationError {
                message: format!("Invalid TrueSkill configuration: {}", e),
            }
        })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
