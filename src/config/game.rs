//! Game parameters for the TrueSkill model

use crate::error::{RatingError, Result};
use crate::numerics::inverse_standard_cdf;
use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Parameters describing how skill, performance and outcomes relate in a game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameInfo {
    /// Mean skill of a new player
    pub initial_mean: f64,
    /// Skill uncertainty of a new player
    pub initial_stddev: f64,
    /// Performance noise: the skill gap giving ~76% chance to win
    pub beta: f64,
    /// Additive skill drift between matches, keeps ratings from freezing
    pub dynamics_factor: f64,
    /// Probability that two equally skilled teams draw
    pub draw_probability: f64,
}

impl Default for GameInfo {
    fn default() -> Self {
        Self::with_initial_mean(25.0)
    }
}

impl GameInfo {
    /// Default parameters scaled to a different initial mean
    pub fn with_initial_mean(initial_mean: f64) -> Self {
        Self {
            initial_mean,
            initial_stddev: initial_mean / 3.0,
            beta: initial_mean / 6.0,
            dynamics_factor: initial_mean / 300.0,
            draw_probability: 0.10,
        }
    }

    /// Rating given to players without history
    pub fn default_rating(&self) -> Rating {
        Rating::new(self.initial_mean, self.initial_stddev)
    }

    /// Performance difference below which a match counts as a draw
    ///
    /// Derived from the draw probability for a pairwise comparison of two
    /// performances each carrying noise `beta`.
    pub fn draw_margin(&self) -> f64 {
        inverse_standard_cdf(0.5 * (self.draw_probability + 1.0)) * 2.0_f64.sqrt() * self.beta
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("initial_mean", self.initial_mean),
            ("initial_stddev", self.initial_stddev),
            ("beta", self.beta),
            ("dynamics_factor", self.dynamics_factor),
            ("draw_probability", self.draw_probability),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(RatingError::configuration(format!("{name} must be finite")).into());
        }

        if self.initial_stddev <= 0.0 {
            return Err(RatingError::configuration("Initial stddev must be positive").into());
        }

        if self.beta <= 0.0 {
            return Err(RatingError::configuration("Beta must be positive").into());
        }

        if self.dynamics_factor < 0.0 {
            return Err(RatingError::configuration("Dynamics factor must be non-negative").into());
        }

        if !(0.0..1.0).contains(&self.draw_probability) {
            return Err(RatingError::configuration("Draw probability must be in [0, 1)").into());
        }

        Ok(())
    }
}
