//! Settings for the iterative message-passing schedule

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Convergence settings for matches with more than two teams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Largest marginal change tolerated between loop iterations
    pub convergence_tolerance: f64,
    /// Iteration cap after which best-effort beliefs are returned
    pub max_iterations: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            convergence_tolerance: 1e-4,
            max_iterations: 100,
        }
    }
}

impl InferenceConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(RatingError::configuration(
                "Convergence tolerance must be finite and positive",
            )
            .into());
        }

        if self.max_iterations == 0 {
            return Err(RatingError::configuration("Max iterations must be greater than 0").into());
        }

        Ok(())
    }
}
