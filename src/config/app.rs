//! Main application configuration
//!
//! This module defines the configuration used by the command line tool,
//! including environment variable loading, TOML files and validation.

use super::game::GameInfo;
use super::inference::InferenceConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub game: GameInfo,
    pub inference: InferenceConfig,
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Multiplier of the standard deviation used for conservative ratings
    pub conservative_stddev_multiplier: f64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            conservative_stddev_multiplier: crate::types::DEFAULT_CONSERVATIVE_STDDEV_MULTIPLIER,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Some(multiplier) = parse_env("TRUESKILL_CONSERVATIVE_MULTIPLIER")? {
            self.service.conservative_stddev_multiplier = multiplier;
        }

        // Game settings
        if let Some(mean) = parse_env("TRUESKILL_INITIAL_MEAN")? {
            self.game.initial_mean = mean;
        }
        if let Some(stddev) = parse_env("TRUESKILL_INITIAL_STDDEV")? {
            self.game.initial_stddev = stddev;
        }
        if let Some(beta) = parse_env("TRUESKILL_BETA")? {
            self.game.beta = beta;
        }
        if let Some(dynamics) = parse_env("TRUESKILL_DYNAMICS_FACTOR")? {
            self.game.dynamics_factor = dynamics;
        }
        if let Some(draw_probability) = parse_env("TRUESKILL_DRAW_PROBABILITY")? {
            self.game.draw_probability = draw_probability;
        }

        // Inference settings
        if let Some(tolerance) = parse_env("TRUESKILL_CONVERGENCE_TOLERANCE")? {
            self.inference.convergence_tolerance = tolerance;
        }
        if let Some(iterations) = parse_env("TRUESKILL_MAX_ITERATIONS")? {
            self.inference.max_iterations = iterations;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if !config.service.conservative_stddev_multiplier.is_finite()
        || config.service.conservative_stddev_multiplier < 0.0
    {
        return Err(anyhow!("Conservative multiplier must be finite and non-negative"));
    }

    config.game.validate()?;
    config.inference.validate()?;

    Ok(())
}
