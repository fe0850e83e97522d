//! Command line entry point for the TrueSkill rating engine
//!
//! Reads a match description from a JSON file, then prints posterior
//! ratings or match quality as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use trueskill_engine::config::AppConfig;
use trueskill_engine::metrics::MetricsCollector;
use trueskill_engine::{
    FactorGraphTrueSkillCalculator, GameInfo, Rating, RatingCalculationResult, RatingCalculator,
    Team, TrueSkillConfig,
};

/// TrueSkill Engine - Bayesian skill ratings for team matches
#[derive(Parser)]
#[command(
    name = "trueskill-engine",
    version,
    about = "Compute TrueSkill ratings and match quality for team matches",
    long_about = "TrueSkill Engine rates players in matches between any number of teams, \
                 with ties, by message passing on a Gaussian factor graph."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Print Prometheus metrics after the command
    #[arg(long, help = "Print collected metrics in Prometheus text format")]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute posterior ratings from a match result
    Rate {
        /// Match file (JSON) with teams and ranks
        #[arg(short, long = "match", value_name = "FILE")]
        match_file: PathBuf,
    },
    /// Compute the quality of a prospective match
    Quality {
        /// Match file (JSON) with teams; ranks are ignored
        #[arg(short, long = "match", value_name = "FILE")]
        match_file: PathBuf,
    },
}

/// A match as read from disk
#[derive(Debug, Deserialize)]
struct MatchFile {
    teams: Vec<MatchTeam>,
    #[serde(default)]
    ranks: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct MatchTeam {
    players: Vec<MatchPlayer>,
}

#[derive(Debug, Deserialize)]
struct MatchPlayer {
    id: String,
    mean: Option<f64>,
    stddev: Option<f64>,
}

impl MatchFile {
    fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse match file {}", path.display()))
    }

    /// Teams with missing ratings filled in from the game defaults
    fn teams(&self, game_info: &GameInfo) -> Vec<Team> {
        let default = game_info.default_rating();
        self.teams
            .iter()
            .map(|team| {
                team.players
                    .iter()
                    .map(|player| {
                        let rating = Rating::new(
                            player.mean.unwrap_or(default.mean),
                            player.stddev.unwrap_or(default.stddev),
                        );
                        (player.id.clone(), rating)
                    })
                    .collect::<Team>()
            })
            .collect()
    }
}

#[derive(Serialize)]
struct RateOutput {
    #[serde(flatten)]
    result: RatingCalculationResult,
    /// `mean - k * stddev` per player, with the configured `k`
    conservative_ratings: IndexMap<String, f64>,
}

#[derive(Serialize)]
struct QualityOutput {
    match_quality: f64,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
        trueskill_engine::config::validate_config(&config)?;
    }

    Ok(config)
}

fn print_metrics(metrics: &MetricsCollector) -> Result<()> {
    use prometheus::{Encoder, TextEncoder};

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.registry().gather(), &mut buffer)?;
    println!("{}", String::from_utf8(buffer)?);
    Ok(())
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let metrics = Arc::new(MetricsCollector::new()?);
    let calculator = FactorGraphTrueSkillCalculator::new(TrueSkillConfig {
        game: config.game,
        inference: config.inference,
    })?
    .with_metrics(metrics.clone());

    match &args.command {
        Command::Rate { match_file } => {
            let game = MatchFile::load(match_file)?;
            let teams = game.teams(&config.game);
            info!(
                teams = teams.len(),
                file = %match_file.display(),
                "rating match"
            );

            let result = calculator.calculate_new_ratings(&teams, &game.ranks)?;
            let multiplier = config.service.conservative_stddev_multiplier;
            let conservative_ratings = result
                .ratings
                .iter()
                .map(|(id, rating)| (id.clone(), rating.conservative_rating(multiplier)))
                .collect();

            let output = RateOutput {
                result,
                conservative_ratings,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Quality { match_file } => {
            let game = MatchFile::load(match_file)?;
            let teams = game.teams(&config.game);

            let match_quality = calculator.calculate_match_quality(&teams)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&QualityOutput { match_quality })?
            );
        }
    }

    if args.metrics {
        print_metrics(&metrics)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    run(&args, &config)
}
