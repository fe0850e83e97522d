//! Shared builders and assertions for integration tests

#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use trueskill_engine::{
    FactorGraphTrueSkillCalculator, GameInfo, PlayerRatings, Rating, Team, TrueSkillConfig,
};

/// Absolute tolerance used by the reference scenarios
pub const ERROR_TOLERANCE: f64 = 0.085;

/// Calculator with default inference settings for `game`
pub fn calculator(game: GameInfo) -> FactorGraphTrueSkillCalculator {
    FactorGraphTrueSkillCalculator::new(TrueSkillConfig {
        game,
        ..TrueSkillConfig::default()
    })
    .unwrap()
}

/// Team of players all holding `rating`
pub fn team_of(ids: &[&str], rating: Rating) -> Team {
    ids.iter().map(|id| (id.to_string(), rating)).collect()
}

/// Team from explicit `(id, mean, stddev)` triples
pub fn team(players: &[(&str, f64, f64)]) -> Team {
    players
        .iter()
        .map(|(id, mean, stddev)| (id.to_string(), Rating::new(*mean, *stddev)))
        .collect()
}

pub fn assert_rating(ratings: &PlayerRatings, id: &str, mean: f64, stddev: f64) {
    let rating = ratings
        .get(id)
        .unwrap_or_else(|| panic!("no rating for {id}"));
    assert_abs_diff_eq!(rating.mean, mean, epsilon = ERROR_TOLERANCE);
    assert_abs_diff_eq!(rating.stddev, stddev, epsilon = ERROR_TOLERANCE);
}

pub fn assert_quality(quality: f64, expected: f64) {
    assert_abs_diff_eq!(quality, expected, epsilon = 0.001);
}
