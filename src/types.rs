//! Common types used throughout the rating engine

use crate::numerics::GaussianDistribution;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for players
pub type PlayerId = String;

/// Posterior ratings keyed by player, in the order players were supplied
pub type PlayerRatings = IndexMap<PlayerId, Rating>;

/// Multiplier of the standard deviation subtracted for a conservative estimate
pub const DEFAULT_CONSERVATIVE_STDDEV_MULTIPLIER: f64 = 3.0;

/// Skill rating of a player: a Gaussian belief over their skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub mean: f64,
    pub stddev: f64,
}

impl Rating {
    pub fn new(mean: f64, stddev: f64) -> Self {
        Self { mean, stddev }
    }

    pub fn variance(&self) -> f64 {
        self.stddev * self.stddev
    }

    /// Skill estimate that the player is very likely above: `mean - k * stddev`
    pub fn conservative_rating(&self, stddev_multiplier: f64) -> f64 {
        self.mean - stddev_multiplier * self.stddev
    }
}

impl From<GaussianDistribution> for Rating {
    fn from(belief: GaussianDistribution) -> Self {
        Self {
            mean: belief.mean(),
            stddev: belief.stddev(),
        }
    }
}

impl From<Rating> for GaussianDistribution {
    fn from(rating: Rating) -> Self {
        GaussianDistribution::new(rating.mean, rating.stddev)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "μ={:.4}, σ={:.4} (conservative {:.4})",
            self.mean,
            self.stddev,
            self.conservative_rating(DEFAULT_CONSERVATIVE_STDDEV_MULTIPLIER)
        )
    }
}

/// A team taking part in a match: players with their prior ratings, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    players: Vec<(PlayerId, Rating)>,
}

impl Team {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Team::add_player`]
    pub fn with_player(mut self, player_id: impl Into<PlayerId>, rating: Rating) -> Self {
        self.add_player(player_id, rating);
        self
    }

    pub fn add_player(&mut self, player_id: impl Into<PlayerId>, rating: Rating) {
        self.players.push((player_id.into(), rating));
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(|(id, _)| id)
    }

    pub fn ratings(&self) -> impl Iterator<Item = &Rating> {
        self.players.iter().map(|(_, rating)| rating)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &Rating)> {
        self.players.iter().map(|(id, rating)| (id, rating))
    }
}

impl FromIterator<(PlayerId, Rating)> for Team {
    fn from_iter<I: IntoIterator<Item = (PlayerId, Rating)>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().collect(),
        }
    }
}
