//! Match quality: how likely a match is to end in a draw
//!
//! Computed in closed form from the prior skills alone. With `A` the
//! player-to-team-difference assignment matrix (column `j` is `+1` for the
//! players of team `j` and `-1` for those of team `j + 1`), `S` the diagonal
//! of prior variances and `m` the prior means:
//!
//! ```text
//! quality = exp(-½·mᵀA·(β²AᵀA + AᵀSA)⁻¹·Aᵀm) · sqrt(det(β²AᵀA) / det(β²AᵀA + AᵀSA))
//! ```
//!
//! For two teams this is the familiar pairwise draw probability
//! normalisation.

use crate::error::{RatingError, Result};
use crate::types::Team;
use nalgebra::{DMatrix, DVector};

/// Draw likelihood of `teams` relative to a perfectly even match, in `[0, 1]`
pub fn match_quality(teams: &[Team], beta: f64) -> Result<f64> {
    if teams.len() < 2 {
        return Err(RatingError::invalid_argument(format!(
            "match quality needs at least 2 teams, got {}",
            teams.len()
        ))
        .into());
    }

    let ratings: Vec<_> = teams.iter().flat_map(|team| team.ratings()).collect();
    let player_count = ratings.len();
    let difference_count = teams.len() - 1;

    let means = DVector::from_iterator(player_count, ratings.iter().map(|r| r.mean));
    let variances = DMatrix::from_diagonal(&DVector::from_iterator(
        player_count,
        ratings.iter().map(|r| r.variance()),
    ));

    let mut assignment = DMatrix::<f64>::zeros(player_count, difference_count);
    let mut row = 0;
    for (team_index, team) in teams.iter().enumerate() {
        for _ in 0..team.player_count() {
            if team_index < difference_count {
                assignment[(row, team_index)] = 1.0;
            }
            if team_index > 0 {
                assignment[(row, team_index - 1)] = -1.0;
            }
            row += 1;
        }
    }

    let transposed = assignment.transpose();
    let performance_noise = (&transposed * &assignment) * (beta * beta);
    let middle = &performance_noise + &transposed * &variances * &assignment;

    let inverse = middle.clone().try_inverse().ok_or_else(|| RatingError::InternalError {
        message: "match quality covariance is singular".to_string(),
    })?;

    let projected = &transposed * &means;
    let exponent = -0.5 * (projected.transpose() * inverse * &projected)[(0, 0)];
    let ratio = performance_noise.determinant() / middle.determinant();

    let quality = exponent.exp() * ratio.sqrt();
    if !quality.is_finite() {
        return Err(RatingError::InternalError {
            message: format!("match quality is not finite: {quality}"),
        }
        .into());
    }

    Ok(quality.clamp(0.0, 1.0))
}
