//! Rank ordering of match results

use crate::error::{RatingError, Result};
use crate::types::Team;

/// Copies of `teams` and `ranks`, stably sorted so the best rank comes first
///
/// Teams sharing a rank keep their relative order. The caller's slices are
/// left untouched. Fails with `InvalidArgument` unless there is exactly one
/// rank per team.
pub fn sort_by_rank(teams: &[Team], ranks: &[u32]) -> Result<(Vec<Team>, Vec<u32>)> {
    if teams.len() != ranks.len() {
        return Err(RatingError::invalid_argument(format!(
            "{} ranks given for {} teams",
            ranks.len(),
            teams.len()
        ))
        .into());
    }

    let mut order: Vec<usize> = (0..teams.len()).collect();
    order.sort_by_key(|&index| ranks[index]);

    let sorted_teams = order.iter().map(|&index| teams[index].clone()).collect();
    let sorted_ranks = order.iter().map(|&index| ranks[index]).collect();
    Ok((sorted_teams, sorted_ranks))
}
