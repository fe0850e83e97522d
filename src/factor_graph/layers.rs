//! The layered TrueSkill factor graph for a single match
//!
//! Layers, top to bottom:
//!
//! 1. prior factors feeding each player's skill variable
//! 2. likelihood factors from skill to performance (noise `beta²`)
//! 3. weighted sums from player performances to team performance
//! 4. weighted sums from adjacent team performances to their difference
//! 5. comparison factors on each difference (win or draw)
//!
//! Teams must already be sorted by rank, best first.

use super::factors::{
    Comparison, ComparisonFactor, LikelihoodFactor, PriorFactor, WeightedSumFactor,
};
use super::graph::{FactorGraph, FactorId};
use super::schedule::{Schedule, ScheduleDiagnostics};
use super::variable::VariableId;
use crate::config::{GameInfo, InferenceConfig};
use crate::error::{RatingError, Result};
use crate::types::{PlayerId, PlayerRatings, Team};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct TeamSum {
    factor: FactorId,
    summand_count: usize,
}

/// A factor graph wired for one match, together with the handles needed to
/// schedule it and read the posteriors back out
#[derive(Debug)]
pub struct TrueSkillFactorGraph {
    graph: FactorGraph,
    inference: InferenceConfig,
    skills: Vec<(PlayerId, VariableId)>,
    priors: Vec<FactorId>,
    likelihoods: Vec<FactorId>,
    team_sums: Vec<TeamSum>,
    differences: Vec<FactorId>,
    difference_variables: Vec<VariableId>,
    comparisons: Vec<FactorId>,
}

impl TrueSkillFactorGraph {
    /// Build the graph for rank-sorted `teams`
    ///
    /// `ranks[i]` belongs to `teams[i]`; adjacent equal ranks are draws.
    pub fn new(
        game_info: &GameInfo,
        inference: &InferenceConfig,
        teams: &[Team],
        ranks: &[u32],
    ) -> Result<Self> {
        if teams.len() < 2 || teams.len() != ranks.len() {
            return Err(RatingError::InternalError {
                message: format!(
                    "cannot build a graph from {} teams and {} ranks",
                    teams.len(),
                    ranks.len()
                ),
            }
            .into());
        }

        let mut graph = FactorGraph::new();
        let beta_squared = game_info.beta * game_info.beta;
        let dynamics_squared = game_info.dynamics_factor * game_info.dynamics_factor;
        let epsilon = game_info.draw_margin();

        let mut skills = Vec::new();
        let mut priors = Vec::new();
        let mut likelihoods = Vec::new();
        let mut team_sums = Vec::with_capacity(teams.len());
        let mut team_performances = Vec::with_capacity(teams.len());

        for (team_index, team) in teams.iter().enumerate() {
            let mut performances = Vec::with_capacity(team.player_count());

            for (player_id, rating) in team.iter() {
                let skill = graph.add_variable(format!("{player_id}'s skill"));
                let prior = graph.add_factor(PriorFactor::new(
                    format!("prior on {player_id}'s skill"),
                    rating.mean,
                    rating.variance() + dynamics_squared,
                    skill,
                ));

                let performance = graph.add_variable(format!("{player_id}'s performance"));
                let likelihood = graph.add_factor(LikelihoodFactor::new(
                    format!("likelihood of {player_id}'s performance"),
                    beta_squared,
                    performance,
                    skill,
                ));

                skills.push((player_id.clone(), skill));
                priors.push(prior);
                likelihoods.push(likelihood);
                performances.push((performance, 1.0));
            }

            let team_performance = graph.add_variable(format!("team {team_index} performance"));
            let factor = graph.add_factor(WeightedSumFactor::new(
                format!("team {team_index} performance sum"),
                team_performance,
                &performances,
            ));
            team_sums.push(TeamSum {
                factor,
                summand_count: performances.len(),
            });
            team_performances.push(team_performance);
        }

        let mut differences = Vec::with_capacity(teams.len() - 1);
        let mut difference_variables = Vec::with_capacity(teams.len() - 1);
        let mut comparisons = Vec::with_capacity(teams.len() - 1);

        for (i, pair) in team_performances.windows(2).enumerate() {
            let difference = graph.add_variable(format!("team {i} - team {} difference", i + 1));
            differences.push(graph.add_factor(WeightedSumFactor::new(
                format!("team {i} - team {} performance difference", i + 1),
                difference,
                &[(pair[0], 1.0), (pair[1], -1.0)],
            )));
            difference_variables.push(difference);

            let comparison = if ranks[i] == ranks[i + 1] {
                Comparison::Within
            } else {
                Comparison::GreaterThan
            };
            comparisons.push(graph.add_factor(ComparisonFactor::new(
                format!("team {i} vs team {} outcome", i + 1),
                comparison,
                epsilon,
                difference,
            )));
        }

        debug!(
            teams = teams.len(),
            players = skills.len(),
            variables = graph.variable_count(),
            factors = graph.factor_count(),
            draw_margin = epsilon,
            "built factor graph"
        );

        Ok(Self {
            graph,
            inference: *inference,
            skills,
            priors,
            likelihoods,
            team_sums,
            differences,
            difference_variables,
            comparisons,
        })
    }

    pub fn graph(&self) -> &FactorGraph {
        &self.graph
    }

    pub fn team_count(&self) -> usize {
        self.team_sums.len()
    }

    /// Down the layers to the differences, refine the comparisons, then
    /// back up to the skills
    pub fn create_full_schedule(&self) -> Schedule {
        let priors = self
            .priors
            .iter()
            .map(|&factor| Schedule::step("prior to skill", factor, 0))
            .collect();
        let skills_to_performances = self
            .likelihoods
            .iter()
            .map(|&factor| Schedule::step("skill to performance", factor, 0))
            .collect();
        let performances_to_teams = self
            .team_sums
            .iter()
            .map(|sum| Schedule::step("performances to team", sum.factor, 0))
            .collect();

        let teams_to_performances = self
            .team_sums
            .iter()
            .flat_map(|sum| {
                (1..=sum.summand_count)
                    .map(move |index| Schedule::step("team to performance", sum.factor, index))
            })
            .collect();
        let performances_to_skills = self
            .likelihoods
            .iter()
            .map(|&factor| Schedule::step("performance to skill", factor, 1))
            .collect();

        Schedule::sequence(
            "full schedule",
            vec![
                Schedule::sequence("priors", priors),
                Schedule::sequence("skills to performances", skills_to_performances),
                Schedule::sequence("performances to teams", performances_to_teams),
                self.comparison_schedule(),
                Schedule::sequence("teams to performances", teams_to_performances),
                Schedule::sequence("performances to skills", performances_to_skills),
            ],
        )
    }

    fn comparison_schedule(&self) -> Schedule {
        let last = self.differences.len() - 1;

        if self.differences.len() == 1 {
            let difference = self.differences[0];
            return Schedule::sequence(
                "two team comparison",
                vec![
                    Schedule::step("teams to difference", difference, 0),
                    Schedule::step("compare difference", self.comparisons[0], 0),
                    Schedule::step("difference to winner", difference, 1),
                    Schedule::step("difference to loser", difference, 2),
                ],
            );
        }

        // Sweep down the chain towards the last team, then back up
        let forward = (0..last)
            .flat_map(|i| {
                [
                    Schedule::step("teams to difference", self.differences[i], 0),
                    Schedule::step("compare difference", self.comparisons[i], 0),
                    Schedule::step("difference to lower team", self.differences[i], 2),
                ]
            })
            .collect();
        let backward = (0..last)
            .map(|i| last - i)
            .flat_map(|i| {
                [
                    Schedule::step("teams to difference", self.differences[i], 0),
                    Schedule::step("compare difference", self.comparisons[i], 0),
                    Schedule::step("difference to upper team", self.differences[i], 1),
                ]
            })
            .collect();

        let refinement = Schedule::repeat_until(
            "comparison refinement",
            Schedule::sequence(
                "forward and backward",
                vec![
                    Schedule::sequence("forward", forward),
                    Schedule::sequence("backward", backward),
                ],
            ),
            self.difference_variables.clone(),
            self.inference.convergence_tolerance,
            self.inference.max_iterations,
        );

        Schedule::sequence(
            "multi team comparison",
            vec![
                refinement,
                Schedule::step("difference to first team", self.differences[0], 1),
                Schedule::step("difference to last team", self.differences[last], 2),
            ],
        )
    }

    /// Run the full schedule, leaving posteriors on the skill variables
    pub fn run_schedule(&mut self) -> Result<ScheduleDiagnostics> {
        let schedule = self.create_full_schedule();
        let diagnostics = schedule.run(&mut self.graph)?;

        debug!(
            steps = diagnostics.steps_run,
            iterations = diagnostics.loop_iterations,
            converged = diagnostics.converged,
            final_delta = diagnostics.final_delta,
            "schedule finished"
        );

        Ok(diagnostics)
    }

    /// Current skill beliefs, in graph (rank-sorted) player order
    pub fn updated_ratings(&self) -> PlayerRatings {
        self.skills
            .iter()
            .map(|(player_id, skill)| (player_id.clone(), self.graph.value(*skill).into()))
            .collect()
    }
}
