//! Factor nodes and their message update rules
//!
//! Every factor keeps the message it last sent to each neighbouring variable.
//! An update divides that old message out of the variable's marginal,
//! multiplies the fresh one in, and reports how far the marginal moved so
//! schedules can detect convergence.

use super::variable::{VariableId, Variables};
use crate::error::{RatingError, Result};
use crate::numerics::truncation::{
    v_exceeds_margin, v_within_margin, w_exceeds_margin, w_within_margin,
};
use crate::numerics::GaussianDistribution;
use std::fmt;

/// A local update rule connecting one or more variables
pub trait Factor: fmt::Debug + Send {
    fn name(&self) -> &str;

    /// Number of neighbouring variables, i.e. valid message indices
    fn message_count(&self) -> usize;

    /// Recompute the message to neighbour `message_index`, apply it to that
    /// variable and return the change in its marginal
    fn update_message(&mut self, message_index: usize, variables: &mut Variables) -> Result<f64>;
}

fn invalid_index(factor: &str, message_index: usize, message_count: usize) -> anyhow::Error {
    RatingError::InternalError {
        message: format!(
            "{factor}: message index {message_index} out of range for {message_count} messages"
        ),
    }
    .into()
}

/// Injects a player's prior skill belief into their skill variable
#[derive(Debug)]
pub struct PriorFactor {
    name: String,
    variable: VariableId,
    prior: GaussianDistribution,
    message: GaussianDistribution,
}

impl PriorFactor {
    pub fn new(name: impl Into<String>, mean: f64, variance: f64, variable: VariableId) -> Self {
        Self {
            name: name.into(),
            variable,
            prior: GaussianDistribution::from_mean_variance(mean, variance),
            message: GaussianDistribution::uniform(),
        }
    }
}

impl Factor for PriorFactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn message_count(&self) -> usize {
        1
    }

    fn update_message(&mut self, message_index: usize, variables: &mut Variables) -> Result<f64> {
        if message_index != 0 {
            return Err(invalid_index(&self.name, message_index, 1));
        }

        let old_marginal = variables.value(self.variable);
        let new_marginal = GaussianDistribution::from_precision_mean(
            old_marginal.precision_mean() + self.prior.precision_mean()
                - self.message.precision_mean(),
            old_marginal.precision() + self.prior.precision() - self.message.precision(),
        );

        variables.set_value(self.variable, new_marginal);
        self.message = self.prior;

        Ok(old_marginal.absolute_difference(&new_marginal))
    }
}

/// Performance is skill plus zero-mean noise of variance `beta²`
///
/// Message 0 goes to the performance variable, message 1 to the skill.
#[derive(Debug)]
pub struct LikelihoodFactor {
    name: String,
    precision: f64,
    variables: [VariableId; 2],
    messages: [GaussianDistribution; 2],
}

impl LikelihoodFactor {
    pub fn new(
        name: impl Into<String>,
        beta_squared: f64,
        performance: VariableId,
        skill: VariableId,
    ) -> Self {
        Self {
            name: name.into(),
            precision: 1.0 / beta_squared,
            variables: [performance, skill],
            messages: [GaussianDistribution::uniform(); 2],
        }
    }

    fn update_helper(&mut self, target: usize, source: usize, variables: &mut Variables) -> f64 {
        let marginal_target = variables.value(self.variables[target]);
        let marginal_source = variables.value(self.variables[source]);
        let message_source = self.messages[source];

        // Belief about the source excluding what this factor told it
        let source_precision = marginal_source.precision() - message_source.precision();
        let source_precision_mean = marginal_source.precision_mean() - message_source.precision_mean();

        let a = self.precision / (self.precision + source_precision);
        let new_message =
            GaussianDistribution::from_precision_mean(a * source_precision_mean, a * source_precision);

        let new_marginal = (marginal_target / self.messages[target]) * new_message;
        self.messages[target] = new_message;
        variables.set_value(self.variables[target], new_marginal);

        new_marginal.absolute_difference(&marginal_target)
    }
}

impl Factor for LikelihoodFactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn message_count(&self) -> usize {
        2
    }

    fn update_message(&mut self, message_index: usize, variables: &mut Variables) -> Result<f64> {
        match message_index {
            0 => Ok(self.update_helper(0, 1, variables)),
            1 => Ok(self.update_helper(1, 0, variables)),
            _ => Err(invalid_index(&self.name, message_index, 2)),
        }
    }
}

/// Exact linear combination `sum = Σ wᵢ·xᵢ` of Gaussian variables
///
/// Message 0 goes to the sum; message `i` (1-based) goes to summand `i - 1`
/// by solving the same equation for that summand.
#[derive(Debug)]
pub struct WeightedSumFactor {
    name: String,
    variables: Vec<VariableId>,
    messages: Vec<GaussianDistribution>,
    weights: Vec<Vec<f64>>,
    weights_squared: Vec<Vec<f64>>,
    variable_index_orders: Vec<Vec<usize>>,
}

impl WeightedSumFactor {
    pub fn new(name: impl Into<String>, sum: VariableId, summands: &[(VariableId, f64)]) -> Self {
        let weights: Vec<f64> = summands.iter().map(|(_, weight)| *weight).collect();
        let summand_count = weights.len();

        let mut variables = Vec::with_capacity(summand_count + 1);
        variables.push(sum);
        variables.extend(summands.iter().map(|(id, _)| *id));

        let mut all_weights = Vec::with_capacity(summand_count + 1);
        let mut variable_index_orders = Vec::with_capacity(summand_count + 1);

        all_weights.push(weights.clone());
        variable_index_orders.push((0..=summand_count).collect());

        // Solve for summand k: x_k = sum/w_k - Σ_{j≠k} (w_j/w_k)·x_j
        for target in 0..summand_count {
            let target_weight = weights[target];
            let mut current = Vec::with_capacity(summand_count);
            let mut order = Vec::with_capacity(summand_count + 1);
            order.push(target + 1);

            for (source, weight) in weights.iter().enumerate() {
                if source == target {
                    continue;
                }
                current.push(if target_weight == 0.0 {
                    0.0
                } else {
                    -weight / target_weight
                });
                order.push(source + 1);
            }

            current.push(if target_weight == 0.0 {
                0.0
            } else {
                1.0 / target_weight
            });
            order.push(0);

            all_weights.push(current);
            variable_index_orders.push(order);
        }

        let weights_squared = all_weights
            .iter()
            .map(|row| row.iter().map(|w| w * w).collect())
            .collect();

        Self {
            name: name.into(),
            messages: vec![GaussianDistribution::uniform(); variables.len()],
            variables,
            weights: all_weights,
            weights_squared,
            variable_index_orders,
        }
    }

    fn update_helper(&mut self, message_index: usize, variables: &mut Variables) -> f64 {
        let order = &self.variable_index_orders[message_index];
        let weights = &self.weights[message_index];
        let weights_squared = &self.weights_squared[message_index];

        let target = order[0];
        let marginal_target = variables.value(self.variables[target]);

        let mut inverse_precision_sum = 0.0;
        let mut weighted_mean_sum = 0.0;
        let mut informed = true;

        for (position, &slot) in order[1..].iter().enumerate() {
            if weights[position] == 0.0 {
                continue;
            }

            let without_message = variables.value(self.variables[slot]) / self.messages[slot];
            if without_message.is_uniform() {
                informed = false;
                break;
            }

            inverse_precision_sum += weights_squared[position] / without_message.precision();
            weighted_mean_sum +=
                weights[position] * without_message.precision_mean() / without_message.precision();
        }

        let new_message = if informed && inverse_precision_sum > 0.0 {
            let new_precision = 1.0 / inverse_precision_sum;
            GaussianDistribution::from_precision_mean(new_precision * weighted_mean_sum, new_precision)
        } else {
            GaussianDistribution::uniform()
        };

        let new_marginal = (marginal_target / self.messages[target]) * new_message;
        self.messages[target] = new_message;
        variables.set_value(self.variables[target], new_marginal);

        new_marginal.absolute_difference(&marginal_target)
    }
}

impl Factor for WeightedSumFactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn message_count(&self) -> usize {
        self.variables.len()
    }

    fn update_message(&mut self, message_index: usize, variables: &mut Variables) -> Result<f64> {
        if message_index >= self.variables.len() {
            return Err(invalid_index(&self.name, message_index, self.variables.len()));
        }

        Ok(self.update_helper(message_index, variables))
    }
}

/// Observed relationship between two teams' performances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// The difference lies within the draw margin
    Within,
    /// The difference exceeds the draw margin
    GreaterThan,
}

/// Non-Gaussian evidence on a performance difference, approximated by
/// moment matching the truncated Gaussian
#[derive(Debug)]
pub struct ComparisonFactor {
    name: String,
    comparison: Comparison,
    epsilon: f64,
    variable: VariableId,
    message: GaussianDistribution,
}

impl ComparisonFactor {
    pub fn new(
        name: impl Into<String>,
        comparison: Comparison,
        epsilon: f64,
        variable: VariableId,
    ) -> Self {
        Self {
            name: name.into(),
            comparison,
            epsilon,
            variable,
            message: GaussianDistribution::uniform(),
        }
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }
}

impl Factor for ComparisonFactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn message_count(&self) -> usize {
        1
    }

    fn update_message(&mut self, message_index: usize, variables: &mut Variables) -> Result<f64> {
        if message_index != 0 {
            return Err(invalid_index(&self.name, message_index, 1));
        }

        let old_marginal = variables.value(self.variable);
        let from_variable = old_marginal / self.message;

        let c = from_variable.precision();
        if c <= 0.0 {
            // Nothing to truncate yet
            return Ok(0.0);
        }

        let d = from_variable.precision_mean();
        let sqrt_c = c.sqrt();
        let t = d / sqrt_c;
        let epsilon = self.epsilon * sqrt_c;

        let (v, w) = match self.comparison {
            Comparison::GreaterThan => (v_exceeds_margin(t, epsilon), w_exceeds_margin(t, epsilon)),
            Comparison::Within => (v_within_margin(t, epsilon), w_within_margin(t, epsilon)),
        };

        // w reaches 1 in the far tail
        let denominator = (1.0 - w).max(f64::EPSILON);
        let new_marginal =
            GaussianDistribution::from_precision_mean((d + sqrt_c * v) / denominator, c / denominator);

        let new_message = (self.message * new_marginal) / old_marginal;
        self.message = new_message;
        variables.set_value(self.variable, new_marginal);

        Ok(new_marginal.absolute_difference(&old_marginal))
    }
}
