//! Storage for one factor graph: the variable arena plus its factors

use super::factors::Factor;
use super::variable::{VariableId, Variables};
use crate::error::{RatingError, Result};
use crate::numerics::GaussianDistribution;

/// Handle to a factor inside a [`FactorGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactorId(usize);

/// Variables and the factors connecting them
///
/// A graph is owned by exactly one computation; it is `Send` so it may be
/// built on one thread and run on another, but never shared.
#[derive(Debug, Default)]
pub struct FactorGraph {
    variables: Variables,
    factors: Vec<Box<dyn Factor>>,
}

impl FactorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, name: impl Into<String>) -> VariableId {
        self.variables.add(name)
    }

    pub fn add_factor(&mut self, factor: impl Factor + 'static) -> FactorId {
        self.factors.push(Box::new(factor));
        FactorId(self.factors.len() - 1)
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn value(&self, id: VariableId) -> GaussianDistribution {
        self.variables.value(id)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    pub fn factor_name(&self, id: FactorId) -> Option<&str> {
        self.factors.get(id.0).map(|factor| factor.name())
    }

    /// Send one message from a factor and return the marginal change it caused
    pub fn update_message(&mut self, factor: FactorId, message_index: usize) -> Result<f64> {
        let Self { variables, factors } = self;
        let factor = factors.get_mut(factor.0).ok_or_else(|| RatingError::InternalError {
            message: format!("unknown factor {}", factor.0),
        })?;

        factor.update_message(message_index, variables)
    }
}
