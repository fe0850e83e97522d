//! Variable nodes of the factor graph
//!
//! Variables live in an arena owned by the graph and are addressed by
//! [`VariableId`]. Each holds its current marginal: the product of every
//! message its neighbouring factors have sent so far.

use crate::numerics::GaussianDistribution;

/// Handle to a variable inside a [`Variables`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableId(usize);

impl VariableId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A named node carrying a Gaussian marginal
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    value: GaussianDistribution,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> GaussianDistribution {
        self.value
    }
}

/// Arena of all variables in one graph
#[derive(Debug, Default)]
pub struct Variables {
    variables: Vec<Variable>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable with no information yet (uniform marginal)
    pub fn add(&mut self, name: impl Into<String>) -> VariableId {
        self.variables.push(Variable {
            name: name.into(),
            value: GaussianDistribution::uniform(),
        });
        VariableId(self.variables.len() - 1)
    }

    pub fn get(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn value(&self, id: VariableId) -> GaussianDistribution {
        self.variables[id.0].value
    }

    pub fn set_value(&mut self, id: VariableId, value: GaussianDistribution) {
        self.variables[id.0].value = value;
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_variables_are_uniform() {
        let mut variables = Variables::new();
        let skill = variables.add("alice's skill");
        let performance = variables.add("alice's performance");

        assert_eq!(variables.len(), 2);
        assert_ne!(skill, performance);
        assert_eq!(performance.index(), 1);
        assert!(variables.value(skill).is_uniform());
        assert_eq!(variables.get(skill).name(), "alice's skill");
    }

    #[test]
    fn test_set_value() {
        let mut variables = Variables::new();
        let id = variables.add("x");
        variables.set_value(id, GaussianDistribution::new(1.0, 2.0));

        assert!((variables.get(id).value().mean() - 1.0).abs() < 1e-12);
        assert_eq!(variables.iter().count(), 1);
    }
}
