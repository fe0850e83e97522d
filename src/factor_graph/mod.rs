//! Gaussian factor graph and message-passing machinery
//!
//! The generic pieces (variables, factors, schedules) know nothing about
//! teams or ranks; [`layers`] wires them into the TrueSkill model.

pub mod factors;
pub mod graph;
pub mod layers;
pub mod schedule;
pub mod variable;

pub use factors::{
    Comparison, ComparisonFactor, Factor, LikelihoodFactor, PriorFactor, WeightedSumFactor,
};
pub use graph::{FactorGraph, FactorId};
pub use layers::TrueSkillFactorGraph;
pub use schedule::{Schedule, ScheduleDiagnostics};
pub use variable::{Variable, VariableId, Variables};
