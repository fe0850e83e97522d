//! Message-passing schedules
//!
//! A schedule is a tree of single factor updates, ordered sequences, and
//! loops. Visiting a schedule returns the largest change a single message
//! produced. A loop instead settles on its watched variables: it repeats its
//! body until their marginals stop moving between consecutive iterations.

use super::graph::{FactorGraph, FactorId};
use super::variable::VariableId;
use crate::numerics::GaussianDistribution;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Ordered message updates over a [`FactorGraph`]
#[derive(Debug, Clone)]
pub enum Schedule {
    /// Send a single message from `factor` to its neighbour `message_index`
    Step {
        name: String,
        factor: FactorId,
        message_index: usize,
    },
    /// Visit each child in order
    Sequence { name: String, schedules: Vec<Schedule> },
    /// Repeat `body` until no watched marginal moves by more than
    /// `max_delta` over one iteration
    Loop {
        name: String,
        body: Box<Schedule>,
        watched: Vec<VariableId>,
        max_delta: f64,
        max_iterations: usize,
    },
}

/// Outcome of running a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDiagnostics {
    /// Total single-message updates performed
    pub steps_run: usize,
    /// Iterations executed by the convergence loop, zero when there is none
    pub loop_iterations: usize,
    /// Whether every loop reached its tolerance before its iteration cap
    pub converged: bool,
    /// Largest change of a watched marginal over the final loop iteration
    pub final_delta: f64,
    /// Largest change a single message made in the final loop iteration
    pub final_message_delta: f64,
}

impl Default for ScheduleDiagnostics {
    fn default() -> Self {
        Self {
            steps_run: 0,
            loop_iterations: 0,
            converged: true,
            final_delta: 0.0,
            final_message_delta: 0.0,
        }
    }
}

impl Schedule {
    pub fn step(name: impl Into<String>, factor: FactorId, message_index: usize) -> Self {
        Self::Step {
            name: name.into(),
            factor,
            message_index,
        }
    }

    pub fn sequence(name: impl Into<String>, schedules: Vec<Schedule>) -> Self {
        Self::Sequence {
            name: name.into(),
            schedules,
        }
    }

    pub fn repeat_until(
        name: impl Into<String>,
        body: Schedule,
        watched: Vec<VariableId>,
        max_delta: f64,
        max_iterations: usize,
    ) -> Self {
        Self::Loop {
            name: name.into(),
            body: Box::new(body),
            watched,
            max_delta,
            max_iterations,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Step { name, .. } | Self::Sequence { name, .. } | Self::Loop { name, .. } => name,
        }
    }

    /// Run the schedule against `graph`
    pub fn run(&self, graph: &mut FactorGraph) -> Result<ScheduleDiagnostics> {
        let mut diagnostics = ScheduleDiagnostics::default();
        self.visit(graph, &mut diagnostics)?;
        Ok(diagnostics)
    }

    fn visit(&self, graph: &mut FactorGraph, diagnostics: &mut ScheduleDiagnostics) -> Result<f64> {
        match self {
            Self::Step {
                factor,
                message_index,
                ..
            } => {
                diagnostics.steps_run += 1;
                graph.update_message(*factor, *message_index)
            }
            Self::Sequence { schedules, .. } => {
                let mut max_delta = 0.0_f64;
                for schedule in schedules {
                    max_delta = max_delta.max(schedule.visit(graph, diagnostics)?);
                }
                Ok(max_delta)
            }
            Self::Loop {
                name,
                body,
                watched,
                max_delta,
                max_iterations,
            } => {
                let mut iterations = 0;
                let mut converged = false;
                let mut delta;
                let mut message_delta;
                let mut previous = snapshot(graph, watched);

                loop {
                    message_delta = body.visit(graph, diagnostics)?;
                    iterations += 1;

                    let current = snapshot(graph, watched);
                    delta = previous
                        .iter()
                        .zip(&current)
                        .map(|(before, after)| before.moment_difference(after))
                        .fold(0.0_f64, f64::max);
                    previous = current;
                    trace!(
                        schedule = %name,
                        iterations,
                        delta,
                        message_delta,
                        "loop iteration finished"
                    );

                    if delta <= *max_delta {
                        converged = true;
                        break;
                    }
                    if iterations >= *max_iterations {
                        break;
                    }
                }

                if !converged {
                    warn!(
                        schedule = %name,
                        iterations,
                        delta,
                        tolerance = *max_delta,
                        "message passing did not converge; returning best-effort beliefs"
                    );
                }

                diagnostics.loop_iterations += iterations;
                diagnostics.converged &= converged;
                diagnostics.final_delta = delta;
                diagnostics.final_message_delta = message_delta;
                Ok(message_delta)
            }
        }
    }
}

fn snapshot(graph: &FactorGraph, variables: &[VariableId]) -> Vec<GaussianDistribution> {
    variables.iter().map(|&id| graph.value(id)).collect()
}
