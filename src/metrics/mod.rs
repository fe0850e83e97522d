//! Metrics for the rating engine
//!
//! This module provides Prometheus metrics for rating calculations,
//! match quality evaluations and convergence of the inference schedule.

pub mod collector;

pub use collector::{MatchKind, MetricsCollector, MetricsTimer, PerformanceMetrics, RatingMetrics};
