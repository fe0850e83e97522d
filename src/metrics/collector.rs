//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for rating calculations and
//! match quality evaluations using Prometheus metrics.

use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the rating engine
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Rating-related metrics
    rating_metrics: RatingMetrics,

    /// Inference and performance metrics
    performance_metrics: PerformanceMetrics,
}

/// Rating-related metrics
#[derive(Clone)]
pub struct RatingMetrics {
    /// Total successful rating calculations by match kind
    pub ratings_calculated_total: IntCounterVec,

    /// Total match quality evaluations
    pub match_quality_evaluations_total: IntCounter,

    /// Requests rejected before any computation
    pub invalid_requests_total: IntCounter,
}

/// Performance metrics
#[derive(Clone)]
pub struct PerformanceMetrics {
    /// Rating calculation time
    pub rating_calculation_duration: Histogram,

    /// Iterations of the multi-team refinement loop
    pub schedule_iterations: Histogram,

    /// Refinement loops that hit their iteration cap
    pub convergence_failures_total: IntCounter,
}

/// Kind of match, used as a metric label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    TwoTeam,
    MultiTeam,
}

impl MatchKind {
    pub fn from_team_count(team_count: usize) -> Self {
        if team_count > 2 {
            Self::MultiTeam
        } else {
            Self::TwoTeam
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoTeam => "two_team",
            Self::MultiTeam => "multi_team",
        }
    }
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let rating_metrics = RatingMetrics::new(&registry)?;
        let performance_metrics = PerformanceMetrics::new(&registry)?;

        Ok(Self {
            registry,
            rating_metrics,
            performance_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get rating metrics
    pub fn rating(&self) -> &RatingMetrics {
        &self.rating_metrics
    }

    /// Get performance metrics
    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance_metrics
    }

    /// Record a completed rating calculation
    pub fn record_rating_calculation(
        &self,
        kind: MatchKind,
        loop_iterations: usize,
        converged: bool,
        duration: Duration,
    ) {
        self.rating_metrics
            .ratings_calculated_total
            .with_label_values(&[kind.as_str()])
            .inc();

        self.performance_metrics
            .rating_calculation_duration
            .observe(duration.as_secs_f64());

        if kind == MatchKind::MultiTeam {
            self.performance_metrics
                .schedule_iterations
                .observe(loop_iterations as f64);
        }

        if !converged {
            self.performance_metrics.convergence_failures_total.inc();
        }
    }

    /// Record a match quality evaluation
    pub fn record_match_quality(&self) {
        self.rating_metrics.match_quality_evaluations_total.inc();
    }

    /// Record a request rejected during validation
    pub fn record_invalid_request(&self) {
        self.rating_metrics.invalid_requests_total.inc();
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl RatingMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let ratings_calculated_total = IntCounterVec::new(
            Opts::new(
                "trueskill_ratings_calculated_total",
                "Total rating calculations completed",
            ),
            &["match_kind"],
        )?;
        registry.register(Box::new(ratings_calculated_total.clone()))?;

        let match_quality_evaluations_total = IntCounter::new(
            "trueskill_match_quality_evaluations_total",
            "Total match quality evaluations",
        )?;
        registry.register(Box::new(match_quality_evaluations_total.clone()))?;

        let invalid_requests_total = IntCounter::new(
            "trueskill_invalid_requests_total",
            "Total requests rejected by validation",
        )?;
        registry.register(Box::new(invalid_requests_total.clone()))?;

        Ok(Self {
            ratings_calculated_total,
            match_quality_evaluations_total,
            invalid_requests_total,
        })
    }
}

impl PerformanceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let rating_calculation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "trueskill_rating_calculation_duration_seconds",
                "Rating calculation duration in seconds",
            )
            .buckets(vec![
                0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
            ]),
        )?;
        registry.register(Box::new(rating_calculation_duration.clone()))?;

        let schedule_iterations = Histogram::with_opts(
            HistogramOpts::new(
                "trueskill_schedule_iterations",
                "Iterations of the multi-team refinement loop",
            )
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0]),
        )?;
        registry.register(Box::new(schedule_iterations.clone()))?;

        let convergence_failures_total = IntCounter::new(
            "trueskill_convergence_failures_total",
            "Refinement loops stopped by the iteration cap",
        )?;
        registry.register(Box::new(convergence_failures_total.clone()))?;

        Ok(Self {
            rating_calculation_duration,
            schedule_iterations,
            convergence_failures_total,
        })
    }
}
