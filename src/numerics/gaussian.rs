//! Univariate Gaussian beliefs in natural-parameter form
//!
//! A belief is stored as `(precision, precision_mean)` where
//! `precision = 1/σ²` and `precision_mean = μ/σ²`. In this form combining
//! independent evidence is addition and removing evidence is subtraction,
//! which is exactly what message passing needs. A precision of zero is the
//! uniform ("no information") belief and the identity for the product.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use std::fmt;
use std::ops::{Div, Mul};

/// Largest precision a belief may carry; collapsed variances are clamped here
pub const MAX_PRECISION: f64 = 1.0e12;

/// A normal distribution over a latent skill or performance value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianDistribution {
    precision: f64,
    precision_mean: f64,
}

impl GaussianDistribution {
    /// Create a belief from its mean and standard deviation
    ///
    /// An infinite standard deviation yields the uniform belief.
    pub fn new(mean: f64, stddev: f64) -> Self {
        Self::from_mean_variance(mean, stddev * stddev)
    }

    /// Create a belief from its mean and variance
    pub fn from_mean_variance(mean: f64, variance: f64) -> Self {
        if variance.is_nan() || variance < 0.0 {
            return Self::uniform();
        }

        let precision = clamp_precision(1.0 / variance);
        Self::from_precision_mean(precision * mean, precision)
    }

    /// Create a belief from natural parameters
    ///
    /// Degenerate inputs never produce NaN beliefs: a NaN or non-positive
    /// precision (or a non-finite precision mean) gives the uniform belief and
    /// an infinite precision is clamped to [`MAX_PRECISION`].
    pub fn from_precision_mean(precision_mean: f64, precision: f64) -> Self {
        if precision.is_nan() || precision <= 0.0 || !precision_mean.is_finite() {
            return Self::uniform();
        }

        let clamped = clamp_precision(precision);
        let precision_mean = if clamped < precision {
            precision_mean / precision * clamped
        } else {
            precision_mean
        };

        Self {
            precision: clamped,
            precision_mean,
        }
    }

    /// The "no information" belief: precision zero
    pub const fn uniform() -> Self {
        Self {
            precision: 0.0,
            precision_mean: 0.0,
        }
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn precision_mean(&self) -> f64 {
        self.precision_mean
    }

    pub fn is_uniform(&self) -> bool {
        self.precision == 0.0
    }

    /// Mean of the belief; the uniform belief reports zero
    pub fn mean(&self) -> f64 {
        if self.is_uniform() {
            0.0
        } else {
            self.precision_mean / self.precision
        }
    }

    /// Variance of the belief; infinite for the uniform belief
    pub fn variance(&self) -> f64 {
        if self.is_uniform() {
            f64::INFINITY
        } else {
            1.0 / self.precision
        }
    }

    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Size of a single message update, in natural parameters
    ///
    /// The larger of the change in precision mean and the square root of the
    /// change in precision.
    pub fn absolute_difference(&self, other: &Self) -> f64 {
        (self.precision_mean - other.precision_mean)
            .abs()
            .max((self.precision - other.precision).abs().sqrt())
    }

    /// Change between two beliefs in mean and standard deviation
    ///
    /// Used to decide whether iterated beliefs have settled. Measured in the
    /// units of the quantity itself, so rounding in very precise beliefs
    /// stays far below any sensible tolerance. Uniform beliefs only match
    /// each other.
    pub fn moment_difference(&self, other: &Self) -> f64 {
        match (self.is_uniform(), other.is_uniform()) {
            (true, true) => 0.0,
            (true, false) | (false, true) => f64::INFINITY,
            (false, false) => (self.mean() - other.mean())
                .abs()
                .max((self.stddev() - other.stddev()).abs()),
        }
    }
}

impl Default for GaussianDistribution {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Bayesian fusion of two independent beliefs about the same quantity
impl Mul for GaussianDistribution {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_precision_mean(
            self.precision_mean + rhs.precision_mean,
            self.precision + rhs.precision,
        )
    }
}

/// Removes the evidence carried by `rhs` from `self`
impl Div for GaussianDistribution {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::from_precision_mean(
            self.precision_mean - rhs.precision_mean,
            self.precision - rhs.precision,
        )
    }
}

impl fmt::Display for GaussianDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "μ={:.4}, σ={:.4}", self.mean(), self.stddev())
    }
}

fn clamp_precision(precision: f64) -> f64 {
    if precision.is_infinite() {
        MAX_PRECISION
    } else {
        precision.min(MAX_PRECISION)
    }
}

/// Density of the standard normal distribution at `x`
pub fn standard_pdf(x: f64) -> f64 {
    Normal::standard().pdf(x)
}

/// Cumulative distribution of the standard normal distribution at `x`
pub fn standard_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Inverse of [`standard_cdf`]
pub fn inverse_standard_cdf(p: f64) -> f64 {
    Normal::standard().inverse_cdf(p)
}
