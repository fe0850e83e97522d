//! Inclusive integer ranges used to validate team and player counts

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of counts, `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    min: usize,
    max: usize,
}

impl Range {
    /// Create a range from explicit bounds
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(RatingError::InvalidRange { min, max }.into());
        }

        Ok(Self { min, max })
    }

    /// Range with only a lower bound
    pub const fn at_least(min: usize) -> Self {
        Self {
            min,
            max: usize::MAX,
        }
    }

    /// Range with only an upper bound
    pub const fn at_most(max: usize) -> Self {
        Self { min: 0, max }
    }

    /// Range containing exactly one value
    pub const fn exactly(value: usize) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Check whether `value` lies within the range
    pub fn contains(&self, value: usize) -> bool {
        self.min <= value && value <= self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.max == usize::MAX {
            write!(f, "[{}, ∞)", self.min)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}
