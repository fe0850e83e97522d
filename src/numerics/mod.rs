//! Numeric building blocks for Gaussian message passing
//!
//! Gaussian beliefs in natural-parameter form, the truncation functions used
//! by comparison factors, and the count ranges used for input validation.

pub mod gaussian;
pub mod range;
pub mod truncation;

pub use gaussian::{inverse_standard_cdf, standard_cdf, standard_pdf, GaussianDistribution};
pub use range::Range;
