//! Moment-matching functions for truncated Gaussians
//!
//! A comparison factor observes that a performance difference is either
//! greater than the draw margin (a decisive result) or within it (a draw).
//! These functions give the additive mean correction `v` and multiplicative
//! variance correction `w` of the Gaussian that best approximates the
//! standard normal truncated to that region, with `t` the standardized
//! difference and `epsilon` the standardized draw margin.

use super::gaussian::{standard_cdf, standard_pdf};

/// Below this the denominators underflow and the asymptotic forms are used
const MIN_DENOMINATOR: f64 = 2.222758749e-162;

/// Mean correction when the difference is known to exceed `epsilon`
pub fn v_exceeds_margin(t: f64, epsilon: f64) -> f64 {
    let denominator = standard_cdf(t - epsilon);
    if denominator < MIN_DENOMINATOR {
        return epsilon - t;
    }

    standard_pdf(t - epsilon) / denominator
}

/// Variance correction when the difference is known to exceed `epsilon`
pub fn w_exceeds_margin(t: f64, epsilon: f64) -> f64 {
    let denominator = standard_cdf(t - epsilon);
    if denominator < MIN_DENOMINATOR {
        return if t < 0.0 { 1.0 } else { 0.0 };
    }

    let v = v_exceeds_margin(t, epsilon);
    v * (v + t - epsilon)
}

/// Mean correction when the difference is known to lie within `[-epsilon, epsilon]`
pub fn v_within_margin(t: f64, epsilon: f64) -> f64 {
    let t_abs = t.abs();
    let denominator = standard_cdf(epsilon - t_abs) - standard_cdf(-epsilon - t_abs);
    if denominator < MIN_DENOMINATOR {
        return if t < 0.0 { -t - epsilon } else { -t + epsilon };
    }

    let numerator = standard_pdf(-epsilon - t_abs) - standard_pdf(epsilon - t_abs);
    if t < 0.0 {
        -numerator / denominator
    } else {
        numerator / denominator
    }
}

/// Variance correction when the difference is known to lie within `[-epsilon, epsilon]`
pub fn w_within_margin(t: f64, epsilon: f64) -> f64 {
    let t_abs = t.abs();
    let denominator = standard_cdf(epsilon - t_abs) - standard_cdf(-epsilon - t_abs);
    if denominator < MIN_DENOMINATOR {
        return 1.0;
    }

    let v = v_within_margin(t_abs, epsilon);
    v * v
        + ((epsilon - t_abs) * standard_pdf(epsilon - t_abs)
            - (-epsilon - t_abs) * standard_pdf(-epsilon - t_abs))
            / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_exceeds_margin_at_zero() {
        // pdf(0) / cdf(0)
        assert_abs_diff_eq!(v_exceeds_margin(0.0, 0.0), 0.7978845608028654, epsilon = 1e-9);
        let v = v_exceeds_margin(0.0, 0.0);
        assert_abs_diff_eq!(w_exceeds_margin(0.0, 0.0), v * v, epsilon = 1e-12);
    }

    #[test]
    fn test_exceeds_margin_bounds() {
        for &t in &[-5.0, -1.0, 0.0, 0.5, 2.0, 6.0] {
            let w = w_exceeds_margin(t, 0.7);
            assert!(w > 0.0 && w < 1.0, "w({t}) = {w}");
            assert!(v_exceeds_margin(t, 0.7) > 0.0);
        }
    }

    #[test]
    fn test_exceeds_margin_far_tail() {
        // Underflowing cdf falls back to the asymptotic forms
        assert_abs_diff_eq!(v_exceeds_margin(-60.0, 0.0), 60.0, epsilon = 1e-12);
        assert_eq!(w_exceeds_margin(-60.0, 0.0), 1.0);
        assert!(v_exceeds_margin(-30.0, 0.0).is_finite());
    }

    #[test]
    fn test_within_margin_symmetry() {
        assert_abs_diff_eq!(v_within_margin(0.0, 0.5), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            v_within_margin(0.3, 0.5),
            -v_within_margin(-0.3, 0.5),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            w_within_margin(0.3, 0.5),
            w_within_margin(-0.3, 0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_within_margin_bounds() {
        for &t in &[-3.0, -0.4, 0.0, 0.2, 1.5] {
            let w = w_within_margin(t, 0.5);
            assert!(w > 0.0 && w < 1.0, "w({t}) = {w}");
        }
        // A draw pulls a positive difference back towards zero
        assert!(v_within_margin(1.0, 0.5) < 0.0);
    }

    #[test]
    fn test_within_margin_far_tail() {
        assert_abs_diff_eq!(v_within_margin(80.0, 0.5), -79.5, epsilon = 1e-12);
        assert_eq!(w_within_margin(80.0, 0.5), 1.0);
    }
}
