//! Arps decline law and initial-decline calibration
//!
//! ```text
//! q(t) = qi / (1 + b·di·t)^(1/b)      b > 0  (hyperbolic, harmonic at b = 1)
//! q(t) = qi · e^(−di·t)               b = 0  (exponential)
//! ```
//!
//! Cumulative volume is the discrete day sum `Σ_{t=0}^{n-1} q(t)`, not the
//! closed-form integral. Calibration solves `Σ q(t; di) = target` for di.
//!
//! All functions are pure and deterministic.

use thiserror::Error;

use crate::config::defaults::{
    BRACKET_MAX_EXPANSIONS, CALIBRATION_MAX_ITERATIONS, CALIBRATION_TOLERANCE,
    EXPONENTIAL_B_EPSILON, INITIAL_DECLINE_GUESS,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("invalid calibration input: {0}")]
    InvalidInput(String),

    /// Cumulative over `days` lies in `(qi, qi·days]` for any di ≥ 0.
    #[error("target {target:.1} outside reachable range ({min:.1}, {max:.1}]")]
    UnreachableTarget { target: f64, min: f64, max: f64 },

    #[error("no convergence after {iterations} iterations")]
    NonConvergence { iterations: usize },
}

fn is_exponential(b: f64) -> bool {
    b.abs() < EXPONENTIAL_B_EPSILON
}

/// Rate at day `t` for initial rate `qi`, initial decline `di` and exponent `b`.
pub fn rate(qi: f64, di: f64, b: f64, t: f64) -> f64 {
    if is_exponential(b) {
        qi * (-di * t).exp()
    } else {
        qi / (1.0 + b * di * t).powf(1.0 / b)
    }
}

/// ∂q/∂di at day `t`.
pub fn rate_derivative(qi: f64, di: f64, b: f64, t: f64) -> f64 {
    if is_exponential(b) {
        -qi * t * (-di * t).exp()
    } else {
        -qi * t * (1.0 + b * di * t).powf(-(1.0 + b) / b)
    }
}

/// Discrete cumulative volume over days `0..days`.
pub fn cumulative(qi: f64, di: f64, b: f64, days: u32) -> f64 {
    (0..days).map(|t| rate(qi, di, b, f64::from(t))).sum()
}

fn cumulative_derivative(qi: f64, di: f64, b: f64, days: u32) -> f64 {
    (0..days).map(|t| rate_derivative(qi, di, b, f64::from(t))).sum()
}

/// Solve for the initial decline rate di such that the discrete cumulative
/// over `days` equals `target`.
///
/// Newton-Raphson from [`INITIAL_DECLINE_GUESS`], kept inside a bracket
/// `[lo, hi]` around the root. The residual is strictly decreasing in di, so
/// the bracket always shrinks; a Newton step that would leave it is replaced
/// by bisection. Converges when a step moves di by less than
/// [`CALIBRATION_TOLERANCE`].
pub fn calibrate(qi: f64, b: f64, target: f64, days: u32) -> Result<f64, CalibrationError> {
    if !(qi.is_finite() && qi > 0.0) {
        return Err(CalibrationError::InvalidInput(format!("initial rate must be positive, got {qi}")));
    }
    if !(target.is_finite() && target > 0.0) {
        return Err(CalibrationError::InvalidInput(format!("target must be positive, got {target}")));
    }
    if !(b.is_finite() && b >= 0.0) {
        return Err(CalibrationError::InvalidInput(format!("b must be non-negative, got {b}")));
    }
    if days == 0 {
        return Err(CalibrationError::InvalidInput("active period must be at least one day".into()));
    }

    let flat = qi * f64::from(days);
    if target == flat {
        return Ok(0.0);
    }
    if target > flat || target <= qi {
        return Err(CalibrationError::UnreachableTarget {
            target,
            min: qi,
            max: flat,
        });
    }

    let residual = |di: f64| cumulative(qi, di, b, days) - target;

    // Bracket the root: residual(lo) > 0 >= residual(hi)
    let mut lo = 0.0;
    let mut hi = INITIAL_DECLINE_GUESS;
    let mut expansions = 0;
    while residual(hi) > 0.0 {
        if expansions == BRACKET_MAX_EXPANSIONS {
            return Err(CalibrationError::NonConvergence { iterations: expansions });
        }
        lo = hi;
        hi *= 2.0;
        expansions += 1;
    }

    let mut di = INITIAL_DECLINE_GUESS;
    for _ in 0..CALIBRATION_MAX_ITERATIONS {
        let f = residual(di);
        if f == 0.0 {
            return Ok(di);
        }
        if f > 0.0 {
            lo = lo.max(di);
        } else {
            hi = hi.min(di);
        }

        let slope = cumulative_derivative(qi, di, b, days);
        let mut next = di - f / slope;
        if !(next.is_finite() && next > lo && next < hi) {
            next = 0.5 * (lo + hi);
        }
        if (next - di).abs() < CALIBRATION_TOLERANCE {
            return Ok(next);
        }
        di = next;
    }

    Err(CalibrationError::NonConvergence {
        iterations: CALIBRATION_MAX_ITERATIONS,
    })
}
