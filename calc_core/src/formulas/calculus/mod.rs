//! # Calculus
//!
//! Derivatives and definite integrals of user-typed functions of `x`.
//! Expressions go through the whitelisted parser in [`expr`]; nothing is
//! ever handed to a general-purpose evaluator.
//!
//! ```rust
//! use calc_core::formulas::calculus::{definite_integral, derivative_at};
//!
//! let d = derivative_at("x^3", 2.0).unwrap();
//! assert_eq!(d.derivative_value, 12.0);
//!
//! let i = definite_integral("x^2", 0.0, 3.0, 100).unwrap();
//! assert!((i.value - 9.0).abs() < 1e-9);
//! ```

pub mod expr;

pub use expr::{parse, Constant, Expr, Func};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_finite, fmt_num};

/// Default Simpson interval count
pub const DEFAULT_INTERVALS: u32 = 1000;

/// Upper bound on Simpson intervals
pub const MAX_INTERVALS: u32 = 1_000_000;

/// Symbolic and numeric derivative at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivativeResult {
    /// Parsed function, re-rendered
    pub expression: String,
    /// Symbolic derivative, rendered
    pub derivative: String,
    pub x: f64,
    pub value: f64,
    pub derivative_value: f64,
    /// Central-difference estimate; `None` when f is undefined at x ± h
    pub numeric_check: Option<f64>,
    pub steps: Vec<String>,
}

/// Evaluate f and f' at `x`, with a numeric cross-check.
pub fn derivative_at(expression: &str, x: f64) -> CalcResult<DerivativeResult> {
    ensure_finite("x", x)?;
    let f = parse(expression)?;
    let df = f.derivative();

    let value = f.eval(x)?;
    let derivative_value = df.eval(x)?;

    let h = 1e-5 * x.abs().max(1.0);
    let numeric_check = match (f.eval(x + h), f.eval(x - h)) {
        (Ok(hi), Ok(lo)) => Some((hi - lo) / (2.0 * h)),
        _ => None,
    };

    let mut steps = vec![
        format!("f(x) = {}", f),
        format!("f'(x) = {}", df),
        format!("f({}) = {}", fmt_num(x, 6), fmt_num(value, 8)),
        format!("f'({}) = {}", fmt_num(x, 6), fmt_num(derivative_value, 8)),
    ];
    if let Some(estimate) = numeric_check {
        steps.push(Formula::CentralDifference.metadata().formula_plain.to_string());
        steps.push(format!("h = {:e}, estimate = {}", h, fmt_num(estimate, 8)));
    }

    Ok(DerivativeResult {
        expression: f.to_string(),
        derivative: df.to_string(),
        x,
        value,
        derivative_value,
        numeric_check,
        steps,
    })
}

/// Composite Simpson approximation of a definite integral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegralResult {
    pub expression: String,
    pub lower: f64,
    pub upper: f64,
    /// Interval count actually used (even, at least 2)
    pub intervals: u32,
    pub step: f64,
    pub value: f64,
    pub steps: Vec<String>,
}

/// ∫ f(x) dx from `a` to `b`. Reversed bounds give the negated integral.
///
/// An odd `intervals` is bumped to the next even number; anything below 2
/// becomes 2.
///
/// # Errors
///
/// Parse errors, non-finite bounds, too many intervals, and any evaluation
/// error at a sample point (a pole inside the range, for instance).
pub fn definite_integral(expression: &str, a: f64, b: f64, intervals: u32) -> CalcResult<IntegralResult> {
    ensure_finite("a", a)?;
    ensure_finite("b", b)?;
    if intervals > MAX_INTERVALS {
        return Err(CalcError::invalid_input(
            "intervals",
            intervals.to_string(),
            format!("At most {} intervals", MAX_INTERVALS),
        ));
    }
    let f = parse(expression)?;

    let n = intervals.max(2);
    let n = if n % 2 == 1 { n + 1 } else { n };
    let h = (b - a) / n as f64;

    let mut sum = f.eval(a)? + f.eval(b)?;
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f.eval(a + i as f64 * h)?;
    }
    let value = sum * h / 3.0;
    if !value.is_finite() {
        return Err(CalcError::domain("definite_integral", "integral diverges"));
    }

    Ok(IntegralResult {
        expression: f.to_string(),
        lower: a,
        upper: b,
        intervals: n,
        step: h,
        value,
        steps: vec![
            Formula::SimpsonRule.metadata().formula_plain.to_string(),
            format!("n = {}, h = ({} - {}) / {} = {}", n, fmt_num(b, 6), fmt_num(a, 6), n, fmt_num(h, 8)),
            format!("I = {}", fmt_num(value, 8)),
        ],
    })
}
