//! # Percentage Utilities
//!
//! The five percentage questions the site answers. Every function returns
//! the value together with the formula used and the substituted steps.
//!
//! ```rust
//! use calc_core::formulas::percentage::{percentage_of, variation_percent};
//!
//! assert_eq!(percentage_of(25.0, 200.0).unwrap().value, 12.5);
//! assert!(variation_percent(80.0, 100.0).unwrap().value > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_finite, fmt_num};

/// Numeric answer plus its display trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageResult {
    pub value: f64,
    pub formula: String,
    pub steps: Vec<String>,
}

impl PercentageResult {
    fn new(formula: Formula, value: f64, steps: Vec<String>) -> Self {
        Self {
            value,
            formula: formula.metadata().formula_plain.to_string(),
            steps,
        }
    }
}

/// "X% of Y"
pub fn percent_of_value(percent: f64, total: f64) -> CalcResult<PercentageResult> {
    ensure_finite("percent", percent)?;
    ensure_finite("total", total)?;
    let value = percent * total / 100.0;
    Ok(PercentageResult::new(
        Formula::PercentOfValue,
        value,
        vec![
            format!("{} * {} = {}", fmt_num(percent, 6), fmt_num(total, 6), fmt_num(percent * total, 6)),
            format!("{} / 100 = {}", fmt_num(percent * total, 6), fmt_num(value, 6)),
        ],
    ))
}

/// "X is what % of Y"
pub fn percentage_of(part: f64, total: f64) -> CalcResult<PercentageResult> {
    ensure_finite("part", part)?;
    ensure_finite("total", total)?;
    if total == 0.0 {
        return Err(CalcError::division_by_zero("percentage_of", "total"));
    }
    let ratio = part / total;
    let value = ratio * 100.0;
    Ok(PercentageResult::new(
        Formula::PercentageOf,
        value,
        vec![
            format!("{} / {} = {}", fmt_num(part, 6), fmt_num(total, 6), fmt_num(ratio, 8)),
            format!("{} * 100 = {}%", fmt_num(ratio, 8), fmt_num(value, 6)),
        ],
    ))
}

/// Percent change from `from` to `to`, relative to `|from|`.
///
/// Zero when equal, positive when `to > from`, negative when `to < from`.
pub fn variation_percent(from: f64, to: f64) -> CalcResult<PercentageResult> {
    ensure_finite("from", from)?;
    ensure_finite("to", to)?;
    if from == 0.0 {
        return Err(CalcError::division_by_zero("variation_percent", "from"));
    }
    let diff = to - from;
    let value = diff / from.abs() * 100.0;
    Ok(PercentageResult::new(
        Formula::VariationPercent,
        value,
        vec![
            format!("{} - {} = {}", fmt_num(to, 6), fmt_num(from, 6), fmt_num(diff, 6)),
            format!("{} / {} * 100 = {}%", fmt_num(diff, 6), fmt_num(from.abs(), 6), fmt_num(value, 6)),
        ],
    ))
}

/// Original value before a known percent change produced `final_value`.
pub fn original_before_change(final_value: f64, percent: f64) -> CalcResult<PercentageResult> {
    ensure_finite("final_value", final_value)?;
    ensure_finite("percent", percent)?;
    let factor = 1.0 + percent / 100.0;
    if factor == 0.0 {
        return Err(CalcError::domain(
            "original_before_change",
            "a -100% change maps every original to zero, so it cannot be undone",
        ));
    }
    let value = final_value / factor;
    Ok(PercentageResult::new(
        Formula::OriginalBeforeChange,
        value,
        vec![
            format!("1 + {} / 100 = {}", fmt_num(percent, 6), fmt_num(factor, 8)),
            format!("{} / {} = {}", fmt_num(final_value, 6), fmt_num(factor, 8), fmt_num(value, 6)),
        ],
    ))
}

/// Apply a percent increase (positive) or decrease (negative).
pub fn apply_percent_change(value: f64, percent: f64) -> CalcResult<PercentageResult> {
    ensure_finite("value", value)?;
    ensure_finite("percent", percent)?;
    let factor = 1.0 + percent / 100.0;
    let result = value * factor;
    Ok(PercentageResult::new(
        Formula::ApplyPercentChange,
        result,
        vec![
            format!("1 + {} / 100 = {}", fmt_num(percent, 6), fmt_num(factor, 8)),
            format!("{} * {} = {}", fmt_num(value, 6), fmt_num(factor, 8), fmt_num(result, 6)),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percent_of_value() {
        let r = percent_of_value(15.0, 80.0).unwrap();
        assert_eq!(r.value, 12.0);
        assert_eq!(r.formula, "result = X * Y / 100");
        assert_eq!(r.steps.len(), 2);
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(50.0, 200.0).unwrap().value, 25.0);
        assert_eq!(percentage_of(1.0, 0.0).unwrap_err().error_code(), "DIVISION_BY_ZERO");
    }

    #[test]
    fn test_variation_sign() {
        assert_eq!(variation_percent(50.0, 50.0).unwrap().value, 0.0);
        assert_eq!(variation_percent(50.0, 75.0).unwrap().value, 50.0);
        assert_eq!(variation_percent(50.0, 25.0).unwrap().value, -50.0);
        // Negative base: going from -50 to -25 is an increase
        assert!(variation_percent(-50.0, -25.0).unwrap().value > 0.0);
        assert!(variation_percent(0.0, 1.0).is_err());
    }

    #[test]
    fn test_original_before_change() {
        let r = original_before_change(120.0, 20.0).unwrap();
        assert_relative_eq!(r.value, 100.0, max_relative = 1e-12);
        assert!(original_before_change(10.0, -100.0).is_err());
    }

    #[test]
    fn test_apply_then_undo() {
        let up = apply_percent_change(80.0, 25.0).unwrap();
        assert_eq!(up.value, 100.0);
        let back = original_before_change(up.value, 25.0).unwrap();
        assert_relative_eq!(back.value, 80.0, max_relative = 1e-12);
    }
}
