//! # Fractions
//!
//! Simplification by GCD and the four basic operations, always returning
//! reduced fractions with the sign carried by the numerator.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::gcd;

/// A reduced fraction with its decimal and mixed-number forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionResult {
    pub numerator: i64,
    pub denominator: i64,
    /// GCD divided out of the unreduced input
    pub gcd: i64,
    pub decimal: f64,
    /// Whole part of the mixed number (truncated toward zero)
    pub whole: i64,
    /// Remaining numerator of the mixed number (same sign as the fraction)
    pub remainder: i64,
    pub steps: Vec<String>,
}

impl FractionResult {
    /// "3/4", "-5/2", "7"
    pub fn display(&self) -> String {
        if self.denominator == 1 {
            self.numerator.to_string()
        } else {
            format!("{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Reduce `num/den`.
///
/// # Errors
///
/// `DivisionByZero` when `den == 0`; `InvalidInput` on `i64::MIN`, which
/// has no positive counterpart.
pub fn simplify(num: i64, den: i64) -> CalcResult<FractionResult> {
    if den == 0 {
        return Err(CalcError::division_by_zero("simplify", "denominator"));
    }
    if num == i64::MIN || den == i64::MIN {
        return Err(CalcError::invalid_input("fraction", format!("{}/{}", num, den), "Value out of range"));
    }

    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let g = gcd(num, den).max(1);
    let (n, d) = (num / g, den / g);

    let mut steps = vec![Formula::FractionSimplify.metadata().formula_plain.to_string()];
    steps.push(format!("gcd({}, {}) = {}", num, den, g));
    steps.push(format!("{}/{} = {}/{}", num, den, n, d));

    Ok(FractionResult {
        numerator: n,
        denominator: d,
        gcd: g,
        decimal: n as f64 / d as f64,
        whole: n / d,
        remainder: n % d,
        steps,
    })
}

fn checked(calculation: &str, value: Option<i64>) -> CalcResult<i64> {
    value.ok_or_else(|| CalcError::domain(calculation, "intermediate value overflows a 64-bit integer"))
}

/// `a/b + c/d`
pub fn add(a: i64, b: i64, c: i64, d: i64) -> CalcResult<FractionResult> {
    simplify(a, b)?;
    simplify(c, d)?;
    let num = checked("add", a.checked_mul(d).zip(c.checked_mul(b)).and_then(|(x, y)| x.checked_add(y)))?;
    let den = checked("add", b.checked_mul(d))?;
    simplify(num, den)
}

/// `a/b - c/d`
pub fn subtract(a: i64, b: i64, c: i64, d: i64) -> CalcResult<FractionResult> {
    let neg_c = checked("subtract", c.checked_neg())?;
    add(a, b, neg_c, d)
}

/// `a/b * c/d`
pub fn multiply(a: i64, b: i64, c: i64, d: i64) -> CalcResult<FractionResult> {
    simplify(a, b)?;
    simplify(c, d)?;
    let num = checked("multiply", a.checked_mul(c))?;
    let den = checked("multiply", b.checked_mul(d))?;
    simplify(num, den)
}

/// `a/b ÷ c/d`
pub fn divide(a: i64, b: i64, c: i64, d: i64) -> CalcResult<FractionResult> {
    if c == 0 {
        return Err(CalcError::division_by_zero("divide", "divisor numerator"));
    }
    multiply(a, b, d, c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify() {
        let f = simplify(12, 18).unwrap();
        assert_eq!((f.numerator, f.denominator, f.gcd), (2, 3, 6));
        assert_eq!(f.display(), "2/3");
    }

    #[test]
    fn test_sign_moves_to_numerator() {
        let f = simplify(3, -6).unwrap();
        assert_eq!((f.numerator, f.denominator), (-1, 2));
        let f = simplify(-4, -8).unwrap();
        assert_eq!((f.numerator, f.denominator), (1, 2));
    }

    #[test]
    fn test_mixed_number() {
        let f = simplify(7, 2).unwrap();
        assert_eq!((f.whole, f.remainder), (3, 1));
        assert_eq!(f.decimal, 3.5);
        let f = simplify(-7, 2).unwrap();
        assert_eq!((f.whole, f.remainder), (-3, -1));
    }

    #[test]
    fn test_zero_numerator_and_denominator() {
        let f = simplify(0, 5).unwrap();
        assert_eq!((f.numerator, f.denominator), (0, 1));
        assert_eq!(simplify(1, 0).unwrap_err().error_code(), "DIVISION_BY_ZERO");
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(add(1, 2, 1, 3).unwrap().display(), "5/6");
        assert_eq!(subtract(1, 2, 1, 2).unwrap().display(), "0");
        assert_eq!(multiply(2, 3, 3, 4).unwrap().display(), "1/2");
        assert_eq!(divide(1, 2, 1, 4).unwrap().display(), "2");
        assert!(divide(1, 2, 0, 4).is_err());
        assert!(add(1, 0, 1, 2).is_err());
    }

    #[test]
    fn test_overflow_is_domain_error() {
        assert_eq!(multiply(i64::MAX, 1, 2, 1).unwrap_err().error_code(), "DOMAIN_ERROR");
    }
}
