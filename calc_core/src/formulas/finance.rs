//! # Finance Formulas
//!
//! Loan amortization (French system: constant payment), future value with
//! periodic contributions, and present value.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::formulas::finance::amortization;
//!
//! let schedule = amortization(10_000.0, 6.0, 1.0, 12).unwrap();
//! assert_eq!(schedule.periods.len(), 12);
//! assert_eq!(schedule.periods.last().unwrap().remaining_balance, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_non_negative, ensure_positive, fmt_num};

/// Upper bound on schedule length (100 years of monthly payments)
const MAX_PERIODS: u32 = 1200;

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// 1-based period number
    pub period: u32,
    pub payment: f64,
    pub principal_paid: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

/// Full amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: f64,
    pub annual_rate_pct: f64,
    pub periods_per_year: u32,
    /// Regular payment (the last one may differ by rounding drift)
    pub payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub periods: Vec<AmortizationPeriod>,
    pub steps: Vec<String>,
}

/// Build a constant-payment amortization schedule.
///
/// Each period's interest is the balance before payment times the periodic
/// rate. The final period pays off whatever balance is left, so its
/// `remaining_balance` is exactly zero.
pub fn amortization(principal: f64, annual_rate_pct: f64, years: f64, periods_per_year: u32) -> CalcResult<AmortizationSchedule> {
    ensure_positive("principal", principal)?;
    ensure_non_negative("annual_rate_pct", annual_rate_pct)?;
    ensure_positive("years", years)?;
    if periods_per_year == 0 {
        return Err(CalcError::invalid_input("periods_per_year", "0", "At least one period per year is required"));
    }

    let n_real = years * periods_per_year as f64;
    let n = n_real.round();
    if n < 1.0 || n > MAX_PERIODS as f64 {
        return Err(CalcError::invalid_input(
            "years",
            years.to_string(),
            format!("Term must span between 1 and {} periods", MAX_PERIODS),
        ));
    }
    let n = n as u32;
    let r = annual_rate_pct / 100.0 / periods_per_year as f64;

    let payment = if r == 0.0 {
        principal / n as f64
    } else {
        principal * r / (1.0 - (1.0 + r).powf(-(n as f64)))
    };

    let mut periods = Vec::with_capacity(n as usize);
    let mut balance = principal;
    for period in 1..=n {
        let interest = balance * r;
        let (pay, principal_paid) = if period == n {
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        balance = if period == n { 0.0 } else { balance - principal_paid };
        periods.push(AmortizationPeriod {
            period,
            payment: pay,
            principal_paid,
            interest,
            remaining_balance: balance,
        });
    }

    let total_interest: f64 = periods.iter().map(|p| p.interest).sum();
    let total_principal: f64 = periods.iter().map(|p| p.principal_paid).sum();
    let total_paid = total_interest + total_principal;

    Ok(AmortizationSchedule {
        principal,
        annual_rate_pct,
        periods_per_year,
        payment,
        total_paid,
        total_interest,
        periods,
        steps: vec![
            Formula::AnnuityPayment.metadata().formula_plain.to_string(),
            format!("r = {}% / 100 / {} = {}", fmt_num(annual_rate_pct, 6), periods_per_year, fmt_num(r, 8)),
            format!("n = {} * {} = {}", fmt_num(years, 4), periods_per_year, n),
            format!("PMT = {}", fmt_num(payment, 2)),
            format!("total interest = {}", fmt_num(total_interest, 2)),
        ],
    })
}

/// Future value result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureValueResult {
    pub future_value: f64,
    pub total_contributed: f64,
    pub interest_earned: f64,
    pub steps: Vec<String>,
}

/// Compound growth of `present` plus a contribution at the end of each period.
pub fn future_value(
    present: f64,
    annual_rate_pct: f64,
    years: f64,
    compounds_per_year: u32,
    periodic_contribution: f64,
) -> CalcResult<FutureValueResult> {
    ensure_non_negative("present", present)?;
    ensure_non_negative("annual_rate_pct", annual_rate_pct)?;
    ensure_non_negative("years", years)?;
    ensure_non_negative("periodic_contribution", periodic_contribution)?;
    if compounds_per_year == 0 {
        return Err(CalcError::invalid_input("compounds_per_year", "0", "At least one compounding per year is required"));
    }

    let r = annual_rate_pct / 100.0 / compounds_per_year as f64;
    let n = years * compounds_per_year as f64;
    let growth = (1.0 + r).powf(n);
    let contributions_fv = if r == 0.0 {
        periodic_contribution * n
    } else {
        periodic_contribution * (growth - 1.0) / r
    };
    let fv = present * growth + contributions_fv;
    let total_contributed = present + periodic_contribution * n;

    Ok(FutureValueResult {
        future_value: fv,
        total_contributed,
        interest_earned: fv - total_contributed,
        steps: vec![
            Formula::FutureValue.metadata().formula_plain.to_string(),
            format!("(1 + {})^{} = {}", fmt_num(r, 8), fmt_num(n, 4), fmt_num(growth, 8)),
            format!("FV = {}", fmt_num(fv, 2)),
        ],
    })
}

/// Present value result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentValueResult {
    pub present_value: f64,
    pub discount: f64,
    pub steps: Vec<String>,
}

/// Discount `future` back to today.
pub fn present_value(future: f64, annual_rate_pct: f64, years: f64, compounds_per_year: u32) -> CalcResult<PresentValueResult> {
    ensure_non_negative("future", future)?;
    ensure_non_negative("annual_rate_pct", annual_rate_pct)?;
    ensure_non_negative("years", years)?;
    if compounds_per_year == 0 {
        return Err(CalcError::invalid_input("compounds_per_year", "0", "At least one compounding per year is required"));
    }

    let r = annual_rate_pct / 100.0 / compounds_per_year as f64;
    let n = years * compounds_per_year as f64;
    let pv = future / (1.0 + r).powf(n);

    Ok(PresentValueResult {
        present_value: pv,
        discount: future - pv,
        steps: vec![
            Formula::PresentValue.metadata().formula_plain.to_string(),
            format!("PV = {} / (1 + {})^{} = {}", fmt_num(future, 2), fmt_num(r, 8), fmt_num(n, 4), fmt_num(pv, 2)),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_payment() {
        // 200k at 6% over 30 years -> 1199.10 per month
        let s = amortization(200_000.0, 6.0, 30.0, 12).unwrap();
        assert!((s.payment - 1199.10).abs() < 0.01);
        assert_eq!(s.periods.len(), 360);
    }

    #[test]
    fn test_schedule_closes_to_zero() {
        let s = amortization(15_000.0, 7.5, 5.0, 12).unwrap();
        let last = s.periods.last().unwrap();
        assert_eq!(last.remaining_balance, 0.0);
        assert!((last.payment - s.payment).abs() < 1e-6);
    }

    #[test]
    fn test_interest_is_balance_times_rate() {
        let s = amortization(10_000.0, 12.0, 1.0, 12).unwrap();
        let r = 0.01;
        let mut before = s.principal;
        for p in &s.periods {
            assert_relative_eq!(p.interest, before * r, max_relative = 1e-12);
            before = p.remaining_balance;
        }
    }

    #[test]
    fn test_totals_consistent() {
        let s = amortization(50_000.0, 4.0, 10.0, 12).unwrap();
        let principal: f64 = s.periods.iter().map(|p| p.principal_paid).sum();
        assert_relative_eq!(principal, s.principal, max_relative = 1e-9);
        let payments: f64 = s.periods.iter().map(|p| p.payment).sum();
        assert_relative_eq!(payments, s.total_paid, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_rate() {
        let s = amortization(1200.0, 0.0, 1.0, 12).unwrap();
        assert_eq!(s.payment, 100.0);
        assert_eq!(s.total_interest, 0.0);
    }

    #[test]
    fn test_invalid_terms() {
        assert!(amortization(0.0, 5.0, 1.0, 12).is_err());
        assert!(amortization(1000.0, 5.0, 1.0, 0).is_err());
        assert!(amortization(1000.0, 5.0, 200.0, 12).is_err());
    }

    #[test]
    fn test_future_and_present_value_inverse() {
        let fv = future_value(1000.0, 5.0, 10.0, 1, 0.0).unwrap();
        assert_relative_eq!(fv.future_value, 1628.894627, max_relative = 1e-9);
        let pv = present_value(fv.future_value, 5.0, 10.0, 1).unwrap();
        assert_relative_eq!(pv.present_value, 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_future_value_with_contributions() {
        let fv = future_value(0.0, 0.0, 2.0, 12, 100.0).unwrap();
        assert_relative_eq!(fv.future_value, 2400.0, max_relative = 1e-12);
        assert_eq!(fv.interest_earned, 0.0);
    }
}
