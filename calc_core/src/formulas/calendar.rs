//! # Calendar Arithmetic
//!
//! Shifting dates by a day count and measuring the distance between two
//! dates. Month lengths and leap years come from chrono's proleptic
//! Gregorian calendar.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;

/// Gregorian leap-year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// A date shifted by a number of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateShiftResult {
    pub original: NaiveDate,
    /// Signed shift actually applied
    pub days: i64,
    pub result: NaiveDate,
    pub weekday: Weekday,
    pub result_is_leap_year: bool,
    pub steps: Vec<String>,
}

/// Add `days` (may be negative) to `date`.
///
/// # Errors
///
/// `DomainError` when the result falls outside chrono's supported range.
pub fn add_days(date: NaiveDate, days: i64) -> CalcResult<DateShiftResult> {
    let shifted = chrono::Duration::try_days(days)
        .and_then(|d| date.checked_add_signed(d))
        .ok_or_else(|| CalcError::domain("add_days", format!("{} shifted by {} days is out of range", date, days)))?;

    Ok(DateShiftResult {
        original: date,
        days,
        result: shifted,
        weekday: shifted.weekday(),
        result_is_leap_year: is_leap_year(shifted.year()),
        steps: vec![
            Formula::DateShift.metadata().formula_plain.to_string(),
            format!("{} {:+} days = {}", date, days, shifted),
        ],
    })
}

/// Subtract `days` from `date`.
pub fn subtract_days(date: NaiveDate, days: i64) -> CalcResult<DateShiftResult> {
    let negated = days
        .checked_neg()
        .ok_or_else(|| CalcError::invalid_input("days", days.to_string(), "Day count out of range"))?;
    add_days(date, negated)
}

/// Distance between two dates.
///
/// `total_days == 7 * weeks + days_remainder`, and
/// `start + years + months + days == end` on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaysBetweenResult {
    /// Earlier of the two dates
    pub start: NaiveDate,
    /// Later of the two dates
    pub end: NaiveDate,
    /// True when the caller passed the dates in reverse order
    pub swapped: bool,
    pub total_days: i64,
    pub weeks: i64,
    pub days_remainder: i64,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub start_is_leap_year: bool,
    pub end_is_leap_year: bool,
    /// February 29ths strictly after `start` and up to and including `end`
    pub leap_days_crossed: u32,
    pub steps: Vec<String>,
}

/// Count Feb 29s in (start, end].
fn leap_days_in(start: NaiveDate, end: NaiveDate) -> u32 {
    (start.year()..=end.year())
        .filter(|&y| is_leap_year(y))
        .filter_map(|y| NaiveDate::from_ymd_opt(y, 2, 29))
        .filter(|d| *d > start && *d <= end)
        .count() as u32
}

/// Days between `a` and `b`, regardless of order.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> CalcResult<DaysBetweenResult> {
    let (start, end, swapped) = if a <= b { (a, b, false) } else { (b, a, true) };
    let total_days = (end - start).num_days();

    // Whole months that fit, then the leftover days
    let mut total_months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut anchor = start;
    while total_months > 0 {
        match start.checked_add_months(Months::new(total_months as u32)) {
            Some(candidate) if candidate <= end => {
                anchor = candidate;
                break;
            }
            _ => total_months -= 1,
        }
    }
    let total_months = total_months.max(0) as u32;
    let days = (end - anchor).num_days();
    if days < 0 {
        return Err(CalcError::Internal {
            message: format!("calendar breakdown overshot between {} and {}", start, end),
        });
    }

    Ok(DaysBetweenResult {
        start,
        end,
        swapped,
        total_days,
        weeks: total_days / 7,
        days_remainder: total_days % 7,
        years: total_months / 12,
        months: total_months % 12,
        days: days as u32,
        start_is_leap_year: is_leap_year(start.year()),
        end_is_leap_year: is_leap_year(end.year()),
        leap_days_crossed: leap_days_in(start, end),
        steps: vec![
            Formula::DaysBetween.metadata().formula_plain.to_string(),
            format!("{} - {} = {} days", end, start, total_days),
            format!("{} = 7 * {} + {}", total_days, total_days / 7, total_days % 7),
            format!("{} years, {} months, {} days", total_months / 12, total_months % 12, days),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_add_days_rolls_over_leap_february() {
        let r = add_days(d(2024, 2, 28), 1).unwrap();
        assert_eq!(r.result, d(2024, 2, 29));
        let r = add_days(d(2023, 2, 28), 1).unwrap();
        assert_eq!(r.result, d(2023, 3, 1));
        let r = add_days(d(2023, 12, 31), 1).unwrap();
        assert_eq!(r.result, d(2024, 1, 1));
        assert!(r.result_is_leap_year);
        assert_eq!(r.weekday, Weekday::Mon);
    }

    #[test]
    fn test_subtract_days() {
        let r = subtract_days(d(2024, 3, 1), 1).unwrap();
        assert_eq!(r.result, d(2024, 2, 29));
        assert_eq!(r.days, -1);
    }

    #[test]
    fn test_add_days_out_of_range() {
        assert!(add_days(d(2024, 1, 1), i64::MAX).is_err());
        assert!(subtract_days(d(2024, 1, 1), i64::MIN).is_err());
    }

    #[test]
    fn test_days_between_breakdown() {
        let r = days_between(d(2020, 1, 15), d(2023, 4, 20)).unwrap();
        assert_eq!((r.years, r.months, r.days), (3, 3, 5));
        assert_eq!(r.total_days, 1191);
        assert_eq!(r.weeks * 7 + r.days_remainder, r.total_days);
        assert!(r.start_is_leap_year);
        assert!(!r.end_is_leap_year);
        assert_eq!(r.leap_days_crossed, 1);
    }

    #[test]
    fn test_days_between_order_independent() {
        let a = days_between(d(2024, 5, 1), d(2024, 1, 1)).unwrap();
        let b = days_between(d(2024, 1, 1), d(2024, 5, 1)).unwrap();
        assert!(a.swapped);
        assert_eq!(a.total_days, b.total_days);
        assert_eq!(a.total_days, 121);
    }

    #[test]
    fn test_days_between_end_of_month_clamp() {
        // Jan 31 + 1 month clamps to Feb 29; the breakdown must still land on the end date
        let r = days_between(d(2024, 1, 31), d(2024, 3, 1)).unwrap();
        let anchor = r.start.checked_add_months(Months::new(r.years * 12 + r.months)).unwrap();
        assert_eq!(anchor + chrono::Duration::days(r.days as i64), r.end);
    }

    #[test]
    fn test_same_day() {
        let r = days_between(d(2024, 6, 1), d(2024, 6, 1)).unwrap();
        assert_eq!(r.total_days, 0);
        assert_eq!((r.years, r.months, r.days), (0, 0, 0));
    }
}
