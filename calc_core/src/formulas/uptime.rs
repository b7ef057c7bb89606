//! # Uptime and Downtime
//!
//! Availability targets ("three nines") translated into allowed downtime,
//! and measured downtime translated back into availability.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_finite, ensure_non_negative, fmt_num};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Reference periods. A month is 30.44 days and a year 365.25 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Day, Period::Week, Period::Month, Period::Year];

    pub fn seconds(self) -> f64 {
        match self {
            Period::Day => SECONDS_PER_DAY,
            Period::Week => 7.0 * SECONDS_PER_DAY,
            Period::Month => 30.44 * SECONDS_PER_DAY,
            Period::Year => 365.25 * SECONDS_PER_DAY,
        }
    }
}

/// Availability class by count of nines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AvailabilityClass {
    BelowTwoNines,
    TwoNines,
    ThreeNines,
    FourNines,
    FiveNinesOrBetter,
}

impl AvailabilityClass {
    pub fn from_percent(pct: f64) -> Self {
        if pct >= 99.999 {
            AvailabilityClass::FiveNinesOrBetter
        } else if pct >= 99.99 {
            AvailabilityClass::FourNines
        } else if pct >= 99.9 {
            AvailabilityClass::ThreeNines
        } else if pct >= 99.0 {
            AvailabilityClass::TwoNines
        } else {
            AvailabilityClass::BelowTwoNines
        }
    }
}

/// Seconds split into whole days, hours, minutes and fractional seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationBreakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
}

impl DurationBreakdown {
    pub fn from_seconds(total: f64) -> Self {
        let total = total.max(0.0);
        let whole = total.floor() as u64;
        Self {
            days: whole / 86_400,
            hours: whole % 86_400 / 3600,
            minutes: whole % 3600 / 60,
            seconds: (whole % 60) as f64 + total.fract(),
        }
    }

    /// "1d 2h 3m 4.5s", leading zero units omitted
    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.days > 0 {
            parts.push(format!("{}d", self.days));
        }
        if self.days > 0 || self.hours > 0 {
            parts.push(format!("{}h", self.hours));
        }
        if self.days > 0 || self.hours > 0 || self.minutes > 0 {
            parts.push(format!("{}m", self.minutes));
        }
        parts.push(format!("{}s", fmt_num(self.seconds, 2)));
        parts.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeWindow {
    pub period: Period,
    pub downtime_seconds: f64,
    pub breakdown: DurationBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UptimeResult {
    pub uptime_percent: f64,
    pub category: AvailabilityClass,
    /// One window per [`Period`], shortest first
    pub windows: Vec<DowntimeWindow>,
    pub steps: Vec<String>,
}

impl UptimeResult {
    pub fn window(&self, period: Period) -> Option<&DowntimeWindow> {
        self.windows.iter().find(|w| w.period == period)
    }
}

/// Allowed downtime per day, week, month and year for an uptime target.
pub fn uptime_from_percentage(pct: f64) -> CalcResult<UptimeResult> {
    ensure_finite("uptime_percent", pct)?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(CalcError::invalid_input(
            "uptime_percent",
            pct.to_string(),
            "Uptime must be between 0 and 100",
        ));
    }
    let down_fraction = 1.0 - pct / 100.0;
    let windows: Vec<DowntimeWindow> = Period::ALL
        .iter()
        .map(|&period| {
            let downtime_seconds = period.seconds() * down_fraction;
            DowntimeWindow {
                period,
                downtime_seconds,
                breakdown: DurationBreakdown::from_seconds(downtime_seconds),
            }
        })
        .collect();

    let mut steps = vec![Formula::UptimeDowntime.metadata().formula_plain.to_string()];
    steps.extend(
        windows
            .iter()
            .map(|w| format!("{:?}: {}", w.period, w.breakdown.display())),
    );

    Ok(UptimeResult {
        uptime_percent: pct,
        category: AvailabilityClass::from_percent(pct),
        windows,
        steps,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeResult {
    pub downtime_seconds: f64,
    pub period: Period,
    pub uptime_percent: f64,
    pub category: AvailabilityClass,
    pub period_breakdown: DurationBreakdown,
    pub downtime_breakdown: DurationBreakdown,
    pub steps: Vec<String>,
}

/// Availability achieved when `downtime_secs` were lost within `period`.
pub fn uptime_from_downtime(downtime_secs: f64, period: Period) -> CalcResult<DowntimeResult> {
    ensure_non_negative("downtime_seconds", downtime_secs)?;
    let total = period.seconds();
    if downtime_secs > total {
        return Err(CalcError::domain(
            "uptime_from_downtime",
            format!("{} s of downtime exceeds a {:?} ({} s)", fmt_num(downtime_secs, 2), period, fmt_num(total, 0)),
        ));
    }
    let uptime_percent = (1.0 - downtime_secs / total) * 100.0;

    Ok(DowntimeResult {
        downtime_seconds: downtime_secs,
        period,
        uptime_percent,
        category: AvailabilityClass::from_percent(uptime_percent),
        period_breakdown: DurationBreakdown::from_seconds(total),
        downtime_breakdown: DurationBreakdown::from_seconds(downtime_secs),
        steps: vec![
            "uptime = (1 - downtime / period) * 100".to_string(),
            format!(
                "(1 - {} / {}) * 100 = {}%",
                fmt_num(downtime_secs, 2),
                fmt_num(total, 0),
                fmt_num(uptime_percent, 6)
            ),
        ],
    })
}
