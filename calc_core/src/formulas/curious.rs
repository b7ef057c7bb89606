//! # Curious Facts
//!
//! Light-hearted estimators: calories burned by affection, pizzas for a
//! party, and a life counted in heartbeats. Every constant comes from the
//! embedded `data/heuristics.toml`, parsed once on first use.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::calendar::days_between;
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_non_negative, fmt_num};

const HEURISTICS_TOML: &str = include_str!("../../data/heuristics.toml");

/// Largest party `pizza_per_person` will plan for
pub const MAX_GUESTS: u32 = 1_000_000;

// ============================================================================
// Constants
// ============================================================================

/// Per-activity burn rates in kcal per minute at intensity 3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRates {
    pub besos: f64,
    pub abrazos: f64,
    pub risas: f64,
    pub baile: f64,
    pub caricias: f64,
}

impl ActivityRates {
    pub fn rate(&self, activity: Activity) -> f64 {
        match activity {
            Activity::Besos => self.besos,
            Activity::Abrazos => self.abrazos,
            Activity::Risas => self.risas,
            Activity::Baile => self.baile,
            Activity::Caricias => self.caricias,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectiveConstants {
    pub intensity_factors: Vec<f64>,
    pub chocolate_square_kcal: f64,
    pub walking_kcal_per_min: f64,
    pub daily_diet_kcal: f64,
    pub kcal_per_minute: ActivityRates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlicesPerPerson {
    pub light: f64,
    pub normal: f64,
    pub hungry: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PizzaConstants {
    pub child_factor: f64,
    pub default_slices_per_pizza: u32,
    pub slices_per_person: SlicesPerPerson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeConstants {
    pub heart_bpm: f64,
    pub breaths_per_minute: f64,
    pub sleep_hours_per_day: f64,
}

/// Everything in `heuristics.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuriousConstants {
    pub affective: AffectiveConstants,
    pub pizza: PizzaConstants,
    pub life: LifeConstants,
}

impl CuriousConstants {
    /// Parse and validate a heuristics document.
    pub fn from_toml_str(src: &str) -> CalcResult<Self> {
        let constants: CuriousConstants =
            toml::from_str(src).map_err(|e| CalcError::config(format!("heuristics.toml: {}", e)))?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn validate(&self) -> CalcResult<()> {
        let factors = &self.affective.intensity_factors;
        if factors.len() != 5 {
            return Err(CalcError::config("intensity_factors needs exactly 5 entries"));
        }
        if factors[0] <= 0.0 || factors.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CalcError::config("intensity_factors must be positive and strictly increasing"));
        }
        let r = &self.affective.kcal_per_minute;
        if [r.besos, r.abrazos, r.risas, r.baile, r.caricias].iter().any(|v| *v <= 0.0) {
            return Err(CalcError::config("kcal_per_minute rates must be positive"));
        }
        if self.affective.chocolate_square_kcal <= 0.0
            || self.affective.walking_kcal_per_min <= 0.0
            || self.affective.daily_diet_kcal <= 0.0
        {
            return Err(CalcError::config("affective equivalences must be positive"));
        }
        if !(0.0..=1.0).contains(&self.pizza.child_factor) || self.pizza.default_slices_per_pizza == 0 {
            return Err(CalcError::config("pizza constants out of range"));
        }
        Ok(())
    }
}

static CONSTANTS: Lazy<CalcResult<CuriousConstants>> = Lazy::new(|| CuriousConstants::from_toml_str(HEURISTICS_TOML));

/// The embedded heuristics, parsed on first access.
pub fn constants() -> CalcResult<&'static CuriousConstants> {
    CONSTANTS.as_ref().map_err(Clone::clone)
}

// ============================================================================
// Affective Calories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Besos,
    Abrazos,
    Risas,
    Baile,
    Caricias,
}

impl Activity {
    pub const ALL: [Activity; 5] = [
        Activity::Besos,
        Activity::Abrazos,
        Activity::Risas,
        Activity::Baile,
        Activity::Caricias,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectiveCaloriesResult {
    pub activity: Activity,
    pub minutes: f64,
    pub intensity: u8,
    pub kcal: f64,
    pub chocolate_squares: f64,
    pub walking_minutes: f64,
    /// Share of a reference daily diet, in percent
    pub diet_percent: f64,
    pub steps: Vec<String>,
}

/// Energy spent on `minutes` of an affectionate activity at `intensity` 1..=5.
pub fn affective_calories(activity: Activity, minutes: f64, intensity: u8) -> CalcResult<AffectiveCaloriesResult> {
    ensure_non_negative("minutes", minutes)?;
    if !(1..=5).contains(&intensity) {
        return Err(CalcError::invalid_input(
            "intensity",
            intensity.to_string(),
            "Intensity must be between 1 and 5",
        ));
    }
    let c = &constants()?.affective;

    let base = c.kcal_per_minute.rate(activity);
    let factor = c.intensity_factors[usize::from(intensity - 1)];
    let kcal = base * minutes * factor;

    Ok(AffectiveCaloriesResult {
        activity,
        minutes,
        intensity,
        kcal,
        chocolate_squares: kcal / c.chocolate_square_kcal,
        walking_minutes: kcal / c.walking_kcal_per_min,
        diet_percent: kcal / c.daily_diet_kcal * 100.0,
        steps: vec![
            Formula::AffectiveCalories.metadata().formula_plain.to_string(),
            format!(
                "{} * {} * {} = {} kcal",
                fmt_num(base, 4),
                fmt_num(minutes, 4),
                fmt_num(factor, 4),
                fmt_num(kcal, 4)
            ),
        ],
    })
}

// ============================================================================
// Pizza per Person
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appetite {
    Light,
    Normal,
    Hungry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PizzaResult {
    pub adults: u32,
    pub children: u32,
    pub appetite: Appetite,
    pub slices_per_pizza: u32,
    /// Adults plus children weighted by the child factor
    pub adult_equivalents: f64,
    pub slices_needed: u32,
    pub pizzas: u32,
    pub leftover_slices: u32,
    pub steps: Vec<String>,
}

/// Pizzas to order, rounded up. `slices_per_pizza` of `None` uses the default cut.
pub fn pizza_per_person(
    adults: u32,
    children: u32,
    appetite: Appetite,
    slices_per_pizza: Option<u32>,
) -> CalcResult<PizzaResult> {
    let c = &constants()?.pizza;
    let spp = slices_per_pizza.unwrap_or(c.default_slices_per_pizza);
    if spp == 0 {
        return Err(CalcError::invalid_input("slices_per_pizza", "0", "A pizza needs at least one slice"));
    }
    if adults == 0 && children == 0 {
        return Err(CalcError::invalid_input("adults", "0", "Nobody to feed"));
    }
    let guests = u64::from(adults) + u64::from(children);
    if guests > u64::from(MAX_GUESTS) {
        return Err(CalcError::invalid_input(
            "adults",
            guests.to_string(),
            format!("At most {} guests can be planned for", MAX_GUESTS),
        ));
    }

    let per_person = match appetite {
        Appetite::Light => c.slices_per_person.light,
        Appetite::Normal => c.slices_per_person.normal,
        Appetite::Hungry => c.slices_per_person.hungry,
    };
    let equivalents = f64::from(adults) + f64::from(children) * c.child_factor;
    let slices = (equivalents * per_person).ceil();
    if !slices.is_finite() || slices > f64::from(u32::MAX) {
        return Err(CalcError::domain("pizza_per_person", "slice count does not fit in 32 bits"));
    }
    let slices_needed = slices as u32;
    let pizzas = slices_needed.div_ceil(spp).max(1);
    let leftover = u64::from(pizzas) * u64::from(spp) - u64::from(slices_needed);
    let leftover = u32::try_from(leftover)
        .map_err(|_| CalcError::domain("pizza_per_person", "leftover slices do not fit in 32 bits"))?;

    Ok(PizzaResult {
        adults,
        children,
        appetite,
        slices_per_pizza: spp,
        adult_equivalents: equivalents,
        slices_needed,
        pizzas,
        leftover_slices: leftover,
        steps: vec![
            Formula::PizzaPerPerson.metadata().formula_plain.to_string(),
            format!("{} + {} * {} = {} people", adults, children, fmt_num(c.child_factor, 2), fmt_num(equivalents, 2)),
            format!("{} * {} = {} slices", fmt_num(equivalents, 2), fmt_num(per_person, 2), slices_needed),
            format!("ceil({} / {}) = {} pizzas", slices_needed, spp, pizzas),
        ],
    })
}

// ============================================================================
// Life in Numbers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeInNumbersResult {
    pub birth_date: NaiveDate,
    pub today: NaiveDate,
    pub age_years: u32,
    pub days: i64,
    pub weeks: i64,
    pub hours: i64,
    pub minutes: i64,
    pub heartbeats: f64,
    pub breaths: f64,
    pub sleep_hours: f64,
    pub days_to_next_birthday: i64,
    pub steps: Vec<String>,
}

/// Next anniversary of `birth` on or after `today`. Feb 29 falls back to Mar 1.
fn next_birthday(birth: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let on_year = |y: i32| birth.with_year(y).or_else(|| NaiveDate::from_ymd_opt(y, 3, 1));
    let this_year = on_year(today.year())?;
    if this_year >= today {
        Some(this_year)
    } else {
        on_year(today.year() + 1)
    }
}

pub fn life_in_numbers(birth_date: NaiveDate, today: NaiveDate) -> CalcResult<LifeInNumbersResult> {
    if birth_date > today {
        return Err(CalcError::invalid_input(
            "birth_date",
            birth_date.to_string(),
            "Birth date is in the future",
        ));
    }
    let c = &constants()?.life;
    let span = days_between(birth_date, today)?;
    let days = span.total_days;
    let minutes = days * 1440;
    let days_to_next_birthday = next_birthday(birth_date, today)
        .map(|d| (d - today).num_days())
        .ok_or_else(|| CalcError::domain("life_in_numbers", "next birthday is out of range"))?;

    let heartbeats = minutes as f64 * c.heart_bpm;
    Ok(LifeInNumbersResult {
        birth_date,
        today,
        age_years: span.years,
        days,
        weeks: days / 7,
        hours: days * 24,
        minutes,
        heartbeats,
        breaths: minutes as f64 * c.breaths_per_minute,
        sleep_hours: days as f64 * c.sleep_hours_per_day,
        days_to_next_birthday,
        steps: vec![
            format!("{} - {} = {} days", today, birth_date, days),
            Formula::LifeInNumbers.metadata().formula_plain.to_string(),
            format!("{} * {} = {}", minutes, fmt_num(c.heart_bpm, 2), fmt_num(heartbeats, 0)),
        ],
    })
}
