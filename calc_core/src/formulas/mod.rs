//! # Formula Library
//!
//! Pure, stateless calculators. Each module follows the same pattern:
//!
//! - plain function arguments (units tagged with the `units` enums)
//! - a `*Result` record carrying the answer plus a display-only `steps` trace
//! - `CalcResult<_>` for every failure, except Roman numerals which report
//!   validity inline
//!
//! [`FormulaRequest`] wraps every operation in one JSON-tagged enum so a
//! front end can dispatch any calculation from a single document:
//!
//! ```rust
//! use calc_core::formulas::{FormulaOutcome, FormulaRequest};
//!
//! let json = r#"{"type": "percentage_of", "part": 30, "total": 120}"#;
//! let request: FormulaRequest = serde_json::from_str(json).unwrap();
//! match request.evaluate().unwrap() {
//!     FormulaOutcome::Percentage(p) => assert_eq!(p.value, 25.0),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod calculus;
pub mod calendar;
pub mod chemistry;
pub mod conversions;
pub mod curious;
pub mod finance;
pub mod fractions;
pub mod geometry;
pub mod percentage;
pub mod physics;
pub mod registry;
pub mod roman;
pub mod uptime;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::units::{DataUnit, EnergyUnit, LengthUnit, MassUnit, SpeedUnit, TimeUnit};

pub use calculus::{DerivativeResult, IntegralResult};
pub use calendar::{DateShiftResult, DaysBetweenResult};
pub use chemistry::{DilutionResult, IdealGasResult, MolarityResult};
pub use conversions::{ConversionResult, TemperatureResult, TemperatureUnit};
pub use curious::{Activity, AffectiveCaloriesResult, Appetite, LifeInNumbersResult, PizzaResult};
pub use finance::{AmortizationSchedule, FutureValueResult, PresentValueResult};
pub use fractions::FractionResult;
pub use geometry::{CircleResult, RhombusResult, TrapezoidResult, TriangleResult};
pub use percentage::PercentageResult;
pub use physics::{KineticEnergyResult, OhmsLawResult, PowerResult, SpeedResult};
pub use registry::{Formula, FormulaCategory};
pub use roman::RomanNumeralResult;
pub use uptime::{DowntimeResult, Period, UptimeResult};

fn meters() -> LengthUnit {
    LengthUnit::Meter
}

fn default_intervals() -> u32 {
    calculus::DEFAULT_INTERVALS
}

/// Binary operation on two fractions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// One calculation, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaRequest {
    // Geometry
    TriangleBaseHeight {
        base: f64,
        height: f64,
        #[serde(default = "meters")]
        unit: LengthUnit,
    },
    TriangleSides {
        a: f64,
        b: f64,
        c: f64,
        #[serde(default = "meters")]
        unit: LengthUnit,
    },
    TriangleSas {
        a: f64,
        b: f64,
        angle_deg: f64,
        #[serde(default = "meters")]
        unit: LengthUnit,
    },
    RhombusDiagonals {
        d1: f64,
        d2: f64,
        #[serde(default = "meters")]
        unit: LengthUnit,
    },
    RhombusSideDiagonal {
        side: f64,
        diagonal: f64,
        #[serde(default = "meters")]
        unit: LengthUnit,
    },
    Trapezoid {
        base_major: f64,
        base_minor: f64,
        height: f64,
        #[serde(default)]
        legs: Option<(f64, f64)>,
        #[serde(default = "meters")]
        unit: LengthUnit,
    },
    Circle {
        radius: f64,
        #[serde(default = "meters")]
        unit: LengthUnit,
    },

    // Physics
    KineticEnergy {
        mass: f64,
        mass_unit: MassUnit,
        speed: f64,
        speed_unit: SpeedUnit,
    },
    OhmsLaw {
        #[serde(default)]
        voltage: Option<f64>,
        #[serde(default)]
        current: Option<f64>,
        #[serde(default)]
        resistance: Option<f64>,
    },
    Speed {
        distance: f64,
        distance_unit: LengthUnit,
        time: f64,
        time_unit: TimeUnit,
    },
    Power {
        energy: f64,
        energy_unit: EnergyUnit,
        time: f64,
        time_unit: TimeUnit,
    },

    // Chemistry
    Molarity {
        solute_grams: f64,
        molar_mass: f64,
        volume_liters: f64,
    },
    Dilution {
        #[serde(default)]
        c1: Option<f64>,
        #[serde(default)]
        v1: Option<f64>,
        #[serde(default)]
        c2: Option<f64>,
        #[serde(default)]
        v2: Option<f64>,
    },
    IdealGas {
        #[serde(default)]
        pressure_pa: Option<f64>,
        #[serde(default)]
        volume_m3: Option<f64>,
        #[serde(default)]
        moles: Option<f64>,
        #[serde(default)]
        temperature_k: Option<f64>,
    },

    // Finance
    Amortization {
        principal: f64,
        annual_rate_pct: f64,
        years: f64,
        periods_per_year: u32,
    },
    FutureValue {
        present: f64,
        annual_rate_pct: f64,
        years: f64,
        compounds_per_year: u32,
        #[serde(default)]
        periodic_contribution: f64,
    },
    PresentValue {
        future: f64,
        annual_rate_pct: f64,
        years: f64,
        compounds_per_year: u32,
    },

    // Calendar
    AddDays {
        date: NaiveDate,
        days: i64,
    },
    SubtractDays {
        date: NaiveDate,
        days: i64,
    },
    DaysBetween {
        start: NaiveDate,
        end: NaiveDate,
    },
    LeapYear {
        year: i32,
    },

    // Arithmetic
    ArabicToRoman {
        value: i64,
    },
    RomanToArabic {
        numeral: String,
    },
    FractionSimplify {
        numerator: i64,
        denominator: i64,
    },
    FractionArithmetic {
        op: FractionOp,
        a: i64,
        b: i64,
        c: i64,
        d: i64,
    },

    // Percentages
    PercentOfValue {
        percent: f64,
        total: f64,
    },
    PercentageOf {
        part: f64,
        total: f64,
    },
    VariationPercent {
        from: f64,
        to: f64,
    },
    OriginalBeforeChange {
        final_value: f64,
        percent: f64,
    },
    ApplyPercentChange {
        value: f64,
        percent: f64,
    },

    // Calculus
    Derivative {
        expression: String,
        x: f64,
    },
    Integral {
        expression: String,
        a: f64,
        b: f64,
        #[serde(default = "default_intervals")]
        intervals: u32,
    },

    // Curious facts
    AffectiveCalories {
        activity: Activity,
        minutes: f64,
        intensity: u8,
    },
    PizzaPerPerson {
        adults: u32,
        #[serde(default)]
        children: u32,
        appetite: Appetite,
        #[serde(default)]
        slices_per_pizza: Option<u32>,
    },
    LifeInNumbers {
        birth_date: NaiveDate,
        today: NaiveDate,
    },

    // Conversions
    Temperature {
        value: f64,
        from: TemperatureUnit,
        to: TemperatureUnit,
    },
    Length {
        value: f64,
        from: LengthUnit,
        to: LengthUnit,
    },
    DataSize {
        value: f64,
        from: DataUnit,
        to: DataUnit,
    },
    UptimeFromPercentage {
        percent: f64,
    },
    UptimeFromDowntime {
        downtime_seconds: f64,
        period: Period,
    },
}

/// Result of [`FormulaRequest::evaluate`], tagged by `type` with the payload under `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "result", rename_all = "snake_case")]
pub enum FormulaOutcome {
    Triangle(TriangleResult),
    Rhombus(RhombusResult),
    Trapezoid(TrapezoidResult),
    Circle(CircleResult),
    KineticEnergy(KineticEnergyResult),
    OhmsLaw(OhmsLawResult),
    Speed(SpeedResult),
    Power(PowerResult),
    Molarity(MolarityResult),
    Dilution(DilutionResult),
    IdealGas(IdealGasResult),
    Amortization(AmortizationSchedule),
    FutureValue(FutureValueResult),
    PresentValue(PresentValueResult),
    DateShift(DateShiftResult),
    DaysBetween(DaysBetweenResult),
    LeapYear { year: i32, is_leap_year: bool },
    Roman(RomanNumeralResult),
    Fraction(FractionResult),
    Percentage(PercentageResult),
    Derivative(DerivativeResult),
    Integral(IntegralResult),
    AffectiveCalories(AffectiveCaloriesResult),
    Pizza(PizzaResult),
    LifeInNumbers(LifeInNumbersResult),
    Temperature(TemperatureResult),
    Length(ConversionResult<LengthUnit>),
    DataSize(ConversionResult<DataUnit>),
    Uptime(UptimeResult),
    Downtime(DowntimeResult),
}

impl FormulaRequest {
    /// Registry entry describing this request
    pub fn formula(&self) -> Formula {
        use FormulaRequest as R;
        match self {
            R::TriangleBaseHeight { .. } => Formula::TriangleBaseHeight,
            R::TriangleSides { .. } => Formula::TriangleHeron,
            R::TriangleSas { .. } => Formula::TriangleSas,
            R::RhombusDiagonals { .. } => Formula::RhombusDiagonals,
            R::RhombusSideDiagonal { .. } => Formula::RhombusSideDiagonal,
            R::Trapezoid { .. } => Formula::TrapezoidArea,
            R::Circle { .. } => Formula::CircleArea,
            R::KineticEnergy { .. } => Formula::KineticEnergy,
            R::OhmsLaw { .. } => Formula::OhmsLaw,
            R::Speed { .. } => Formula::AverageSpeed,
            R::Power { .. } => Formula::MechanicalPower,
            R::Molarity { .. } => Formula::Molarity,
            R::Dilution { .. } => Formula::Dilution,
            R::IdealGas { .. } => Formula::IdealGasLaw,
            R::Amortization { .. } => Formula::AnnuityPayment,
            R::FutureValue { .. } => Formula::FutureValue,
            R::PresentValue { .. } => Formula::PresentValue,
            R::AddDays { .. } | R::SubtractDays { .. } | R::LeapYear { .. } => Formula::DateShift,
            R::DaysBetween { .. } => Formula::DaysBetween,
            R::ArabicToRoman { .. } | R::RomanToArabic { .. } => Formula::RomanNumerals,
            R::FractionSimplify { .. } | R::FractionArithmetic { .. } => Formula::FractionSimplify,
            R::PercentOfValue { .. } => Formula::PercentOfValue,
            R::PercentageOf { .. } => Formula::PercentageOf,
            R::VariationPercent { .. } => Formula::VariationPercent,
            R::OriginalBeforeChange { .. } => Formula::OriginalBeforeChange,
            R::ApplyPercentChange { .. } => Formula::ApplyPercentChange,
            R::Derivative { .. } => Formula::CentralDifference,
            R::Integral { .. } => Formula::SimpsonRule,
            R::AffectiveCalories { .. } => Formula::AffectiveCalories,
            R::PizzaPerPerson { .. } => Formula::PizzaPerPerson,
            R::LifeInNumbers { .. } => Formula::LifeInNumbers,
            R::Temperature { .. } => Formula::TemperatureConversion,
            R::Length { .. } | R::DataSize { .. } => Formula::LinearUnitConversion,
            R::UptimeFromPercentage { .. } | R::UptimeFromDowntime { .. } => Formula::UptimeDowntime,
        }
    }

    /// Run the calculation.
    pub fn evaluate(&self) -> CalcResult<FormulaOutcome> {
        use FormulaOutcome as O;
        use FormulaRequest as R;

        debug!("evaluating {:?}", self.formula());

        let outcome = match self.clone() {
            R::TriangleBaseHeight { base, height, unit } => {
                O::Triangle(geometry::triangle_from_base_height(base, height, unit)?)
            }
            R::TriangleSides { a, b, c, unit } => O::Triangle(geometry::triangle_from_sides(a, b, c, unit)?),
            R::TriangleSas { a, b, angle_deg, unit } => {
                O::Triangle(geometry::triangle_from_two_sides_angle(a, b, angle_deg, unit)?)
            }
            R::RhombusDiagonals { d1, d2, unit } => O::Rhombus(geometry::rhombus_from_diagonals(d1, d2, unit)?),
            R::RhombusSideDiagonal { side, diagonal, unit } => {
                O::Rhombus(geometry::rhombus_from_side_diagonal(side, diagonal, unit)?)
            }
            R::Trapezoid {
                base_major,
                base_minor,
                height,
                legs,
                unit,
            } => O::Trapezoid(geometry::trapezoid(base_major, base_minor, height, legs, unit)?),
            R::Circle { radius, unit } => O::Circle(geometry::circle(radius, unit)?),

            R::KineticEnergy {
                mass,
                mass_unit,
                speed,
                speed_unit,
            } => O::KineticEnergy(physics::kinetic_energy(mass, mass_unit, speed, speed_unit)?),
            R::OhmsLaw {
                voltage,
                current,
                resistance,
            } => O::OhmsLaw(physics::ohms_law(voltage, current, resistance)?),
            R::Speed {
                distance,
                distance_unit,
                time,
                time_unit,
            } => O::Speed(physics::speed(distance, distance_unit, time, time_unit)?),
            R::Power {
                energy,
                energy_unit,
                time,
                time_unit,
            } => O::Power(physics::power(energy, energy_unit, time, time_unit)?),

            R::Molarity {
                solute_grams,
                molar_mass,
                volume_liters,
            } => O::Molarity(chemistry::molarity(solute_grams, molar_mass, volume_liters)?),
            R::Dilution { c1, v1, c2, v2 } => O::Dilution(chemistry::dilution(c1, v1, c2, v2)?),
            R::IdealGas {
                pressure_pa,
                volume_m3,
                moles,
                temperature_k,
            } => O::IdealGas(chemistry::ideal_gas(pressure_pa, volume_m3, moles, temperature_k)?),

            R::Amortization {
                principal,
                annual_rate_pct,
                years,
                periods_per_year,
            } => O::Amortization(finance::amortization(principal, annual_rate_pct, years, periods_per_year)?),
            R::FutureValue {
                present,
                annual_rate_pct,
                years,
                compounds_per_year,
                periodic_contribution,
            } => O::FutureValue(finance::future_value(
                present,
                annual_rate_pct,
                years,
                compounds_per_year,
                periodic_contribution,
            )?),
            R::PresentValue {
                future,
                annual_rate_pct,
                years,
                compounds_per_year,
            } => O::PresentValue(finance::present_value(future, annual_rate_pct, years, compounds_per_year)?),

            R::AddDays { date, days } => O::DateShift(calendar::add_days(date, days)?),
            R::SubtractDays { date, days } => O::DateShift(calendar::subtract_days(date, days)?),
            R::DaysBetween { start, end } => O::DaysBetween(calendar::days_between(start, end)?),
            R::LeapYear { year } => O::LeapYear {
                year,
                is_leap_year: calendar::is_leap_year(year),
            },

            R::ArabicToRoman { value } => O::Roman(roman::arabic_to_roman(value)),
            R::RomanToArabic { numeral } => O::Roman(roman::roman_to_arabic(&numeral)),
            R::FractionSimplify { numerator, denominator } => O::Fraction(fractions::simplify(numerator, denominator)?),
            R::FractionArithmetic { op, a, b, c, d } => O::Fraction(match op {
                FractionOp::Add => fractions::add(a, b, c, d)?,
                FractionOp::Subtract => fractions::subtract(a, b, c, d)?,
                FractionOp::Multiply => fractions::multiply(a, b, c, d)?,
                FractionOp::Divide => fractions::divide(a, b, c, d)?,
            }),

            R::PercentOfValue { percent, total } => O::Percentage(percentage::percent_of_value(percent, total)?),
            R::PercentageOf { part, total } => O::Percentage(percentage::percentage_of(part, total)?),
            R::VariationPercent { from, to } => O::Percentage(percentage::variation_percent(from, to)?),
            R::OriginalBeforeChange { final_value, percent } => {
                O::Percentage(percentage::original_before_change(final_value, percent)?)
            }
            R::ApplyPercentChange { value, percent } => O::Percentage(percentage::apply_percent_change(value, percent)?),

            R::Derivative { expression, x } => O::Derivative(calculus::derivative_at(&expression, x)?),
            R::Integral {
                expression,
                a,
                b,
                intervals,
            } => O::Integral(calculus::definite_integral(&expression, a, b, intervals)?),

            R::AffectiveCalories {
                activity,
                minutes,
                intensity,
            } => O::AffectiveCalories(curious::affective_calories(activity, minutes, intensity)?),
            R::PizzaPerPerson {
                adults,
                children,
                appetite,
                slices_per_pizza,
            } => O::Pizza(curious::pizza_per_person(adults, children, appetite, slices_per_pizza)?),
            R::LifeInNumbers { birth_date, today } => O::LifeInNumbers(curious::life_in_numbers(birth_date, today)?),

            R::Temperature { value, from, to } => O::Temperature(conversions::convert_temperature(value, from, to)?),
            R::Length { value, from, to } => O::Length(conversions::convert_length(value, from, to)?),
            R::DataSize { value, from, to } => O::DataSize(conversions::convert_data_size(value, from, to)?),
            R::UptimeFromPercentage { percent } => O::Uptime(uptime::uptime_from_percentage(percent)?),
            R::UptimeFromDowntime {
                downtime_seconds,
                period,
            } => O::Downtime(uptime::uptime_from_downtime(downtime_seconds, period)?),
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_json() {
        let json = r#"{"type": "triangle_sides", "a": 3, "b": 4, "c": 5}"#;
        let request: FormulaRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.formula(), Formula::TriangleHeron);
        match request.evaluate().unwrap() {
            FormulaOutcome::Triangle(t) => {
                assert_eq!(t.area, 6.0);
                assert!(t.is_right());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"type": "ohms_law", "voltage": 12, "resistance": 4}"#;
        let request: FormulaRequest = serde_json::from_str(json).unwrap();
        match request.evaluate().unwrap() {
            FormulaOutcome::OhmsLaw(r) => assert_eq!(r.current_a, 3.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_dates_and_strings() {
        let json = r#"{"type": "days_between", "start": "2024-01-01", "end": "2024-03-01"}"#;
        let request: FormulaRequest = serde_json::from_str(json).unwrap();
        match request.evaluate().unwrap() {
            FormulaOutcome::DaysBetween(d) => assert_eq!(d.total_days, 60),
            other => panic!("unexpected {:?}", other),
        }

        let request = FormulaRequest::RomanToArabic {
            numeral: "XIV".to_string(),
        };
        match request.evaluate().unwrap() {
            FormulaOutcome::Roman(r) => assert_eq!(r.arabic, 14),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_errors_propagate() {
        let request = FormulaRequest::Derivative {
            expression: "import os".to_string(),
            x: 1.0,
        };
        assert_eq!(request.evaluate().unwrap_err().error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = FormulaRequest::LeapYear { year: 2024 }.evaluate().unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["type"], "leap_year");
        assert_eq!(json["result"]["is_leap_year"], true);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"{"type": "eval", "code": "rm -rf /"}"#;
        assert!(serde_json::from_str::<FormulaRequest>(json).is_err());
    }
}
