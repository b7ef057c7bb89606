//! # Physics Formulas
//!
//! Kinetic energy, Ohm's law, average speed and mechanical power. Inputs
//! arrive with a unit tag; everything is normalized to SI through
//! [`crate::units`] before computing, and results carry the SI value plus
//! the alternative units the pages display.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_finite, ensure_non_negative, ensure_positive, fmt_num};
use crate::units::{
    EnergyUnit, Joules, Kilograms, LengthUnit, LinearUnit, MassUnit, Meters, MetersPerSecond, Seconds, SpeedUnit,
    TimeUnit, Watts, WATTS_PER_HORSEPOWER,
};

// ============================================================================
// Kinetic Energy
// ============================================================================

/// Kinetic energy with the usual display equivalents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KineticEnergyResult {
    pub mass_kg: Kilograms,
    pub speed_ms: MetersPerSecond,
    pub joules: Joules,
    pub kilojoules: f64,
    pub calories: f64,
    pub kilocalories: f64,
    pub watt_hours: f64,
    pub steps: Vec<String>,
}

/// `E = ½ m v²`
pub fn kinetic_energy(mass: f64, mass_unit: MassUnit, speed: f64, speed_unit: SpeedUnit) -> CalcResult<KineticEnergyResult> {
    ensure_positive("mass", mass)?;
    ensure_non_negative("speed", speed)?;

    let m = Kilograms(mass_unit.to_base(mass));
    let v = MetersPerSecond(speed_unit.to_base(speed));
    let e = 0.5 * m.value() * v.value() * v.value();

    Ok(KineticEnergyResult {
        mass_kg: m,
        speed_ms: v,
        joules: Joules(e),
        kilojoules: EnergyUnit::Kilojoule.from_base(e),
        calories: EnergyUnit::Calorie.from_base(e),
        kilocalories: EnergyUnit::Kilocalorie.from_base(e),
        watt_hours: EnergyUnit::WattHour.from_base(e),
        steps: vec![
            Formula::KineticEnergy.metadata().formula_plain.to_string(),
            format!("m = {} {} = {} kg", fmt_num(mass, 6), mass_unit.symbol(), fmt_num(m.value(), 6)),
            format!("v = {} {} = {} m/s", fmt_num(speed, 6), speed_unit.symbol(), fmt_num(v.value(), 6)),
            format!("E = 0.5 * {} * {}² = {} J", fmt_num(m.value(), 6), fmt_num(v.value(), 6), fmt_num(e, 6)),
        ],
    })
}

// ============================================================================
// Ohm's Law
// ============================================================================

/// Which of the three quantities the solver computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OhmsQuantity {
    Voltage,
    Current,
    Resistance,
}

/// Complete V/I/R triple plus dissipated power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhmsLawResult {
    pub voltage_v: f64,
    pub current_a: f64,
    pub resistance_ohm: f64,
    pub power_w: f64,
    pub solved_for: OhmsQuantity,
    pub steps: Vec<String>,
}

/// Solve `V = I·R` given exactly two of the three quantities.
///
/// # Errors
///
/// - `InvalidInput` unless exactly two values are supplied
/// - `DivisionByZero` when the divisor (current or resistance) is zero
pub fn ohms_law(voltage: Option<f64>, current: Option<f64>, resistance: Option<f64>) -> CalcResult<OhmsLawResult> {
    let given = [voltage, current, resistance].iter().filter(|v| v.is_some()).count();
    if given != 2 {
        return Err(CalcError::invalid_input(
            "ohms_law",
            given.to_string(),
            "Exactly two of voltage, current and resistance are required",
        ));
    }

    let formula = Formula::OhmsLaw.metadata().formula_plain;
    let (v, i, r, solved_for, step) = match (voltage, current, resistance) {
        (None, Some(i), Some(r)) => {
            ensure_finite("current", i)?;
            ensure_finite("resistance", r)?;
            let v = i * r;
            (v, i, r, OhmsQuantity::Voltage, format!("V = {} * {} = {} V", fmt_num(i, 6), fmt_num(r, 6), fmt_num(v, 6)))
        }
        (Some(v), None, Some(r)) => {
            ensure_finite("voltage", v)?;
            ensure_finite("resistance", r)?;
            if r == 0.0 {
                return Err(CalcError::division_by_zero("ohms_law", "resistance"));
            }
            let i = v / r;
            (v, i, r, OhmsQuantity::Current, format!("I = V / R = {} / {} = {} A", fmt_num(v, 6), fmt_num(r, 6), fmt_num(i, 6)))
        }
        (Some(v), Some(i), None) => {
            ensure_finite("voltage", v)?;
            ensure_finite("current", i)?;
            if i == 0.0 {
                return Err(CalcError::division_by_zero("ohms_law", "current"));
            }
            let r = v / i;
            (v, i, r, OhmsQuantity::Resistance, format!("R = V / I = {} / {} = {} ohm", fmt_num(v, 6), fmt_num(i, 6), fmt_num(r, 6)))
        }
        _ => {
            return Err(CalcError::Internal {
                message: "ohms_law reached an impossible input combination".to_string(),
            })
        }
    };

    let power = v * i;
    Ok(OhmsLawResult {
        voltage_v: v,
        current_a: i,
        resistance_ohm: r,
        power_w: power,
        solved_for,
        steps: vec![
            formula.to_string(),
            step,
            format!("{} = {} W", Formula::ElectricPower.metadata().formula_plain, fmt_num(power, 6)),
        ],
    })
}

// ============================================================================
// Speed
// ============================================================================

/// Average speed in the units shown on the speed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedResult {
    pub distance_m: Meters,
    pub time_s: Seconds,
    pub meters_per_second: MetersPerSecond,
    pub kilometers_per_hour: f64,
    pub miles_per_hour: f64,
    pub knots: f64,
    /// Minutes per kilometer, the pace runners use
    pub pace_min_per_km: Option<f64>,
    pub steps: Vec<String>,
}

/// `v = d / t`
pub fn speed(distance: f64, distance_unit: LengthUnit, time: f64, time_unit: TimeUnit) -> CalcResult<SpeedResult> {
    ensure_non_negative("distance", distance)?;
    ensure_non_negative("time", time)?;
    if time == 0.0 {
        return Err(CalcError::division_by_zero("speed", "time"));
    }

    let d = Meters(distance_unit.to_base(distance));
    let t = Seconds(time_unit.to_base(time));
    let v = d / t;
    let pace = if v.value() > 0.0 {
        Some(1000.0 / v.value() / 60.0)
    } else {
        None
    };

    Ok(SpeedResult {
        distance_m: d,
        time_s: t,
        meters_per_second: v,
        kilometers_per_hour: SpeedUnit::KilometersPerHour.from_base(v.value()),
        miles_per_hour: SpeedUnit::MilesPerHour.from_base(v.value()),
        knots: SpeedUnit::Knot.from_base(v.value()),
        pace_min_per_km: pace,
        steps: vec![
            Formula::AverageSpeed.metadata().formula_plain.to_string(),
            format!("v = {} m / {} s = {} m/s", fmt_num(d.value(), 6), fmt_num(t.value(), 6), fmt_num(v.value(), 6)),
        ],
    })
}

// ============================================================================
// Power
// ============================================================================

/// Mechanical power result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerResult {
    pub energy_j: Joules,
    pub time_s: Seconds,
    pub watts: Watts,
    pub kilowatts: f64,
    pub horsepower: f64,
    pub steps: Vec<String>,
}

/// `P = W / t`
pub fn power(energy: f64, energy_unit: EnergyUnit, time: f64, time_unit: TimeUnit) -> CalcResult<PowerResult> {
    ensure_non_negative("energy", energy)?;
    ensure_non_negative("time", time)?;
    if time == 0.0 {
        return Err(CalcError::division_by_zero("power", "time"));
    }

    let w = Joules(energy_unit.to_base(energy));
    let t = Seconds(time_unit.to_base(time));
    let p = w / t;

    Ok(PowerResult {
        energy_j: w,
        time_s: t,
        watts: p,
        kilowatts: p.value() / 1000.0,
        horsepower: p.value() / WATTS_PER_HORSEPOWER,
        steps: vec![
            Formula::MechanicalPower.metadata().formula_plain.to_string(),
            format!("P = {} J / {} s = {} W", fmt_num(w.value(), 6), fmt_num(t.value(), 6), fmt_num(p.value(), 6)),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kinetic_energy_si() {
        let r = kinetic_energy(2.0, MassUnit::Kilogram, 3.0, SpeedUnit::MetersPerSecond).unwrap();
        assert_eq!(r.joules, Joules(9.0));
        assert_relative_eq!(r.kilocalories, 9.0 / 4184.0, max_relative = 1e-12);
    }

    #[test]
    fn test_kinetic_energy_normalizes_units() {
        // 1000 kg at 36 km/h = 10 m/s -> 50 kJ
        let r = kinetic_energy(1.0, MassUnit::Tonne, 36.0, SpeedUnit::KilometersPerHour).unwrap();
        assert_relative_eq!(r.kilojoules, 50.0, max_relative = 1e-12);
        assert!(kinetic_energy(0.0, MassUnit::Kilogram, 1.0, SpeedUnit::MetersPerSecond).is_err());
    }

    #[test]
    fn test_ohms_law_each_direction() {
        let v = ohms_law(None, Some(2.0), Some(5.0)).unwrap();
        assert_eq!(v.voltage_v, 10.0);
        assert_eq!(v.solved_for, OhmsQuantity::Voltage);
        assert_eq!(v.power_w, 20.0);

        let i = ohms_law(Some(12.0), None, Some(4.0)).unwrap();
        assert_eq!(i.current_a, 3.0);

        let r = ohms_law(Some(9.0), Some(3.0), None).unwrap();
        assert_eq!(r.resistance_ohm, 3.0);
    }

    #[test]
    fn test_ohms_law_requires_two_values() {
        assert_eq!(ohms_law(Some(1.0), None, None).unwrap_err().error_code(), "INVALID_INPUT");
        assert!(ohms_law(None, None, None).is_err());
        assert!(ohms_law(Some(1.0), Some(1.0), Some(1.0)).is_err());
    }

    #[test]
    fn test_ohms_law_zero_divisor() {
        assert_eq!(ohms_law(Some(5.0), None, Some(0.0)).unwrap_err().error_code(), "DIVISION_BY_ZERO");
        assert_eq!(ohms_law(Some(5.0), Some(0.0), None).unwrap_err().error_code(), "DIVISION_BY_ZERO");
    }

    #[test]
    fn test_speed() {
        let r = speed(10.0, LengthUnit::Kilometer, 1.0, TimeUnit::Hour).unwrap();
        assert_relative_eq!(r.kilometers_per_hour, 10.0, max_relative = 1e-12);
        assert_relative_eq!(r.pace_min_per_km.unwrap(), 6.0, max_relative = 1e-12);
        assert!(speed(10.0, LengthUnit::Meter, 0.0, TimeUnit::Second).is_err());
    }

    #[test]
    fn test_power() {
        let r = power(1.0, EnergyUnit::KilowattHour, 1.0, TimeUnit::Hour).unwrap();
        assert_relative_eq!(r.kilowatts, 1.0, max_relative = 1e-12);
        assert_relative_eq!(r.horsepower, 1000.0 / WATTS_PER_HORSEPOWER, max_relative = 1e-12);
    }
}
