//! # Unit Conversions
//!
//! Temperature is affine and gets its own function; every other quantity
//! converts through [`LinearUnit`] factors.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_finite, ensure_non_negative, fmt_num};
use crate::units::{DataUnit, LengthUnit, LinearUnit};

/// Absolute zero in Celsius
pub const ABSOLUTE_ZERO_C: f64 = -273.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureUnit::Kelvin => value + ABSOLUTE_ZERO_C,
        }
    }

    fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => celsius - ABSOLUTE_ZERO_C,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    pub value: f64,
    pub from: TemperatureUnit,
    pub to: TemperatureUnit,
    pub result: f64,
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
    pub steps: Vec<String>,
}

/// Convert a temperature.
///
/// # Errors
///
/// `DomainError` when the input lies below absolute zero.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> CalcResult<TemperatureResult> {
    ensure_finite("value", value)?;
    let celsius = from.to_celsius(value);
    let kelvin = TemperatureUnit::Kelvin.from_celsius(celsius);
    if kelvin < 0.0 {
        return Err(CalcError::domain(
            "convert_temperature",
            format!("{} {} is below absolute zero", fmt_num(value, 4), from.symbol()),
        ));
    }
    let result = to.from_celsius(celsius);

    Ok(TemperatureResult {
        value,
        from,
        to,
        result,
        celsius,
        fahrenheit: TemperatureUnit::Fahrenheit.from_celsius(celsius),
        kelvin,
        steps: vec![
            Formula::TemperatureConversion.metadata().formula_plain.to_string(),
            format!("{} {} = {} °C", fmt_num(value, 4), from.symbol(), fmt_num(celsius, 4)),
            format!("{} °C = {} {}", fmt_num(celsius, 4), fmt_num(result, 4), to.symbol()),
        ],
    })
}

/// Result of a factor-based conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult<U> {
    pub value: f64,
    pub from: U,
    pub to: U,
    pub result: f64,
    /// Multiplier from `from` to `to`
    pub factor: f64,
    pub steps: Vec<String>,
}

/// Convert between any two units of the same table.
pub fn convert<U: LinearUnit>(value: f64, from: U, to: U) -> CalcResult<ConversionResult<U>> {
    ensure_finite("value", value)?;
    let factor = from.factor() / to.factor();
    let result = from.convert(value, to);
    Ok(ConversionResult {
        value,
        from,
        to,
        result,
        factor,
        steps: vec![
            Formula::LinearUnitConversion.metadata().formula_plain.to_string(),
            format!(
                "{} {} * {} = {} {}",
                fmt_num(value, 6),
                from.symbol(),
                fmt_num(factor, 10),
                fmt_num(result, 6),
                to.symbol()
            ),
        ],
    })
}

pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> CalcResult<ConversionResult<LengthUnit>> {
    convert(value, from, to)
}

/// Data sizes cannot be negative.
pub fn convert_data_size(value: f64, from: DataUnit, to: DataUnit) -> CalcResult<ConversionResult<DataUnit>> {
    ensure_non_negative("value", value)?;
    convert(value, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_temperature_fixed_points() {
        let r = convert_temperature(100.0, TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit).unwrap();
        assert_relative_eq!(r.result, 212.0, max_relative = 1e-12);
        assert_relative_eq!(r.kelvin, 373.15, max_relative = 1e-12);

        let r = convert_temperature(-40.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius).unwrap();
        assert_relative_eq!(r.result, -40.0, max_relative = 1e-12);

        let r = convert_temperature(0.0, TemperatureUnit::Kelvin, TemperatureUnit::Celsius).unwrap();
        assert_relative_eq!(r.result, -273.15, max_relative = 1e-12);
    }

    #[test]
    fn test_below_absolute_zero() {
        assert_eq!(
            convert_temperature(-300.0, TemperatureUnit::Celsius, TemperatureUnit::Kelvin)
                .unwrap_err()
                .error_code(),
            "DOMAIN_ERROR"
        );
        assert!(convert_temperature(-1.0, TemperatureUnit::Kelvin, TemperatureUnit::Celsius).is_err());
        assert!(convert_temperature(-500.0, TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius).is_err());
    }

    #[test]
    fn test_length() {
        let r = convert_length(1.0, LengthUnit::Mile, LengthUnit::Kilometer).unwrap();
        assert_relative_eq!(r.result, 1.609344, max_relative = 1e-12);
        assert_eq!(convert_length(5.0, LengthUnit::Meter, LengthUnit::Meter).unwrap().result, 5.0);
    }

    #[test]
    fn test_data_size_decimal_vs_binary() {
        let r = convert_data_size(1.0, DataUnit::Gibibyte, DataUnit::Megabyte).unwrap();
        assert_relative_eq!(r.result, 1073.741824, max_relative = 1e-12);
        let r = convert_data_size(1.0, DataUnit::Byte, DataUnit::Bit).unwrap();
        assert_eq!(r.result, 8.0);
        assert!(convert_data_size(-1.0, DataUnit::Byte, DataUnit::Bit).is_err());
    }
}
