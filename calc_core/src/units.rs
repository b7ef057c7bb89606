//! # Unit Types
//!
//! Type-safe wrappers for SI quantities plus the fixed conversion tables the
//! physics and conversion calculators normalize through.
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Every calculator normalizes to SI before computing, then converts back
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! Unit *tags* (what the user picked in a dropdown) are plain enums that
//! implement [`LinearUnit`]: one factor to the SI base unit per variant.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{LengthUnit, LinearUnit, Meters};
//!
//! let m = LengthUnit::Kilometer.to_base(1.5);
//! assert_eq!(m, 1500.0);
//!
//! let feet = LengthUnit::Meter.convert(1.0, LengthUnit::Foot);
//! assert!((feet - 3.28084).abs() < 1e-5);
//!
//! let d = Meters(2.0) + Meters(3.0);
//! assert_eq!(d.value(), 5.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// SI Quantities
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Time in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(pub f64);

/// Speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersPerSecond(pub f64);

/// Energy in joules
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Joules(pub f64);

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

impl Div<Seconds> for Meters {
    type Output = MetersPerSecond;
    fn div(self, rhs: Seconds) -> MetersPerSecond {
        MetersPerSecond(self.0 / rhs.0)
    }
}

impl Div<Seconds> for Joules {
    type Output = Watts;
    fn div(self, rhs: Seconds) -> Watts {
        Watts(self.0 / rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Seconds);
impl_arithmetic!(MetersPerSecond);
impl_arithmetic!(Joules);
impl_arithmetic!(Watts);

// ============================================================================
// Unit Tags
// ============================================================================

/// A unit that converts to its base unit by a single multiplicative factor.
pub trait LinearUnit: Copy {
    /// How many base units one of this unit is
    fn factor(self) -> f64;

    /// Short symbol for display ("km", "kWh")
    fn symbol(self) -> &'static str;

    /// Convert a value in this unit to the base unit
    fn to_base(self, value: f64) -> f64 {
        value * self.factor()
    }

    /// Convert a base-unit value into this unit
    fn from_base(self, value: f64) -> f64 {
        value / self.factor()
    }

    /// Convert a value in this unit into `to`
    fn convert(self, value: f64, to: Self) -> f64 {
        to.from_base(self.to_base(value))
    }
}

macro_rules! unit_table {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($factor:expr, $symbol:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants for UI selection
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl LinearUnit for $name {
            fn factor(self) -> f64 {
                match self {
                    $($name::$variant => $factor),+
                }
            }

            fn symbol(self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.symbol())
            }
        }
    };
}

unit_table! {
    /// Length units, base unit meter
    LengthUnit {
        Millimeter => (0.001, "mm"),
        Centimeter => (0.01, "cm"),
        Meter => (1.0, "m"),
        Kilometer => (1000.0, "km"),
        Inch => (0.0254, "in"),
        Foot => (0.3048, "ft"),
        Yard => (0.9144, "yd"),
        Mile => (1609.344, "mi"),
        NauticalMile => (1852.0, "nmi"),
    }
}

unit_table! {
    /// Mass units, base unit kilogram
    MassUnit {
        Gram => (0.001, "g"),
        Kilogram => (1.0, "kg"),
        Tonne => (1000.0, "t"),
        Ounce => (0.028_349_523_125, "oz"),
        Pound => (0.453_592_37, "lb"),
    }
}

unit_table! {
    /// Time units, base unit second
    TimeUnit {
        Second => (1.0, "s"),
        Minute => (60.0, "min"),
        Hour => (3600.0, "h"),
        Day => (86_400.0, "d"),
    }
}

unit_table! {
    /// Speed units, base unit meter per second
    SpeedUnit {
        MetersPerSecond => (1.0, "m/s"),
        KilometersPerHour => (1000.0 / 3600.0, "km/h"),
        MilesPerHour => (1609.344 / 3600.0, "mph"),
        Knot => (1852.0 / 3600.0, "kn"),
    }
}

unit_table! {
    /// Energy units, base unit joule
    EnergyUnit {
        Joule => (1.0, "J"),
        Kilojoule => (1000.0, "kJ"),
        Calorie => (4.184, "cal"),
        Kilocalorie => (4184.0, "kcal"),
        WattHour => (3600.0, "Wh"),
        KilowattHour => (3_600_000.0, "kWh"),
    }
}

unit_table! {
    /// Data size units, base unit byte. Decimal (kB) and binary (KiB) prefixes.
    DataUnit {
        Bit => (0.125, "bit"),
        Byte => (1.0, "B"),
        Kilobyte => (1e3, "kB"),
        Megabyte => (1e6, "MB"),
        Gigabyte => (1e9, "GB"),
        Terabyte => (1e12, "TB"),
        Kibibyte => (1024.0, "KiB"),
        Mebibyte => (1_048_576.0, "MiB"),
        Gibibyte => (1_073_741_824.0, "GiB"),
        Tebibyte => (1_099_511_627_776.0, "TiB"),
    }
}

/// Mechanical horsepower in watts
pub const WATTS_PER_HORSEPOWER: f64 = 745.699_871_582_270_2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversion() {
        assert_eq!(LengthUnit::Kilometer.to_base(2.0), 2000.0);
        let inches = LengthUnit::Foot.convert(1.0, LengthUnit::Inch);
        assert!((inches - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_speed_conversion() {
        let ms = SpeedUnit::KilometersPerHour.to_base(36.0);
        assert!((ms - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_data_units_binary_vs_decimal() {
        let kib_in_kb = DataUnit::Kibibyte.convert(1.0, DataUnit::Kilobyte);
        assert!((kib_in_kb - 1.024).abs() < 1e-12);
        assert_eq!(DataUnit::Byte.convert(1.0, DataUnit::Bit), 8.0);
    }

    #[test]
    fn test_quantity_division() {
        let v = Meters(100.0) / Seconds(20.0);
        assert_eq!(v, MetersPerSecond(5.0));
        let p = Joules(600.0) / Seconds(60.0);
        assert_eq!(p.value(), 10.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Kilograms(10.0);
        let b = Kilograms(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let unit = SpeedUnit::KilometersPerHour;
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, "\"kilometers_per_hour\"");

        let m = Meters(12.5);
        assert_eq!(serde_json::to_string(&m).unwrap(), "12.5");
    }

    #[test]
    fn test_all_lists_every_variant() {
        assert_eq!(MassUnit::ALL.len(), 5);
        assert!(TimeUnit::ALL.contains(&TimeUnit::Day));
    }
}
