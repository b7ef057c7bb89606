//! # Formula Registry
//!
//! Central registry of every formula the calculator pages use. Each formula
//! has metadata: a display name, the plain-text formula that step traces
//! quote, its variables, and the function implementing it.
//!
//! ## Usage
//!
//! ```rust
//! use calc_core::formulas::registry::Formula;
//!
//! let meta = Formula::TriangleHeron.metadata();
//! assert_eq!(meta.formula_plain, "A = sqrt(s(s-a)(s-b)(s-c)), s = (a+b+c)/2");
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Formula Categories
// ============================================================================

/// Categories for grouping formulas in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaCategory {
    Geometry,
    Physics,
    Chemistry,
    Finance,
    Calendar,
    Percentages,
    /// Fractions and numeral systems
    Arithmetic,
    Calculus,
    /// Heuristic "curious facts" calculators
    CuriousFacts,
    /// Unit conversions and availability figures
    Conversions,
}

impl FormulaCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaCategory::Geometry => "Geometry",
            FormulaCategory::Physics => "Physics",
            FormulaCategory::Chemistry => "Chemistry",
            FormulaCategory::Finance => "Finance",
            FormulaCategory::Calendar => "Calendar",
            FormulaCategory::Percentages => "Percentages",
            FormulaCategory::Arithmetic => "Arithmetic",
            FormulaCategory::Calculus => "Calculus",
            FormulaCategory::CuriousFacts => "Curious Facts",
            FormulaCategory::Conversions => "Conversions",
        }
    }

    /// Sort order in the catalog
    pub fn sort_order(&self) -> u8 {
        match self {
            FormulaCategory::Geometry => 0,
            FormulaCategory::Physics => 1,
            FormulaCategory::Chemistry => 2,
            FormulaCategory::Finance => 3,
            FormulaCategory::Percentages => 4,
            FormulaCategory::Arithmetic => 5,
            FormulaCategory::Calendar => 6,
            FormulaCategory::Calculus => 7,
            FormulaCategory::Conversions => 8,
            FormulaCategory::CuriousFacts => 9,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in a formula.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "m", "v", "A")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "kg", "m/s", "%"), empty when dimensionless
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Formula Metadata
// ============================================================================

/// Complete metadata for one formula.
#[derive(Debug, Clone)]
pub struct FormulaMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// What the formula computes
    pub description: &'static str,
    /// The formula in plain text, quoted by result step traces
    pub formula_plain: &'static str,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Category for grouping in the catalog
    pub category: FormulaCategory,
    /// Source module where the implementation lives
    pub source_module: &'static str,
    /// Function implementing the formula
    pub source_function: &'static str,
}

// ============================================================================
// Formula Enum
// ============================================================================

/// Every formula exposed by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Formula {
    // Geometry
    TriangleBaseHeight,
    TriangleHeron,
    TriangleSas,
    RhombusDiagonals,
    RhombusSideDiagonal,
    TrapezoidArea,
    CircleArea,
    // Physics
    KineticEnergy,
    OhmsLaw,
    ElectricPower,
    AverageSpeed,
    MechanicalPower,
    // Chemistry
    Molarity,
    Dilution,
    IdealGasLaw,
    // Finance
    AnnuityPayment,
    FutureValue,
    PresentValue,
    // Calendar
    DateShift,
    DaysBetween,
    // Percentages
    PercentOfValue,
    PercentageOf,
    VariationPercent,
    OriginalBeforeChange,
    ApplyPercentChange,
    // Arithmetic
    FractionSimplify,
    RomanNumerals,
    // Calculus
    CentralDifference,
    SimpsonRule,
    // Curious facts
    AffectiveCalories,
    PizzaPerPerson,
    LifeInNumbers,
    // Conversions
    TemperatureConversion,
    LinearUnitConversion,
    UptimeDowntime,
}

impl Formula {
    /// Get the full metadata for this formula
    pub fn metadata(&self) -> FormulaMetadata {
        use FormulaCategory as C;
        match self {
            Formula::TriangleBaseHeight => FormulaMetadata {
                name: "Triangle Area (Base and Height)",
                description: "Area of a triangle from one side and the height onto it",
                formula_plain: "A = b * h / 2",
                variables: vec![
                    Variable::new("b", "Base", "length"),
                    Variable::new("h", "Height onto the base", "length"),
                    Variable::new("A", "Area", "length^2"),
                ],
                category: C::Geometry,
                source_module: "formulas/geometry.rs",
                source_function: "triangle_from_base_height",
            },
            Formula::TriangleHeron => FormulaMetadata {
                name: "Triangle Area (Heron)",
                description: "Area of a triangle from its three sides",
                formula_plain: "A = sqrt(s(s-a)(s-b)(s-c)), s = (a+b+c)/2",
                variables: vec![
                    Variable::new("a, b, c", "Sides", "length"),
                    Variable::new("s", "Semi-perimeter", "length"),
                    Variable::new("A", "Area", "length^2"),
                ],
                category: C::Geometry,
                source_module: "formulas/geometry.rs",
                source_function: "triangle_from_sides",
            },
            Formula::TriangleSas => FormulaMetadata {
                name: "Triangle Area (Two Sides and Included Angle)",
                description: "Area and third side from two sides and the angle between them",
                formula_plain: "A = a * b * sin(C) / 2, c^2 = a^2 + b^2 - 2ab cos(C)",
                variables: vec![
                    Variable::new("a, b", "Known sides", "length"),
                    Variable::new("C", "Included angle", "deg"),
                ],
                category: C::Geometry,
                source_module: "formulas/geometry.rs",
                source_function: "triangle_from_two_sides_angle",
            },
            Formula::RhombusDiagonals => FormulaMetadata {
                name: "Rhombus Area (Diagonals)",
                description: "Area and side of a rhombus from its diagonals",
                formula_plain: "A = D * d / 2, side = sqrt((D/2)^2 + (d/2)^2)",
                variables: vec![
                    Variable::new("D", "Major diagonal", "length"),
                    Variable::new("d", "Minor diagonal", "length"),
                ],
                category: C::Geometry,
                source_module: "formulas/geometry.rs",
                source_function: "rhombus_from_diagonals",
            },
            Formula::RhombusSideDiagonal => FormulaMetadata {
                name: "Rhombus Area (Side and Diagonal)",
                description: "Recovers the second diagonal from a side and one diagonal",
                formula_plain: "d2 = 2 * sqrt(s^2 - (d1/2)^2), A = d1 * d2 / 2",
                variables: vec![
                    Variable::new("s", "Side", "length"),
                    Variable::new("d1", "Known diagonal", "length"),
                ],
                category: C::Geometry,
                source_module: "formulas/geometry.rs",
                source_function: "rhombus_from_side_diagonal",
            },
            Formula::TrapezoidArea => FormulaMetadata {
                name: "Trapezoid Area",
                description: "Area of a trapezoid from both bases and the height",
                formula_plain: "A = (B + b) * h / 2",
                variables: vec![
                    Variable::new("B", "Major base", "length"),
                    Variable::new("b", "Minor base", "length"),
                    Variable::new("h", "Height", "length"),
                ],
                category: C::Geometry,
                source_module: "formulas/geometry.rs",
                source_function: "trapezoid",
            },
            Formula::CircleArea => FormulaMetadata {
                name: "Circle Area and Circumference",
                description: "Area, diameter and circumference of a circle",
                formula_plain: "A = pi * r^2, C = 2 * pi * r",
                variables: vec![Variable::new("r", "Radius", "length")],
                category: C::Geometry,
                source_module: "formulas/geometry.rs",
                source_function: "circle",
            },
            Formula::KineticEnergy => FormulaMetadata {
                name: "Kinetic Energy",
                description: "Energy of a body in translational motion",
                formula_plain: "E = m * v^2 / 2",
                variables: vec![
                    Variable::new("m", "Mass", "kg"),
                    Variable::new("v", "Speed", "m/s"),
                    Variable::new("E", "Kinetic energy", "J"),
                ],
                category: C::Physics,
                source_module: "formulas/physics.rs",
                source_function: "kinetic_energy",
            },
            Formula::OhmsLaw => FormulaMetadata {
                name: "Ohm's Law",
                description: "Solves voltage, current or resistance from the other two",
                formula_plain: "V = I * R",
                variables: vec![
                    Variable::new("V", "Voltage", "V"),
                    Variable::new("I", "Current", "A"),
                    Variable::new("R", "Resistance", "ohm"),
                ],
                category: C::Physics,
                source_module: "formulas/physics.rs",
                source_function: "ohms_law",
            },
            Formula::ElectricPower => FormulaMetadata {
                name: "Electric Power",
                description: "Power dissipated in a resistive circuit",
                formula_plain: "P = V * I",
                variables: vec![Variable::new("P", "Power", "W")],
                category: C::Physics,
                source_module: "formulas/physics.rs",
                source_function: "ohms_law",
            },
            Formula::AverageSpeed => FormulaMetadata {
                name: "Average Speed",
                description: "Distance covered per unit time",
                formula_plain: "v = d / t",
                variables: vec![
                    Variable::new("d", "Distance", "m"),
                    Variable::new("t", "Time", "s"),
                ],
                category: C::Physics,
                source_module: "formulas/physics.rs",
                source_function: "speed",
            },
            Formula::MechanicalPower => FormulaMetadata {
                name: "Mechanical Power",
                description: "Work done per unit time",
                formula_plain: "P = W / t",
                variables: vec![
                    Variable::new("W", "Work or energy", "J"),
                    Variable::new("t", "Time", "s"),
                ],
                category: C::Physics,
                source_module: "formulas/physics.rs",
                source_function: "power",
            },
            Formula::Molarity => FormulaMetadata {
                name: "Molarity",
                description: "Moles of solute per liter of solution",
                formula_plain: "n = m / M, c = n / V",
                variables: vec![
                    Variable::new("m", "Solute mass", "g"),
                    Variable::new("M", "Molar mass", "g/mol"),
                    Variable::new("V", "Solution volume", "L"),
                ],
                category: C::Chemistry,
                source_module: "formulas/chemistry.rs",
                source_function: "molarity",
            },
            Formula::Dilution => FormulaMetadata {
                name: "Dilution",
                description: "Conservation of solute when diluting",
                formula_plain: "C1 * V1 = C2 * V2",
                variables: vec![
                    Variable::new("C1, V1", "Initial concentration and volume", ""),
                    Variable::new("C2, V2", "Final concentration and volume", ""),
                ],
                category: C::Chemistry,
                source_module: "formulas/chemistry.rs",
                source_function: "dilution",
            },
            Formula::IdealGasLaw => FormulaMetadata {
                name: "Ideal Gas Law",
                description: "State equation of an ideal gas",
                formula_plain: "P * V = n * R * T",
                variables: vec![
                    Variable::new("P", "Pressure", "Pa"),
                    Variable::new("V", "Volume", "m^3"),
                    Variable::new("n", "Amount of substance", "mol"),
                    Variable::new("T", "Temperature", "K"),
                ],
                category: C::Chemistry,
                source_module: "formulas/chemistry.rs",
                source_function: "ideal_gas",
            },
            Formula::AnnuityPayment => FormulaMetadata {
                name: "Loan Payment (French Amortization)",
                description: "Constant periodic payment that repays a loan",
                formula_plain: "PMT = P * r / (1 - (1 + r)^-n)",
                variables: vec![
                    Variable::new("P", "Principal", "currency"),
                    Variable::new("r", "Periodic rate", ""),
                    Variable::new("n", "Number of periods", ""),
                ],
                category: C::Finance,
                source_module: "formulas/finance.rs",
                source_function: "amortization",
            },
            Formula::FutureValue => FormulaMetadata {
                name: "Future Value",
                description: "Compound growth with optional periodic contributions",
                formula_plain: "FV = PV * (1 + r)^n + PMT * ((1 + r)^n - 1) / r",
                variables: vec![
                    Variable::new("PV", "Present value", "currency"),
                    Variable::new("PMT", "Contribution per period", "currency"),
                ],
                category: C::Finance,
                source_module: "formulas/finance.rs",
                source_function: "future_value",
            },
            Formula::PresentValue => FormulaMetadata {
                name: "Present Value",
                description: "Discounts a future amount to today",
                formula_plain: "PV = FV / (1 + r)^n",
                variables: vec![Variable::new("FV", "Future value", "currency")],
                category: C::Finance,
                source_module: "formulas/finance.rs",
                source_function: "present_value",
            },
            Formula::DateShift => FormulaMetadata {
                name: "Add or Subtract Days",
                description: "Shifts a date by a number of days across months and leap years",
                formula_plain: "date' = date + n days",
                variables: vec![Variable::new("n", "Day count", "d")],
                category: C::Calendar,
                source_module: "formulas/calendar.rs",
                source_function: "add_days",
            },
            Formula::DaysBetween => FormulaMetadata {
                name: "Days Between Dates",
                description: "Elapsed days with a years/months/days breakdown",
                formula_plain: "total = |end - start|, total = 7 * weeks + days",
                variables: vec![],
                category: C::Calendar,
                source_module: "formulas/calendar.rs",
                source_function: "days_between",
            },
            Formula::PercentOfValue => FormulaMetadata {
                name: "Percent of a Value",
                description: "X% of Y",
                formula_plain: "result = X * Y / 100",
                variables: vec![],
                category: C::Percentages,
                source_module: "formulas/percentage.rs",
                source_function: "percent_of_value",
            },
            Formula::PercentageOf => FormulaMetadata {
                name: "Percentage of a Total",
                description: "X is what percent of Y",
                formula_plain: "result = X / Y * 100",
                variables: vec![],
                category: C::Percentages,
                source_module: "formulas/percentage.rs",
                source_function: "percentage_of",
            },
            Formula::VariationPercent => FormulaMetadata {
                name: "Percent Change",
                description: "Relative change from A to B",
                formula_plain: "result = (B - A) / |A| * 100",
                variables: vec![],
                category: C::Percentages,
                source_module: "formulas/percentage.rs",
                source_function: "variation_percent",
            },
            Formula::OriginalBeforeChange => FormulaMetadata {
                name: "Value Before a Percent Change",
                description: "Recovers the original from a final value and a known change",
                formula_plain: "original = final / (1 + p / 100)",
                variables: vec![],
                category: C::Percentages,
                source_module: "formulas/percentage.rs",
                source_function: "original_before_change",
            },
            Formula::ApplyPercentChange => FormulaMetadata {
                name: "Apply a Percent Change",
                description: "Increases or decreases a value by a percentage",
                formula_plain: "result = value * (1 + p / 100)",
                variables: vec![],
                category: C::Percentages,
                source_module: "formulas/percentage.rs",
                source_function: "apply_percent_change",
            },
            Formula::FractionSimplify => FormulaMetadata {
                name: "Fraction Simplification",
                description: "Reduces a fraction by the greatest common divisor",
                formula_plain: "a/b = (a/gcd(a,b)) / (b/gcd(a,b))",
                variables: vec![],
                category: C::Arithmetic,
                source_module: "formulas/fractions.rs",
                source_function: "simplify",
            },
            Formula::RomanNumerals => FormulaMetadata {
                name: "Roman Numerals",
                description: "Arabic to Roman and back, 1 to 3999",
                formula_plain: "M=1000 CM=900 D=500 CD=400 C=100 XC=90 L=50 XL=40 X=10 IX=9 V=5 IV=4 I=1",
                variables: vec![],
                category: C::Arithmetic,
                source_module: "formulas/roman.rs",
                source_function: "arabic_to_roman",
            },
            Formula::CentralDifference => FormulaMetadata {
                name: "Derivative at a Point",
                description: "Symbolic derivative checked against a central difference",
                formula_plain: "f'(x) ~ (f(x + h) - f(x - h)) / (2h)",
                variables: vec![Variable::new("h", "Step", "")],
                category: C::Calculus,
                source_module: "formulas/calculus/mod.rs",
                source_function: "derivative_at",
            },
            Formula::SimpsonRule => FormulaMetadata {
                name: "Definite Integral (Simpson)",
                description: "Composite Simpson's rule over an even number of intervals",
                formula_plain: "I ~ h/3 * (f0 + 4f1 + 2f2 + ... + 4f(n-1) + fn)",
                variables: vec![Variable::new("n", "Intervals (even)", "")],
                category: C::Calculus,
                source_module: "formulas/calculus/mod.rs",
                source_function: "definite_integral",
            },
            Formula::AffectiveCalories => FormulaMetadata {
                name: "Affective Calories",
                description: "Approximate energy spent kissing, hugging, laughing...",
                formula_plain: "kcal = base(activity) * minutes * intensity_factor",
                variables: vec![],
                category: C::CuriousFacts,
                source_module: "formulas/curious.rs",
                source_function: "affective_calories",
            },
            Formula::PizzaPerPerson => FormulaMetadata {
                name: "Pizza per Person",
                description: "How many pizzas to order for a group",
                formula_plain: "pizzas = ceil((adults + children * k) * slices(appetite) / slices_per_pizza)",
                variables: vec![],
                category: C::CuriousFacts,
                source_module: "formulas/curious.rs",
                source_function: "pizza_per_person",
            },
            Formula::LifeInNumbers => FormulaMetadata {
                name: "Life in Numbers",
                description: "Days lived, heartbeats and breaths since a birth date",
                formula_plain: "beats = minutes_lived * bpm",
                variables: vec![],
                category: C::CuriousFacts,
                source_module: "formulas/curious.rs",
                source_function: "life_in_numbers",
            },
            Formula::TemperatureConversion => FormulaMetadata {
                name: "Temperature Conversion",
                description: "Celsius, Fahrenheit and Kelvin",
                formula_plain: "F = C * 9/5 + 32, K = C + 273.15",
                variables: vec![],
                category: C::Conversions,
                source_module: "formulas/conversions.rs",
                source_function: "convert_temperature",
            },
            Formula::LinearUnitConversion => FormulaMetadata {
                name: "Unit Conversion",
                description: "Any unit pair sharing a base unit",
                formula_plain: "y = x * factor(from) / factor(to)",
                variables: vec![],
                category: C::Conversions,
                source_module: "formulas/conversions.rs",
                source_function: "convert_length",
            },
            Formula::UptimeDowntime => FormulaMetadata {
                name: "Uptime and Downtime",
                description: "Allowed downtime for an availability target",
                formula_plain: "downtime = period * (1 - uptime / 100)",
                variables: vec![],
                category: C::Conversions,
                source_module: "formulas/uptime.rs",
                source_function: "uptime_from_percentage",
            },
        }
    }

    /// Get all formulas in a given category
    pub fn in_category(category: FormulaCategory) -> Vec<Formula> {
        ALL_FORMULAS
            .iter()
            .filter(|f| f.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories that contain at least one formula, in catalog order
    pub fn all_categories() -> Vec<FormulaCategory> {
        let mut cats: Vec<FormulaCategory> = Vec::new();
        for f in ALL_FORMULAS {
            let cat = f.metadata().category;
            if !cats.contains(&cat) {
                cats.push(cat);
            }
        }
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All formulas in the registry (for iteration)
pub static ALL_FORMULAS: &[Formula] = &[
    Formula::TriangleBaseHeight,
    Formula::TriangleHeron,
    Formula::TriangleSas,
    Formula::RhombusDiagonals,
    Formula::RhombusSideDiagonal,
    Formula::TrapezoidArea,
    Formula::CircleArea,
    Formula::KineticEnergy,
    Formula::OhmsLaw,
    Formula::ElectricPower,
    Formula::AverageSpeed,
    Formula::MechanicalPower,
    Formula::Molarity,
    Formula::Dilution,
    Formula::IdealGasLaw,
    Formula::AnnuityPayment,
    Formula::FutureValue,
    Formula::PresentValue,
    Formula::DateShift,
    Formula::DaysBetween,
    Formula::PercentOfValue,
    Formula::PercentageOf,
    Formula::VariationPercent,
    Formula::OriginalBeforeChange,
    Formula::ApplyPercentChange,
    Formula::FractionSimplify,
    Formula::RomanNumerals,
    Formula::CentralDifference,
    Formula::SimpsonRule,
    Formula::AffectiveCalories,
    Formula::PizzaPerPerson,
    Formula::LifeInNumbers,
    Formula::TemperatureConversion,
    Formula::LinearUnitConversion,
    Formula::UptimeDowntime,
];

// ============================================================================
// Markdown Catalog Generation
// ============================================================================

/// Generate the FORMULAS.md catalog from the registry.
///
/// ```rust
/// use calc_core::formulas::registry::generate_formula_catalog_markdown;
///
/// let markdown = generate_formula_catalog_markdown();
/// assert!(markdown.contains("# Formula Catalog"));
/// assert!(markdown.contains("## Geometry"));
/// ```
pub fn generate_formula_catalog_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Formula Catalog

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-formulas`

Every formula behind the calculator pages, with the plain-text form that
result step traces quote and the function that implements it.

---

"#,
    );

    let categories = Formula::all_categories();

    for category in &categories {
        output.push_str(&format!("## {}\n\n", category.display_name()));

        for formula in Formula::in_category(*category) {
            let meta = formula.metadata();
            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n---\n\n",
                meta.source_function,
                meta.source_module.trim_start_matches("formulas/")
            ));
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Formulas:** {}\n- **Categories:** {}\n",
        ALL_FORMULAS.len(),
        categories.len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_formula_has_metadata() {
        for f in ALL_FORMULAS {
            let meta = f.metadata();
            assert!(!meta.name.is_empty(), "{:?} missing name", f);
            assert!(!meta.formula_plain.is_empty(), "{:?} missing formula", f);
            assert!(meta.source_module.starts_with("formulas/"), "{:?} bad source module", f);
            assert!(!meta.source_function.is_empty(), "{:?} missing source function", f);
        }
    }

    #[test]
    fn test_categories_sorted_and_complete() {
        let cats = Formula::all_categories();
        assert_eq!(cats.len(), 10);
        assert_eq!(cats[0], FormulaCategory::Geometry);
        assert_eq!(Formula::in_category(FormulaCategory::Geometry).len(), 7);
    }

    #[test]
    fn test_generate_catalog() {
        let markdown = generate_formula_catalog_markdown();
        assert!(markdown.contains("### Triangle Area (Heron)"));
        assert!(markdown.contains("`V = I * R`"));
        assert!(markdown.contains("**Total Formulas:** 35"));
        assert!(markdown.contains("**Categories:** 10"));
        assert!(markdown.contains("formulas/percentage.rs"));
    }
}
