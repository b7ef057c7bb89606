//! # Plane Geometry
//!
//! Triangle, rhombus, trapezoid and circle calculators. Every function
//! validates that the measurements describe a real shape: a triangle whose
//! sides only just touch (a + b == c) is rejected, never returned as a
//! zero-area result.
//!
//! All linear outputs are in the caller's `LengthUnit`; areas are in that
//! unit squared.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::formulas::geometry::triangle_from_sides;
//! use calc_core::units::LengthUnit;
//!
//! let t = triangle_from_sides(3.0, 4.0, 5.0, LengthUnit::Centimeter).unwrap();
//! assert!((t.area - 6.0).abs() < 1e-12);
//! assert!(t.is_right());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{approx_eq, ensure_positive, fmt_num};
use crate::units::{LengthUnit, LinearUnit};

/// Relative tolerance for closing checks (right angles, trapezoid legs)
const SHAPE_TOLERANCE: f64 = 1e-9;

/// Side-length classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideKind {
    Equilateral,
    Isosceles,
    Scalene,
}

/// Largest-angle classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleKind {
    Acute,
    Right,
    Obtuse,
}

/// Which inputs produced a triangle result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleMethod {
    BaseHeight,
    ThreeSides,
    TwoSidesAngle,
}

/// Result of any triangle calculator.
///
/// `sides`, `perimeter`, `angles_deg` and the classifications are only
/// known when the three sides are (not for the base-height method).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleResult {
    pub method: TriangleMethod,
    pub unit: LengthUnit,
    pub area: f64,
    /// Side taken as the base
    pub base: f64,
    /// Height onto `base`
    pub height: f64,
    pub sides: Option<[f64; 3]>,
    pub perimeter: Option<f64>,
    /// Angles opposite to sides a, b, c
    pub angles_deg: Option<[f64; 3]>,
    pub side_kind: Option<SideKind>,
    pub angle_kind: Option<AngleKind>,
    pub steps: Vec<String>,
}

impl TriangleResult {
    /// True for a right triangle (only known with three sides)
    pub fn is_right(&self) -> bool {
        self.angle_kind == Some(AngleKind::Right)
    }
}

/// Triangle from a base and the height onto it: `A = b*h/2`.
pub fn triangle_from_base_height(base: f64, height: f64, unit: LengthUnit) -> CalcResult<TriangleResult> {
    ensure_positive("base", base)?;
    ensure_positive("height", height)?;

    let area = base * height / 2.0;
    let u = unit.symbol();

    Ok(TriangleResult {
        method: TriangleMethod::BaseHeight,
        unit,
        area,
        base,
        height,
        sides: None,
        perimeter: None,
        angles_deg: None,
        side_kind: None,
        angle_kind: None,
        steps: vec![
            Formula::TriangleBaseHeight.metadata().formula_plain.to_string(),
            format!("A = {} * {} / 2", fmt_num(base, 6), fmt_num(height, 6)),
            format!("A = {} {}²", fmt_num(area, 6), u),
        ],
    })
}

/// Check the strict triangle inequality for all three pairs.
fn check_triangle_inequality(a: f64, b: f64, c: f64) -> CalcResult<()> {
    let pairs = [(a, b, c, "a + b", "c"), (a, c, b, "a + c", "b"), (b, c, a, "b + c", "a")];
    for (x, y, z, sum_label, side_label) in pairs {
        if x + y <= z {
            return Err(CalcError::domain(
                "triangle",
                format!(
                    "{} = {} must be greater than {} = {}",
                    sum_label,
                    fmt_num(x + y, 6),
                    side_label,
                    fmt_num(z, 6)
                ),
            ));
        }
    }
    Ok(())
}

fn classify_sides(a: f64, b: f64, c: f64) -> SideKind {
    let ab = approx_eq(a, b, SHAPE_TOLERANCE);
    let bc = approx_eq(b, c, SHAPE_TOLERANCE);
    let ac = approx_eq(a, c, SHAPE_TOLERANCE);
    if ab && bc {
        SideKind::Equilateral
    } else if ab || bc || ac {
        SideKind::Isosceles
    } else {
        SideKind::Scalene
    }
}

fn classify_angles(a: f64, b: f64, c: f64) -> AngleKind {
    let mut s = [a, b, c];
    s.sort_by(|x, y| x.total_cmp(y));
    let lhs = s[0] * s[0] + s[1] * s[1];
    let rhs = s[2] * s[2];
    if approx_eq(lhs, rhs, SHAPE_TOLERANCE) {
        AngleKind::Right
    } else if lhs > rhs {
        AngleKind::Acute
    } else {
        AngleKind::Obtuse
    }
}

/// Angle opposite to `opposite`, by the law of cosines.
fn angle_opposite(opposite: f64, x: f64, y: f64) -> f64 {
    let cos = ((x * x + y * y - opposite * opposite) / (2.0 * x * y)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

fn full_triangle(method: TriangleMethod, a: f64, b: f64, c: f64, unit: LengthUnit, mut steps: Vec<String>) -> TriangleResult {
    let s = (a + b + c) / 2.0;
    // max(0) guards the product against rounding just below zero on very flat triangles
    let area = (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt();
    let height = 2.0 * area / a;
    let angles = [angle_opposite(a, b, c), angle_opposite(b, a, c), angle_opposite(c, a, b)];

    steps.push(format!("h(a) = 2A / a = {}", fmt_num(height, 6)));
    steps.push(format!("P = a + b + c = {} {}", fmt_num(a + b + c, 6), unit.symbol()));

    TriangleResult {
        method,
        unit,
        area,
        base: a,
        height,
        sides: Some([a, b, c]),
        perimeter: Some(a + b + c),
        angles_deg: Some(angles),
        side_kind: Some(classify_sides(a, b, c)),
        angle_kind: Some(classify_angles(a, b, c)),
        steps,
    }
}

/// Triangle from its three sides (Heron's formula).
///
/// # Errors
///
/// `DomainError` when the sides violate the strict triangle inequality,
/// including the degenerate case where two sides sum exactly to the third.
pub fn triangle_from_sides(a: f64, b: f64, c: f64, unit: LengthUnit) -> CalcResult<TriangleResult> {
    ensure_positive("side_a", a)?;
    ensure_positive("side_b", b)?;
    ensure_positive("side_c", c)?;
    check_triangle_inequality(a, b, c)?;

    let s = (a + b + c) / 2.0;
    let area = (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt();
    let steps = vec![
        Formula::TriangleHeron.metadata().formula_plain.to_string(),
        format!("s = ({} + {} + {}) / 2 = {}", fmt_num(a, 6), fmt_num(b, 6), fmt_num(c, 6), fmt_num(s, 6)),
        format!("A = sqrt({} * {} * {} * {})", fmt_num(s, 6), fmt_num(s - a, 6), fmt_num(s - b, 6), fmt_num(s - c, 6)),
        format!("A = {} {}²", fmt_num(area, 6), unit.symbol()),
    ];

    Ok(full_triangle(TriangleMethod::ThreeSides, a, b, c, unit, steps))
}

/// Triangle from two sides and the angle between them (degrees).
pub fn triangle_from_two_sides_angle(a: f64, b: f64, angle_deg: f64, unit: LengthUnit) -> CalcResult<TriangleResult> {
    ensure_positive("side_a", a)?;
    ensure_positive("side_b", b)?;
    ensure_positive("angle_deg", angle_deg)?;
    if angle_deg >= 180.0 {
        return Err(CalcError::domain(
            "triangle",
            format!("included angle {}° must be below 180°", fmt_num(angle_deg, 6)),
        ));
    }

    let gamma = angle_deg.to_radians();
    let c = (a * a + b * b - 2.0 * a * b * gamma.cos()).sqrt();
    let steps = vec![
        Formula::TriangleSas.metadata().formula_plain.to_string(),
        format!(
            "c = sqrt({}² + {}² - 2 * {} * {} * cos({}°)) = {}",
            fmt_num(a, 6),
            fmt_num(b, 6),
            fmt_num(a, 6),
            fmt_num(b, 6),
            fmt_num(angle_deg, 6),
            fmt_num(c, 6)
        ),
        format!("A = {} * {} * sin({}°) / 2 = {}", fmt_num(a, 6), fmt_num(b, 6), fmt_num(angle_deg, 6), fmt_num(a * b * gamma.sin() / 2.0, 6)),
    ];

    check_triangle_inequality(a, b, c)?;
    Ok(full_triangle(TriangleMethod::TwoSidesAngle, a, b, c, unit, steps))
}

/// Rhombus result: both diagonals, side, perimeter and area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhombusResult {
    pub unit: LengthUnit,
    pub diagonal_major: f64,
    pub diagonal_minor: f64,
    pub side: f64,
    pub perimeter: f64,
    pub area: f64,
    /// Height between opposite sides
    pub height: f64,
    pub steps: Vec<String>,
}

fn rhombus(d1: f64, d2: f64, unit: LengthUnit, mut steps: Vec<String>) -> RhombusResult {
    let (major, minor) = if d1 >= d2 { (d1, d2) } else { (d2, d1) };
    let side = ((major / 2.0).powi(2) + (minor / 2.0).powi(2)).sqrt();
    let area = major * minor / 2.0;
    steps.push(format!("A = {} * {} / 2 = {} {}²", fmt_num(major, 6), fmt_num(minor, 6), fmt_num(area, 6), unit.symbol()));
    steps.push(format!("P = 4 * {} = {} {}", fmt_num(side, 6), fmt_num(4.0 * side, 6), unit.symbol()));
    RhombusResult {
        unit,
        diagonal_major: major,
        diagonal_minor: minor,
        side,
        perimeter: 4.0 * side,
        area,
        height: area / side,
        steps,
    }
}

/// Rhombus from its two diagonals.
pub fn rhombus_from_diagonals(d1: f64, d2: f64, unit: LengthUnit) -> CalcResult<RhombusResult> {
    ensure_positive("diagonal_1", d1)?;
    ensure_positive("diagonal_2", d2)?;
    let steps = vec![Formula::RhombusDiagonals.metadata().formula_plain.to_string()];
    Ok(rhombus(d1, d2, unit, steps))
}

/// Rhombus from a side and one diagonal.
///
/// # Errors
///
/// `DomainError` when the diagonal is not shorter than twice the side (the
/// two half-triangles would be flat or impossible).
pub fn rhombus_from_side_diagonal(side: f64, diagonal: f64, unit: LengthUnit) -> CalcResult<RhombusResult> {
    ensure_positive("side", side)?;
    ensure_positive("diagonal", diagonal)?;
    if diagonal >= 2.0 * side {
        return Err(CalcError::domain(
            "rhombus",
            format!(
                "diagonal {} must be shorter than twice the side ({})",
                fmt_num(diagonal, 6),
                fmt_num(2.0 * side, 6)
            ),
        ));
    }

    let other = 2.0 * (side * side - (diagonal / 2.0).powi(2)).sqrt();
    let steps = vec![
        Formula::RhombusSideDiagonal.metadata().formula_plain.to_string(),
        format!("d2 = 2 * sqrt({}² - ({}/2)²) = {}", fmt_num(side, 6), fmt_num(diagonal, 6), fmt_num(other, 6)),
    ];
    Ok(rhombus(diagonal, other, unit, steps))
}

/// Trapezoid result. Legs and perimeter are present when known or derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidResult {
    pub unit: LengthUnit,
    pub base_major: f64,
    pub base_minor: f64,
    pub height: f64,
    pub legs: (f64, f64),
    /// True when legs were derived assuming an isosceles trapezoid
    pub assumed_isosceles: bool,
    pub area: f64,
    pub perimeter: f64,
    /// Segment joining the midpoints of the legs
    pub median: f64,
    pub steps: Vec<String>,
}

/// Trapezoid from both bases, the height and optionally the two legs.
///
/// Without legs the trapezoid is taken as isosceles. With legs, each leg
/// must be at least the height and their horizontal projections must close
/// the difference between the bases.
pub fn trapezoid(
    base_major: f64,
    base_minor: f64,
    height: f64,
    legs: Option<(f64, f64)>,
    unit: LengthUnit,
) -> CalcResult<TrapezoidResult> {
    ensure_positive("base_major", base_major)?;
    ensure_positive("base_minor", base_minor)?;
    ensure_positive("height", height)?;

    let (big, small) = if base_major >= base_minor {
        (base_major, base_minor)
    } else {
        (base_minor, base_major)
    };
    let diff = big - small;
    let area = (big + small) * height / 2.0;

    let mut steps = vec![
        Formula::TrapezoidArea.metadata().formula_plain.to_string(),
        format!("A = ({} + {}) * {} / 2 = {} {}²", fmt_num(big, 6), fmt_num(small, 6), fmt_num(height, 6), fmt_num(area, 6), unit.symbol()),
    ];

    let (legs, assumed_isosceles) = match legs {
        None => {
            let leg = (height * height + (diff / 2.0).powi(2)).sqrt();
            steps.push(format!("isosceles leg = sqrt(h² + ((B - b)/2)²) = {}", fmt_num(leg, 6)));
            ((leg, leg), true)
        }
        Some((l1, l2)) => {
            ensure_positive("leg_1", l1)?;
            ensure_positive("leg_2", l2)?;
            for (label, leg) in [("leg_1", l1), ("leg_2", l2)] {
                if leg < height && !approx_eq(leg, height, SHAPE_TOLERANCE) {
                    return Err(CalcError::domain(
                        "trapezoid",
                        format!("{} = {} is shorter than the height {}", label, fmt_num(leg, 6), fmt_num(height, 6)),
                    ));
                }
            }
            let p1 = (l1 * l1 - height * height).max(0.0).sqrt();
            let p2 = (l2 * l2 - height * height).max(0.0).sqrt();
            // Legs may lean inward or outward, so the projections combine with either sign
            let closes = [p1 + p2, (p1 - p2).abs()]
                .iter()
                .any(|&proj| approx_eq(proj, diff, 1e-6));
            if !closes {
                return Err(CalcError::domain(
                    "trapezoid",
                    format!(
                        "legs project {} and {} horizontally, which cannot span the base difference {}",
                        fmt_num(p1, 6),
                        fmt_num(p2, 6),
                        fmt_num(diff, 6)
                    ),
                ));
            }
            ((l1, l2), false)
        }
    };

    let perimeter = big + small + legs.0 + legs.1;
    steps.push(format!("P = {} {}", fmt_num(perimeter, 6), unit.symbol()));

    Ok(TrapezoidResult {
        unit,
        base_major: big,
        base_minor: small,
        height,
        legs,
        assumed_isosceles,
        area,
        perimeter,
        median: (big + small) / 2.0,
        steps,
    })
}

/// Circle result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleResult {
    pub unit: LengthUnit,
    pub radius: f64,
    pub diameter: f64,
    pub circumference: f64,
    pub area: f64,
    pub steps: Vec<String>,
}

/// Circle from its radius.
pub fn circle(radius: f64, unit: LengthUnit) -> CalcResult<CircleResult> {
    ensure_positive("radius", radius)?;
    let area = std::f64::consts::PI * radius * radius;
    let circumference = 2.0 * std::f64::consts::PI * radius;
    Ok(CircleResult {
        unit,
        radius,
        diameter: 2.0 * radius,
        circumference,
        area,
        steps: vec![
            Formula::CircleArea.metadata().formula_plain.to_string(),
            format!("A = pi * {}² = {}", fmt_num(radius, 6), fmt_num(area, 6)),
            format!("C = 2 * pi * {} = {}", fmt_num(radius, 6), fmt_num(circumference, 6)),
        ],
    })
}
