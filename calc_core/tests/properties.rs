//! Property tests over the formula library.

use approx::assert_relative_eq;
use calc_core::formulas::calendar::days_between;
use calc_core::formulas::calculus::expr::{MAX_NESTING, MAX_TOKENS};
use calc_core::formulas::calculus::parse;
use calc_core::formulas::curious::{affective_calories, pizza_per_person, Activity, Appetite, MAX_GUESTS};
use calc_core::formulas::finance::amortization;
use calc_core::formulas::fractions::simplify;
use calc_core::formulas::geometry::triangle_from_sides;
use calc_core::formulas::percentage::{percent_of_value, percentage_of, variation_percent};
use calc_core::formulas::physics::ohms_law;
use calc_core::formulas::roman::{arabic_to_roman, roman_to_arabic};
use calc_core::numeric::gcd;
use calc_core::units::LengthUnit;
use calc_core::FormulaRequest;
use chrono::NaiveDate;
use proptest::prelude::*;

fn activity() -> impl Strategy<Value = Activity> {
    prop::sample::select(Activity::ALL.to_vec())
}

fn appetite() -> impl Strategy<Value = Appetite> {
    prop::sample::select(vec![Appetite::Light, Appetite::Normal, Appetite::Hungry])
}

fn date() -> impl Strategy<Value = NaiveDate> {
    // 1900-01-01 .. roughly 2100
    (693_596i32..766_645).prop_map(|d| NaiveDate::from_num_days_from_ce_opt(d).unwrap())
}

proptest! {
    #[test]
    fn heron_area_matches_side_angle_side(
        a in 0.1f64..100.0,
        b in 0.1f64..100.0,
        gamma_deg in 10.0f64..170.0,
    ) {
        let gamma = gamma_deg.to_radians();
        let c = (a * a + b * b - 2.0 * a * b * gamma.cos()).sqrt();
        let expected = 0.5 * a * b * gamma.sin();

        let tri = triangle_from_sides(a, b, c, LengthUnit::Meter).unwrap();
        assert_relative_eq!(tri.area, expected, max_relative = 1e-6);

        let angles = tri.angles_deg.unwrap();
        assert_relative_eq!(angles.iter().sum::<f64>(), 180.0, max_relative = 1e-9);
        assert_relative_eq!(angles[2], gamma_deg, max_relative = 1e-6);
    }

    #[test]
    fn violated_triangle_inequality_is_a_domain_error(
        a in 0.1f64..100.0,
        b in 0.1f64..100.0,
        extra in 0.0f64..50.0,
    ) {
        let err = triangle_from_sides(a, b, a + b + extra, LengthUnit::Meter).unwrap_err();
        prop_assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn roman_round_trip(n in 1i64..=3999) {
        let encoded = arabic_to_roman(n);
        prop_assert!(encoded.is_valid);
        let decoded = roman_to_arabic(&encoded.roman);
        prop_assert!(decoded.is_valid);
        prop_assert_eq!(decoded.arabic, n);
        prop_assert_eq!(decoded.roman, encoded.roman);
    }

    #[test]
    fn roman_rejects_out_of_range(n in prop_oneof![-10_000i64..=0, 4000i64..100_000]) {
        let result = arabic_to_roman(n);
        prop_assert!(!result.is_valid);
        prop_assert!(result.error.is_some());
    }

    #[test]
    fn amortization_closes_the_loan(
        principal in 1_000.0f64..1_000_000.0,
        rate in 0.0f64..20.0,
        years in 1u32..=30,
        periods_per_year in prop::sample::select(vec![1u32, 4, 12]),
    ) {
        let s = amortization(principal, rate, f64::from(years), periods_per_year).unwrap();
        prop_assert_eq!(s.periods.len() as u32, years * periods_per_year);

        let last = s.periods.last().unwrap();
        prop_assert_eq!(last.remaining_balance, 0.0);

        let interest: f64 = s.periods.iter().map(|p| p.interest).sum();
        let principal_paid: f64 = s.periods.iter().map(|p| p.principal_paid).sum();
        assert_relative_eq!(s.total_paid, interest + principal_paid, max_relative = 1e-12);
        assert_relative_eq!(principal_paid, principal, max_relative = 1e-9);
        prop_assert!(s.total_interest >= 0.0);
    }

    #[test]
    fn ohms_law_round_trip(v in 0.01f64..1_000.0, i in 0.001f64..100.0) {
        let solved_r = ohms_law(Some(v), Some(i), None).unwrap();
        let back = ohms_law(None, Some(i), Some(solved_r.resistance_ohm)).unwrap();
        assert_relative_eq!(back.voltage_v, v, max_relative = 1e-9);
        assert_relative_eq!(back.power_w, v * i, max_relative = 1e-9);
    }

    #[test]
    fn percentage_reconstructs_part(percent in -500.0f64..500.0, total in 1.0f64..1e6) {
        let part = percent_of_value(percent, total).unwrap().value;
        let back = percentage_of(part, total).unwrap().value;
        prop_assert!((back - percent).abs() <= 1e-9 * percent.abs().max(1.0));
    }

    #[test]
    fn variation_sign_follows_direction(from in -1e6f64..1e6, to in -1e6f64..1e6) {
        prop_assume!(from != 0.0);
        let v = variation_percent(from, to).unwrap().value;
        if to > from {
            prop_assert!(v > 0.0);
        } else if to < from {
            prop_assert!(v < 0.0);
        } else {
            prop_assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn affective_calories_grow_with_time_and_intensity(
        activity in activity(),
        m1 in 0.0f64..300.0,
        m2 in 0.0f64..300.0,
        intensity in 1u8..5,
    ) {
        let (short, long) = if m1 <= m2 { (m1, m2) } else { (m2, m1) };
        let a = affective_calories(activity, short, intensity).unwrap();
        let b = affective_calories(activity, long, intensity).unwrap();
        prop_assert!(a.kcal <= b.kcal);

        let harder = affective_calories(activity, long, intensity + 1).unwrap();
        prop_assert!(harder.kcal >= b.kcal);
        if long > 0.0 {
            prop_assert!(harder.kcal > b.kcal);
        }
    }

    #[test]
    fn days_between_splits_into_weeks(a in date(), b in date()) {
        let r = days_between(a, b).unwrap();
        prop_assert!(r.total_days >= 0);
        prop_assert!((0..7).contains(&r.days_remainder));
        prop_assert_eq!(r.weeks * 7 + r.days_remainder, r.total_days);
        prop_assert_eq!(r.total_days, (a - b).num_days().abs());
        prop_assert!(r.start <= r.end);
    }

    #[test]
    fn simplified_fractions_are_reduced(num in -100_000i64..100_000, den in -100_000i64..100_000) {
        prop_assume!(den != 0);
        let f = simplify(num, den).unwrap();
        prop_assert!(f.denominator > 0);
        prop_assert_eq!(gcd(f.numerator, f.denominator), 1);
        // Same value as the input
        prop_assert_eq!(f.numerator as i128 * den as i128, num as i128 * f.denominator as i128);
    }

    #[test]
    fn pizza_never_panics_on_any_party(
        adults in any::<u32>(),
        children in any::<u32>(),
        appetite in appetite(),
        slices in prop::option::of(any::<u32>()),
    ) {
        match pizza_per_person(adults, children, appetite, slices) {
            Ok(r) => {
                prop_assert!(u64::from(adults) + u64::from(children) <= u64::from(MAX_GUESTS));
                prop_assert!(r.pizzas >= 1);
                prop_assert_eq!(
                    u64::from(r.pizzas) * u64::from(r.slices_per_pizza),
                    u64::from(r.slices_needed) + u64::from(r.leftover_slices)
                );
            }
            Err(e) => prop_assert_eq!(e.error_code(), "INVALID_INPUT"),
        }
    }

    #[test]
    fn nesting_past_the_limit_is_a_parse_error(
        depth in (MAX_NESTING + 1)..(MAX_NESTING * 4),
        open in prop::sample::select(vec!["(", "-(", "sin(", "sqrt("]),
    ) {
        let src = format!("{}x{}", open.repeat(depth), ")".repeat(depth));
        prop_assert_eq!(parse(&src).unwrap_err().error_code(), "PARSE_ERROR");
    }

    #[test]
    fn nesting_within_the_limit_parses(depth in 1usize..(MAX_NESTING / 2)) {
        let src = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        prop_assert!(parse(&src).is_ok());
    }
}

#[test]
fn huge_requests_come_back_as_errors() {
    let pizza: FormulaRequest = serde_json::from_str(&format!(
        r#"{{"type": "pizza_per_person", "adults": {}, "appetite": "hungry"}}"#,
        u32::MAX
    ))
    .unwrap();
    assert_eq!(pizza.evaluate().unwrap_err().error_code(), "INVALID_INPUT");

    let deep = format!("{}x{}", "(".repeat(100_000), ")".repeat(100_000));
    let derivative = FormulaRequest::Derivative { expression: deep, x: 1.0 };
    assert_eq!(derivative.evaluate().unwrap_err().error_code(), "PARSE_ERROR");

    let long = vec!["x"; MAX_TOKENS].join(" + ");
    let integral = FormulaRequest::Integral {
        expression: long,
        a: 0.0,
        b: 1.0,
        intervals: 10,
    };
    assert_eq!(integral.evaluate().unwrap_err().error_code(), "PARSE_ERROR");
}
