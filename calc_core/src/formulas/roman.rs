//! # Roman Numerals
//!
//! Conversion in both directions for 1..=3999. Neither function returns an
//! error: invalid input yields a result with `is_valid == false` and a
//! message, so the page can render it inline.
//!
//! ```rust
//! use calc_core::formulas::roman::{arabic_to_roman, roman_to_arabic};
//!
//! assert_eq!(arabic_to_roman(1994).roman, "MCMXCIV");
//! assert_eq!(roman_to_arabic("mcmxciv").arabic, 1994);
//! assert!(!roman_to_arabic("IIII").is_valid);
//! ```

use serde::{Deserialize, Serialize};

/// Smallest representable value
pub const MIN_ROMAN: i64 = 1;
/// Largest value expressible without overline notation
pub const MAX_ROMAN: i64 = 3999;

const TABLE: [(i64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Outcome of a conversion in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RomanNumeralResult {
    /// Arabic value (0 when invalid)
    pub arabic: i64,
    /// Canonical Roman form (empty when invalid)
    pub roman: String,
    pub is_valid: bool,
    /// Why the input was rejected
    pub error: Option<String>,
    /// Symbol-by-symbol breakdown, e.g. "CM = 900"
    pub steps: Vec<String>,
}

impl RomanNumeralResult {
    fn invalid(arabic: i64, reason: impl Into<String>) -> Self {
        Self {
            arabic,
            roman: String::new(),
            is_valid: false,
            error: Some(reason.into()),
            steps: Vec::new(),
        }
    }
}

/// Greedy encode; caller guarantees the range.
fn encode(mut n: i64) -> (String, Vec<String>) {
    let mut roman = String::new();
    let mut steps = Vec::new();
    for (value, symbol) in TABLE {
        while n >= value {
            roman.push_str(symbol);
            steps.push(format!("{} = {}", symbol, value));
            n -= value;
        }
    }
    (roman, steps)
}

/// Arabic to Roman. Valid only for 1..=3999.
pub fn arabic_to_roman(n: i64) -> RomanNumeralResult {
    if !(MIN_ROMAN..=MAX_ROMAN).contains(&n) {
        return RomanNumeralResult::invalid(n, format!("{} is outside {}..={}", n, MIN_ROMAN, MAX_ROMAN));
    }
    let (roman, steps) = encode(n);
    RomanNumeralResult {
        arabic: n,
        roman,
        is_valid: true,
        error: None,
        steps,
    }
}

fn symbol_value(c: char) -> Option<i64> {
    match c {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Roman to Arabic.
///
/// Only I, V, X, L, C, D, M are accepted (case-insensitive), and the numeral
/// must be in canonical subtractive form: "IV" is valid, "IIII", "IL" and
/// "VX" are not.
pub fn roman_to_arabic(input: &str) -> RomanNumeralResult {
    let s = input.trim().to_uppercase();
    if s.is_empty() {
        return RomanNumeralResult::invalid(0, "Empty numeral");
    }

    let mut values = Vec::with_capacity(s.len());
    for c in s.chars() {
        match symbol_value(c) {
            Some(v) => values.push(v),
            None => return RomanNumeralResult::invalid(0, format!("'{}' is not a Roman symbol", c)),
        }
    }

    let mut total = 0i64;
    for (i, v) in values.iter().enumerate() {
        match values.get(i + 1) {
            Some(next) if next > v => total -= v,
            _ => total += v,
        }
    }

    if !(MIN_ROMAN..=MAX_ROMAN).contains(&total) {
        return RomanNumeralResult::invalid(total, format!("{} does not encode a value in {}..={}", s, MIN_ROMAN, MAX_ROMAN));
    }

    // Re-encoding catches repeated symbols and illegal subtractive pairs
    let (canonical, steps) = encode(total);
    if canonical != s {
        return RomanNumeralResult::invalid(total, format!("{} is not canonical; did you mean {}?", s, canonical));
    }

    RomanNumeralResult {
        arabic: total,
        roman: canonical,
        is_valid: true,
        error: None,
        steps,
    }
}
