//! # Coercion Module
//!
//! Turns raw field text into the number the form stores.
//!
//! ## Coercion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input (after trimming whitespace)        Stored value                  │
//! │  ──────────────────────────────────       ────────────                  │
//! │  ""                                       0                             │
//! │  "12", "-3.5", ".5", "1.", "2e3"          the decimal value             │
//! │  "Infinity", "+Infinity", "-Infinity"     ±∞                            │
//! │  "0x1A", "0o17", "0b101"                  26, 15, 5                     │
//! │  anything else ("abc", "1,5", "inf")      NaN                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! These are the browser's `Number(text)` rules. There is no range or sign
//! check: a negative quantity is stored as typed.

/// Coerces raw field text to a number. Never fails; bad input is `NaN`.
///
/// ## Example
/// ```rust
/// use invoice_core::coerce::coerce_number;
///
/// assert_eq!(coerce_number(" 2.5 "), 2.5);
/// assert_eq!(coerce_number(""), 0.0);
/// assert!(coerce_number("abc").is_nan());
/// ```
pub fn coerce_number(raw: &str) -> f64 {
    let text = raw.trim_matches(is_js_whitespace);

    if text.is_empty() {
        return 0.0;
    }

    if let Some(value) = parse_prefixed_integer(text) {
        return value;
    }

    let (sign, unsigned) = match text.as_bytes()[0] {
        b'+' => (1.0, &text[1..]),
        b'-' => (-1.0, &text[1..]),
        _ => (1.0, text),
    };

    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }

    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }

    match unsigned.parse::<f64>() {
        Ok(value) => sign * value,
        Err(_) => f64::NAN,
    }
}

/// Whitespace stripped by `Number()`, including the byte order mark.
fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// `0x` / `0o` / `0b` literals. Unsigned only.
fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    // Accumulated as f64 so long literals lose precision instead of overflowing.
    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * radix as f64 + d as f64,
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

/// `digits [. digits] [exponent]` or `. digits [exponent]`, ASCII only.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_decimals() {
        assert_eq!(coerce_number("10"), 10.0);
        assert_eq!(coerce_number("-3.5"), -3.5);
        assert_eq!(coerce_number("+4"), 4.0);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("1."), 1.0);
        assert_eq!(coerce_number("2e3"), 2000.0);
        assert_eq!(coerce_number("2.5E-1"), 0.25);
    }

    #[test]
    fn test_whitespace_and_empty() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number("\t7\n"), 7.0);
    }

    #[test]
    fn test_infinity_spellings() {
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("infinity").is_nan());
    }

    #[test]
    fn test_prefixed_integers() {
        assert_eq!(coerce_number("0x1A"), 26.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("0B101"), 5.0);
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0xG").is_nan());
        assert!(coerce_number("-0x10").is_nan());
    }

    #[test]
    fn test_garbage_is_nan() {
        for raw in ["abc", "1,5", "12abc", ".", "e5", "1e", "--1", "NaN", "nan", "1_000"] {
            assert!(coerce_number(raw).is_nan(), "{raw:?} should coerce to NaN");
        }
    }
}
