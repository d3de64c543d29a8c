//! # Amount Module
//!
//! Provides the `Amount` type for line totals and the subtotal.
//!
//! ## Why Float Amounts?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FORM'S CONTRACT                                                    │
//! │                                                                         │
//! │  Quantities and prices are whatever the user typed, coerced with the   │
//! │  browser's Number() rules:                                              │
//! │    "2.5"  → 2.5                                                         │
//! │    "abc"  → NaN   ← must survive into the row total and the subtotal   │
//! │                                                                         │
//! │  Integer cents cannot carry NaN, so amounts stay IEEE-754 doubles and  │
//! │  only the DISPLAY is fixed to two decimals.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use invoice_core::amount::Amount;
//!
//! let row = Amount::new(2.5) * 3.0;
//! assert_eq!(row.to_string(), "7.50");
//!
//! let broken = Amount::new(f64::NAN) + row;
//! assert_eq!(broken.to_string(), "NaN");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Amount Type
// =============================================================================

/// A monetary value as typed into the form.
///
/// ## Design Decisions
/// - **f64**: carries `NaN` from bad input through every derived total
/// - **Single field tuple struct**: zero-cost wrapper with a fixed display
/// - **Serialized as a plain number**: `NaN` becomes `null` in JSON
///
/// ## Where Amount is Used
/// ```text
/// LineItem.quantity × LineItem.unit_price ──► line_total ──► "₹ 7.50"
///                                                 │
///                                                 ▼
///                                  Σ line_total ──► subtotal ──► "₹ 20.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Amount(f64);

impl Amount {
    /// Wraps a raw value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Amount(value)
    }

    /// Returns the raw value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Zero amount, the subtotal of an empty form.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0.0)
    }

    /// True when bad input has poisoned this amount.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    /// Formats with a currency symbol the way the form paints totals.
    ///
    /// ## Example
    /// ```rust
    /// use invoice_core::amount::Amount;
    ///
    /// assert_eq!(Amount::new(20.0).with_symbol("₹"), "₹ 20.00");
    /// assert_eq!(Amount::new(f64::NAN).with_symbol("₹"), "₹ NaN");
    /// ```
    pub fn with_symbol(&self, symbol: &str) -> String {
        if symbol.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", symbol, self)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal display with `Number.prototype.toFixed(2)` conventions.
///
/// - ties round away from zero on the exact binary value (`1.125` → `1.13`,
///   but `1.005` is stored below the tie and prints `1.00`)
/// - magnitudes from `1e21` up print like [`display_number`] (`1e+21`)
/// - `NaN` prints as `NaN`
/// - infinities print as `Infinity` / `-Infinity`
/// - negative zero prints as `0.00`
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value();
        if v.is_nan() {
            f.write_str("NaN")
        } else if v.is_infinite() {
            f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
        } else if v == 0.0 {
            f.write_str("0.00")
        } else if v.abs() >= 1e21 {
            f.write_str(&display_number(v))
        } else {
            let sign = if v < 0.0 { "-" } else { "" };
            write!(f, "{}{}", sign, two_decimals(v.abs()))
        }
    }
}

/// Rounds a finite, non-negative value to two decimals, half away from zero.
fn two_decimals(v: f64) -> String {
    // Below 1e21, 60 places are enough for the third decimal to be exact.
    let exact = format!("{:.60}", v);
    let (int, frac) = exact.split_once('.').unwrap_or((exact.as_str(), "00"));

    let mut digits: Vec<u8> = int.bytes().chain(frac.bytes().take(2)).collect();
    if matches!(frac.as_bytes().get(2), Some(d) if *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let (int, frac) = digits.split_at(digits.len() - 2);
    format!("{}.{}", String::from_utf8_lossy(int), String::from_utf8_lossy(frac))
}

impl Default for Amount {
    fn default() -> Self {
        Amount::zero()
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<f64> for Amount {
    type Output = Self;

    #[inline]
    fn mul(self, qty: f64) -> Self {
        Amount(self.0 * qty)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

// =============================================================================
// Raw Number Display
// =============================================================================

/// Renders a raw field value the way `String(Number)` does.
///
/// Unlike [`Amount`]'s display this does not fix the decimals: `2.5` stays
/// `2.5` and `1` stays `1`. Very large and very small magnitudes switch to
/// exponent form.
///
/// ## Example
/// ```rust
/// use invoice_core::amount::display_number;
///
/// assert_eq!(display_number(1.0), "1");
/// assert_eq!(display_number(2.5), "2.5");
/// assert_eq!(display_number(1e21), "1e+21");
/// assert_eq!(display_number(1e-7), "1e-7");
/// assert_eq!(display_number(f64::NAN), "NaN");
/// ```
pub fn display_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}{}", sign, shortest_decimal(value.abs()))
    }
}

/// What a number input shows for a stored value.
///
/// An input cannot hold `NaN` or an infinity, so those leave the box empty
/// while the totals keep printing `NaN`.
///
/// ## Example
/// ```rust
/// use invoice_core::amount::input_value;
///
/// assert_eq!(input_value(2.5), "2.5");
/// assert_eq!(input_value(f64::NAN), "");
/// ```
pub fn input_value(value: f64) -> String {
    if value.is_finite() {
        display_number(value)
    } else {
        String::new()
    }
}

/// Lays out the shortest round-trip digits of a finite, positive value.
///
/// ```text
/// value = 0.d₁d₂…d_k × 10ⁿ
///
///   k ≤ n ≤ 21   → digits + zeros          1e20   → "100000000000000000000"
///   0 < n ≤ 21   → point inside digits     2.5    → "2.5"
///  -6 < n ≤ 0    → "0." + zeros + digits   1e-6   → "0.000001"
///   otherwise    → d₁.d₂…e±(n-1)           1.5e21 → "1.5e+21"
/// ```
fn shortest_decimal(v: f64) -> String {
    let sci = format!("{:e}", v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat(n.unsigned_abs() as usize), digits)
    } else {
        let e = n - 1;
        let e_sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, e_sign, e.unsigned_abs())
        } else {
            format!("{}.{}e{}{}", first, rest, e_sign, e.unsigned_abs())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Amount::new(7.5).to_string(), "7.50");
        assert_eq!(Amount::new(20.0).to_string(), "20.00");
        assert_eq!(Amount::new(0.1 + 0.2).to_string(), "0.30");
        assert_eq!(Amount::new(1234.567).to_string(), "1234.57");
    }

    #[test]
    fn test_display_rounds_ties_up() {
        assert_eq!((Amount::new(0.375) * 3.0).to_string(), "1.13");
        assert_eq!(Amount::new(0.625).to_string(), "0.63");
        assert_eq!(Amount::new(99.995).to_string(), "100.00");
        assert_eq!(Amount::new(-0.625).to_string(), "-0.63");
    }

    #[test]
    fn test_display_follows_stored_value_not_typed_text() {
        assert_eq!(Amount::new(1.005).to_string(), "1.00");
        assert_eq!(Amount::new(2.675).to_string(), "2.67");
        assert_eq!(Amount::new(0.995).to_string(), "0.99");
    }

    #[test]
    fn test_display_huge_uses_exponent() {
        assert_eq!(Amount::new(1e21).to_string(), "1e+21");
        assert_eq!(Amount::new(-2.5e22).to_string(), "-2.5e+22");
        assert_eq!(Amount::new(1e20).to_string(), "100000000000000000000.00");
    }

    #[test]
    fn test_tiny_negative_keeps_sign() {
        assert_eq!(Amount::new(-0.001).to_string(), "-0.00");
    }

    #[test]
    fn test_display_non_finite() {
        assert_eq!(Amount::new(f64::NAN).to_string(), "NaN");
        assert_eq!(Amount::new(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Amount::new(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_negative_zero_prints_unsigned() {
        assert_eq!(Amount::new(-0.0).to_string(), "0.00");
        assert_eq!(Amount::new(-1.5).to_string(), "-1.50");
    }

    #[test]
    fn test_nan_propagates_through_sum() {
        let total: Amount = [Amount::new(1.0), Amount::new(f64::NAN), Amount::new(2.0)]
            .into_iter()
            .sum();
        assert!(total.is_nan());
    }

    #[test]
    fn test_with_symbol() {
        assert_eq!(Amount::new(7.5).with_symbol("₹"), "₹ 7.50");
        assert_eq!(Amount::new(7.5).with_symbol(""), "7.50");
    }

    #[test]
    fn test_display_number() {
        assert_eq!(display_number(10.0), "10");
        assert_eq!(display_number(-0.0), "0");
        assert_eq!(display_number(0.25), "0.25");
        assert_eq!(display_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_input_value_blanks_non_finite() {
        assert_eq!(input_value(f64::NAN), "");
        assert_eq!(input_value(f64::INFINITY), "");
        assert_eq!(input_value(0.0), "0");
        assert_eq!(input_value(1e21), "1e+21");
    }

    #[test]
    fn test_display_number_exponent_thresholds() {
        assert_eq!(display_number(1e21), "1e+21");
        assert_eq!(display_number(1.5e21), "1.5e+21");
        assert_eq!(display_number(1e20), "100000000000000000000");
        assert_eq!(display_number(1e-6), "0.000001");
        assert_eq!(display_number(1e-7), "1e-7");
        assert_eq!(display_number(-1.25e-7), "-1.25e-7");
        assert_eq!(display_number(123.456), "123.456");
    }
}
