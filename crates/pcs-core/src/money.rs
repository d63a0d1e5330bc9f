//! # Money: Integer-Cent Arithmetic
//!
//! Every monetary amount in the engine is an integer number of cents. Rates
//! arrive as decimal strings ("0.22", "1500.00", "6.2") and are parsed into
//! fixed-point integers at an explicit scale, so no dollar figure ever passes
//! through `f64`.
//!
//! Rounding is half-up (away from zero) and happens once, at the point where a
//! product is converted back into cents.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An amount of money in integer cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    /// Zero dollars.
    pub const ZERO: Cents = Cents(0);

    /// Wrap a raw cent count.
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole dollars to cents.
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// The raw cent count.
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Multiply by an integer quantity (nights, days), saturating on overflow.
    pub fn times(self, quantity: i64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }

    /// Apply a basis-point factor, rounding half-up to the cent.
    pub fn apply_bps(self, bps: BasisPoints) -> Self {
        Self(mul_div_round(self.0, i64::from(bps.0), 10_000))
    }

    /// Render as a plain decimal string, e.g. `1500.00`.
    pub fn to_decimal_string(self) -> String {
        format_amount(self.0)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = abs / 100;
        let digits = dollars.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}${grouped}.{:02}", abs % 100)
    }
}

impl Add for Cents {
    type Output = Cents;
    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Cents {
    type Output = Cents;
    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, |acc, c| acc + c)
    }
}

/// A rate expressed in basis points (1/100 of a percent).
///
/// `6.2%` is `620`, `1.45%` is `145`, `95%` is `9500`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// 100%.
    pub const FULL: BasisPoints = BasisPoints(10_000);

    /// Wrap a raw basis-point value.
    pub const fn new(bps: u32) -> Self {
        Self(bps)
    }

    /// The raw basis-point value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Parse a percentage string ("6.2", "15", "1.45") into basis points.
    pub fn parse_percent(s: &str) -> Result<Self, ValidationError> {
        match parse_scaled(s, 2) {
            Some(v) if (0..=i64::from(u32::MAX)).contains(&v) => Ok(Self(v as u32)),
            _ => Err(ValidationError::InvalidRate(s.to_string())),
        }
    }

    /// Render as a percentage string with two decimals, e.g. `27.65`.
    pub fn to_percent_string(self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }

    /// Saturating sum of two rates.
    pub fn saturating_add(self, other: BasisPoints) -> BasisPoints {
        BasisPoints(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_percent_string())
    }
}

/// Parse a decimal string into an integer with `scale` fractional digits.
///
/// `parse_scaled("0.655", 3) == Some(655)`, `parse_scaled("1500", 2) ==
/// Some(150000)`. Digits beyond `scale` are truncated. Returns `None` for
/// empty, malformed or overflowing input.
pub fn parse_scaled(s: &str, scale: u32) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (int_str, frac_str) = match body.find('.') {
        Some(pos) => (&body[..pos], &body[pos + 1..]),
        None => (body, ""),
    };
    if int_str.is_empty() && frac_str.is_empty() {
        return None;
    }
    if !int_str.chars().all(|c| c.is_ascii_digit()) || !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let factor = 10i64.checked_pow(scale)?;
    let int_part: i64 = if int_str.is_empty() { 0 } else { int_str.parse().ok()? };

    let mut frac_digits: String = frac_str.chars().take(scale as usize).collect();
    while frac_digits.len() < scale as usize {
        frac_digits.push('0');
    }
    let frac_part: i64 = if frac_digits.is_empty() { 0 } else { frac_digits.parse().ok()? };

    let magnitude = int_part.checked_mul(factor)?.checked_add(frac_part)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a decimal dollar string into cents.
///
/// `"1500"` → 150000, `"868.2"` → 86820, `"0.01"` → 1.
pub fn parse_amount(s: &str) -> Option<Cents> {
    parse_scaled(s, 2).map(Cents)
}

/// Format cents with two decimal places, no grouping: `86820` → `"868.20"`.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Compute `value * mul / div` in 128-bit space, rounding half away from zero.
///
/// Saturates to `i64::MAX`/`i64::MIN` if the rounded result does not fit.
/// A zero divisor yields zero.
pub fn mul_div_round(value: i64, mul: i64, div: i64) -> i64 {
    if div == 0 {
        return 0;
    }
    let num = i128::from(value) * i128::from(mul);
    let den = i128::from(div);
    let half = den.abs() / 2;
    // Push the numerator half a divisor away from zero, then truncate.
    let rounded = (num + half * num.signum()) / den;
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_whole_and_decimal() {
        assert_eq!(parse_amount("1500"), Some(Cents::new(150_000)));
        assert_eq!(parse_amount("1500.00"), Some(Cents::new(150_000)));
        assert_eq!(parse_amount("868.2"), Some(Cents::new(86_820)));
        assert_eq!(parse_amount("0.01"), Some(Cents::new(1)));
        assert_eq!(parse_amount(".5"), Some(Cents::new(50)));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("."), None);
    }

    #[test]
    fn parse_scaled_truncates_extra_digits() {
        assert_eq!(parse_scaled("0.655", 3), Some(655));
        assert_eq!(parse_scaled("0.6559", 3), Some(655));
        assert_eq!(parse_scaled("0.22", 3), Some(220));
        assert_eq!(parse_scaled("-1.5", 2), Some(-150));
    }

    #[test]
    fn parse_scaled_overflow_is_none() {
        assert_eq!(parse_scaled("99999999999999999999", 2), None);
    }

    #[test]
    fn format_amount_two_decimals() {
        assert_eq!(format_amount(86_820), "868.20");
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(7), "0.07");
        assert_eq!(format_amount(-150), "-1.50");
    }

    #[test]
    fn cents_display_groups_thousands() {
        assert_eq!(Cents::new(225_000).to_string(), "$2,250.00");
        assert_eq!(Cents::new(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(Cents::new(99).to_string(), "$0.99");
        assert_eq!(Cents::new(-100_000).to_string(), "-$1,000.00");
    }

    #[test]
    fn basis_points_parse() {
        assert_eq!(BasisPoints::parse_percent("6.2").unwrap().value(), 620);
        assert_eq!(BasisPoints::parse_percent("1.45").unwrap().value(), 145);
        assert_eq!(BasisPoints::parse_percent("15").unwrap().value(), 1500);
        assert_eq!(BasisPoints::parse_percent("0").unwrap().value(), 0);
        assert!(BasisPoints::parse_percent("-1").is_err());
        assert!(BasisPoints::parse_percent("six").is_err());
    }

    #[test]
    fn basis_points_percent_string() {
        assert_eq!(BasisPoints::new(2765).to_percent_string(), "27.65");
        assert_eq!(BasisPoints::new(620).to_string(), "6.20%");
    }

    #[test]
    fn apply_bps_rounds_half_up() {
        assert_eq!(Cents::new(120_000).apply_bps(BasisPoints::new(620)), Cents::new(7_440));
        assert_eq!(Cents::new(120_000).apply_bps(BasisPoints::new(145)), Cents::new(1_740));
        // 0.5 cent rounds up
        assert_eq!(Cents::new(1).apply_bps(BasisPoints::new(5_000)), Cents::new(1));
        assert_eq!(Cents::new(3).apply_bps(BasisPoints::new(5_000)), Cents::new(2));
    }

    #[test]
    fn mul_div_round_signs() {
        assert_eq!(mul_div_round(7, 1, 2), 4);
        assert_eq!(mul_div_round(-7, 1, 2), -4);
        assert_eq!(mul_div_round(10, 3, 0), 0);
        assert_eq!(mul_div_round(i64::MAX, 10, 1), i64::MAX);
    }

    #[test]
    fn cents_sum_and_times() {
        let total: Cents = [Cents::new(100), Cents::new(250)].into_iter().sum();
        assert_eq!(total, Cents::new(350));
        assert_eq!(Cents::new(18_000).times(10), Cents::new(180_000));
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn format_then_parse_is_identity(cents in -1_000_000_000i64..1_000_000_000) {
                prop_assert_eq!(parse_amount(&format_amount(cents)), Some(Cents::new(cents)));
            }

            #[test]
            fn apply_bps_never_exceeds_full(cents in 0i64..100_000_000, bps in 0u32..=10_000) {
                let applied = Cents::new(cents).apply_bps(BasisPoints::new(bps));
                prop_assert!(applied <= Cents::new(cents));
                prop_assert!(applied >= Cents::ZERO);
            }
        }
    }
}
