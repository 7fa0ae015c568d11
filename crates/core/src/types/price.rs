//! Type-safe price representation using decimal arithmetic.
//!
//! The shop trades in Vietnamese đồng only. VND has no minor unit in
//! everyday use, so display rounds to whole đồng and groups thousands with
//! dots (`1.250.000 ₫`).

use std::fmt;
use std::ops::{Add, Mul, Sub};

use rust_decimal::Decimal;
use rust_decimal::prelude::{RoundingStrategy, ToPrimitive};
use serde::{Deserialize, Serialize};

/// A price in Vietnamese đồng.
///
/// Deserializes from either a JSON number or a numeric string, which is how
/// the backend sends amounts depending on the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero đồng.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of đồng.
    #[must_use]
    pub fn from_dong(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is strictly negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Format for display, e.g. `1.250.000 ₫`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let whole = rounded.abs().to_u128().unwrap_or_default();
        let digits = whole.to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if rounded.is_sign_negative() && whole > 0 {
            format!("-{grouped} ₫")
        } else {
            format!("{grouped} ₫")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_dong(0).display(), "0 ₫");
        assert_eq!(Price::from_dong(999).display(), "999 ₫");
        assert_eq!(Price::from_dong(1_000).display(), "1.000 ₫");
        assert_eq!(Price::from_dong(1_250_000).display(), "1.250.000 ₫");
        assert_eq!(Price::from_dong(-45_000).display(), "-45.000 ₫");
    }

    #[test]
    fn test_display_rounds_fractional_dong() {
        let price = Price::new(Decimal::new(12_3456, 1)); // 12345.6
        assert_eq!(price.display(), "12.346 ₫");
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("250000").unwrap();
        let from_string: Price = serde_json::from_str("\"250000\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Price::from_dong(250_000));
    }

    #[test]
    fn test_arithmetic() {
        let total: Price = [Price::from_dong(100), Price::from_dong(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_dong(350));
        assert_eq!(Price::from_dong(120) * 3, Price::from_dong(360));
        assert!((Price::from_dong(5) - Price::from_dong(10)).is_negative());
    }
}
