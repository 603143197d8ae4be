//! # Money Module
//!
//! Provides the `Money` type for peso amounts.
//!
//! ## Why Integer Pesos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Colombian pesos have no fractional unit in day-to-day trade.          │
//! │                                                                         │
//! │  Prices:      $12.500, $3.000, $48.900                                  │
//! │  Storage:     INTEGER 12500                                             │
//! │                                                                         │
//! │  Integers keep totals, ledger balances and report sums exact.          │
//! │  Only averages (reports) leave integer land, as f64.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gastro_core::money::Money;
//!
//! let beer = Money::from_pesos(8_000);
//! let extra = Money::from_pesos(2_500);
//! assert_eq!((beer * 2 + extra).pesos(), 18_500);
//! assert_eq!((beer * 2 + extra).to_string(), "$18.500");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// A peso amount. Signed so that ledger balances can go negative
/// (more paid than invoiced).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos)
    }

    /// Returns the amount in pesos.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0
    }

    /// Zero pesos.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Amount as f64, for averages and percentages in reports.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

/// Formats as `$12.500` (dot thousands separator, as printed on tickets).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a line quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_pesos(0).to_string(), "$0");
        assert_eq!(Money::from_pesos(950).to_string(), "$950");
        assert_eq!(Money::from_pesos(12_500).to_string(), "$12.500");
        assert_eq!(Money::from_pesos(1_250_000).to_string(), "$1.250.000");
        assert_eq!(Money::from_pesos(-40_000).to_string(), "-$40.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(10_000);
        let b = Money::from_pesos(2_500);
        assert_eq!((a + b).pesos(), 12_500);
        assert_eq!((a - b).pesos(), 7_500);
        assert_eq!((b * 3).pesos(), 7_500);
        assert_eq!((-a).pesos(), -10_000);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_pesos(100), Money::from_pesos(-40), Money::from_pesos(20)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.pesos(), 80);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_pesos(8_000)).unwrap();
        assert_eq!(json, "8000");
        let back: Money = serde_json::from_str("8000").unwrap();
        assert_eq!(back, Money::from_pesos(8_000));
    }
}
