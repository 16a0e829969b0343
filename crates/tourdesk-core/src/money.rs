//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A day of split payments summed as floats drifts away from the         │
//! │  cash actually in the drawer.                                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                        │
//! │    Every amount is an i64 count of cents. Sums are exact, and the      │
//! │    ±0.01 payment tolerance is exactly one unit.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tourdesk_core::money::Money;
//!
//! let adult = Money::from_cents(5000); // R$ 50.00
//! let line = adult * 2 + Money::from_cents(2500);
//! assert_eq!(line.cents(), 12_500);
//! assert_eq!(line.to_string(), "R$ 125.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// Arithmetic saturates instead of overflowing, so no sum or product of
/// amounts can panic.
///
/// ## Where Money Flows
/// ```text
/// Tour.price_*_cents ──► CartItem prices ──► Cart.total()
///                                               │
///                         PaymentSplit legs ◄───┘ (must match ±1 cent)
///                               │
///                               ▼
///                         Sale.total_cents ──► ClosingTotals buckets
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tourdesk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a unit price by a quantity, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use tourdesk_core::money::Money;
    ///
    /// let child = Money::from_cents(2500);
    /// assert_eq!(child.multiply_quantity(3).cents(), 7500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// True when `self` and `other` differ by at most `tolerance`.
    ///
    /// ## Example
    /// ```rust
    /// use tourdesk_core::money::Money;
    ///
    /// let one_cent = Money::from_cents(1);
    /// assert!(Money::from_cents(12_500).is_within(Money::from_cents(12_499), one_cent));
    /// assert!(!Money::from_cents(12_500).is_within(Money::from_cents(12_498), one_cent));
    /// ```
    #[inline]
    pub const fn is_within(&self, other: Money, tolerance: Money) -> bool {
        self.0.abs_diff(other.0) <= tolerance.0.unsigned_abs()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount as `R$ 10.99` (debugging and logs; the UI formats itself).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
