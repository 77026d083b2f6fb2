//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                    │
//! │                                                                │
//! │  In floating point:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                  │
//! │                                                                │
//! │  OUR SOLUTION: Integer Kuruş                                   │
//! │    Every price, line total and sale total is an i64 count of   │
//! │    the smallest currency unit. Sums over a day of sales are    │
//! │    exact; the report aggregation never drifts.                 │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use canteen_core::money::Money;
//!
//! // Create from kuruş (preferred)
//! let price = Money::from_kurus(1550); // 15.50 TL
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // 31.00 TL
//! let total = price + Money::from_kurus(500);     // 20.50 TL
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (kuruş).
///
/// ## Design Decisions
/// - **i64 (signed)**: headroom for any realistic canteen total
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: serializes as a bare integer, which is the
///   representation persisted inside each sale's line-items document
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kuruş (the smallest currency unit).
    ///
    /// ```rust
    /// use canteen_core::money::Money;
    ///
    /// let price = Money::from_kurus(1550); // 15.50 TL
    /// assert_eq!(price.kurus(), 1550);
    /// ```
    #[inline]
    pub const fn from_kurus(kurus: i64) -> Self {
        Money(kurus)
    }

    /// Creates a Money value from major and minor units (lira and kuruş).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_lira_kurus(-5, 50)` is -5.50 TL, not -4.50 TL.
    #[inline]
    pub const fn from_lira_kurus(lira: i64, kurus: i64) -> Self {
        if lira < 0 {
            Money(lira * 100 - kurus)
        } else {
            Money(lira * 100 + kurus)
        }
    }

    /// Returns the value in kuruş.
    #[inline]
    pub const fn kurus(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (lira) portion.
    #[inline]
    pub const fn lira(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (kuruş) portion, always 0-99.
    #[inline]
    pub const fn kurus_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use canteen_core::money::Money;
    ///
    /// let unit_price = Money::from_kurus(299);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.kurus(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// This is for logs and debugging. The presentation layer owns
/// user-facing formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02} TL", sign, self.lira().abs(), self.kurus_part())
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

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line totals (cart total, report revenue).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
