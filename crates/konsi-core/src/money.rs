//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: integer minor currency units (whole rupiah)          │
//! │    Every ledger amount — price, debt, payment — is an i64.          │
//! │    Rounding only ever happens in one place (discount math) and      │
//! │    is explicit there.                                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use konsi_core::money::Money;
//!
//! let price = Money::from_minor(45_000); // Rp45.000
//! let line = price.multiply_quantity(3); // Rp135.000
//! assert_eq!(line.minor(), 135_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (whole rupiah for IDR).
///
/// ## Design Decisions
/// - **i64 (signed)**: receivables can legitimately go negative (partner
///   credit after an overpayment)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor currency units.
    ///
    /// ## Example
    /// ```rust
    /// use konsi_core::money::Money;
    ///
    /// let price = Money::from_minor(45_000);
    /// assert_eq!(price.minor(), 45_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor currency units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// This is how every ledger line total is computed: the store never
    /// trusts a client-sent total.
    ///
    /// ## Example
    /// ```rust
    /// use konsi_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(10_000);
    /// assert_eq!(unit_price.multiply_quantity(2).minor(), 20_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount (0-100) and returns the discounted
    /// amount, rounded to the nearest minor unit.
    ///
    /// The caller is responsible for validating the percentage range with
    /// [`crate::validation::validate_discount`].
    ///
    /// ## Example
    /// ```rust
    /// use konsi_core::money::Money;
    ///
    /// let price = Money::from_minor(45_000);
    /// assert_eq!(price.with_discount(10).minor(), 40_500);
    /// ```
    pub fn with_discount(&self, percent: u32) -> Money {
        if percent == 0 {
            return *self;
        }
        // Rounded integer math: (price * (100 - pct) + 50) / 100
        let kept = 100 - i64::from(percent.min(100));
        Money((self.0 * kept + 50) / 100)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in Indonesian-rupiah style
/// ("Rp45.000"), for logs and diagnostics only. Actual UI formatting belongs
/// to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp{}", sign, grouped)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(45_000);
        assert_eq!(money.minor(), 45_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(45_000)), "Rp45.000");
        assert_eq!(format!("{}", Money::from_minor(1_234_567)), "Rp1.234.567");
        assert_eq!(format!("{}", Money::from_minor(500)), "Rp500");
        assert_eq!(format!("{}", Money::from_minor(-5_000)), "-Rp5.000");
        assert_eq!(format!("{}", Money::zero()), "Rp0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(10_000);
        let b = Money::from_minor(4_000);

        assert_eq!((a + b).minor(), 14_000);
        assert_eq!((a - b).minor(), 6_000);
        assert_eq!((a * 3).minor(), 30_000);

        let mut c = a;
        c += b;
        assert_eq!(c.minor(), 14_000);
        c -= b;
        assert_eq!(c.minor(), 10_000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_minor(10_000);
        assert_eq!(unit_price.multiply_quantity(2).minor(), 20_000);
    }

    #[test]
    fn test_discount() {
        let price = Money::from_minor(45_000);
        assert_eq!(price.with_discount(0).minor(), 45_000);
        assert_eq!(price.with_discount(10).minor(), 40_500);
        assert_eq!(price.with_discount(100).minor(), 0);

        // Rounds to nearest: 99 * 0.85 = 84.15 → 84
        assert_eq!(Money::from_minor(99).with_discount(15).minor(), 84);
        // 10 * 0.25 = 2.5 → rounds up to 3
        assert_eq!(Money::from_minor(10).with_discount(75).minor(), 3);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let credit = Money::from_minor(-100);
        assert!(credit.is_negative());
        assert_eq!(credit.abs().minor(), 100);
    }
}
