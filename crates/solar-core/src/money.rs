//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    10_000_001 × 1.1 = 11000001.100000001  ❌ drift                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer đồng                                             │
//! │    Every price, line total and subtotal is an exact i64.                │
//! │    Percentages and divisions round ONCE, explicitly, half up.           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use solar_core::money::Money;
//!
//! let panel = Money::from_dong(2_500_000);
//! let line_total = panel.checked_multiply_quantity(5).unwrap();
//! assert_eq!(line_total.dong(), 12_500_000);
//!
//! // Line totals that do not fit in an i64 are refused, not wrapped.
//! assert!(panel.checked_multiply_quantity(10_000_000_000_000).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Rounding
// =============================================================================

/// Divides and rounds half up (towards positive infinity), the same rule the
/// quote sheet has always used for VAT, totals and installments.
fn round_div(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

/// Narrows an i128 intermediate back to đồng, `None` when it does not fit.
fn narrow(value: i128) -> Option<Money> {
    i64::try_from(value).ok().map(Money)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Vietnamese đồng (VND has no minor unit in use).
///
/// ## Design Decisions
/// - **i64 (signed)**: price differences and adjustments can be negative
/// - **Single field tuple struct**: serializes as a bare JSON number
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CatalogItem.price ──► QuoteLineItem.unit_price ──► line total_price   │
/// │                                                                         │
/// │  Quote.subtotal ──► VAT ──► Quote.total ──► USD / installments         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole đồng.
    #[inline]
    pub const fn from_dong(dong: i64) -> Self {
        Money(dong)
    }

    /// Creates a Money value from an estimated amount, rounding half up.
    ///
    /// Only for derived estimates (savings from kWh × tariff). Catalog prices
    /// and quote arithmetic never pass through floating point.
    pub fn round_from_estimate(amount: f64) -> Self {
        Money(amount.round() as i64)
    }

    /// Returns the value in đồng.
    #[inline]
    pub const fn dong(&self) -> i64 {
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

    /// Calculates tax at `rate`, rounded half up.
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::money::Money;
    /// use solar_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_dong(12_345);
    /// let vat = subtotal.calculate_tax(TaxRate::from_bps(1000)).unwrap(); // 10%
    /// // 1234.5 → 1235
    /// assert_eq!(vat.dong(), 1235);
    /// ```
    ///
    /// `None` only for a rate above 100% on an amount near `i64::MAX`.
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        narrow(round_div(self.0 as i128 * rate.bps() as i128, 10_000))
    }

    /// Returns the amount grossed up by `rate` (amount × (1 + rate)), rounded
    /// half up as a single operation.
    ///
    /// This is NOT `self + self.calculate_tax(rate)`: the gross is rounded on
    /// its own, so it may differ from that sum by at most one đồng.
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::money::Money;
    /// use solar_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_dong(10_000_000);
    /// let total = subtotal.gross_up(TaxRate::from_bps(1000)).unwrap();
    /// assert_eq!(total.dong(), 11_000_000);
    /// ```
    ///
    /// `None` when the grossed-up amount does not fit in an i64.
    pub fn gross_up(&self, rate: TaxRate) -> Option<Money> {
        narrow(round_div(
            self.0 as i128 * (10_000 + rate.bps() as i128),
            10_000,
        ))
    }

    /// Divides into `parts` and rounds half up. `parts` must be positive.
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::money::Money;
    ///
    /// let total = Money::from_dong(11_000_000);
    /// assert_eq!(total.divide_rounded(12).dong(), 916_667);
    /// ```
    pub fn divide_rounded(&self, parts: i64) -> Money {
        // |x / parts| <= |x| for parts >= 1, so the quotient always fits
        Money(round_div(self.0 as i128, parts as i128) as i64)
    }

    /// Multiplies money by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }

    /// Multiplies money by a quantity, clamping at the i64 bounds.
    ///
    /// For derived estimates only; quote lines use
    /// [`Money::checked_multiply_quantity`].
    #[inline]
    pub const fn saturating_multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Vietnamese grouping: `1.250.000 ₫`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} ₫", sign, grouped)
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
