//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                        │
//! │                                                                     │
//! │  In many retail systems:                                            │
//! │    10000 sats / 3 = 3333.33... → Where did the fraction go?         │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Satoshis                                     │
//! │    Every price is already in the atomic unit. There is nothing      │
//! │    smaller than one satoshi, so integer arithmetic is exact.        │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! // Create from satoshis (the only way)
//! let price = Money::from_sats(20_000);
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // 40000 sats
//! let total = price + Money::from_sats(5_000);  // 25000 sats
//!
//! // NEVER do this:
//! // let bad = Money::from_float(0.0002); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in satoshis (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │                       Where Money is Used                           │
/// │                                                                     │
/// │  Product.price_sats ──┬──► LineItem.unit_price ──► line total       │
/// │                       │                                             │
/// │  Modifier.delta ──────┘                                             │
/// │                                                                     │
/// │  Cart.subtotal ──► Discount amount ──► Cart.total                   │
/// │                                                                     │
/// │  EVERY monetary value in the system flows through this type         │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from satoshis (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_sats(20_000);
    /// assert_eq!(price.sats(), 20_000);
    /// ```
    ///
    /// ## Why Satoshis?
    /// Using the atomic unit eliminates all floating-point concerns.
    /// Calculations and the API all use satoshis. A currency conversion
    /// collaborator turns display currency into sats before calling us.
    #[inline]
    pub const fn from_sats(sats: i64) -> Self {
        Money(sats)
    }

    /// Returns the value in satoshis.
    #[inline]
    pub const fn sats(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert_eq!(zero.sats(), 0);
    /// assert!(zero.is_zero());
    /// ```
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

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_sats(20_000);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.sats(), 60_000);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Coffee 20000 sats
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: 60000 sats
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes a percentage of this amount, rounding half up.
    ///
    /// ## Arguments
    /// * `percent` - Percentage in whole points (10 = 10%)
    ///
    /// ## Implementation
    /// Integer math with an i128 intermediate to prevent overflow:
    /// `(sats * percent + 50) / 100`. The +50 provides rounding
    /// (50/100 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let subtotal = Money::from_sats(20_000);
    /// assert_eq!(subtotal.percent_of(10).sats(), 2_000);
    ///
    /// // Rounding: 15 sats at 10% = 1.5 → 2
    /// assert_eq!(Money::from_sats(15).percent_of(10).sats(), 2);
    /// ```
    pub fn percent_of(&self, percent: u32) -> Money {
        let part = (self.0 as i128 * percent as i128 + 50) / 100;
        Money::from_sats(part as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle fiat conversion and localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sats", self.0)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
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
