//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐    │
//! │  │    Product      │   │    Modifier     │   │    Discount     │    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │    │
//! │  │  id             │   │  id             │   │  Percentage(%)  │    │
//! │  │  name           │   │  name           │   │  Fixed(sats)    │    │
//! │  │  price_sats     │   │  price_delta    │   │                 │    │
//! │  │  category_id    │   │                 │   │  one per cart   │    │
//! │  │  is_active      │   │  zero or more   │   │  clamped, never │    │
//! │  │                 │   │  per cart line  │   │  negative total │    │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and modifiers are owned by the catalog collaborator; the cart
//! only ever reads them and freezes copies into its lines. The cart never
//! looks products up by id, it stores whatever reference it is given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_modifier_name, validate_price_sats, validate_product_name};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown on the cart line and on the order.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Base price in satoshis (smallest currency unit).
    pub price_sats: i64,

    /// Category this product is listed under, if any.
    pub category_id: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new active product after validating its fields.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::Product;
    ///
    /// let coffee = Product::new("prod-1", "Coffee", 20_000).unwrap();
    /// assert_eq!(coffee.price().sats(), 20_000);
    /// assert!(coffee.is_active);
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_sats: i64) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }
        validate_product_name(&name)?;
        validate_price_sats(price_sats)?;

        let now = Utc::now();
        Ok(Product {
            id,
            name,
            description: None,
            price_sats,
            category_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the base price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_sats(self.price_sats)
    }
}

// =============================================================================
// Modifier
// =============================================================================

/// An optional add-on to a product that changes its price.
///
/// Modifiers are attached to a cart line at add-time and are immutable once
/// attached. The price delta is zero or positive: a modifier can make an
/// item more expensive, never cheaper (discounts handle the other
/// direction, at cart level).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Modifier {
    /// Unique identifier.
    pub id: String,

    /// Display name, e.g. "Extra Shot".
    pub name: String,

    /// Price delta in satoshis (zero or positive).
    pub price_delta_sats: i64,
}

impl Modifier {
    /// Creates a new modifier after validating its fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price_delta_sats: i64,
    ) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }
        validate_modifier_name(&name)?;
        validate_price_sats(price_delta_sats)?;

        Ok(Modifier {
            id,
            name,
            price_delta_sats,
        })
    }

    /// Returns the price delta as a Money type.
    #[inline]
    pub fn price_delta(&self) -> Money {
        Money::from_sats(self.price_delta_sats)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount applied once to the cart's pre-discount subtotal.
///
/// At most one discount is active per cart; applying a new one replaces
/// the old one. Magnitudes are clamped at construction so that the cart
/// total can never go negative:
///
/// - `Percentage` is clamped to 0..=100
/// - `Fixed` amounts are clamped to be non-negative, and again to the
///   subtotal when the amount off is computed
///
/// ## Serialized Form
/// ```json
/// { "kind": "percentage", "magnitude": 10 }
/// { "kind": "fixed", "magnitude": 5000 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "magnitude", rename_all = "snake_case")]
pub enum Discount {
    /// Percentage of the subtotal, in whole points (0-100).
    Percentage(u32),
    /// Absolute amount in satoshis.
    Fixed(i64),
}

impl Discount {
    /// Kind strings accepted by [`Discount::parse`].
    pub const KINDS: [&'static str; 2] = ["percentage", "fixed"];

    /// Creates a percentage discount, clamping to 0..=100.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::Discount;
    ///
    /// assert_eq!(Discount::percentage(10), Discount::Percentage(10));
    /// assert_eq!(Discount::percentage(250), Discount::Percentage(100));
    /// ```
    pub fn percentage(percent: u32) -> Self {
        Discount::Percentage(percent.min(100))
    }

    /// Creates a fixed discount, clamping negative amounts to zero.
    pub fn fixed(sats: i64) -> Self {
        Discount::Fixed(sats.max(0))
    }

    /// Parses a discount from an untyped (kind, magnitude) pair.
    ///
    /// This is the boundary for UI input: an unrecognized kind is rejected
    /// and the cart is left unchanged, while an out-of-range magnitude is
    /// clamped rather than rejected so the checkout flow is never
    /// interrupted over a sloppy value.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::Discount;
    ///
    /// assert_eq!(
    ///     Discount::parse("percentage", 10).unwrap(),
    ///     Discount::Percentage(10)
    /// );
    /// assert!(Discount::parse("bogo", 1).is_err());
    /// ```
    pub fn parse(kind: &str, magnitude: i64) -> Result<Self, ValidationError> {
        match kind {
            "percentage" => Ok(Discount::percentage(magnitude.clamp(0, 100) as u32)),
            "fixed" => Ok(Discount::fixed(magnitude)),
            _ => Err(ValidationError::NotAllowed {
                field: "discount kind".to_string(),
                allowed: Self::KINDS.iter().map(|k| k.to_string()).collect(),
            }),
        }
    }

    /// Computes the amount taken off the given subtotal.
    ///
    /// The result is clamped to the subtotal, so
    /// `subtotal - amount_off(subtotal)` is never negative.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{money::Money, types::Discount};
    ///
    /// let subtotal = Money::from_sats(20_000);
    /// assert_eq!(Discount::percentage(10).amount_off(subtotal).sats(), 2_000);
    /// assert_eq!(Discount::fixed(50_000).amount_off(subtotal), subtotal);
    /// ```
    pub fn amount_off(&self, subtotal: Money) -> Money {
        let amount = match self {
            // Direct enum construction can bypass the clamping
            // constructors, so clamp again here.
            Discount::Percentage(percent) => subtotal.percent_of((*percent).min(100)),
            Discount::Fixed(sats) => Money::from_sats((*sats).max(0)),
        };
        amount.min(subtotal)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_new_validates() {
        let coffee = Product::new("prod-1", "Coffee", 20_000).unwrap();
        assert_eq!(coffee.name, "Coffee");
        assert_eq!(coffee.price().sats(), 20_000);
        assert!(coffee.is_active);

        assert!(Product::new("", "Coffee", 20_000).is_err());
        assert!(Product::new("prod-1", "", 20_000).is_err());
        assert!(Product::new("prod-1", "Coffee", -1).is_err());
    }

    #[test]
    fn test_modifier_new_validates() {
        let shot = Modifier::new("mod-1", "Extra Shot", 5_000).unwrap();
        assert_eq!(shot.price_delta().sats(), 5_000);

        // Zero delta is a valid modifier (e.g. "Decaf")
        assert!(Modifier::new("mod-2", "Decaf", 0).is_ok());

        assert!(Modifier::new("mod-3", "Negative", -100).is_err());
        assert!(Modifier::new("", "Extra Shot", 5_000).is_err());
    }

    #[test]
    fn test_discount_constructors_clamp() {
        assert_eq!(Discount::percentage(250), Discount::Percentage(100));
        assert_eq!(Discount::fixed(-500), Discount::Fixed(0));
    }

    #[test]
    fn test_discount_parse() {
        assert_eq!(
            Discount::parse("percentage", 10).unwrap(),
            Discount::Percentage(10)
        );
        assert_eq!(Discount::parse("fixed", 5_000).unwrap(), Discount::Fixed(5_000));

        // Out-of-range magnitudes clamp instead of erroring
        assert_eq!(
            Discount::parse("percentage", 400).unwrap(),
            Discount::Percentage(100)
        );
        assert_eq!(
            Discount::parse("percentage", -5).unwrap(),
            Discount::Percentage(0)
        );
        assert_eq!(Discount::parse("fixed", -5_000).unwrap(), Discount::Fixed(0));

        // Unknown kinds are rejected
        let err = Discount::parse("bogo", 1).unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_discount_amount_off() {
        let subtotal = Money::from_sats(20_000);

        assert_eq!(
            Discount::percentage(10).amount_off(subtotal).sats(),
            2_000
        );
        assert_eq!(Discount::fixed(5_000).amount_off(subtotal).sats(), 5_000);

        // Fixed discount larger than subtotal clamps to the subtotal
        assert_eq!(Discount::fixed(50_000).amount_off(subtotal), subtotal);

        // Raw enum values outside the valid range still clamp
        assert_eq!(Discount::Percentage(900).amount_off(subtotal), subtotal);
        assert_eq!(Discount::Fixed(-42).amount_off(subtotal), Money::zero());
    }

    #[test]
    fn test_discount_serialized_form() {
        let json = serde_json::to_value(Discount::Percentage(10)).unwrap();
        assert_eq!(json["kind"], "percentage");
        assert_eq!(json["magnitude"], 10);

        let json = serde_json::to_value(Discount::Fixed(5_000)).unwrap();
        assert_eq!(json["kind"], "fixed");
        assert_eq!(json["magnitude"], 5_000);
    }
}
