//! # Pricing Module
//!
//! Pure functions converting a product plus its selected modifiers into a
//! unit price, and a unit price plus a quantity into a line total.
//!
//! ## Where Pricing Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Product "Coffee" (20000) + Modifier "Extra Shot" (5000)            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  unit_price(&coffee, &[extra_shot])  = 25000 sats                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  line_total(25000, qty 2)            = 50000 sats                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No rounding is involved: every input is already in the atomic currency
//! unit, so this is plain integer addition and multiplication. Malformed
//! modifier lists are the caller's responsibility to prevent via the
//! validated constructors in [`crate::types`].

use crate::money::Money;
use crate::types::{Modifier, Product};

/// Computes the unit price of a product with the given modifiers applied.
///
/// Unit price = base price + sum of each modifier's price delta.
///
/// ## Example
/// ```rust
/// use tally_core::pricing::unit_price;
/// use tally_core::types::{Modifier, Product};
///
/// let coffee = Product::new("prod-1", "Coffee", 20_000).unwrap();
/// let shot = Modifier::new("mod-1", "Extra Shot", 5_000).unwrap();
///
/// assert_eq!(unit_price(&coffee, &[]).sats(), 20_000);
/// assert_eq!(unit_price(&coffee, &[shot]).sats(), 25_000);
/// ```
pub fn unit_price(product: &Product, modifiers: &[Modifier]) -> Money {
    modifiers
        .iter()
        .fold(product.price(), |price, modifier| {
            price + modifier.price_delta()
        })
}

/// Computes a line total from a unit price and a quantity.
#[inline]
pub fn line_total(unit_price: Money, quantity: i64) -> Money {
    unit_price.multiply_quantity(quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> Product {
        Product::new("prod-coffee", "Coffee", 20_000).unwrap()
    }

    #[test]
    fn test_unit_price_without_modifiers() {
        assert_eq!(unit_price(&coffee(), &[]).sats(), 20_000);
    }

    #[test]
    fn test_unit_price_with_modifiers() {
        let shot = Modifier::new("mod-shot", "Extra Shot", 5_000).unwrap();
        let oat = Modifier::new("mod-oat", "Oat Milk", 2_000).unwrap();

        assert_eq!(unit_price(&coffee(), &[shot.clone()]).sats(), 25_000);
        assert_eq!(unit_price(&coffee(), &[shot, oat]).sats(), 27_000);
    }

    #[test]
    fn test_unit_price_zero_delta_modifier() {
        let decaf = Modifier::new("mod-decaf", "Decaf", 0).unwrap();
        assert_eq!(unit_price(&coffee(), &[decaf]).sats(), 20_000);
    }

    #[test]
    fn test_line_total() {
        let unit = unit_price(&coffee(), &[]);
        assert_eq!(line_total(unit, 1).sats(), 20_000);
        assert_eq!(line_total(unit, 3).sats(), 60_000);
    }
}
