//! # Cart Store
//!
//! The in-memory shopping cart: an insertion-ordered collection of line
//! items plus at most one active discount.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cart Store Operations                         │
//! │                                                                     │
//! │  Frontend Action       Session Operation       Cart State Change    │
//! │  ───────────────       ─────────────────       ─────────────────    │
//! │                                                                     │
//! │  Click Product ───────► add_to_cart() ───────► merge or push line   │
//! │                                                                     │
//! │  Change Quantity ─────► set_quantity() ──────► lines[i].qty = n     │
//! │                                                                     │
//! │  Enter Discount ──────► apply_discount() ────► discount = Some(d)   │
//! │                                                                     │
//! │  Click Clear ─────────► clear_cart() ────────► lines.clear()        │
//! │                                                                     │
//! │  EVERY mutation ends with recompute(): totals are stored state,     │
//! │  updated before the mutating call returns, never computed lazily.   │
//! │  A read between two operations always observes a consistent total.  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Identity
//! A line is identified by its product id plus the SORTED set of applied
//! modifier ids. Adding "Coffee + Extra Shot" twice merges into one line
//! with quantity 2; "Coffee" plain and "Coffee + Extra Shot" are two
//! separate lines. Modifier ordering is irrelevant to identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use tally_core::error::CoreResult;
use tally_core::pricing;
use tally_core::validation::validate_quantity;
use tally_core::{CoreError, Discount, Modifier, Money, Product};
use tally_core::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Line Item
// =============================================================================

/// One distinct product+modifier combination in the cart.
///
/// ## Design Notes
/// - `product_id`: reference back to the catalog product
/// - name, unit price, and modifiers are frozen copies of catalog data at
///   add-time. The cart displays consistent data even if the catalog
///   changes after the item was added.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable identity of this line: product id + sorted modifier ids.
    pub line_key: String,

    /// Product ID this line refers to.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in satoshis at time of adding (frozen):
    /// base price + sum of modifier deltas.
    pub unit_price_sats: i64,

    /// Modifiers applied to this line (frozen, deduplicated by id,
    /// first-occurrence order preserved for display).
    pub modifiers: Vec<Modifier>,

    /// Quantity in cart (always positive; a quantity of zero removes
    /// the line instead).
    pub quantity: i64,

    /// When this line was first added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Computes the identity key for a product + modifier combination.
    ///
    /// Modifier ids are sorted before joining so that two selections of
    /// the same modifiers in different order produce the same key.
    ///
    /// ## Example
    /// ```rust
    /// use tally_checkout::LineItem;
    /// use tally_core::types::Modifier;
    ///
    /// let shot = Modifier::new("shot", "Extra Shot", 5_000).unwrap();
    /// let oat = Modifier::new("oat", "Oat Milk", 2_000).unwrap();
    ///
    /// assert_eq!(LineItem::key_for("prod-1", &[]), "prod-1");
    /// assert_eq!(
    ///     LineItem::key_for("prod-1", &[shot.clone(), oat.clone()]),
    ///     LineItem::key_for("prod-1", &[oat, shot])
    /// );
    /// ```
    pub fn key_for(product_id: &str, modifiers: &[Modifier]) -> String {
        if modifiers.is_empty() {
            return product_id.to_string();
        }

        let mut ids: Vec<&str> = modifiers.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        format!("{}::{}", product_id, ids.join("+"))
    }

    /// Creates a new cart line from a product, quantity, and modifiers.
    ///
    /// ## Price Freezing
    /// The unit price is captured at this moment. If the product or
    /// modifier prices change in the catalog, this line retains the
    /// original price.
    fn from_product(product: &Product, quantity: i64, modifiers: Vec<Modifier>) -> Self {
        let unit_price = pricing::unit_price(product, &modifiers);

        LineItem {
            line_key: Self::key_for(&product.id, &modifiers),
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_sats: unit_price.sats(),
            modifiers,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_sats(self.unit_price_sats)
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        pricing::line_total(self.unit_price(), self.quantity)
    }

    /// Calculates the line total in satoshis.
    #[inline]
    pub fn line_total_sats(&self) -> i64 {
        self.line_total().sats()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived cart totals, recomputed after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct lines.
    pub line_count: usize,

    /// Total quantity across all lines.
    pub total_quantity: i64,

    /// Sum of line totals before discount.
    pub subtotal_sats: i64,

    /// Amount taken off by the active discount (clamped to the subtotal).
    pub discount_sats: i64,

    /// Final total: max(0, subtotal - discount).
    pub total_sats: i64,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by (product id, sorted modifier id set); adding the
///   same combination again increases quantity
/// - Quantity is always positive (setting quantity to 0 removes the line)
/// - At most one active discount; applying a new one replaces it
/// - `totals` always reflects the current lines and discount; every
///   mutating operation ends with a recompute before it returns
/// - Maximum distinct lines: 100, maximum quantity per line: 999
///   (configured in tally-core)
///
/// Fields are private so the invariants cannot be bypassed; reads go
/// through the accessors, mutations through the operations below.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Lines in insertion order.
    lines: Vec<LineItem>,

    /// The active discount, if any.
    discount: Option<Discount>,

    /// Stored totals, recomputed on every mutation.
    totals: CartTotals,

    /// When the cart was created/last cleared.
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            discount: None,
            totals: CartTotals::default(),
            created_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Lines in insertion order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// The active discount, if any.
    pub fn discount(&self) -> Option<Discount> {
        self.discount
    }

    /// Current totals. Always consistent with lines and discount.
    pub fn totals(&self) -> &CartTotals {
        &self.totals
    }

    /// When the cart was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a product to the cart or increases quantity if an identical
    /// product+modifier combination is already present.
    ///
    /// ## Behavior
    /// - Quantity must be positive; zero or negative is rejected with a
    ///   validation error and the cart is left unchanged
    /// - Modifiers are deduplicated by id (first occurrence wins)
    /// - No catalog lookup happens here: the product reference is stored
    ///   as given, unknown ids included
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: i64,
        modifiers: &[Modifier],
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let mut applied: Vec<Modifier> = Vec::with_capacity(modifiers.len());
        for modifier in modifiers {
            if !applied.iter().any(|m| m.id == modifier.id) {
                applied.push(modifier.clone());
            }
        }

        let key = LineItem::key_for(&product.id, &applied);

        if let Some(line) = self.lines.iter_mut().find(|l| l.line_key == key) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
        } else {
            if self.lines.len() >= MAX_CART_LINES {
                return Err(CoreError::CartTooLarge {
                    max: MAX_CART_LINES,
                });
            }
            self.lines
                .push(LineItem::from_product(product, quantity, applied));
        }

        self.recompute();
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - Quantity 0: removes the line entirely (no zero-quantity entries)
    /// - Negative quantity: rejected
    /// - Unknown line key: returns `LineNotFound`
    pub fn set_quantity(&mut self, line_key: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(line_key);
        }

        validate_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.line_key == line_key)
            .ok_or_else(|| CoreError::LineNotFound(line_key.to_string()))?;

        line.quantity = quantity;
        self.recompute();
        Ok(())
    }

    /// Removes a line from the cart by line key.
    pub fn remove_line(&mut self, line_key: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.line_key != line_key);

        if self.lines.len() == initial_len {
            return Err(CoreError::LineNotFound(line_key.to_string()));
        }

        self.recompute();
        Ok(())
    }

    /// Applies a discount to the cart, replacing any existing one.
    ///
    /// Never fails: magnitudes are clamped at construction and the amount
    /// off is clamped to the subtotal at recompute time, so the total can
    /// never go negative.
    pub fn apply_discount(&mut self, discount: Discount) {
        self.discount = Some(discount);
        self.recompute();
    }

    /// Removes the active discount, if any.
    pub fn remove_discount(&mut self) {
        self.discount = None;
        self.recompute();
    }

    /// Clears all lines and the discount. Idempotent.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = None;
        self.created_at = Utc::now();
        self.recompute();
    }

    /// Recomputes the stored totals from lines and discount.
    ///
    /// Called at the end of every mutation, inside the same `&mut self`
    /// borrow, so no caller can observe a cart whose totals are stale.
    fn recompute(&mut self) {
        let subtotal = self
            .lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total());

        let discount_amount = self
            .discount
            .map(|d| d.amount_off(subtotal))
            .unwrap_or_default();

        let total = (subtotal - discount_amount).max(Money::zero());

        self.totals = CartTotals {
            line_count: self.lines.len(),
            total_quantity: self.lines.iter().map(|l| l.quantity).sum(),
            subtotal_sats: subtotal.sats(),
            discount_sats: discount_amount.sats(),
            total_sats: total.sats(),
        };
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
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

    fn extra_shot() -> Modifier {
        Modifier::new("mod-shot", "Extra Shot", 5_000).unwrap()
    }

    fn oat_milk() -> Modifier {
        Modifier::new("mod-oat", "Oat Milk", 2_000).unwrap()
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[]).unwrap();

        assert_eq!(cart.totals().line_count, 1);
        assert_eq!(cart.totals().total_quantity, 1);
        assert_eq!(cart.totals().subtotal_sats, 20_000);
        assert_eq!(cart.totals().total_sats, 20_000);
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut cart = Cart::new();

        // Coffee qty 1, then 2 more of the same product, no modifiers:
        // one line, quantity 3, total 60000
        cart.add_line(&coffee(), 1, &[]).unwrap();
        cart.add_line(&coffee(), 2, &[]).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.totals().total_sats, 60_000);
    }

    #[test]
    fn test_modifier_changes_unit_price() {
        let mut cart = Cart::new();

        // Coffee (20000) + Extra Shot (5000), qty 1 → total 25000
        cart.add_line(&coffee(), 1, &[extra_shot()]).unwrap();

        assert_eq!(cart.lines()[0].unit_price_sats, 25_000);
        assert_eq!(cart.totals().total_sats, 25_000);
    }

    #[test]
    fn test_different_modifier_sets_are_separate_lines() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[]).unwrap();
        cart.add_line(&coffee(), 1, &[extra_shot()]).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.totals().subtotal_sats, 45_000);
    }

    #[test]
    fn test_modifier_order_does_not_matter() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[extra_shot(), oat_milk()])
            .unwrap();
        cart.add_line(&coffee(), 1, &[oat_milk(), extra_shot()])
            .unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].unit_price_sats, 27_000);
    }

    #[test]
    fn test_duplicate_modifiers_deduplicated() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[extra_shot(), extra_shot()])
            .unwrap();

        assert_eq!(cart.lines()[0].modifiers.len(), 1);
        assert_eq!(cart.lines()[0].unit_price_sats, 25_000);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();

        assert!(cart.add_line(&coffee(), 0, &[]).is_err());
        assert!(cart.add_line(&coffee(), -3, &[]).is_err());

        // Rejected operations leave the cart unchanged
        assert!(cart.is_empty());
        assert_eq!(cart.totals().total_sats, 0);
    }

    #[test]
    fn test_add_rejects_quantity_above_max() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 999, &[]).unwrap();
        let err = cart.add_line(&coffee(), 1, &[]).unwrap_err();

        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart.lines()[0].quantity, 999);
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::new();

        for i in 0..100 {
            let product = Product::new(format!("prod-{i}"), format!("Product {i}"), 1_000).unwrap();
            cart.add_line(&product, 1, &[]).unwrap();
        }

        let overflow = Product::new("prod-overflow", "One Too Many", 1_000).unwrap();
        let err = cart.add_line(&overflow, 1, &[]).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
        assert_eq!(cart.totals().line_count, 100);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add_line(&coffee(), 1, &[]).unwrap();
        let key = cart.lines()[0].line_key.clone();

        cart.set_quantity(&key, 5).unwrap();
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.totals().total_sats, 100_000);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_line(&coffee(), 2, &[]).unwrap();
        let key = cart.lines()[0].line_key.clone();

        cart.set_quantity(&key, 0).unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.totals().total_sats, 0);
    }

    #[test]
    fn test_set_quantity_rejects_negative() {
        let mut cart = Cart::new();
        cart.add_line(&coffee(), 2, &[]).unwrap();
        let key = cart.lines()[0].line_key.clone();

        assert!(cart.set_quantity(&key, -1).is_err());
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_remove_line_unknown_key() {
        let mut cart = Cart::new();

        let err = cart.remove_line("no-such-line").unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound(_)));
    }

    #[test]
    fn test_percentage_discount() {
        let mut cart = Cart::new();

        // Coffee 20000, qty 1, 10% discount → total 18000
        cart.add_line(&coffee(), 1, &[]).unwrap();
        cart.apply_discount(Discount::percentage(10));

        assert_eq!(cart.totals().subtotal_sats, 20_000);
        assert_eq!(cart.totals().discount_sats, 2_000);
        assert_eq!(cart.totals().total_sats, 18_000);
    }

    #[test]
    fn test_fixed_discount_clamps_to_zero() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[]).unwrap();
        cart.apply_discount(Discount::fixed(50_000));

        assert_eq!(cart.totals().discount_sats, 20_000);
        assert_eq!(cart.totals().total_sats, 0);
    }

    #[test]
    fn test_discount_is_replaced_not_stacked() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[]).unwrap();
        cart.apply_discount(Discount::percentage(50));
        cart.apply_discount(Discount::percentage(10));

        assert_eq!(cart.discount(), Some(Discount::Percentage(10)));
        assert_eq!(cart.totals().total_sats, 18_000);
    }

    #[test]
    fn test_discount_recomputed_when_lines_change() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[]).unwrap();
        cart.apply_discount(Discount::percentage(10));
        cart.add_line(&coffee(), 2, &[]).unwrap();

        // 60000 subtotal, 10% off → 54000
        assert_eq!(cart.totals().subtotal_sats, 60_000);
        assert_eq!(cart.totals().total_sats, 54_000);
    }

    #[test]
    fn test_remove_discount() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 1, &[]).unwrap();
        cart.apply_discount(Discount::percentage(10));
        cart.remove_discount();

        assert_eq!(cart.discount(), None);
        assert_eq!(cart.totals().total_sats, 20_000);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = Cart::new();

        cart.add_line(&coffee(), 2, &[extra_shot()]).unwrap();
        cart.apply_discount(Discount::fixed(1_000));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.discount(), None);
        assert_eq!(cart.totals(), &CartTotals::default());

        // Clearing again is a no-op
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.totals(), &CartTotals::default());
    }

    #[test]
    fn test_line_key_for() {
        assert_eq!(LineItem::key_for("prod-1", &[]), "prod-1");

        let key_a = LineItem::key_for("prod-1", &[extra_shot(), oat_milk()]);
        let key_b = LineItem::key_for("prod-1", &[oat_milk(), extra_shot()]);
        assert_eq!(key_a, key_b);
        assert_eq!(key_a, "prod-1::mod-oat+mod-shot");
    }
}
