//! # Checkout Session
//!
//! The facade presentation layers talk to. One `CheckoutSession` owns one
//! cart for the lifetime of one UI session.
//!
//! ## Reactive Snapshots
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Snapshot Publication Flow                         │
//! │                                                                     │
//! │  session.add_to_cart(&coffee, 1, &[])                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  lock cart ── mutate ── recompute totals ── build CartSnapshot      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  watch channel: send_replace(snapshot)                              │
//! │       │                                                             │
//! │       ├──► returned to the caller                                   │
//! │       │                                                             │
//! │       └──► every subscriber sees the new value                      │
//! │                                                                     │
//! │  FAILED operations publish nothing: the cart and the last           │
//! │  published snapshot stay exactly as they were.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Watch Channel?
//! Presentation layers want "the current cart" rather than a history of
//! mutations. `tokio::sync::watch` keeps exactly the latest value, never
//! blocks the sender, and works without a runtime for synchronous reads.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<_>>`: the session is `Sync` so a UI
//! runtime may call it from its own threads, but operations are short
//! lock-mutate-publish sequences and never suspend. Within one session
//! operations apply strictly in dispatch order.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use tally_core::error::CoreResult;
use tally_core::{Discount, Modifier, Product};

use crate::cart::{Cart, CartTotals, LineItem};
use crate::error::CheckoutError;

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Immutable snapshot of the cart, published after every mutation.
///
/// This is the only cart view presentation layers ever see; they cannot
/// reach the live `Cart` and so cannot observe a half-applied mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub lines: Vec<LineItem>,

    /// The active discount, if any.
    pub discount: Option<Discount>,

    /// Totals consistent with `lines` and `discount`.
    pub totals: CartTotals,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot {
            lines: cart.lines().to_vec(),
            discount: cart.discount(),
            totals: cart.totals().clone(),
        }
    }
}

// =============================================================================
// Checkout Session
// =============================================================================

/// A checkout session: one cart, one owner, explicit construction.
///
/// There is no global cart. Whatever hosts the UI session constructs a
/// `CheckoutSession` and passes it to the layers that need it; when the
/// session ends the cart goes with it. This keeps cart state out of
/// process-wide mutable globals and makes tests trivial.
///
/// ## Example
/// ```rust
/// use tally_checkout::CheckoutSession;
/// use tally_core::types::Product;
///
/// let session = CheckoutSession::new();
/// let mut updates = session.subscribe();
///
/// let coffee = Product::new("prod-1", "Coffee", 20_000).unwrap();
/// session.add_to_cart(&coffee, 1, &[]).unwrap();
///
/// assert!(updates.has_changed().unwrap());
/// assert_eq!(updates.borrow_and_update().totals.total_sats, 20_000);
/// ```
#[derive(Debug)]
pub struct CheckoutSession {
    /// Session identity, carried in logs and handed to the order
    /// collaborator when the cart is turned into an order.
    session_id: String,

    /// The live cart. Exclusive access via the mutex.
    cart: Arc<Mutex<Cart>>,

    /// Publisher side of the snapshot channel. Also stores the latest
    /// snapshot for cheap `snapshot()` reads.
    snapshot_tx: watch::Sender<CartSnapshot>,
}

impl CheckoutSession {
    /// Creates a new session with an empty cart.
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(CartSnapshot::default());
        let session = CheckoutSession {
            session_id: Uuid::new_v4().to_string(),
            cart: Arc::new(Mutex::new(Cart::new())),
            snapshot_tx,
        };
        debug!(session_id = %session.session_id, "checkout session created");
        session
    }

    /// This session's unique identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Subscribes to snapshot updates.
    ///
    /// The receiver immediately holds the latest snapshot and is marked
    /// changed on every subsequent successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a product to the cart, merging with an existing line when the
    /// product and modifier set match.
    ///
    /// The caller (catalog collaborator) is responsible for checking that
    /// the product is active and for converting display currency to sats
    /// before calling; this layer stores the reference as given.
    pub fn add_to_cart(
        &self,
        product: &Product,
        quantity: i64,
        modifiers: &[Modifier],
    ) -> Result<CartSnapshot, CheckoutError> {
        debug!(
            session_id = %self.session_id,
            product_id = %product.id,
            quantity,
            modifier_count = modifiers.len(),
            "add_to_cart"
        );
        self.try_apply(|cart| cart.add_line(product, quantity, modifiers))
    }

    /// Applies a discount, replacing any existing one. Never fails.
    pub fn apply_discount(&self, discount: Discount) -> CartSnapshot {
        debug!(session_id = %self.session_id, ?discount, "apply_discount");
        self.apply(|cart| cart.apply_discount(discount))
    }

    /// Applies a discount from untyped UI input.
    ///
    /// Unknown kinds are rejected and the cart is left unchanged;
    /// out-of-range magnitudes are clamped, not rejected.
    pub fn apply_discount_input(
        &self,
        kind: &str,
        magnitude: i64,
    ) -> Result<CartSnapshot, CheckoutError> {
        debug!(session_id = %self.session_id, kind, magnitude, "apply_discount_input");
        let discount = Discount::parse(kind, magnitude)?;
        Ok(self.apply_discount(discount))
    }

    /// Removes the active discount, if any.
    pub fn remove_discount(&self) -> CartSnapshot {
        debug!(session_id = %self.session_id, "remove_discount");
        self.apply(|cart| cart.remove_discount())
    }

    /// Sets the quantity of a line; quantity 0 removes it.
    pub fn set_quantity(
        &self,
        line_key: &str,
        quantity: i64,
    ) -> Result<CartSnapshot, CheckoutError> {
        debug!(session_id = %self.session_id, line_key, quantity, "set_quantity");
        self.try_apply(|cart| cart.set_quantity(line_key, quantity))
    }

    /// Removes a line from the cart.
    pub fn remove_line(&self, line_key: &str) -> Result<CartSnapshot, CheckoutError> {
        debug!(session_id = %self.session_id, line_key, "remove_line");
        self.try_apply(|cart| cart.remove_line(line_key))
    }

    /// Clears the cart: no lines, no discount, zero totals. Idempotent.
    pub fn clear_cart(&self) -> CartSnapshot {
        debug!(session_id = %self.session_id, "clear_cart");
        self.apply(|cart| cart.clear())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Runs an infallible mutation, then publishes and returns the fresh
    /// snapshot.
    fn apply<F>(&self, f: F) -> CartSnapshot
    where
        F: FnOnce(&mut Cart),
    {
        let mut cart = self.cart.lock().expect("cart mutex poisoned");
        f(&mut cart);
        self.publish(&cart)
    }

    /// Runs a fallible mutation. On success publishes and returns the
    /// fresh snapshot; on failure publishes nothing (the cart itself was
    /// left untouched by the store).
    fn try_apply<F>(&self, f: F) -> Result<CartSnapshot, CheckoutError>
    where
        F: FnOnce(&mut Cart) -> CoreResult<()>,
    {
        let mut cart = self.cart.lock().expect("cart mutex poisoned");
        f(&mut cart)?;
        Ok(self.publish(&cart))
    }

    /// Publishes the cart's current state on the watch channel.
    fn publish(&self, cart: &Cart) -> CartSnapshot {
        let snapshot = CartSnapshot::from(cart);
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}

impl Default for CheckoutSession {
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
    use crate::error::ErrorCode;

    fn coffee() -> Product {
        Product::new("prod-coffee", "Coffee", 20_000).unwrap()
    }

    fn extra_shot() -> Modifier {
        Modifier::new("mod-shot", "Extra Shot", 5_000).unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = CheckoutSession::new();
        let snapshot = session.snapshot();

        assert!(snapshot.lines.is_empty());
        assert_eq!(snapshot.discount, None);
        assert_eq!(snapshot.totals, CartTotals::default());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = CheckoutSession::new();
        let b = CheckoutSession::new();
        assert_ne!(a.session_id(), b.session_id());
    }

    #[test]
    fn test_add_to_cart_returns_and_publishes_snapshot() {
        let session = CheckoutSession::new();
        let mut updates = session.subscribe();

        let returned = session.add_to_cart(&coffee(), 1, &[]).unwrap();

        assert!(updates.has_changed().unwrap());
        let published = updates.borrow_and_update().clone();
        assert_eq!(published.totals.total_sats, 20_000);
        assert_eq!(published.totals.total_sats, returned.totals.total_sats);
        assert_eq!(published.lines.len(), returned.lines.len());
    }

    #[test]
    fn test_failed_mutation_publishes_nothing() {
        let session = CheckoutSession::new();
        session.add_to_cart(&coffee(), 1, &[]).unwrap();

        let mut updates = session.subscribe();
        let err = session.add_to_cart(&coffee(), 0, &[]).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!updates.has_changed().unwrap());
        assert_eq!(session.snapshot().totals.total_sats, 20_000);
    }

    #[test]
    fn test_merge_scenario() {
        // Coffee 20000: add qty 1 → total 20000; add qty 2 more →
        // one line, quantity 3, total 60000
        let session = CheckoutSession::new();

        let snapshot = session.add_to_cart(&coffee(), 1, &[]).unwrap();
        assert_eq!(snapshot.totals.total_sats, 20_000);

        let snapshot = session.add_to_cart(&coffee(), 2, &[]).unwrap();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].quantity, 3);
        assert_eq!(snapshot.totals.total_sats, 60_000);
    }

    #[test]
    fn test_modifier_scenario() {
        // Coffee 20000 + Extra Shot 5000, qty 1 → total 25000
        let session = CheckoutSession::new();

        let snapshot = session.add_to_cart(&coffee(), 1, &[extra_shot()]).unwrap();
        assert_eq!(snapshot.totals.total_sats, 25_000);
    }

    #[test]
    fn test_percentage_discount_scenario() {
        // Coffee 20000, qty 1, 10% discount → total 18000
        let session = CheckoutSession::new();

        session.add_to_cart(&coffee(), 1, &[]).unwrap();
        let snapshot = session.apply_discount(Discount::percentage(10));

        assert_eq!(snapshot.totals.subtotal_sats, 20_000);
        assert_eq!(snapshot.totals.discount_sats, 2_000);
        assert_eq!(snapshot.totals.total_sats, 18_000);
    }

    #[test]
    fn test_apply_discount_input() {
        let session = CheckoutSession::new();
        session.add_to_cart(&coffee(), 1, &[]).unwrap();

        let snapshot = session.apply_discount_input("fixed", 5_000).unwrap();
        assert_eq!(snapshot.totals.total_sats, 15_000);
    }

    #[test]
    fn test_unknown_discount_kind_rejected_cart_unchanged() {
        let session = CheckoutSession::new();
        session.add_to_cart(&coffee(), 1, &[]).unwrap();
        session.apply_discount_input("fixed", 5_000).unwrap();

        let mut updates = session.subscribe();
        let err = session.apply_discount_input("bogo", 1).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!updates.has_changed().unwrap());
        // The previous discount survives
        assert_eq!(session.snapshot().discount, Some(Discount::Fixed(5_000)));
    }

    #[test]
    fn test_set_quantity_and_remove_line() {
        let session = CheckoutSession::new();
        let snapshot = session.add_to_cart(&coffee(), 1, &[]).unwrap();
        let key = snapshot.lines[0].line_key.clone();

        let snapshot = session.set_quantity(&key, 4).unwrap();
        assert_eq!(snapshot.totals.total_sats, 80_000);

        let snapshot = session.remove_line(&key).unwrap();
        assert!(snapshot.lines.is_empty());
        assert_eq!(snapshot.totals.total_sats, 0);

        let err = session.remove_line(&key).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_clear_cart() {
        let session = CheckoutSession::new();
        session.add_to_cart(&coffee(), 3, &[extra_shot()]).unwrap();
        session.apply_discount(Discount::percentage(10));

        let snapshot = session.clear_cart();

        assert!(snapshot.lines.is_empty());
        assert_eq!(snapshot.discount, None);
        assert_eq!(snapshot.totals, CartTotals::default());
    }

    #[test]
    fn test_snapshot_wire_shape_is_camel_case() {
        let session = CheckoutSession::new();
        session.add_to_cart(&coffee(), 1, &[extra_shot()]).unwrap();
        session.apply_discount(Discount::percentage(10));

        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert!(json["totals"]["totalSats"].is_i64());
        assert!(json["totals"]["subtotalSats"].is_i64());
        assert!(json["lines"][0]["lineKey"].is_string());
        assert!(json["lines"][0]["unitPriceSats"].is_i64());
        assert_eq!(json["discount"]["kind"], "percentage");
    }
}
