//! # tally-checkout: Cart Store and Checkout Session for Tally POS
//!
//! This crate owns the in-memory shopping cart for a single UI session and
//! exposes it to presentation layers through a reactive snapshot.
//!
//! ## Module Organization
//! ```text
//! tally_checkout/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── cart.rs         ◄─── Cart store: lines, merge-on-add, totals
//! ├── session.rs      ◄─── CheckoutSession facade + snapshot channel
//! └── error.rs        ◄─── Serializable error type for UI boundaries
//! ```
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     One-Directional Data Flow                       │
//! │                                                                     │
//! │  UI event                                                           │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  CheckoutSession::add_to_cart / apply_discount / clear_cart         │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  Cart mutation + synchronous total recomputation                    │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  CartSnapshot published on the watch channel                        │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  UI re-render                                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no persistence, no network I/O, and no background task in this
//! crate. The order/checkout collaborator reads the final snapshot to
//! create a persisted order record elsewhere.
//!
//! ## Example
//! ```rust
//! use tally_checkout::CheckoutSession;
//! use tally_core::types::{Discount, Product};
//!
//! let session = CheckoutSession::new();
//! let coffee = Product::new("prod-1", "Coffee", 20_000).unwrap();
//!
//! let snapshot = session.add_to_cart(&coffee, 1, &[]).unwrap();
//! assert_eq!(snapshot.totals.total_sats, 20_000);
//!
//! let snapshot = session.apply_discount(Discount::percentage(10));
//! assert_eq!(snapshot.totals.total_sats, 18_000);
//! ```

pub mod cart;
pub mod error;
pub mod session;

// Re-exports for convenience
pub use cart::{Cart, CartTotals, LineItem};
pub use error::{CheckoutError, ErrorCode};
pub use session::{CartSnapshot, CheckoutSession};
