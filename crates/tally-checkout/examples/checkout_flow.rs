//! End-to-end checkout session walkthrough.
//!
//! Run with:
//! ```sh
//! cargo run -p tally-checkout --example checkout_flow
//! ```
//! Set `RUST_LOG=debug` to see the per-operation events.

use tally_checkout::CheckoutSession;
use tally_core::types::{Discount, Modifier, Product};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Same subscriber setup as the POS host process: INFO by default,
    // overridable with RUST_LOG
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Catalog data, normally supplied by the catalog collaborator
    let coffee = Product::new("prod-coffee", "Coffee", 20_000)?;
    let croissant = Product::new("prod-croissant", "Croissant", 12_000)?;
    let extra_shot = Modifier::new("mod-shot", "Extra Shot", 5_000)?;

    let session = CheckoutSession::new();
    let mut updates = session.subscribe();
    println!("session {}", session.session_id());

    // Ring up an order: the second plain coffee merges into the first
    session.add_to_cart(&coffee, 1, &[])?;
    session.add_to_cart(&coffee, 2, &[])?;
    session.add_to_cart(&coffee, 1, &[extra_shot])?;
    session.add_to_cart(&croissant, 2, &[])?;

    let snapshot = session.apply_discount(Discount::percentage(10));

    println!("\ncart ({} lines):", snapshot.totals.line_count);
    for line in &snapshot.lines {
        println!("  {:<24} x{:<3} {}", line.name, line.quantity, line.line_total());
    }
    println!("subtotal: {} sats", snapshot.totals.subtotal_sats);
    println!("discount: -{} sats", snapshot.totals.discount_sats);
    println!("total:    {} sats", snapshot.totals.total_sats);

    // What a subscriber (e.g. the web frontend bridge) would receive
    let latest = updates.borrow_and_update().clone();
    println!("\npublished snapshot:\n{}", serde_json::to_string_pretty(&latest)?);

    Ok(())
}
