//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//! Module paths are hidden (`with_target(false)`); the store logs an `entity_type` field instead,
//! so lines stay short while keeping the structured data.
//!
//! ```bash
//! # Orders written, statuses advanced, subscriptions opened
//! RUST_LOG=info cargo run
//!
//! # Every store request with its payload, and counter retries
//! RUST_LOG=debug cargo run
//!
//! # Only the allocator
//! RUST_LOG=info,singalbucks::clients::counter_client=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a single submission reads:
//!
//! ```text
//! INFO Actor started entity_type="Order"
//! INFO next_order_number: Committed entity_type="Counter" id=order_counter revision=1
//! INFO next_order_number: Allocated order number order_number=1 revision=1 attempt=1
//! INFO create_order: Created entity_type="Order" id=1 size=1
//! INFO create_order: Order written order_number=1 total_amount=5500
//! INFO submit: Order placed order_number=1 total_amount=5500
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // The store logs entity_type instead of module paths
        .compact()
        .init();
}
