//! # Singalbucks
//!
//! Ordering for a small café, split across two screens that share one realtime store: customers
//! build a cart and place orders, and the kitchen watches a live board and moves each order from
//! pending to made to served.
//!
//! ## Design
//!
//! The store is the [`realtime_store`] crate: one actor per collection, keyed records with
//! revisions, conditional writes and change subscriptions. This crate adds the café on top.
//!
//! - **Order numbers** come from a single counter record, advanced with a compare-and-set retry
//!   loop, so concurrent customers never receive the same number.
//! - **Status** is one enum with an explicit transition check; an order cannot be served before
//!   it is made, or go backwards.
//! - **Pricing** pairs drinks with snacks into sets: `min(drinks, snacks)` sets, the rest at unit
//!   price.
//! - **Screens** receive an explicitly built [`Session`](lifecycle::Session) rather than reaching
//!   for a global connection, and hold their subscriptions as handles with an explicit `close`.
//!
//! ## Module Tour
//!
//! ### 1. The Data ([`model`])
//! Menu, cart, pricing, orders and the counter. No I/O.
//!
//! ### 2. The Actors ([`order_actor`], [`counter_actor`])
//! [`ActorEntity`](realtime_store::ActorEntity) implementations and their error types.
//!
//! ### 3. The Interface ([`clients`])
//! [`OrderClient`](clients::OrderClient) and [`CounterClient`](clients::CounterClient) wrap the
//! generic store client and speak in domain errors.
//!
//! ### 4. The Screens ([`flows`])
//! [`OrderSubmission`](flows::OrderSubmission) for customers and
//! [`KitchenScreen`](flows::KitchenScreen) for staff.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! [`OrderSystem`](lifecycle::OrderSystem) starts the actors, owns the connection state and
//! shuts everything down; also configuration and tracing setup.
//!
//! ### 6. The Wire Format ([`wire`])
//! The shared JSON tree (`/orders`, `/order_counter`) for export and restore.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod counter_actor;
pub mod flows;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod wire;
