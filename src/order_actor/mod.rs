//! # Order Actor
//!
//! Keeps the `/orders` collection: one [`Order`] per order number.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](realtime_store::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`], the single error type for placing and advancing orders
//! - [`actions`] - [`OrderAction`] for moving an order through the kitchen
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use singalbucks::clients::OrderClient;
//! use singalbucks::model::{Menu, OrderStatus};
//! use singalbucks::order_actor;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = order_actor::new(32);
//!     let client = OrderClient::new(generic_client);
//!
//!     // The menu is the actor's context
//!     tokio::spawn(actor.run(Arc::new(Menu::default())));
//!
//!     let items = BTreeMap::from([("Lemonade".to_string(), 1)]);
//!     client.create_order(1, items, 3000).await?;
//!     assert_eq!(client.advance(1).await?, OrderStatus::Made);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Order;
use realtime_store::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size)
}
