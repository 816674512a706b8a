//! The two screens as view models, each driven through a [`Session`](crate::lifecycle::Session).
//!
//! - [`customer`] - cart, pricing and order submission
//! - [`kitchen`] - the live order board and status changes

pub mod customer;
pub mod kitchen;

pub use customer::{OrderSubmission, PlacedOrder};
pub use kitchen::{BoardCounts, BoardUpdate, KitchenScreen, OrderBoard};
