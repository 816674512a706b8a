//! # Counter Actor
//!
//! Keeps the `order_counter` record: the last order number handed out. Allocation itself lives
//! in [`CounterClient::next_order_number`](crate::clients::CounterClient::next_order_number).

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::Counter;
use realtime_store::{ResourceActor, ResourceClient};

/// Creates a new Counter actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Counter>, ResourceClient<Counter>) {
    ResourceActor::new(buffer_size)
}
