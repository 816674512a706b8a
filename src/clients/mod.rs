//! Type-safe wrappers around [`ResourceClient`](realtime_store::ResourceClient).

pub mod counter_client;
pub mod order_client;

pub use counter_client::*;
pub use order_client::*;
pub use realtime_store::ActorClient;
