//! # Realtime Store
//!
//! An in-process realtime record store built on the actor model. Each collection of records is
//! owned by a [`ResourceActor`] running in its own Tokio task; everything else talks to it through
//! a cloneable [`ResourceClient`].
//!
//! ## What it offers
//!
//! - **Keyed records** written under caller-chosen keys, with async lifecycle hooks defined by
//!   the [`ActorEntity`] trait and a context injected when the actor starts.
//! - **Revisions and conditional writes**: every record carries a revision, and
//!   [`ResourceClient::compare_and_set`] only writes when the revision is still the one the
//!   caller read. Retrying on [`FrameworkError::Conflict`] gives a transactional
//!   read-modify-write that stays correct under concurrent callers.
//! - **Change subscriptions**: after each successful write the actor publishes a [`Snapshot`] of
//!   the whole collection. [`ResourceClient::observe`] turns that into a callback and hands back
//!   a [`Subscription`] with an explicit `close()`.
//! - **Connection liveness**: [`ConnectionMonitor`] / [`ConnectionWatch`] carry the
//!   connected/disconnected flag clients use to enable or disable writes.
//!
//! ## Concurrency Model
//!
//! - Each actor processes its requests sequentially, so a single request never races another
//!   request on the same collection.
//! - Races between *separate* requests (read, then write) are what revisions are for.
//! - There are no timeouts and no cancellation: a request waits until the actor answers or goes
//!   away (`ActorClosed` / `ActorDropped`).
//!
//! ## Testing
//!
//! The [`mock`] module provides a [`MockClient`](mock::MockClient) that answers requests from
//! queued expectations, for testing client wrappers without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod connection;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod subscription;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use connection::{ConnectionMonitor, ConnectionState, ConnectionWatch};
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response, Snapshot, Versioned};
pub use subscription::Subscription;
