//! # System Lifecycle
//!
//! [`OrderSystem`] is the composition root: it starts the actors, injects their context, owns
//! the connection state and shuts everything down. The screens never reach for a global; they
//! receive a [`Session`] built here.
//!
//! ## Dependency Injection via Context
//!
//! Actors are created first and receive their dependencies when started with `run(context)`.
//! The order actor gets the shared [`Menu`](crate::model::Menu) so it can check new orders
//! against it; the counter actor needs nothing (`()`).
//!
//! ## Graceful Shutdown
//!
//! 1. **Mark disconnected** - screens stop accepting submissions
//! 2. **Drop all clients** - closes the sender side of the request channels
//! 3. **Actors detect closure** - `receiver.recv()` returns `None` and the loop logs its final size
//! 4. **Await completion** - the join handles are awaited
//!
//! Observers opened through a session end when their actor stops.

pub mod config;
pub mod order_system;
pub mod tracing;

pub use config::*;
pub use order_system::*;
pub use self::tracing::setup_tracing;
