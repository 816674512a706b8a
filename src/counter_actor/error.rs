//! Error types for the Counter actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CounterError {
    /// Writes kept being rejected while the counter itself did not move.
    #[error("Could not allocate an order number after {attempts} attempts")]
    Contention { attempts: u32 },

    /// The counter cannot go any higher.
    #[error("Order numbers exhausted: counter is at {last}")]
    Exhausted { last: u64 },

    /// The counter record was already seeded.
    #[error("Counter already exists: {0}")]
    AlreadyExists(String),

    /// An error occurred while communicating with the store.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CounterError {
    fn from(msg: String) -> Self {
        CounterError::ActorCommunicationError(msg)
    }
}
