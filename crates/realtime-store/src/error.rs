//! # Store Errors
//!
//! Errors raised by the store itself, as opposed to the entity errors produced by hooks, which
//! travel inside [`FrameworkError::EntityError`].

/// Errors that can occur within the store.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    /// A conditional write observed a different revision than the caller expected.
    /// `None` stands for "no record".
    #[error("Revision conflict on {id}: expected {expected:?}, found {actual:?}")]
    Conflict {
        id: String,
        expected: Option<u64>,
        actual: Option<u64>,
    },
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// True when the error is a lost compare-and-set race, which the caller may retry.
    pub fn is_conflict(&self) -> bool {
        matches!(self, FrameworkError::Conflict { .. })
    }
}
