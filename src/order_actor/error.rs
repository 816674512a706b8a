//! Error types for the Order actor.

use crate::counter_actor::CounterError;
use crate::model::OrderStatus;
use thiserror::Error;

/// Errors that can occur while placing or advancing orders.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// An order with this number is already stored.
    #[error("Order already exists: {0}")]
    AlreadyExists(String),

    /// Submission refused because the store is unreachable.
    #[error("Not connected to the order database")]
    Disconnected,

    /// Submission refused because nothing was selected.
    #[error("Select at least one item")]
    EmptyCart,

    /// The item is not on the menu.
    #[error("Unknown menu item: {0}")]
    UnknownItem(String),

    /// The status change skips a step or goes backwards.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The order has nothing left to advance to.
    #[error("Order {0} has already been served")]
    AlreadyServed(u64),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// No order number could be allocated.
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// An error occurred while communicating with the store.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
