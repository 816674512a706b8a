//! Custom actions for the Order actor.
//!
//! Handled by [`ActorEntity::handle_action`](realtime_store::ActorEntity::handle_action); see
//! [`entity`](super::entity) for the implementation.

/// Order operations beyond create/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Moves the order one step forward (pending to made, made to served).
    /// Returns the new status.
    ///
    /// # Errors
    /// Fails with [`OrderError::AlreadyServed`](super::OrderError::AlreadyServed) on a served
    /// order.
    Advance,
}
