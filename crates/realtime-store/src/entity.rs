//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every record type (an order, a counter, ...) implements
//! to be kept by the generic [`ResourceActor`](crate::ResourceActor). It names the key type, the
//! payloads used to create and update a record, the record-specific actions, the context injected
//! at run time and the error type reported by the hooks.
//!
//! # Keys are chosen by the caller
//!
//! Records are written under a key supplied by the caller (`create(id, params)`), the same way a
//! realtime database writes a child under a path. Allocating keys is therefore the application's
//! business; a shared counter record updated with
//! [`compare_and_set`](crate::ResourceClient::compare_and_set) is the usual way to do it.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! Both default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be stored by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so they may consult other actors. The `Context` associated type is handed to
/// every hook and is supplied when the actor starts (`actor.run(context)`), not when it is built.
///
/// # Working copies
/// `on_update` and `handle_action` run against a clone of the stored record. The actor commits
/// the clone only when the hook returns `Ok`, so a hook may bail out halfway without leaving a
/// partially modified record behind.
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// Key under which the record is stored.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Payload required to create a new record.
    type Create: Send + Sync + Debug;

    /// Payload required to update an existing record.
    type Update: Send + Sync + Debug;

    /// Record-specific operations.
    type Action: Send + Sync + Debug;

    /// Result returned by [`ActorEntity::handle_action`].
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into the actor. Use `()` when nothing is needed.
    type Context: Send + Sync;

    /// Error reported by the hooks.
    ///
    /// One error type per entity rather than one per message: callers match on a single enum and
    /// the union of failure modes stays in one place.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the record from its key and creation payload.
    /// Runs inside the actor, so anything stamped here (e.g. a timestamp) is store-assigned.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after `from_create_params` and before the record is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update payload.
    async fn on_update(
        &mut self,
        update: Self::Update,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the record is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handles a record-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
