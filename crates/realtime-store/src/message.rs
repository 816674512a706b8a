//! # Generic Messages
//!
//! Request types sent from a [`ResourceClient`](crate::ResourceClient) to a
//! [`ResourceActor`](crate::ResourceActor), plus the value types that come back.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Full view of a collection at one point in time, published after every successful write.
pub type Snapshot<T> = Arc<HashMap<<T as ActorEntity>::Id, T>>;

/// A record together with its revision.
///
/// Revisions start at 1 when the record is created and grow by one on every write. They are
/// what [`ResourceRequest::CompareAndSet`] compares against.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub revision: u64,
}

/// Internal message type sent to the actor.
///
/// The CRUD variants go through the entity hooks. `CompareAndSet` is a raw conditional write
/// that skips them; it exists for read-modify-write transactions such as counters. `List` and
/// `Subscribe` read the whole collection, once or continuously.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        id: T::Id,
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    GetVersioned {
        id: T::Id,
        respond_to: Response<Option<Versioned<T>>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    CompareAndSet {
        id: T::Id,
        expected: Option<u64>,
        value: T,
        respond_to: Response<u64>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Subscribe {
        respond_to: Response<watch::Receiver<Snapshot<T>>>,
    },
}
