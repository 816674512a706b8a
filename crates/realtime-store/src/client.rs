//! # Generic Client
//!
//! The cloneable handle used to talk to a [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Snapshot, Versioned};
use crate::subscription::Subscription;
use tokio::sync::{mpsc, oneshot, watch};

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only the request sender, so cloning is cheap and clones can be handed to any task.
/// Every method sends one request and waits for the actor's reply; nothing is cancelled or
/// timed out on the caller's behalf.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Writes a new record under `id`. Fails with `AlreadyExists` if the key is taken.
    pub async fn create(&self, id: T::Id, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create {
            id,
            params,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Reads a record together with its revision, for a later [`compare_and_set`](Self::compare_and_set).
    pub async fn get_versioned(&self, id: T::Id) -> Result<Option<Versioned<T>>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::GetVersioned { id, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Writes `value` only if the record's current revision equals `expected`
    /// (`None` meaning the record must not exist). Returns the new revision.
    ///
    /// Entity hooks are not run for this write.
    pub async fn compare_and_set(
        &self,
        id: T::Id,
        expected: Option<u64>,
        value: T,
    ) -> Result<u64, FrameworkError> {
        self.request(|respond_to| ResourceRequest::CompareAndSet {
            id,
            expected,
            value,
            respond_to,
        })
        .await
    }

    /// Every record in the collection, in no particular order.
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    /// A receiver that always holds the latest snapshot of the collection.
    pub async fn subscribe(&self) -> Result<watch::Receiver<Snapshot<T>>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Subscribe { respond_to })
            .await
    }

    /// Calls `callback` with the current snapshot, then again after every change, until the
    /// returned [`Subscription`] is closed or dropped, or the actor stops.
    pub async fn observe<F>(&self, mut callback: F) -> Result<Subscription, FrameworkError>
    where
        F: FnMut(&Snapshot<T>) + Send + 'static,
    {
        let mut receiver = self.subscribe().await?;
        Ok(Subscription::spawn(async move {
            loop {
                let snapshot = receiver.borrow_and_update().clone();
                callback(&snapshot);
                if receiver.changed().await.is_err() {
                    break;
                }
            }
        }))
    }
}
