//! # Generic Actor Server
//!
//! `ResourceActor` owns one keyed collection of records. It processes requests one at a time in
//! its own Tokio task, so every request, including a compare-and-set, is atomic with respect to
//! every other request on the same collection.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Snapshot, Versioned};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of records.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the records and the receiver end of
/// the request channel; the cloneable [`ResourceClient`] is the other half. Because a single
/// task owns the map, no `Mutex` is needed around it.
///
/// After every successful write the actor publishes a [`Snapshot`] of the whole collection on a
/// `watch` channel. Subscribers always see the latest state and never an intermediate one.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies into `actor.run(context)`.
/// 3. **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use realtime_store::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Note { id: u32, text: String }
/// #[derive(Debug)] struct NoteCreate { text: String }
/// #[derive(Debug)] enum NoteAction {}
/// #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
///
/// #[async_trait]
/// impl ActorEntity for Note {
///     type Id = u32;
///     type Create = NoteCreate;
///     type Update = ();
///     type Action = NoteAction;
///     type ActionResult = ();
///     type Context = ();
///     type Error = NoteError;
///
///     fn from_create_params(id: u32, p: NoteCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, text: p.text })
///     }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, a: NoteAction, _: &()) -> Result<(), Self::Error> {
///         match a {}
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Note>::new(10);
///     tokio::spawn(actor.run(()));
///     client.create(7, NoteCreate { text: "hi".into() }).await.unwrap();
///     assert_eq!(client.get(7).await.unwrap().unwrap().text, "hi");
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, Versioned<T>>,
    changes: watch::Sender<Snapshot<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full, client calls wait
    /// for room.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (changes, _) = watch::channel(Arc::new(HashMap::new()));
        let actor = Self {
            receiver,
            store: HashMap::new(),
            changes,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// # Context Injection
    /// `context` is handed to every entity hook. It is supplied here rather than in `new()` so
    /// that actors can be wired to clients created after them.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "singalbucks::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?params, "Create");
                    let result = self.create(entity_type, id, params, &context).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).map(|entry| entry.value.clone());
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::GetVersioned { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(
                        entity_type,
                        %id,
                        revision = ?item.as_ref().map(|entry| entry.revision),
                        "GetVersioned"
                    );
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = match self.store.get(&id).map(|entry| entry.value.clone()) {
                        Some(mut working) => match working.on_update(update, &context).await {
                            Ok(()) => {
                                let revision = self.commit(id.clone(), working.clone());
                                info!(entity_type, %id, revision, "Updated");
                                Ok(working)
                            }
                            Err(e) => {
                                warn!(entity_type, %id, error = %e, "Update failed");
                                Err(FrameworkError::EntityError(Box::new(e)))
                            }
                        },
                        None => {
                            warn!(entity_type, %id, "Not found");
                            Err(FrameworkError::NotFound(id.to_string()))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = match self.store.get(&id).map(|entry| entry.value.clone()) {
                        Some(item) => match item.on_delete(&context).await {
                            Ok(()) => {
                                self.store.remove(&id);
                                self.publish();
                                info!(entity_type, %id, size = self.store.len(), "Deleted");
                                Ok(())
                            }
                            Err(e) => {
                                warn!(entity_type, %id, error = %e, "on_delete failed");
                                Err(FrameworkError::EntityError(Box::new(e)))
                            }
                        },
                        None => {
                            warn!(entity_type, %id, "Not found");
                            Err(FrameworkError::NotFound(id.to_string()))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = match self.store.get(&id).map(|entry| entry.value.clone()) {
                        Some(mut working) => match working.handle_action(action, &context).await {
                            Ok(outcome) => {
                                let revision = self.commit(id.clone(), working);
                                info!(entity_type, %id, revision, "Action ok");
                                Ok(outcome)
                            }
                            Err(e) => {
                                warn!(entity_type, %id, error = %e, "Action failed");
                                Err(FrameworkError::EntityError(Box::new(e)))
                            }
                        },
                        None => {
                            warn!(entity_type, %id, "Not found");
                            Err(FrameworkError::NotFound(id.to_string()))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::CompareAndSet {
                    id,
                    expected,
                    value,
                    respond_to,
                } => {
                    let actual = self.store.get(&id).map(|entry| entry.revision);
                    debug!(entity_type, %id, ?expected, ?actual, "CompareAndSet");
                    let result = if actual == expected {
                        let revision = self.commit(id.clone(), value);
                        info!(entity_type, %id, revision, "Committed");
                        Ok(revision)
                    } else {
                        debug!(entity_type, %id, "Revision conflict");
                        Err(FrameworkError::Conflict {
                            id: id.to_string(),
                            expected,
                            actual,
                        })
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .map(|entry| entry.value.clone())
                        .collect();
                    debug!(entity_type, size = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Subscribe { respond_to } => {
                    debug!(
                        entity_type,
                        subscribers = self.changes.receiver_count() + 1,
                        "Subscribe"
                    );
                    let _ = respond_to.send(Ok(self.changes.subscribe()));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        entity_type: &str,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        if self.store.contains_key(&id) {
            warn!(entity_type, %id, "Already exists");
            return Err(FrameworkError::AlreadyExists(id.to_string()));
        }

        let mut item = T::from_create_params(id.clone(), params).map_err(|e| {
            warn!(entity_type, %id, error = %e, "Create failed");
            FrameworkError::EntityError(Box::new(e))
        })?;

        if let Err(e) = item.on_create(context).await {
            warn!(entity_type, %id, error = %e, "on_create failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }

        self.commit(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    /// Stores `value` under `id`, bumps its revision and notifies subscribers.
    fn commit(&mut self, id: T::Id, value: T) -> u64 {
        let revision = self
            .store
            .get(&id)
            .map(|entry| entry.revision + 1)
            .unwrap_or(1);
        self.store.insert(id, Versioned { value, revision });
        self.publish();
        revision
    }

    fn publish(&self) {
        let snapshot: HashMap<T::Id, T> = self
            .store
            .iter()
            .map(|(id, entry)| (id.clone(), entry.value.clone()))
            .collect();
        self.changes.send_replace(Arc::new(snapshot));
    }
}
