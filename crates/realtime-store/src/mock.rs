//! # Mock Clients
//!
//! [`MockClient<T>`] hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of expectations instead of by an actor. It is meant for testing the logic *around* a
//! client (retry loops, multi-step flows, error surfacing) without any store state.
//!
//! | | MockClient | Real Actor |
//! |---|---|---|
//! | **State** | None, answers are scripted | Real records and revisions |
//! | **Error injection** | `return_err(..)` | Needs the right state |
//! | **Use case** | Client wrappers and flows | The actor itself, full system |
//!
//! ## Scripting a lost race
//!
//! ```rust
//! use realtime_store::mock::MockClient;
//! use realtime_store::{ActorEntity, FrameworkError, Versioned};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Tally { n: u64 }
//! #[derive(Debug)] enum TallyAction {}
//! #[derive(Debug, thiserror::Error)] #[error("tally")] struct TallyError;
//!
//! #[async_trait]
//! impl ActorEntity for Tally {
//!     type Id = String; type Create = (); type Update = (); type Action = TallyAction;
//!     type ActionResult = (); type Context = (); type Error = TallyError;
//!     fn from_create_params(_: String, _: ()) -> Result<Self, Self::Error> { Ok(Self { n: 0 }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, a: TallyAction, _: &()) -> Result<(), Self::Error> { match a {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Tally>::new();
//!     mock.expect_get_versioned("tally".into())
//!         .return_ok(Some(Versioned { value: Tally { n: 4 }, revision: 9 }));
//!     mock.expect_compare_and_set("tally".into()).return_err(FrameworkError::Conflict {
//!         id: "tally".into(),
//!         expected: Some(9),
//!         actual: Some(10),
//!     });
//!
//!     let client = mock.client();
//!     let read = client.get_versioned("tally".into()).await.unwrap().unwrap();
//!     let write = client
//!         .compare_and_set("tally".into(), Some(read.revision), Tally { n: 5 })
//!         .await;
//!     assert!(write.unwrap_err().is_conflict());
//!     mock.verify();
//! }
//! ```
//!
//! ## Raw helpers
//!
//! [`create_mock_client`] returns a client plus the receiving end of its channel, so a test can
//! inspect each request and answer it by hand (see [`expect_create`], [`expect_action`], ...).

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Versioned};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted answer for the next request.
enum Expectation<T: ActorEntity> {
    Create {
        id: T::Id,
        response: Result<T::Id, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    GetVersioned {
        id: T::Id,
        response: Result<Option<Versioned<T>>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
    CompareAndSet {
        id: T::Id,
        response: Result<u64, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in the order they were queued. A request that does not match the
/// next expectation (wrong kind or wrong key) panics the mock task, which the caller observes as
/// [`FrameworkError::ActorDropped`]; [`MockClient::verify`] then reports the leftovers.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Create { id, respond_to, .. },
                        Some(Expectation::Create {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "create on unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "get on unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::GetVersioned { id, respond_to },
                        Some(Expectation::GetVersioned {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "get_versioned on unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "update on unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "action on unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::CompareAndSet { id, respond_to, .. },
                        Some(Expectation::CompareAndSet {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "compare_and_set on unexpected key");
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn builder<R: Send + 'static>(
        &self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    /// Expects a `create` under `id`.
    pub fn expect_create(&mut self, id: T::Id) -> ExpectationBuilder<T, T::Id> {
        self.builder(move |response| Expectation::Create { id, response })
    }

    /// Expects a `get` of `id`.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    /// Expects a `get_versioned` of `id`.
    pub fn expect_get_versioned(
        &mut self,
        id: T::Id,
    ) -> ExpectationBuilder<T, Option<Versioned<T>>> {
        self.builder(move |response| Expectation::GetVersioned { id, response })
    }

    /// Expects an `update` of `id`.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    /// Expects an action on `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    /// Expects a `compare_and_set` on `id`.
    pub fn expect_compare_and_set(&mut self, id: T::Id) -> ExpectationBuilder<T, u64> {
        self.builder(move |response| Expectation::CompareAndSet { id, response })
    }

    /// Expects a `list`.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Completes an expectation with the answer the mock should give.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Answer with a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Answer with an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// RAW HELPERS
// =============================================================================

/// Creates a client and the receiving end of its channel.
///
/// The test plays the actor: it pulls each request off `receiver`, asserts on it and answers
/// through the enclosed responder. Useful when the test needs to see the payload itself.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Create,
    oneshot::Sender<Result<T::Id, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create {
            id,
            params,
            respond_to,
        }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Update, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a CompareAndSet request
pub async fn expect_compare_and_set<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    Option<u64>,
    T,
    oneshot::Sender<Result<u64, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::CompareAndSet {
            id,
            expected,
            value,
            respond_to,
        }) => Some((id, expected, value, respond_to)),
        _ => None,
    }
}
