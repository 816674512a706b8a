//! # Counter Client
//!
//! Allocates order numbers from the shared `order_counter` record.
//!
//! Allocation is a transactional read-modify-write: read the counter with its revision, then
//! write `value + 1` with [`compare_and_set`](ResourceClient::compare_and_set) on that revision.
//! If another caller wrote in between, the write is rejected and the loop reads again. Every
//! successful allocation therefore moves the counter by exactly one, and no two callers ever get
//! the same number.
use crate::clients::ActorClient;
use crate::counter_actor::CounterError;
use crate::model::{Counter, CounterCreate, CounterKey};
use async_trait::async_trait;
use realtime_store::{FrameworkError, ResourceClient};
use tracing::{debug, info, instrument, warn};

/// Default number of rejected writes against an unchanged counter before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 25;

/// Client for interacting with the Counter actor.
#[derive(Clone)]
pub struct CounterClient {
    inner: ResourceClient<Counter>,
    key: CounterKey,
    max_retries: u32,
}

impl CounterClient {
    pub fn new(inner: ResourceClient<Counter>) -> Self {
        Self::with_max_retries(inner, DEFAULT_MAX_RETRIES)
    }

    /// `max_retries` bounds rejected writes against a counter that is not moving. Below 1 is
    /// treated as 1.
    pub fn with_max_retries(inner: ResourceClient<Counter>, max_retries: u32) -> Self {
        Self {
            inner,
            key: CounterKey::order_counter(),
            max_retries: max_retries.max(1),
        }
    }

    /// Returns the next order number: 1 on an empty store, then 2, 3, ...
    ///
    /// A lost race is only counted against `max_retries` while the counter stands still. When
    /// the re-read shows the counter moved, another caller got a number and the count starts
    /// over, so any number of concurrent callers all get through.
    ///
    /// # Errors
    /// [`CounterError::Contention`] when `max_retries` writes in a row were rejected against the
    /// same revision. [`CounterError::Exhausted`] when the counter is already at `u64::MAX`.
    #[instrument(skip(self))]
    pub async fn next_order_number(&self) -> Result<u64, CounterError> {
        let mut attempt: u32 = 0;
        let mut stalled: u32 = 0;
        let mut last_seen: Option<Option<u64>> = None;

        loop {
            attempt = attempt.saturating_add(1);
            let current = self
                .inner
                .get_versioned(self.key.clone())
                .await
                .map_err(Self::map_error)?;
            let (value, expected) = match current {
                Some(entry) => (entry.value.value, Some(entry.revision)),
                None => (0, None),
            };
            if last_seen == Some(expected) {
                stalled += 1;
            } else {
                stalled = 1;
                last_seen = Some(expected);
            }
            let next = value
                .checked_add(1)
                .ok_or(CounterError::Exhausted { last: value })?;

            match self
                .inner
                .compare_and_set(self.key.clone(), expected, Counter { value: next })
                .await
            {
                Ok(revision) => {
                    info!(order_number = next, revision, attempt, "Allocated order number");
                    return Ok(next);
                }
                Err(e) if e.is_conflict() => {
                    if stalled >= self.max_retries {
                        warn!(attempts = stalled, "Gave up allocating an order number");
                        return Err(CounterError::Contention { attempts: stalled });
                    }
                    debug!(attempt, stalled, "Counter moved, retrying");
                    tokio::task::yield_now().await;
                }
                Err(e) => return Err(Self::map_error(e)),
            }
        }
    }

    /// The last number handed out, 0 if none.
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<u64, CounterError> {
        let counter = self
            .inner
            .get(self.key.clone())
            .await
            .map_err(Self::map_error)?;
        Ok(counter.map(|c| c.value).unwrap_or(0))
    }

    /// Seeds the counter so the next allocation returns `start + 1`.
    #[instrument(skip(self))]
    pub async fn initialize(&self, start: u64) -> Result<(), CounterError> {
        debug!("Sending request");
        self.inner
            .create(self.key.clone(), CounterCreate { start })
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Counter> for CounterClient {
    type Error = CounterError;

    fn inner(&self) -> &ResourceClient<Counter> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::AlreadyExists(id) => CounterError::AlreadyExists(id),
            other => CounterError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realtime_store::mock::{create_mock_client, expect_compare_and_set, MockClient};
    use realtime_store::Versioned;

    fn key() -> CounterKey {
        CounterKey::order_counter()
    }

    fn conflict(expected: Option<u64>, actual: Option<u64>) -> FrameworkError {
        FrameworkError::Conflict {
            id: key().to_string(),
            expected,
            actual,
        }
    }

    #[tokio::test]
    async fn test_first_number_is_one() {
        let mut mock = MockClient::<Counter>::new();
        mock.expect_get_versioned(key()).return_ok(None);
        mock.expect_compare_and_set(key()).return_ok(1);

        let client = CounterClient::new(mock.client());
        assert_eq!(client.next_order_number().await.unwrap(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_writes_value_plus_one_on_read_revision() {
        let (client, mut receiver) = create_mock_client::<Counter>(10);
        let counter = CounterClient::new(client);
        let task = tokio::spawn(async move { counter.next_order_number().await });

        match receiver.recv().await {
            Some(realtime_store::ResourceRequest::GetVersioned { id, respond_to }) => {
                assert_eq!(id, key());
                respond_to
                    .send(Ok(Some(Versioned {
                        value: Counter { value: 41 },
                        revision: 6,
                    })))
                    .unwrap();
            }
            _ => panic!("Expected GetVersioned request"),
        }

        let (id, expected, value, responder) = expect_compare_and_set(&mut receiver)
            .await
            .expect("Expected CompareAndSet request");
        assert_eq!(id, key());
        assert_eq!(expected, Some(6));
        assert_eq!(value, Counter { value: 42 });
        responder.send(Ok(7)).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 42);
    }

    #[tokio::test]
    async fn test_lost_race_rereads_and_retries() {
        let mut mock = MockClient::<Counter>::new();
        mock.expect_get_versioned(key()).return_ok(Some(Versioned {
            value: Counter { value: 4 },
            revision: 4,
        }));
        mock.expect_compare_and_set(key())
            .return_err(conflict(Some(4), Some(5)));
        mock.expect_get_versioned(key()).return_ok(Some(Versioned {
            value: Counter { value: 5 },
            revision: 5,
        }));
        mock.expect_compare_and_set(key()).return_ok(6);

        let client = CounterClient::new(mock.client());
        assert_eq!(client.next_order_number().await.unwrap(), 6);
        mock.verify();
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let mut mock = MockClient::<Counter>::new();
        for _ in 0..3 {
            mock.expect_get_versioned(key()).return_ok(None);
            mock.expect_compare_and_set(key())
                .return_err(conflict(None, Some(1)));
        }

        let client = CounterClient::with_max_retries(mock.client(), 3);
        assert_eq!(
            client.next_order_number().await,
            Err(CounterError::Contention { attempts: 3 })
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_moving_counter_never_exhausts_retries() {
        let mut mock = MockClient::<Counter>::new();
        for last in 0..6 {
            mock.expect_get_versioned(key()).return_ok(Some(Versioned {
                value: Counter { value: last },
                revision: last,
            }));
            mock.expect_compare_and_set(key())
                .return_err(conflict(Some(last), Some(last + 1)));
        }
        mock.expect_get_versioned(key()).return_ok(Some(Versioned {
            value: Counter { value: 6 },
            revision: 6,
        }));
        mock.expect_compare_and_set(key()).return_ok(7);

        let client = CounterClient::with_max_retries(mock.client(), 2);
        assert_eq!(client.next_order_number().await.unwrap(), 7);
        mock.verify();
    }

    #[tokio::test]
    async fn test_counter_at_max_is_exhausted_without_writing() {
        let mut mock = MockClient::<Counter>::new();
        mock.expect_get_versioned(key()).return_ok(Some(Versioned {
            value: Counter { value: u64::MAX },
            revision: 1,
        }));

        let client = CounterClient::new(mock.client());
        assert_eq!(
            client.next_order_number().await,
            Err(CounterError::Exhausted { last: u64::MAX })
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_store_failure_is_not_retried() {
        let mut mock = MockClient::<Counter>::new();
        mock.expect_get_versioned(key())
            .return_err(FrameworkError::ActorClosed);

        let client = CounterClient::new(mock.client());
        assert!(matches!(
            client.next_order_number().await,
            Err(CounterError::ActorCommunicationError(_))
        ));
        mock.verify();
    }

    #[tokio::test]
    async fn test_current_defaults_to_zero() {
        let mut mock = MockClient::<Counter>::new();
        mock.expect_get(key()).return_ok(None);
        mock.expect_get(key()).return_ok(Some(Counter { value: 9 }));

        let client = CounterClient::new(mock.client());
        assert_eq!(client.current().await.unwrap(), 0);
        assert_eq!(client.current().await.unwrap(), 9);
        mock.verify();
    }
}
