//! # Subscriptions
//!
//! A [`Subscription`] is the handle for a background observer task. Views hold one for as long
//! as they are on screen and close it when they go away, so listeners never outlive their owner.

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle for a running observer.
///
/// [`close`](Subscription::close) stops the observer and waits until it has stopped. Dropping
/// the handle without closing it aborts the task without waiting.
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Runs `task` in the background, tied to the returned handle.
    pub fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(task)),
        }
    }

    /// False once the observer has stopped, e.g. because the store shut down.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the observer and waits for it to finish.
    pub async fn close(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            debug!("Subscription closed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
