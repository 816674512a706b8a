//! # Connection Liveness
//!
//! Realtime databases expose a well-known boolean that flips on connect and disconnect. Here the
//! composition root owns a [`ConnectionMonitor`] and flips it; everything else holds a cloneable
//! [`ConnectionWatch`] and reads or observes the state.

use crate::subscription::Subscription;
use std::fmt::{self, Display};
use tokio::sync::watch;
use tracing::info;

/// Reachability of the store as seen by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initial state, before the first report.
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        };
        f.write_str(label)
    }
}

/// Writer side: reports connects and disconnects.
#[derive(Debug)]
pub struct ConnectionMonitor {
    state: watch::Sender<ConnectionState>,
}

impl ConnectionMonitor {
    /// Creates a monitor in the `Connecting` state along with its first watch.
    pub fn new() -> (Self, ConnectionWatch) {
        let (state, receiver) = watch::channel(ConnectionState::Connecting);
        (Self { state }, ConnectionWatch { receiver })
    }

    /// Pushes the liveness flag. Watchers are only woken when the state actually changes.
    pub fn set_connected(&self, connected: bool) {
        let next = if connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            info!(state = %next, "Connection state changed");
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Another watch on the same state.
    pub fn watch(&self) -> ConnectionWatch {
        ConnectionWatch {
            receiver: self.state.subscribe(),
        }
    }
}

/// Reader side: cloneable view of the connection state.
#[derive(Debug, Clone)]
pub struct ConnectionWatch {
    receiver: watch::Receiver<ConnectionState>,
}

impl ConnectionWatch {
    pub fn state(&self) -> ConnectionState {
        *self.receiver.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Waits until the state satisfies `predicate`. Returns the state, or `None` if the monitor
    /// was dropped first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&ConnectionState) -> bool,
    ) -> Option<ConnectionState> {
        self.receiver.wait_for(predicate).await.ok().map(|state| *state)
    }

    /// Calls `callback` with the current state and on every change, until the subscription is
    /// closed or the monitor is dropped.
    pub fn observe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(ConnectionState) + Send + 'static,
    {
        let mut receiver = self.receiver.clone();
        Subscription::spawn(async move {
            loop {
                let state = *receiver.borrow_and_update();
                callback(state);
                if receiver.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    async fn wait_until(mut ready: impl FnMut() -> bool) {
        for _ in 0..100 {
            if ready() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("observer never caught up");
    }

    #[tokio::test]
    async fn test_monitor_starts_connecting_and_flips() {
        let (monitor, watch) = ConnectionMonitor::new();
        assert_eq!(watch.state(), ConnectionState::Connecting);
        assert!(!watch.is_connected());

        monitor.set_connected(true);
        assert!(watch.is_connected());
        assert_eq!(monitor.state(), ConnectionState::Connected);

        monitor.set_connected(false);
        assert_eq!(watch.state(), ConnectionState::Disconnected);
        assert_eq!(watch.state().to_string(), "Disconnected");
    }

    #[tokio::test]
    async fn test_wait_for_connected() {
        let (monitor, watch) = ConnectionMonitor::new();
        let mut waiter = watch.clone();
        let task = tokio::spawn(async move { waiter.wait_for(|s| s.is_connected()).await });

        monitor.set_connected(true);
        assert_eq!(task.await.unwrap(), Some(ConnectionState::Connected));
    }

    #[tokio::test]
    async fn test_observe_sees_changes_until_closed() {
        let (monitor, watch) = ConnectionMonitor::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = watch.observe(move |state| sink.lock().unwrap().push(state));

        wait_until(|| seen.lock().unwrap().len() >= 1).await;
        monitor.set_connected(true);
        wait_until(|| seen.lock().unwrap().len() >= 2).await;
        subscription.close().await;

        monitor.set_connected(false);
        tokio::task::yield_now().await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![ConnectionState::Connecting, ConnectionState::Connected]
        );
    }
}
