use crate::clients::{ActorClient, CounterClient, OrderClient};
use crate::lifecycle::SystemConfig;
use crate::model::Menu;
use crate::order_actor::OrderError;
use crate::wire;
use realtime_store::{ConnectionMonitor, ConnectionWatch};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Everything a screen needs to talk to the store.
///
/// Built by [`OrderSystem::session`] and handed to the flows by value; clones share the same
/// actors and connection state.
#[derive(Clone)]
pub struct Session {
    pub orders: OrderClient,
    pub counter: CounterClient,
    pub connection: ConnectionWatch,
    pub menu: Arc<Menu>,
}

impl Session {
    pub fn new(
        orders: OrderClient,
        counter: CounterClient,
        connection: ConnectionWatch,
        menu: Arc<Menu>,
    ) -> Self {
        Self {
            orders,
            counter,
            connection,
            menu,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }
}

/// The runtime orchestrator: starts the order and counter actors, owns the connection state and
/// hands out [`Session`]s.
///
/// # Architecture
///
/// - **Order Actor**: the `/orders` collection; its context is the shared [`Menu`]
/// - **Counter Actor**: the `order_counter` record
/// - **Connection Monitor**: the liveness flag; set to connected once both actors run
///
/// # Example
///
/// ```rust
/// use singalbucks::lifecycle::{OrderSystem, SystemConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let system = OrderSystem::new(SystemConfig::default());
///     let session = system.session();
///     assert_eq!(session.counter.next_order_number().await?, 1);
///
///     // Sessions hold clients; drop them so the actors can stop
///     drop(session);
///     system.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct OrderSystem {
    /// Client for the Order actor
    pub order_client: OrderClient,

    /// Client for the Counter actor
    pub counter_client: CounterClient,

    monitor: ConnectionMonitor,
    menu: Arc<Menu>,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts both actors and marks the store connected. Must be called inside a Tokio runtime.
    pub fn new(config: SystemConfig) -> Self {
        let buffer = config.channel_buffer.max(1);
        let menu = Arc::new(config.menu);

        // 1. Create actors
        let (order_actor, order_client) = crate::order_actor::new(buffer);
        let (counter_actor, counter_client) = crate::counter_actor::new(buffer);

        // 2. Start actors with injected context
        let order_handle = tokio::spawn(order_actor.run(menu.clone()));
        let counter_handle = tokio::spawn(counter_actor.run(()));

        let (monitor, _) = ConnectionMonitor::new();
        monitor.set_connected(true);
        info!(buffer, retries = config.counter_max_retries, "Order system started");

        Self {
            order_client: OrderClient::new(order_client),
            counter_client: CounterClient::with_max_retries(
                counter_client,
                config.counter_max_retries,
            ),
            monitor,
            menu,
            handles: vec![order_handle, counter_handle],
        }
    }

    /// Starts a system seeded from a JSON tree in the shape of [`wire::export_database`].
    ///
    /// Malformed orders are skipped. The counter resumes from the larger of the stored counter
    /// and the highest order number, so restored numbers are never handed out again.
    pub async fn restore(config: SystemConfig, tree: &Value) -> Result<Self, OrderError> {
        let system = Self::new(config);
        let orders = wire::import_orders(tree);
        let highest = orders.iter().map(|o| o.order_number()).max().unwrap_or(0);
        let start = wire::import_counter(tree).max(highest);

        let restored = orders.len();
        for order in orders {
            system.order_client.restore(order).await?;
        }
        if start > 0 {
            system.counter_client.initialize(start).await?;
        }
        info!(restored, counter = start, "Restored orders");
        Ok(system)
    }

    /// A new handle for a screen.
    pub fn session(&self) -> Session {
        Session::new(
            self.order_client.clone(),
            self.counter_client.clone(),
            self.monitor.watch(),
            self.menu.clone(),
        )
    }

    pub fn connection(&self) -> ConnectionWatch {
        self.monitor.watch()
    }

    /// Flips the liveness flag seen by every session.
    pub fn set_connected(&self, connected: bool) {
        self.monitor.set_connected(connected);
    }

    pub fn menu(&self) -> &Arc<Menu> {
        &self.menu
    }

    /// The current store contents as a JSON tree.
    pub async fn export(&self) -> Result<Value, OrderError> {
        let mut orders = self.order_client.list().await?;
        orders.sort_by_key(|order| order.id);
        let counter = self.counter_client.current().await?;
        Ok(wire::export_database(&orders, counter))
    }

    /// Gracefully shuts down the system.
    ///
    /// Marks the connection as lost, drops this system's clients and waits for both actors to
    /// finish. An actor only stops once every client clone is gone, so sessions and screens must
    /// be dropped or closed first.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Shutting down system...");
        self.monitor.set_connected(false);

        // Dropping the clients closes the request channels; each actor then leaves its loop
        drop(self.order_client);
        drop(self.counter_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
