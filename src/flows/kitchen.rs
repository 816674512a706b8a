//! # Kitchen Screen
//!
//! [`OrderBoard`] splits the order collection into the three columns the kitchen works from.
//! [`KitchenScreen`] keeps a board current: it observes the order actor, rebuilds the board on
//! every change and hands each rebuild to a callback as a [`BoardUpdate`].
//!
//! ```rust
//! use singalbucks::flows::kitchen::KitchenScreen;
//! use singalbucks::flows::customer::OrderSubmission;
//! use singalbucks::lifecycle::{OrderSystem, SystemConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = OrderSystem::new(SystemConfig::default());
//!     let screen = KitchenScreen::open(system.session(), |update| {
//!         println!("{:?} new: {:?}", update.board.counts(), update.new_arrivals);
//!     })
//!     .await?;
//!
//!     let mut customer = OrderSubmission::new(system.session());
//!     customer.add("Lemonade")?;
//!     let placed = customer.submit().await?;
//!     screen.mark_made(placed.order_number).await?;
//!
//!     screen.close().await;
//!     drop(customer);
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::clients::ActorClient;
use crate::lifecycle::Session;
use crate::model::{Order, OrderStatus};
use crate::order_actor::OrderError;
use chrono::{DateTime, Local};
use realtime_store::{ConnectionState, Subscription};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// Orders by column: pending and made oldest first, served newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBoard {
    pub pending: Vec<Order>,
    pub made: Vec<Order>,
    pub served: Vec<Order>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardCounts {
    pub pending: usize,
    pub made: usize,
    pub served: usize,
}

impl OrderBoard {
    pub fn from_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let mut board = OrderBoard::default();
        for order in orders {
            match order.status {
                OrderStatus::Pending => board.pending.push(order),
                OrderStatus::Made => board.made.push(order),
                OrderStatus::Served => board.served.push(order),
            }
        }
        board.pending.sort_by_key(|order| order.id);
        board.made.sort_by_key(|order| order.id);
        board.served.sort_by(|a, b| b.id.cmp(&a.id));
        board
    }

    pub fn counts(&self) -> BoardCounts {
        BoardCounts {
            pending: self.pending.len(),
            made: self.made.len(),
            served: self.served.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.made.len() + self.served.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, status: OrderStatus) -> &[Order] {
        match status {
            OrderStatus::Pending => &self.pending,
            OrderStatus::Made => &self.made,
            OrderStatus::Served => &self.served,
        }
    }

    /// Order numbers of one column, in display order.
    pub fn numbers(&self, status: OrderStatus) -> Vec<u64> {
        self.column(status).iter().map(Order::order_number).collect()
    }
}

/// One rebuild of the board.
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    pub board: OrderBoard,
    /// Order numbers not present in the previous rebuild, ascending. On the first rebuild this is
    /// every order.
    pub new_arrivals: Vec<u64>,
    pub updated_at: DateTime<Local>,
}

/// A live kitchen board. Observation stops on [`close`](Self::close) or when the screen is
/// dropped.
pub struct KitchenScreen {
    session: Session,
    subscription: Subscription,
    latest: Arc<Mutex<Option<BoardUpdate>>>,
}

impl KitchenScreen {
    /// Subscribes to the order collection. `on_update` runs once with the current board and then
    /// after every change.
    #[instrument(skip(session, on_update))]
    pub async fn open<F>(session: Session, mut on_update: F) -> Result<Self, OrderError>
    where
        F: FnMut(&BoardUpdate) + Send + 'static,
    {
        let latest = Arc::new(Mutex::new(None));
        let slot = latest.clone();
        let mut known: HashSet<u64> = HashSet::new();

        let subscription = session
            .orders
            .observe(move |snapshot| {
                let numbers: HashSet<u64> = snapshot.keys().map(|id| id.0).collect();
                let mut new_arrivals: Vec<u64> = numbers.difference(&known).copied().collect();
                new_arrivals.sort_unstable();
                for order_number in &new_arrivals {
                    info!(order_number, "New order arrived");
                }
                known = numbers;

                let update = BoardUpdate {
                    board: OrderBoard::from_orders(snapshot.values().cloned()),
                    new_arrivals,
                    updated_at: Local::now(),
                };
                on_update(&update);
                *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(update);
            })
            .await?;
        info!("Kitchen screen opened");

        Ok(Self {
            session,
            subscription,
            latest,
        })
    }

    /// The most recent rebuild, if one has happened yet.
    pub fn latest(&self) -> Option<BoardUpdate> {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.session.connection.state()
    }

    pub async fn advance(&self, order_number: u64) -> Result<OrderStatus, OrderError> {
        self.session.orders.advance(order_number).await
    }

    pub async fn mark_made(&self, order_number: u64) -> Result<Order, OrderError> {
        self.session.orders.mark_made(order_number).await
    }

    pub async fn mark_served(&self, order_number: u64) -> Result<Order, OrderError> {
        self.session.orders.mark_served(order_number).await
    }

    /// Reads the collection once and builds a board from it, without waiting for a change.
    pub async fn refresh(&self) -> Result<OrderBoard, OrderError> {
        let orders = self.session.orders.list().await?;
        Ok(OrderBoard::from_orders(orders))
    }

    /// Stops observing. The callback is not called again once this returns.
    pub async fn close(self) {
        self.subscription.close().await;
        info!("Kitchen screen closed");
    }
}
