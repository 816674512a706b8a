//! # Customer Screen
//!
//! [`OrderSubmission`] is the view model behind the ordering tablet: a cart limited to menu
//! items, its price, and `submit`, which allocates an order number and writes the order.
//!
//! Submission is two writes: the counter, then the order. If the order write fails after the
//! counter moved, that number is never used. The failure is logged as an orphaned order number
//! and returned to the caller; nothing is rolled back.

use crate::lifecycle::Session;
use crate::model::{format_won, Cart, Menu};
use crate::order_actor::OrderError;
use realtime_store::ConnectionState;
use tracing::{error, info, instrument, warn};

/// What the customer is told after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_number: u64,
    pub total_amount: u64,
}

impl PlacedOrder {
    pub fn message(&self) -> String {
        format!(
            "Order #{}\nTotal: {}\n\nPlease remember your order number!",
            self.order_number,
            format_won(self.total_amount)
        )
    }
}

pub struct OrderSubmission {
    session: Session,
    cart: Cart,
}

impl OrderSubmission {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            cart: Cart::new(),
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.session.menu
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one of a menu item and returns its new quantity.
    pub fn add(&mut self, name: &str) -> Result<u32, OrderError> {
        self.check_on_menu(name)?;
        Ok(self.cart.add(name))
    }

    /// Removes one of an item and returns its new quantity.
    pub fn remove(&mut self, name: &str) -> u32 {
        self.cart.remove(name)
    }

    pub fn set_quantity(&mut self, name: &str, quantity: u32) -> Result<(), OrderError> {
        if quantity > 0 {
            self.check_on_menu(name)?;
        }
        self.cart.set_quantity(name, quantity);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.cart.clear();
    }

    pub fn total(&self) -> u64 {
        self.session.menu.total(&self.cart)
    }

    /// The confirmation text: one line per item, then the total.
    pub fn summary(&self) -> String {
        format!(
            "Your order:\n\n{}\n\nTotal: {}",
            self.cart.summary(),
            format_won(self.total())
        )
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.session.connection.state()
    }

    /// Whether the order button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.cart.is_empty() && self.session.is_connected()
    }

    /// Places the cart as a new order.
    ///
    /// Refuses while disconnected or with an empty cart. On success the cart is emptied; on
    /// failure it is kept so the customer can retry.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<PlacedOrder, OrderError> {
        if !self.session.is_connected() {
            warn!(state = %self.connection_state(), "Refusing order while disconnected");
            return Err(OrderError::Disconnected);
        }
        if self.cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let total_amount = self.total();
        let order_number = self.session.counter.next_order_number().await?;

        let items = self.cart.items().clone();
        if let Err(e) = self
            .session
            .orders
            .create_order(order_number, items, total_amount)
            .await
        {
            error!(order_number, error = %e, "Order write failed; order number is orphaned");
            return Err(e);
        }

        info!(order_number, total_amount, "Order placed");
        self.cart.clear();
        Ok(PlacedOrder {
            order_number,
            total_amount,
        })
    }

    fn check_on_menu(&self, name: &str) -> Result<(), OrderError> {
        if self.session.menu.contains(name) {
            Ok(())
        } else {
            Err(OrderError::UnknownItem(name.to_string()))
        }
    }
}
