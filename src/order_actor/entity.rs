//! [`ActorEntity`] implementation for [`Order`].
//!
//! The actor's context is the shared [`Menu`]; `on_create` checks every new order against it, so
//! a record that reaches the store always has known items, positive quantities and a total that
//! matches the menu pricing.

use super::actions::OrderAction;
use super::error::OrderError;
use crate::model::{Cart, Menu, Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use async_trait::async_trait;
use chrono::Utc;
use realtime_store::ActorEntity;
use std::sync::Arc;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderStatus;
    type Context = Arc<Menu>;
    type Error = OrderError;

    /// Builds a pending order stamped with the current time.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.order_number != id.0 {
            return Err(OrderError::ValidationError(format!(
                "order number {} written under key {}",
                params.order_number, id
            )));
        }
        Ok(Self {
            id,
            items: params.items,
            total_amount: params.total_amount,
            timestamp: Utc::now().timestamp_millis(),
            status: OrderStatus::Pending,
        })
    }

    async fn on_create(&mut self, menu: &Arc<Menu>) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        for (name, quantity) in &self.items {
            if !menu.contains(name) {
                return Err(OrderError::UnknownItem(name.clone()));
            }
            if *quantity == 0 {
                return Err(OrderError::ValidationError(format!(
                    "zero quantity for {}",
                    name
                )));
            }
        }
        let expected = menu.total(&Cart::from(self.items.clone()));
        if expected != self.total_amount {
            return Err(OrderError::ValidationError(format!(
                "total {} does not match menu price {}",
                self.total_amount, expected
            )));
        }
        Ok(())
    }

    /// Moves to `update.status`, which must be the next step.
    async fn on_update(&mut self, update: OrderUpdate, _menu: &Arc<Menu>) -> Result<(), OrderError> {
        self.status = self.status.transition_to(update.status)?;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _menu: &Arc<Menu>,
    ) -> Result<OrderStatus, OrderError> {
        match action {
            OrderAction::Advance => {
                let next = self
                    .status
                    .next()
                    .ok_or(OrderError::AlreadyServed(self.order_number()))?;
                self.status = self.status.transition_to(next)?;
                Ok(self.status)
            }
        }
    }
}
