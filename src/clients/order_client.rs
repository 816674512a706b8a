//! # Order Client
//!
//! High-level API for the Order actor. Store errors are mapped back into [`OrderError`], so a
//! hook's rejection (an invalid transition, an unknown item) reaches the caller as the same
//! variant the hook returned.
use crate::clients::ActorClient;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use realtime_store::{FrameworkError, ResourceClient};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Writes a new pending order under `order_number`.
    ///
    /// The actor stamps the timestamp and checks the items and total against the menu. Fails
    /// with [`OrderError::AlreadyExists`] if the number is taken.
    #[instrument(skip(self, items))]
    pub async fn create_order(
        &self,
        order_number: u64,
        items: BTreeMap<String, u32>,
        total_amount: u64,
    ) -> Result<OrderId, OrderError> {
        debug!(?items, "create_order called");
        let payload = OrderCreate {
            order_number,
            items,
            total_amount,
        };
        let id = self
            .inner
            .create(OrderId(order_number), payload)
            .await
            .map_err(Self::map_error)?;
        info!("Order written");
        Ok(id)
    }

    /// Moves an order to `status`, which must be the next step from its current one.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_number: u64,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .update(OrderId(order_number), OrderUpdate { status })
            .await
            .map_err(Self::map_error)
    }

    pub async fn mark_made(&self, order_number: u64) -> Result<Order, OrderError> {
        self.update_status(order_number, OrderStatus::Made).await
    }

    pub async fn mark_served(&self, order_number: u64) -> Result<Order, OrderError> {
        self.update_status(order_number, OrderStatus::Served).await
    }

    /// Moves an order one step forward and returns its new status.
    #[instrument(skip(self))]
    pub async fn advance(&self, order_number: u64) -> Result<OrderStatus, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(OrderId(order_number), OrderAction::Advance)
            .await
            .map_err(Self::map_error)
    }

    /// Stores an order exactly as given (timestamp and status included), skipping the creation
    /// checks. Used when seeding a store from a dump.
    #[instrument(skip(self, order), fields(order_number = order.order_number()))]
    pub async fn restore(&self, order: Order) -> Result<(), OrderError> {
        debug!("Sending request");
        self.inner
            .compare_and_set(order.id, None, order)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                FrameworkError::Conflict { id, .. } => OrderError::AlreadyExists(id),
                other => Self::map_error(other),
            })
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::AlreadyExists(id) => OrderError::AlreadyExists(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                Ok(order_error) => *order_error,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realtime_store::mock::{
        create_mock_client, expect_action, expect_create, expect_update, MockClient,
    };

    #[tokio::test]
    async fn test_create_order_sends_payload_under_its_number() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);

        let task = tokio::spawn(async move {
            let items = BTreeMap::from([("Hot Dog".to_string(), 2)]);
            order_client.create_order(7, items, 7000).await
        });

        let (id, payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(id, OrderId(7));
        assert_eq!(payload.order_number, 7);
        assert_eq!(payload.total_amount, 7000);
        assert_eq!(payload.items.get("Hot Dog"), Some(&2));
        responder.send(Ok(OrderId(7))).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), OrderId(7));
    }

    #[tokio::test]
    async fn test_mark_made_sends_explicit_status() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);

        let task = tokio::spawn(async move { order_client.mark_made(5).await });

        let (id, update, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, OrderId(5));
        assert_eq!(
            update,
            OrderUpdate {
                status: OrderStatus::Made
            }
        );
        let made = Order {
            id: OrderId(5),
            items: BTreeMap::from([("Iced Tea".to_string(), 1)]),
            total_amount: 3000,
            timestamp: 0,
            status: OrderStatus::Made,
        };
        responder.send(Ok(made.clone())).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), made);
    }

    #[tokio::test]
    async fn test_advance_returns_new_status() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let order_client = OrderClient::new(client);

        let task = tokio::spawn(async move { order_client.advance(3).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, OrderId(3));
        assert_eq!(action, OrderAction::Advance);
        responder.send(Ok(OrderStatus::Made)).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), OrderStatus::Made);
    }

    #[tokio::test]
    async fn test_hook_errors_come_back_as_order_errors() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_update(OrderId(2))
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::InvalidTransition {
                    from: OrderStatus::Pending,
                    to: OrderStatus::Served,
                },
            )));
        mock.expect_create(OrderId(2))
            .return_err(FrameworkError::AlreadyExists("2".into()));
        mock.expect_action(OrderId(9))
            .return_err(FrameworkError::NotFound("9".into()));
        mock.expect_list().return_err(FrameworkError::ActorClosed);

        let client = OrderClient::new(mock.client());
        assert_eq!(
            client.mark_served(2).await.unwrap_err(),
            OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Served
            }
        );
        assert_eq!(
            client
                .create_order(2, BTreeMap::from([("Lemonade".to_string(), 1)]), 3000)
                .await
                .unwrap_err(),
            OrderError::AlreadyExists("2".into())
        );
        assert_eq!(
            client.advance(9).await.unwrap_err(),
            OrderError::NotFound("9".into())
        );
        assert!(matches!(
            client.list().await,
            Err(OrderError::ActorCommunicationError(_))
        ));
        mock.verify();
    }

    #[tokio::test]
    async fn test_foreign_entity_errors_are_reported_as_communication_errors() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(1))
            .return_err(FrameworkError::EntityError(Box::new(std::io::Error::other(
                "disk on fire",
            ))));

        let client = OrderClient::new(mock.client());
        match client.advance(1).await {
            Err(OrderError::ActorCommunicationError(msg)) => assert!(msg.contains("disk on fire")),
            other => panic!("expected ActorCommunicationError, got {:?}", other),
        }
    }
}
