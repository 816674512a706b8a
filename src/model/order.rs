//! Customer orders as kept by the order actor.
//!
//! [`Order`] implements the [`ActorEntity`](realtime_store::ActorEntity) trait, so it can be kept
//! by a [`ResourceActor`](realtime_store::ResourceActor) under its [`OrderId`]. See
//! [`order_actor::entity`](crate::order_actor::entity) for the creation checks ([`OrderCreate`])
//! and status changes ([`OrderUpdate`]).
use crate::order_actor::OrderError;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Key of an order: its order number. Renders as the plain decimal number, which is also the
/// key used in the `/orders` tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(number: u64) -> Self {
        Self(number)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an order is in the kitchen. Only moves forward: `Pending -> Made -> Served`.
///
/// Stored as the `is_made`/`is_served` pair of an [`OrderRecord`], never on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Made,
    Served,
}

impl OrderStatus {
    /// Reads the stored flag pair. `is_served` wins regardless of `is_made`.
    pub fn from_flags(is_made: bool, is_served: bool) -> Self {
        match (is_made, is_served) {
            (_, true) => OrderStatus::Served,
            (true, false) => OrderStatus::Made,
            (false, false) => OrderStatus::Pending,
        }
    }

    /// The `(is_made, is_served)` pair written to the store.
    pub fn flags(self) -> (bool, bool) {
        match self {
            OrderStatus::Pending => (false, false),
            OrderStatus::Made => (true, false),
            OrderStatus::Served => (true, true),
        }
    }

    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Made),
            OrderStatus::Made => Some(OrderStatus::Served),
            OrderStatus::Served => None,
        }
    }

    /// Checks a move to `to`. Anything other than a single step forward is rejected.
    pub fn transition_to(self, to: OrderStatus) -> Result<OrderStatus, OrderError> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(OrderError::InvalidTransition { from: self, to })
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Made => "made",
            OrderStatus::Served => "served",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub items: BTreeMap<String, u32>,
    pub total_amount: u64,
    /// Epoch millis, stamped by the store when the order is written.
    pub timestamp: i64,
    pub status: OrderStatus,
}

/// Payload for writing a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreate {
    pub order_number: u64,
    pub items: BTreeMap<String, u32>,
    pub total_amount: u64,
}

/// Moves an order to an explicit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: OrderStatus,
}

impl Order {
    pub fn order_number(&self) -> u64 {
        self.id.0
    }

    pub fn is_made(&self) -> bool {
        self.status.flags().0
    }

    pub fn is_served(&self) -> bool {
        self.status == OrderStatus::Served
    }

    /// Creation time as `HH:MM` in local time.
    pub fn formatted_time(&self) -> String {
        self.formatted_time_in(&Local)
    }

    /// Creation time as `HH:MM` in `zone`. Empty if the timestamp is out of range.
    pub fn formatted_time_in<Tz: TimeZone>(&self, zone: &Tz) -> String
    where
        Tz::Offset: Display,
    {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
            .map(|utc| utc.with_timezone(zone).format("%H:%M").to_string())
            .unwrap_or_default()
    }

    pub fn to_record(&self) -> OrderRecord {
        let (is_made, is_served) = self.status.flags();
        OrderRecord {
            order_number: self.order_number(),
            items: self.items.clone(),
            total_amount: self.total_amount,
            timestamp: self.timestamp,
            is_made,
            is_served,
        }
    }
}

/// An order as it appears under `/orders/{order_number}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_number: u64,
    pub items: BTreeMap<String, u32>,
    pub total_amount: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub is_made: bool,
    #[serde(default)]
    pub is_served: bool,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: OrderId(record.order_number),
            items: record.items,
            total_amount: record.total_amount,
            timestamp: record.timestamp,
            status: OrderStatus::from_flags(record.is_made, record.is_served),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId(12),
            items: BTreeMap::from([("Lemonade".to_string(), 1)]),
            total_amount: 3000,
            // 2024-03-01 09:05:30 UTC
            timestamp: 1_709_283_930_000,
            status,
        }
    }

    #[test]
    fn test_status_from_flags() {
        assert_eq!(OrderStatus::from_flags(false, false), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_flags(true, false), OrderStatus::Made);
        assert_eq!(OrderStatus::from_flags(true, true), OrderStatus::Served);
        assert_eq!(OrderStatus::from_flags(false, true), OrderStatus::Served);
    }

    #[test]
    fn test_only_single_forward_steps_are_allowed() {
        use OrderStatus::*;
        assert_eq!(Pending.transition_to(Made).unwrap(), Made);
        assert_eq!(Made.transition_to(Served).unwrap(), Served);

        for (from, to) in [
            (Pending, Served),
            (Pending, Pending),
            (Made, Pending),
            (Made, Made),
            (Served, Made),
            (Served, Pending),
            (Served, Served),
        ] {
            assert_eq!(
                from.transition_to(to),
                Err(OrderError::InvalidTransition { from, to })
            );
        }
        assert_eq!(Served.next(), None);
    }

    #[test]
    fn test_id_renders_as_number() {
        assert_eq!(OrderId(42).to_string(), "42");
    }

    #[test]
    fn test_formatted_time() {
        assert_eq!(order(OrderStatus::Pending).formatted_time_in(&Utc), "09:05");
        let broken = Order {
            timestamp: i64::MAX,
            ..order(OrderStatus::Pending)
        };
        assert_eq!(broken.formatted_time_in(&Utc), "");
    }

    #[test]
    fn test_record_json_shape() {
        let record = order(OrderStatus::Made).to_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "order_number": 12,
                "items": {"Lemonade": 1},
                "total_amount": 3000,
                "timestamp": 1_709_283_930_000i64,
                "is_made": true,
                "is_served": false
            })
        );

        let sparse: OrderRecord = serde_json::from_value(serde_json::json!({
            "order_number": 3,
            "items": {"Hot Dog": 2},
            "total_amount": 7000,
            "timestamp": 0
        }))
        .unwrap();
        assert_eq!(Order::from(sparse).status, OrderStatus::Pending);
    }
}
