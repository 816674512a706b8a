//! # Wire Format
//!
//! The JSON tree the two screens share:
//!
//! ```text
//! /orders/{order_number}: { order_number, items, total_amount, timestamp, is_made, is_served }
//! /order_counter: int
//! ```
//!
//! [`export_database`] renders the store in that shape and [`import_orders`] reads it back.
//! Reading is lenient the way a value listener is: a record that does not decode, or that sits
//! under a key other than its own order number, is skipped with a warning instead of failing the
//! whole tree.

use crate::model::{Order, OrderRecord};
use serde_json::{Map, Value};
use tracing::warn;

pub const ORDERS_PATH: &str = "orders";
pub const COUNTER_PATH: &str = "order_counter";

/// Renders `orders` and the counter as the shared JSON tree.
pub fn export_database<'a>(orders: impl IntoIterator<Item = &'a Order>, counter: u64) -> Value {
    let mut records = Map::new();
    for order in orders {
        let record = order.to_record();
        match serde_json::to_value(&record) {
            Ok(value) => {
                records.insert(order.id.to_string(), value);
            }
            Err(e) => warn!(order_number = order.order_number(), error = %e, "Skipping order"),
        }
    }
    let mut root = Map::new();
    root.insert(ORDERS_PATH.to_string(), Value::Object(records));
    root.insert(COUNTER_PATH.to_string(), Value::from(counter));
    Value::Object(root)
}

/// Decodes every well-formed order under `/orders`, sorted by order number.
pub fn import_orders(tree: &Value) -> Vec<Order> {
    let Some(records) = tree.get(ORDERS_PATH).and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut orders: Vec<Order> = records
        .iter()
        .filter_map(|(key, value)| {
            let record: OrderRecord = match serde_json::from_value(value.clone()) {
                Ok(record) => record,
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping malformed order");
                    return None;
                }
            };
            if key != &record.order_number.to_string() {
                warn!(key = %key, order_number = record.order_number, "Skipping misplaced order");
                return None;
            }
            Some(Order::from(record))
        })
        .collect();
    orders.sort_by_key(|order| order.id);
    orders
}

/// Reads `/order_counter`. Absent or malformed counters read as 0.
pub fn import_counter(tree: &Value) -> u64 {
    match tree.get(COUNTER_PATH) {
        None | Some(Value::Null) => 0,
        Some(value) => value.as_u64().unwrap_or_else(|| {
            warn!(%value, "Ignoring malformed order counter");
            0
        }),
    }
}
