use std::fmt::{self, Display};

/// Key of the single counter record.
pub const ORDER_COUNTER: &str = "order_counter";

/// Key type for counters. There is only ever [`CounterKey::order_counter`] in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey(pub String);

impl CounterKey {
    pub fn order_counter() -> Self {
        Self(ORDER_COUNTER.to_string())
    }
}

impl Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The last order number handed out. An absent counter reads as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter {
    pub value: u64,
}

/// Payload for seeding a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterCreate {
    pub start: u64,
}
