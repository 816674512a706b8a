use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item name to quantity. Entries with a zero quantity are never kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<String, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one of `name`. Returns the new quantity.
    pub fn add(&mut self, name: &str) -> u32 {
        let quantity = self.items.entry(name.to_string()).or_insert(0);
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Removes one of `name`, dropping the entry when it reaches zero. Returns the new quantity.
    pub fn remove(&mut self, name: &str) -> u32 {
        match self.items.get_mut(name) {
            Some(quantity) if *quantity > 1 => {
                *quantity -= 1;
                *quantity
            }
            Some(_) => {
                self.items.remove(name);
                0
            }
            None => 0,
        }
    }

    pub fn set_quantity(&mut self, name: &str, quantity: u32) {
        if quantity == 0 {
            self.items.remove(name);
        } else {
            self.items.insert(name.to_string(), quantity);
        }
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all items.
    pub fn item_count(&self) -> u64 {
        self.items.values().map(|q| u64::from(*q)).sum()
    }

    pub fn items(&self) -> &BTreeMap<String, u32> {
        &self.items
    }

    /// One "• name xN" line per item, sorted by name.
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|(name, quantity)| format!("• {} x{}", name, quantity))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<BTreeMap<String, u32>> for Cart {
    fn from(mut items: BTreeMap<String, u32>) -> Self {
        items.retain(|_, quantity| *quantity > 0);
        Self { items }
    }
}

impl From<Cart> for BTreeMap<String, u32> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut cart = Cart::new();
        assert_eq!(cart.add("Lemonade"), 1);
        assert_eq!(cart.add("Lemonade"), 2);
        assert_eq!(cart.remove("Lemonade"), 1);
        assert_eq!(cart.remove("Lemonade"), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.remove("Lemonade"), 0);
    }

    #[test]
    fn test_zero_quantity_drops_entry() {
        let mut cart = Cart::new();
        cart.set_quantity("Hot Dog", 3);
        assert_eq!(cart.item_count(), 3);
        cart.set_quantity("Hot Dog", 0);
        assert!(cart.is_empty());

        let mut raw = BTreeMap::new();
        raw.insert("Iced Tea".to_string(), 0);
        raw.insert("Cupbokki".to_string(), 2);
        let cart = Cart::from(raw);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity("Cupbokki"), 2);
    }

    #[test]
    fn test_summary_lines_are_sorted() {
        let mut cart = Cart::new();
        cart.set_quantity("Lemonade", 2);
        cart.add("Hot Dog");
        assert_eq!(cart.summary(), "• Hot Dog x1\n• Lemonade x2");
        cart.clear();
        assert_eq!(cart.summary(), "");
    }
}
