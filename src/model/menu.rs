//! The café menu and its pricing rule.
//!
//! Every drink costs [`DRINK_PRICE`] and every snack [`SNACK_PRICE`]. Each drink paired with a
//! snack is charged [`SET_PRICE`] instead of the two unit prices.

use crate::model::Cart;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Display};
use thiserror::Error;

/// Unit price of any drink, in won.
pub const DRINK_PRICE: u64 = 3000;
/// Unit price of any snack, in won.
pub const SNACK_PRICE: u64 = 3500;
/// Price of one drink + one snack bought together.
pub const SET_PRICE: u64 = 5500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Drink,
    Snack,
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Drink => f.write_str("Drinks"),
            Category::Snack => f.write_str("Snacks"),
        }
    }
}

/// Category prices and the set discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceList {
    pub drink: u64,
    pub snack: u64,
    pub set: u64,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            drink: DRINK_PRICE,
            snack: SNACK_PRICE,
            set: SET_PRICE,
        }
    }
}

impl PriceList {
    pub fn unit_price(&self, category: Category) -> u64 {
        match category {
            Category::Drink => self.drink,
            Category::Snack => self.snack,
        }
    }

    /// Total for `drinks` drinks and `snacks` snacks, pairing as many as possible into sets.
    pub fn total(&self, drinks: u64, snacks: u64) -> u64 {
        let sets = drinks.min(snacks);
        sets * self.set + (drinks - sets) * self.drink + (snacks - sets) * self.snack
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub category: Category,
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Menu lists {0:?} more than once")]
    DuplicateItem(String),

    #[error("Menu has no items")]
    Empty,
}

/// The items on sale and their prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub prices: PriceList,
    pub items: Vec<MenuItem>,
}

impl Default for Menu {
    fn default() -> Self {
        let item = |name: &str, category| MenuItem {
            name: name.to_string(),
            category,
        };
        Self {
            prices: PriceList::default(),
            items: vec![
                item("Hot Americano", Category::Drink),
                item("Iced Americano", Category::Drink),
                item("Iced Tea", Category::Drink),
                item("Lemonade", Category::Drink),
                item("Cupbokki", Category::Snack),
                item("Hot Dog", Category::Snack),
            ],
        }
    }
}

impl Menu {
    /// Parses a menu such as
    /// `{"prices": {"drink": 3000, "snack": 3500, "set": 5500}, "items": [{"name": "Lemonade", "category": "drink"}]}`.
    /// `prices` may be omitted to use the standard prices.
    pub fn from_json(json: &str) -> Result<Self, MenuError> {
        let menu: Menu = serde_json::from_str(json)?;
        menu.validate()?;
        Ok(menu)
    }

    fn validate(&self) -> Result<(), MenuError> {
        if self.items.is_empty() {
            return Err(MenuError::Empty);
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.name.as_str()) {
                return Err(MenuError::DuplicateItem(item.name.clone()));
            }
        }
        Ok(())
    }

    pub fn item(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.item(name).is_some()
    }

    pub fn category_of(&self, name: &str) -> Option<Category> {
        self.item(name).map(|item| item.category)
    }

    /// Unit price shown next to an item.
    pub fn price_of(&self, name: &str) -> Option<u64> {
        self.category_of(name)
            .map(|category| self.prices.unit_price(category))
    }

    /// Items of one category, sorted by name.
    pub fn section(&self, category: Category) -> Vec<&MenuItem> {
        let mut items: Vec<&MenuItem> = self
            .items
            .iter()
            .filter(|item| item.category == category)
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Price of a cart. Names that are not on the menu count for nothing.
    pub fn total(&self, cart: &Cart) -> u64 {
        let (mut drinks, mut snacks) = (0u64, 0u64);
        for (name, quantity) in cart.items() {
            match self.category_of(name) {
                Some(Category::Drink) => drinks += u64::from(*quantity),
                Some(Category::Snack) => snacks += u64::from(*quantity),
                None => {}
            }
        }
        self.prices.total(drinks, snacks)
    }
}

/// Renders an amount with thousands separators, e.g. `5,500 won`.
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{} won", grouped)
}

/// Price of `cart` on the standard menu.
pub fn total(cart: &Cart) -> u64 {
    Menu::default().total(cart)
}
