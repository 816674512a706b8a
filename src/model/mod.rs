//! Plain data types. [`Order`] and [`Counter`] implement
//! [`ActorEntity`](realtime_store::ActorEntity) in their actor modules.

pub mod cart;
pub mod counter;
pub mod menu;
pub mod order;

pub use cart::*;
pub use counter::*;
pub use menu::{format_won, Category, Menu, MenuError, MenuItem, PriceList, DRINK_PRICE, SET_PRICE, SNACK_PRICE};
pub use order::*;
