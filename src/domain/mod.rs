//! Marketplace entities as the remote API returns them. Pure data, no client concerns.

pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod session;

pub use menu_item::*;
pub use order::*;
pub use restaurant::*;
pub use session::*;

pub type RestaurantId = i64;
pub type MenuItemId = i64;
pub type OrderId = i64;
pub type UserId = i64;

/// The server sends `null` for unset booleans, strings and lists.
pub(crate) mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn or_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
    }

    pub fn yes() -> bool {
        true
    }
}
