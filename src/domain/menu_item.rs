use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{nullable, MenuItemId, RestaurantId};

/// A dish offered by exactly one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub description: String,
    pub price: f64,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub image: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub is_popular: bool,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub is_vegetarian: bool,
    #[serde(default = "nullable::yes", deserialize_with = "nullable::or_true")]
    pub available: bool,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub allergens: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl MenuItem {
    pub fn new(
        id: MenuItemId,
        restaurant_id: RestaurantId,
        name: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id,
            restaurant_id,
            name: name.into(),
            description: String::new(),
            price,
            image: String::new(),
            category: String::new(),
            is_popular: false,
            is_vegetarian: false,
            available: true,
            allergens: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Fields a restaurant owner submits when creating or editing a menu item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
    pub is_popular: bool,
    pub is_vegetarian: bool,
    pub available: bool,
    pub allergens: Vec<String>,
}
