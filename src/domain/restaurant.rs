use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{nullable, RestaurantId, UserId};

/// A restaurant listed on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub image: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub cuisine: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub review_count: u32,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub delivery_time: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub delivery_fee: f64,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub min_order: f64,
    #[serde(default = "nullable::yes", deserialize_with = "nullable::or_true")]
    pub is_open: bool,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub address: String,
    #[serde(default, deserialize_with = "nullable::or_default")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Restaurant {
    pub fn new(id: RestaurantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image: String::new(),
            cuisine: String::new(),
            rating: 0.0,
            review_count: 0,
            delivery_time: String::new(),
            delivery_fee: 0.0,
            min_order: 0.0,
            is_open: true,
            address: String::new(),
            categories: Vec::new(),
            owner_id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Restaurant profile fields an owner submits on setup or edit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDraft {
    pub name: String,
    pub image: String,
    pub cuisine: String,
    pub delivery_time: String,
    pub delivery_fee: f64,
    pub min_order: f64,
    pub is_open: bool,
    pub address: String,
    pub categories: Vec<String>,
}
