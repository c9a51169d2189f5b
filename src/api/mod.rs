//! The remote marketplace API as seen by this client.
//!
//! Each trait is one seam the core depends on. [`HttpApiClient`](crate::clients::HttpApiClient)
//! implements all of them over HTTP; tests script them through the mock framework.

pub mod error;

pub use error::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    LoginRequest, MenuItem, MenuItemId, Order, OrderId, OrderStatus, RegisterRequest, Restaurant,
    RestaurantId, Session, UserId,
};

/// One requested line of a new order. Price is resolved by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub restaurant_id: RestaurantId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    #[serde(default)]
    pub message: String,
}

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError>;

    async fn get_order(&self, id: OrderId) -> Result<Order, ApiError>;

    async fn get_orders_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, ApiError>;

    /// The server is the final arbiter of whether the transition is legal.
    async fn update_order_status(&self, id: OrderId, status: OrderStatus)
        -> Result<Order, ApiError>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn get_all_restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;

    async fn get_restaurant_by_id(&self, id: RestaurantId) -> Result<Restaurant, ApiError>;

    async fn get_restaurant_by_owner_id(&self, owner_id: UserId) -> Result<Restaurant, ApiError>;

    async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>, ApiError>;

    async fn get_menu_items_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: LoginRequest) -> Result<Session, ApiError>;

    async fn register(&self, request: RegisterRequest) -> Result<Session, ApiError>;
}
