//! # Mock Framework
//!
//! Utilities for testing flows against a scripted remote API.
//!
//! Use [`create_mock_api`] to get an API handle and a receiver. Run the flow under
//! test in a spawned task, then use helpers like [`expect_create_order`] to assert
//! the request it sent and answer it, successfully or with an error.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{mpsc, oneshot};

use crate::api::{ApiError, AuthApi, CatalogApi, CreateOrderRequest, OrderApi};
use crate::domain::{
    LoginRequest, MenuItem, Order, OrderId, OrderItem, OrderStatus, RegisterRequest, Restaurant,
    RestaurantId, Session, UserId,
};

pub type Responder<T> = oneshot::Sender<Result<T, ApiError>>;

/// Every call the core can make on the remote API.
#[derive(Debug)]
pub enum ApiRequest {
    CreateOrder {
        request: CreateOrderRequest,
        respond_to: Responder<Order>,
    },
    GetOrder {
        id: OrderId,
        respond_to: Responder<Order>,
    },
    GetOrdersByRestaurant {
        restaurant_id: RestaurantId,
        respond_to: Responder<Vec<Order>>,
    },
    UpdateOrderStatus {
        id: OrderId,
        status: OrderStatus,
        respond_to: Responder<Order>,
    },
    GetAllRestaurants {
        respond_to: Responder<Vec<Restaurant>>,
    },
    GetRestaurantById {
        id: RestaurantId,
        respond_to: Responder<Restaurant>,
    },
    GetRestaurantByOwnerId {
        owner_id: UserId,
        respond_to: Responder<Restaurant>,
    },
    SearchRestaurants {
        query: String,
        respond_to: Responder<Vec<Restaurant>>,
    },
    GetMenuItemsByRestaurant {
        restaurant_id: RestaurantId,
        respond_to: Responder<Vec<MenuItem>>,
    },
    Login {
        request: LoginRequest,
        respond_to: Responder<Session>,
    },
    Register {
        request: RegisterRequest,
        respond_to: Responder<Session>,
    },
}

/// API implementation that forwards every call to the test through a channel.
#[derive(Clone)]
pub struct MockApi {
    sender: mpsc::Sender<ApiRequest>,
}

pub fn create_mock_api(buffer_size: usize) -> (MockApi, mpsc::Receiver<ApiRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockApi { sender }, receiver)
}

impl MockApi {
    async fn call<T>(
        &self,
        build: impl FnOnce(Responder<T>) -> ApiRequest + Send,
    ) -> Result<T, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ApiError::Transport("Mock closed".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Transport("Mock dropped".to_string()))?
    }
}

#[async_trait]
impl OrderApi for MockApi {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError> {
        self.call(|respond_to| ApiRequest::CreateOrder { request, respond_to }).await
    }

    async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.call(|respond_to| ApiRequest::GetOrder { id, respond_to }).await
    }

    async fn get_orders_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, ApiError> {
        self.call(|respond_to| ApiRequest::GetOrdersByRestaurant { restaurant_id, respond_to })
            .await
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        self.call(|respond_to| ApiRequest::UpdateOrderStatus { id, status, respond_to })
            .await
    }
}

#[async_trait]
impl CatalogApi for MockApi {
    async fn get_all_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.call(|respond_to| ApiRequest::GetAllRestaurants { respond_to }).await
    }

    async fn get_restaurant_by_id(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        self.call(|respond_to| ApiRequest::GetRestaurantById { id, respond_to }).await
    }

    async fn get_restaurant_by_owner_id(&self, owner_id: UserId) -> Result<Restaurant, ApiError> {
        self.call(|respond_to| ApiRequest::GetRestaurantByOwnerId { owner_id, respond_to })
            .await
    }

    async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>, ApiError> {
        let query = query.to_string();
        self.call(|respond_to| ApiRequest::SearchRestaurants { query, respond_to }).await
    }

    async fn get_menu_items_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, ApiError> {
        self.call(|respond_to| ApiRequest::GetMenuItemsByRestaurant { restaurant_id, respond_to })
            .await
    }
}

#[async_trait]
impl AuthApi for MockApi {
    async fn login(&self, request: LoginRequest) -> Result<Session, ApiError> {
        self.call(|respond_to| ApiRequest::Login { request, respond_to }).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<Session, ApiError> {
        self.call(|respond_to| ApiRequest::Register { request, respond_to }).await
    }
}

/// Helper to verify that the next call is a create-order request
pub async fn expect_create_order(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(CreateOrderRequest, Responder<Order>)> {
    match receiver.recv().await {
        Some(ApiRequest::CreateOrder { request, respond_to }) => Some((request, respond_to)),
        _ => None,
    }
}

pub async fn expect_get_order(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(OrderId, Responder<Order>)> {
    match receiver.recv().await {
        Some(ApiRequest::GetOrder { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call fetches a restaurant's orders
pub async fn expect_orders_by_restaurant(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(RestaurantId, Responder<Vec<Order>>)> {
    match receiver.recv().await {
        Some(ApiRequest::GetOrdersByRestaurant {
            restaurant_id,
            respond_to,
        }) => Some((restaurant_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is a status update
pub async fn expect_update_status(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(OrderId, OrderStatus, Responder<Order>)> {
    match receiver.recv().await {
        Some(ApiRequest::UpdateOrderStatus {
            id,
            status,
            respond_to,
        }) => Some((id, status, respond_to)),
        _ => None,
    }
}

pub async fn expect_all_restaurants(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<Responder<Vec<Restaurant>>> {
    match receiver.recv().await {
        Some(ApiRequest::GetAllRestaurants { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_search_restaurants(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(String, Responder<Vec<Restaurant>>)> {
    match receiver.recv().await {
        Some(ApiRequest::SearchRestaurants { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

pub async fn expect_restaurant_by_id(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(RestaurantId, Responder<Restaurant>)> {
    match receiver.recv().await {
        Some(ApiRequest::GetRestaurantById { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

pub async fn expect_restaurant_by_owner(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(UserId, Responder<Restaurant>)> {
    match receiver.recv().await {
        Some(ApiRequest::GetRestaurantByOwnerId {
            owner_id,
            respond_to,
        }) => Some((owner_id, respond_to)),
        _ => None,
    }
}

pub async fn expect_menu_items(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(RestaurantId, Responder<Vec<MenuItem>>)> {
    match receiver.recv().await {
        Some(ApiRequest::GetMenuItemsByRestaurant {
            restaurant_id,
            respond_to,
        }) => Some((restaurant_id, respond_to)),
        _ => None,
    }
}

pub async fn expect_login(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(LoginRequest, Responder<Session>)> {
    match receiver.recv().await {
        Some(ApiRequest::Login {
            request,
            respond_to,
        }) => Some((request, respond_to)),
        _ => None,
    }
}

pub async fn expect_register(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(RegisterRequest, Responder<Session>)> {
    match receiver.recv().await {
        Some(ApiRequest::Register {
            request,
            respond_to,
        }) => Some((request, respond_to)),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

pub fn session(user_id: UserId) -> Session {
    Session {
        token: format!("token-{user_id}"),
        token_type: "Bearer".to_string(),
        id: user_id,
        username: format!("owner{user_id}"),
        email: format!("owner{user_id}@example.com"),
        full_name: "Ana Owner".to_string(),
        roles: vec!["ROLE_RESTAURANT_OWNER".to_string()],
        restaurant_id: None,
    }
}

pub fn order(id: OrderId, status: OrderStatus, total: f64) -> Order {
    Order {
        id,
        order_number: format!("ORD-{id}"),
        restaurant_id: 10,
        restaurant_name: "Luigi".to_string(),
        items: vec![OrderItem {
            id: Some(id * 100),
            menu_item_id: 1,
            name: "Pizza".to_string(),
            description: String::new(),
            price: total,
            image: String::new(),
            quantity: 1,
            category: None,
        }],
        total,
        status,
        created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap(),
        updated_at: None,
        customer_name: "Ion".to_string(),
        customer_phone: "0712".to_string(),
        customer_address: "Main 1".to_string(),
        notes: None,
    }
}

pub fn with_status(mut order: Order, status: OrderStatus) -> Order {
    order.status = status;
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api() {
        let (api, mut receiver) = create_mock_api(10);

        let task = tokio::spawn(async move { api.get_restaurant_by_id(10).await });

        let (id, responder) = expect_restaurant_by_id(&mut receiver)
            .await
            .expect("Expected GetRestaurantById request");
        assert_eq!(id, 10);
        responder.send(Ok(Restaurant::new(10, "Luigi"))).unwrap();

        let result = task.await.unwrap();
        assert_eq!(result.map(|r| r.name), Ok("Luigi".to_string()));
    }
}
