//! Merchant view over one restaurant's orders.
//!
//! The console never assumes a status change succeeded: the displayed status
//! only changes once the server has confirmed the update.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, CatalogApi, OrderApi};
use crate::domain::{Order, OrderId, OrderStatus, Restaurant};
use crate::session::{SessionError, SessionStore};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConsoleError {
    #[error("Not signed in")]
    NotAuthenticated,
    /// The signed-in owner has not set up a restaurant yet.
    #[error("No restaurant registered for this account")]
    NoRestaurant,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Order not found: {0}")]
    UnknownOrder(OrderId),
    #[error("Order {order_id} is {status} and cannot change")]
    NoTransition {
        order_id: OrderId,
        status: OrderStatus,
    },
    /// Fetching the restaurant or its orders failed.
    #[error("Loading orders failed: {0}")]
    Load(ApiError),
    /// A status update was rejected or could not be sent.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ConsoleError {
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Api(e) => e
                .server_message()
                .unwrap_or("Failed to update order status")
                .to_string(),
            ConsoleError::Load(e) => e
                .server_message()
                .unwrap_or("Failed to load orders")
                .to_string(),
            ConsoleError::NoRestaurant => {
                "Set up your restaurant before managing orders".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// An action an owner may take on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Advance(OrderStatus),
    Cancel,
}

impl StatusAction {
    pub fn target(self) -> OrderStatus {
        match self {
            StatusAction::Advance(next) => next,
            StatusAction::Cancel => OrderStatus::Cancelled,
        }
    }

    /// Button text for the action.
    pub fn label(self) -> String {
        match self {
            StatusAction::Advance(next) => format!("Mark as {}", next.label()),
            StatusAction::Cancel => "Cancel".to_string(),
        }
    }
}

/// Dashboard counters, derived from the order list on every call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub preparing: usize,
    pub completed: usize,
    /// Sum of totals over every order that was not cancelled.
    pub revenue: f64,
}

impl OrderStats {
    pub fn from_orders(orders: &[Order]) -> Self {
        let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
        Self {
            total: orders.len(),
            pending: count(OrderStatus::Pending),
            preparing: count(OrderStatus::Preparing),
            completed: count(OrderStatus::Completed),
            revenue: orders
                .iter()
                .filter(|o| o.status != OrderStatus::Cancelled)
                .map(|o| o.total)
                .sum(),
        }
    }
}

pub fn actions_for(order: &Order) -> Vec<StatusAction> {
    let mut actions = Vec::with_capacity(2);
    if let Some(next) = order.status.next() {
        actions.push(StatusAction::Advance(next));
    }
    if order.status.can_cancel() {
        actions.push(StatusAction::Cancel);
    }
    actions
}

pub struct OrderConsole<A: OrderApi + CatalogApi> {
    api: A,
    restaurant: Restaurant,
    orders: Vec<Order>,
    filter: Option<OrderStatus>,
}

impl<A: OrderApi + CatalogApi> OrderConsole<A> {
    /// Open the console for the signed-in owner's restaurant.
    #[instrument(skip(api, sessions))]
    pub async fn open(api: A, sessions: &dyn SessionStore) -> Result<Self, ConsoleError> {
        let session = sessions.get()?.ok_or(ConsoleError::NotAuthenticated)?;
        let restaurant = api
            .get_restaurant_by_owner_id(session.id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    info!(user_id = session.id, "Owner has no restaurant yet");
                    ConsoleError::NoRestaurant
                } else {
                    ConsoleError::Load(e)
                }
            })?;
        info!(restaurant_id = restaurant.id, restaurant_name = %restaurant.name, "Console opened");
        Self::for_restaurant(api, restaurant).await
    }

    pub async fn for_restaurant(api: A, restaurant: Restaurant) -> Result<Self, ConsoleError> {
        let mut console = Self {
            api,
            restaurant,
            orders: Vec::new(),
            filter: None,
        };
        console.refresh().await?;
        Ok(console)
    }

    pub fn restaurant(&self) -> &Restaurant {
        &self.restaurant
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    #[instrument(skip(self), fields(restaurant_id = self.restaurant.id))]
    pub async fn refresh(&mut self) -> Result<(), ConsoleError> {
        self.orders = self
            .api
            .get_orders_by_restaurant(self.restaurant.id)
            .await
            .map_err(ConsoleError::Load)?;
        info!(count = self.orders.len(), "Orders loaded");
        Ok(())
    }

    /// Re-read a single order from the server and replace the local entry.
    #[instrument(skip(self), fields(restaurant_id = self.restaurant.id))]
    pub async fn reload_order(&mut self, order_id: OrderId) -> Result<&Order, ConsoleError> {
        let index = self
            .orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or(ConsoleError::UnknownOrder(order_id))?;
        let fresh = self.api.get_order(order_id).await.map_err(ConsoleError::Load)?;
        self.orders[index] = fresh;
        Ok(&self.orders[index])
    }

    /// Move an order one step along the progression.
    pub async fn advance(&mut self, order_id: OrderId) -> Result<Order, ConsoleError> {
        let order = self.order(order_id).ok_or(ConsoleError::UnknownOrder(order_id))?;
        let next = order.status.next().ok_or(ConsoleError::NoTransition {
            order_id,
            status: order.status,
        })?;
        self.apply(order_id, StatusAction::Advance(next)).await
    }

    pub async fn cancel(&mut self, order_id: OrderId) -> Result<Order, ConsoleError> {
        let order = self.order(order_id).ok_or(ConsoleError::UnknownOrder(order_id))?;
        if !order.status.can_cancel() {
            return Err(ConsoleError::NoTransition {
                order_id,
                status: order.status,
            });
        }
        self.apply(order_id, StatusAction::Cancel).await
    }

    #[instrument(skip(self), fields(restaurant_id = self.restaurant.id))]
    async fn apply(
        &mut self,
        order_id: OrderId,
        action: StatusAction,
    ) -> Result<Order, ConsoleError> {
        let confirmed = self
            .api
            .update_order_status(order_id, action.target())
            .await?;
        info!(status = %confirmed.status, "Status change confirmed");

        if let Some(entry) = self.orders.iter_mut().find(|o| o.id == confirmed.id) {
            *entry = confirmed.clone();
        }
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Re-fetch after status change failed, keeping confirmed entry");
        }
        Ok(confirmed)
    }

    pub fn filter(&self) -> Option<OrderStatus> {
        self.filter
    }

    /// Restrict the visible list to one status, or show everything with `None`.
    pub fn set_filter(&mut self, filter: Option<OrderStatus>) {
        self.filter = filter;
    }

    pub fn visible_orders(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| self.filter.map_or(true, |status| o.status == status))
            .collect()
    }

    pub fn stats(&self) -> OrderStats {
        OrderStats::from_orders(&self.orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_framework::{
        create_mock_api, expect_get_order, expect_orders_by_restaurant,
        expect_restaurant_by_owner, expect_update_status, order, session, with_status,
        ApiRequest, MockApi,
    };
    use crate::session::MemorySessionStore;
    use tokio::sync::mpsc;

    fn board() -> Vec<Order> {
        vec![
            order(1, OrderStatus::Pending, 30.0),
            order(2, OrderStatus::Preparing, 45.0),
            order(3, OrderStatus::Completed, 20.0),
            order(4, OrderStatus::Cancelled, 100.0),
            order(5, OrderStatus::Pending, 12.5),
        ]
    }

    async fn opened_console(
        orders: Vec<Order>,
    ) -> (OrderConsole<MockApi>, mpsc::Receiver<ApiRequest>) {
        let (api, mut rx) = create_mock_api(8);
        let task = tokio::spawn(OrderConsole::for_restaurant(api, Restaurant::new(10, "Luigi")));
        let (restaurant_id, responder) = expect_orders_by_restaurant(&mut rx).await.unwrap();
        assert_eq!(restaurant_id, 10);
        responder.send(Ok(orders)).unwrap();
        (task.await.unwrap().unwrap(), rx)
    }

    #[test]
    fn test_actions_follow_progression() {
        let pending = order(1, OrderStatus::Pending, 1.0);
        assert_eq!(
            actions_for(&pending),
            vec![StatusAction::Advance(OrderStatus::Confirmed), StatusAction::Cancel]
        );
        let ready = with_status(pending.clone(), OrderStatus::Ready);
        assert_eq!(
            actions_for(&ready),
            vec![StatusAction::Advance(OrderStatus::Completed), StatusAction::Cancel]
        );
        assert!(actions_for(&with_status(pending.clone(), OrderStatus::Completed)).is_empty());
        assert!(actions_for(&with_status(pending, OrderStatus::Cancelled)).is_empty());
    }

    #[test]
    fn test_stats_exclude_cancelled_revenue() {
        let stats = OrderStats::from_orders(&board());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.preparing, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.revenue, 107.5);
    }

    #[tokio::test]
    async fn test_open_requires_session() {
        let (api, _rx) = create_mock_api(2);
        let result = OrderConsole::open(api, &MemorySessionStore::new()).await;
        assert_eq!(result.err(), Some(ConsoleError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_open_resolves_owner_restaurant() {
        let (api, mut rx) = create_mock_api(4);
        let task = tokio::spawn(async move {
            let store = MemorySessionStore::with_session(session(42));
            OrderConsole::open(api, &store).await
        });

        let (owner_id, responder) = expect_restaurant_by_owner(&mut rx).await.unwrap();
        assert_eq!(owner_id, 42);
        responder.send(Ok(Restaurant::new(10, "Luigi"))).unwrap();
        let (_, responder) = expect_orders_by_restaurant(&mut rx).await.unwrap();
        responder.send(Ok(board())).unwrap();

        let console = task.await.unwrap().unwrap();
        assert_eq!(console.restaurant().name, "Luigi");
        assert_eq!(console.orders().len(), 5);
    }

    #[tokio::test]
    async fn test_advance_refetches_after_confirmation() {
        let (console, mut rx) = opened_console(board()).await;

        let task = tokio::spawn(async move {
            let mut console = console;
            let result = console.advance(1).await;
            (console, result)
        });

        let (id, status, responder) = expect_update_status(&mut rx).await.unwrap();
        assert_eq!((id, status), (1, OrderStatus::Confirmed));
        responder
            .send(Ok(order(1, OrderStatus::Confirmed, 30.0)))
            .unwrap();

        let (_, responder) = expect_orders_by_restaurant(&mut rx).await.unwrap();
        let mut refreshed = board();
        refreshed[0].status = OrderStatus::Confirmed;
        refreshed.push(order(6, OrderStatus::Pending, 8.0));
        responder.send(Ok(refreshed)).unwrap();

        let (console, result) = task.await.unwrap();
        assert_eq!(result.unwrap().status, OrderStatus::Confirmed);
        assert_eq!(console.order(1).unwrap().status, OrderStatus::Confirmed);
        assert_eq!(console.orders().len(), 6);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_status_unchanged() {
        let (console, mut rx) = opened_console(board()).await;

        let task = tokio::spawn(async move {
            let mut console = console;
            let result = console.advance(2).await;
            (console, result)
        });

        let (_, status, responder) = expect_update_status(&mut rx).await.unwrap();
        assert_eq!(status, OrderStatus::Ready);
        responder
            .send(Err(ApiError::Status {
                status: 409,
                message: Some("Order changed".into()),
            }))
            .unwrap();

        let (console, result) = task.await.unwrap();
        let err = result.unwrap_err();
        assert_eq!(err.user_message(), "Order changed");
        assert_eq!(console.order(2).unwrap().status, OrderStatus::Preparing);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refetch_failure_keeps_confirmed_entry() {
        let (console, mut rx) = opened_console(board()).await;

        let task = tokio::spawn(async move {
            let mut console = console;
            let result = console.cancel(5).await;
            (console, result)
        });

        let (id, status, responder) = expect_update_status(&mut rx).await.unwrap();
        assert_eq!((id, status), (5, OrderStatus::Cancelled));
        responder
            .send(Ok(order(5, OrderStatus::Cancelled, 12.5)))
            .unwrap();
        let (_, responder) = expect_orders_by_restaurant(&mut rx).await.unwrap();
        responder
            .send(Err(ApiError::Transport("timeout".into())))
            .unwrap();

        let (console, result) = task.await.unwrap();
        assert!(result.is_ok());
        assert_eq!(console.order(5).unwrap().status, OrderStatus::Cancelled);
        assert_eq!(console.stats().revenue, 95.0);
    }

    #[tokio::test]
    async fn test_terminal_orders_send_nothing() {
        let (mut console, mut rx) = opened_console(board()).await;

        assert_eq!(
            console.advance(3).await.unwrap_err(),
            ConsoleError::NoTransition { order_id: 3, status: OrderStatus::Completed }
        );
        assert_eq!(
            console.cancel(4).await.unwrap_err(),
            ConsoleError::NoTransition { order_id: 4, status: OrderStatus::Cancelled }
        );
        assert_eq!(console.cancel(3).await.unwrap_err().to_string(), "Order 3 is COMPLETED and cannot change");
        assert_eq!(console.advance(99).await.unwrap_err(), ConsoleError::UnknownOrder(99));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_filter_is_local() {
        let (mut console, mut rx) = opened_console(board()).await;

        console.set_filter(Some(OrderStatus::Pending));
        let ids: Vec<_> = console.visible_orders().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 5]);

        console.set_filter(Some(OrderStatus::Ready));
        assert!(console.visible_orders().is_empty());

        console.set_filter(None);
        assert_eq!(console.visible_orders().len(), 5);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(
            StatusAction::Advance(OrderStatus::Preparing).label(),
            "Mark as Preparing"
        );
        assert_eq!(StatusAction::Cancel.label(), "Cancel");
    }

    #[tokio::test]
    async fn test_open_without_restaurant_asks_for_setup() {
        let (api, mut rx) = create_mock_api(4);
        let task = tokio::spawn(async move {
            let store = MemorySessionStore::with_session(session(42));
            OrderConsole::open(api, &store).await.err()
        });

        let (_, responder) = expect_restaurant_by_owner(&mut rx).await.unwrap();
        responder
            .send(Err(ApiError::Status {
                status: 404,
                message: None,
            }))
            .unwrap();

        let err = task.await.unwrap();
        assert_eq!(err, Some(ConsoleError::NoRestaurant));
        assert_eq!(
            err.map(|e| e.user_message()).as_deref(),
            Some("Set up your restaurant before managing orders")
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_failure_has_its_own_message() {
        let (api, mut rx) = create_mock_api(4);
        let task = tokio::spawn(OrderConsole::for_restaurant(api, Restaurant::new(10, "Luigi")));

        let (_, responder) = expect_orders_by_restaurant(&mut rx).await.unwrap();
        responder
            .send(Err(ApiError::Transport("connection refused".into())))
            .unwrap();

        let err = task.await.unwrap().err().unwrap();
        assert!(matches!(err, ConsoleError::Load(_)));
        assert_eq!(err.user_message(), "Failed to load orders");
    }

    #[tokio::test]
    async fn test_owner_lookup_failure_is_load_error() {
        let (api, mut rx) = create_mock_api(4);
        let task = tokio::spawn(async move {
            let store = MemorySessionStore::with_session(session(42));
            OrderConsole::open(api, &store).await.err()
        });

        let (_, responder) = expect_restaurant_by_owner(&mut rx).await.unwrap();
        responder
            .send(Err(ApiError::Status {
                status: 500,
                message: Some("Database unavailable".into()),
            }))
            .unwrap();

        let err = task.await.unwrap().unwrap();
        assert!(matches!(err, ConsoleError::Load(_)));
        assert_eq!(err.user_message(), "Database unavailable");
    }

    #[tokio::test]
    async fn test_reload_order_replaces_entry() {
        let (console, mut rx) = opened_console(board()).await;

        let task = tokio::spawn(async move {
            let mut console = console;
            let status = console.reload_order(2).await.map(|o| o.status);
            (console, status)
        });

        let (id, responder) = expect_get_order(&mut rx).await.unwrap();
        assert_eq!(id, 2);
        responder.send(Ok(order(2, OrderStatus::Ready, 45.0))).unwrap();

        let (mut console, status) = task.await.unwrap();
        assert_eq!(status, Ok(OrderStatus::Ready));
        assert_eq!(console.order(2).unwrap().status, OrderStatus::Ready);
        assert_eq!(
            console.reload_order(99).await.err(),
            Some(ConsoleError::UnknownOrder(99))
        );
    }
}
