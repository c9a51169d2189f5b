use tracing::{debug, instrument};

use crate::actor_framework::StoreClient;
use crate::cart::{CartAction, CartError, CartState};
use crate::domain::{MenuItem, MenuItemId, RestaurantId};

/// Handle to the cart actor. Cloning it shares the same cart.
#[derive(Clone)]
pub struct CartClient {
    inner: StoreClient<CartState>,
}

impl CartClient {
    pub fn new(inner: StoreClient<CartState>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, item), fields(item_id = item.id, item_name = %item.name))]
    pub async fn add_item(
        &self,
        item: MenuItem,
        restaurant_id: RestaurantId,
        restaurant_name: String,
    ) -> Result<CartState, CartError> {
        debug!("Sending request");
        self.inner
            .dispatch(CartAction::AddItem {
                item,
                restaurant_id,
                restaurant_name,
            })
            .await
            .map_err(CartError::from)
    }

    /// Same as [`add_item`](Self::add_item) but also returns the cart as it was
    /// just before the add, observed in the same actor turn.
    #[instrument(skip(self, item), fields(item_id = item.id, item_name = %item.name))]
    pub async fn add_item_tracked(
        &self,
        item: MenuItem,
        restaurant_id: RestaurantId,
        restaurant_name: String,
    ) -> Result<(CartState, CartState), CartError> {
        debug!("Sending request");
        self.inner
            .transition(CartAction::AddItem {
                item,
                restaurant_id,
                restaurant_name,
            })
            .await
            .map_err(CartError::from)
    }

    cart_method!(fn remove_item(id: MenuItemId) => CartAction::RemoveItem(id));

    cart_method!(
        /// Zero or a negative quantity removes the line.
        fn update_quantity(id: MenuItemId, quantity: i64) => CartAction::UpdateQuantity { id, quantity }
    );

    cart_method!(fn clear() => CartAction::Clear);

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<CartState, CartError> {
        debug!("Sending request");
        self.inner.snapshot().await.map_err(CartError::from)
    }

    /// Stop the cart actor. Every clone of this handle fails afterwards.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), CartError> {
        self.inner.stop().await.map_err(CartError::from)
    }
}
