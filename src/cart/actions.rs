use crate::domain::{MenuItem, MenuItemId, RestaurantId};

/// Every way the cart can change.
#[derive(Debug, Clone)]
pub enum CartAction {
    AddItem {
        item: MenuItem,
        restaurant_id: RestaurantId,
        restaurant_name: String,
    },
    RemoveItem(MenuItemId),
    /// A quantity of zero or below removes the line.
    UpdateQuantity { id: MenuItemId, quantity: i64 },
    Clear,
}
