use crate::actor_framework::Reducer;
use crate::domain::{MenuItem, MenuItemId, RestaurantId};

use super::CartAction;

/// One distinct menu item in the cart. Quantity is never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: MenuItem,
    pub quantity: u32,
}

impl CartLine {
    fn new(item: MenuItem) -> Self {
        Self { item, quantity: 1 }
    }

    pub fn subtotal(&self) -> f64 {
        self.item.price * f64::from(self.quantity)
    }
}

/// The cart contents.
///
/// When any line exists the cart is bound to exactly one restaurant and every
/// line came from it. An empty cart is never bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
    restaurant_id: Option<RestaurantId>,
    restaurant_name: Option<String>,
}

impl Reducer for CartState {
    type Action = CartAction;

    fn reduce(self, action: CartAction) -> Self {
        match action {
            CartAction::AddItem {
                item,
                restaurant_id,
                restaurant_name,
            } => self.with_item(item, restaurant_id, restaurant_name),
            CartAction::RemoveItem(id) => self.without_line(id),
            CartAction::UpdateQuantity { id, quantity } if quantity <= 0 => self.without_line(id),
            CartAction::UpdateQuantity { id, quantity } => {
                self.with_quantity(id, u32::try_from(quantity).unwrap_or(u32::MAX))
            }
            CartAction::Clear => Self::default(),
        }
    }
}

impl CartState {
    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item.id == id)
    }

    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        self.restaurant_id
    }

    pub fn restaurant_name(&self) -> Option<&str> {
        self.restaurant_name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Adds one of `item`. An item from another restaurant than the bound one
    /// silently replaces the whole cart.
    pub fn add_item(
        &mut self,
        item: MenuItem,
        restaurant_id: RestaurantId,
        restaurant_name: impl Into<String>,
    ) {
        self.apply(CartAction::AddItem {
            item,
            restaurant_id,
            restaurant_name: restaurant_name.into(),
        });
    }

    pub fn remove_item(&mut self, id: MenuItemId) {
        self.apply(CartAction::RemoveItem(id));
    }

    pub fn update_quantity(&mut self, id: MenuItemId, quantity: i64) {
        self.apply(CartAction::UpdateQuantity { id, quantity });
    }

    pub fn clear(&mut self) {
        self.apply(CartAction::Clear);
    }

    pub fn apply(&mut self, action: CartAction) {
        *self = std::mem::take(self).reduce(action);
    }

    fn with_item(
        mut self,
        item: MenuItem,
        restaurant_id: RestaurantId,
        restaurant_name: String,
    ) -> Self {
        if self.restaurant_id.is_some_and(|bound| bound != restaurant_id) {
            return Self {
                lines: vec![CartLine::new(item)],
                restaurant_id: Some(restaurant_id),
                restaurant_name: Some(restaurant_name),
            };
        }

        match self.lines.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => {
                self.lines.push(CartLine::new(item));
                self.restaurant_id.get_or_insert(restaurant_id);
                self.restaurant_name.get_or_insert(restaurant_name);
            }
        }
        self
    }

    fn without_line(mut self, id: MenuItemId) -> Self {
        self.lines.retain(|line| line.item.id != id);
        if self.lines.is_empty() {
            return Self::default();
        }
        self
    }

    fn with_quantity(mut self, id: MenuItemId, quantity: u32) -> Self {
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == id) {
            line.quantity = quantity.max(1);
        }
        self
    }
}
