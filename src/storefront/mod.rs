//! A restaurant's menu page: browsing by category and adding dishes to the cart.

use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiError, CatalogApi};
use crate::cart::CartError;
use crate::clients::CartClient;
use crate::domain::{MenuItem, MenuItemId, Restaurant, RestaurantId};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorefrontError {
    #[error("Menu item not found: {0}")]
    UnknownItem(MenuItemId),
    #[error("{0} is not available right now")]
    Unavailable(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// What happened to the cart when a dish was added.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added { quantity: u32 },
    /// The cart held dishes from another restaurant and was replaced.
    CartReset { previous_restaurant: Option<String> },
}

/// Restaurants for the home page. A blank query lists everything.
#[instrument(skip(api))]
pub async fn find_restaurants<A: CatalogApi>(
    api: &A,
    query: &str,
) -> Result<Vec<Restaurant>, StorefrontError> {
    let query = query.trim();
    let restaurants = if query.is_empty() {
        api.get_all_restaurants().await?
    } else {
        api.search_restaurants(query).await?
    };
    info!(count = restaurants.len(), "Restaurants loaded");
    Ok(restaurants)
}

#[derive(Debug, Clone)]
pub struct RestaurantMenu {
    pub restaurant: Restaurant,
    pub items: Vec<MenuItem>,
}

impl RestaurantMenu {
    #[instrument(skip(api))]
    pub async fn load<A: CatalogApi>(
        api: &A,
        restaurant_id: RestaurantId,
    ) -> Result<Self, StorefrontError> {
        let restaurant = api.get_restaurant_by_id(restaurant_id).await?;
        let items = api.get_menu_items_by_restaurant(restaurant_id).await?;
        info!(restaurant_name = %restaurant.name, items = items.len(), "Menu loaded");
        Ok(Self { restaurant, items })
    }

    /// Distinct categories in the order they first appear on the menu.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !item.category.is_empty() && !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    pub fn items_in<'a>(&'a self, category: Option<&'a str>) -> impl Iterator<Item = &'a MenuItem> {
        self.items
            .iter()
            .filter(move |item| category.map_or(true, |c| item.category == c))
    }

    pub fn popular(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|item| item.is_popular)
    }

    pub fn find(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Add one of `item_id` to the shared cart and report whether that wiped
    /// a cart from another restaurant.
    #[instrument(skip(self, cart), fields(restaurant_id = self.restaurant.id))]
    pub async fn add_to_cart(
        &self,
        cart: &CartClient,
        item_id: MenuItemId,
    ) -> Result<AddOutcome, StorefrontError> {
        let item = self
            .find(item_id)
            .ok_or(StorefrontError::UnknownItem(item_id))?;
        if !item.available {
            return Err(StorefrontError::Unavailable(item.name.clone()));
        }

        let (before, after) = cart
            .add_item_tracked(item.clone(), self.restaurant.id, self.restaurant.name.clone())
            .await?;

        if before
            .restaurant_id()
            .is_some_and(|bound| bound != self.restaurant.id)
        {
            info!(previous = ?before.restaurant_name(), "Cart reset for a new restaurant");
            return Ok(AddOutcome::CartReset {
                previous_restaurant: before.restaurant_name().map(str::to_string),
            });
        }

        let quantity = after.line(item_id).map_or(0, |line| line.quantity);
        Ok(AddOutcome::Added { quantity })
    }
}
