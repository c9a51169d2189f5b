use tracing::{error, info, warn, Instrument};

use foodiego_client::app_system::{setup_tracing, ClientSystem};
use foodiego_client::config::Config;
use foodiego_client::storefront::{find_restaurants, RestaurantMenu};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::load();
    info!(api_url = %config.api_url, "Starting FoodieGo client");

    let system = ClientSystem::new(&config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("browse");
    let browsed = async {
        let restaurants = find_restaurants(&system.api, "").await?;
        let Some(first) = restaurants.first() else {
            warn!("No restaurants to browse");
            return Ok(());
        };

        let menu = RestaurantMenu::load(&system.api, first.id).await?;
        if let Some(item) = menu.items.iter().find(|item| item.available) {
            let outcome = menu.add_to_cart(&system.cart_client, item.id).await?;
            info!(item = %item.name, ?outcome, "Added to cart");
        }
        Ok::<_, foodiego_client::storefront::StorefrontError>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = browsed {
        error!(error = %e, "Browsing failed");
    }

    match system.cart_client.snapshot().await {
        Ok(cart) => info!(
            items = cart.total_items(),
            total = cart.total_price(),
            restaurant = ?cart.restaurant_name(),
            "Cart summary"
        ),
        Err(e) => error!(error = %e, "Could not read the cart"),
    }

    system.shutdown().await?;

    info!("Client finished");
    Ok(())
}
