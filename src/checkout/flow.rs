use tracing::{error, info, instrument, warn};

use crate::api::OrderApi;
use crate::clients::CartClient;
use crate::domain::Order;

use super::{CheckoutError, CheckoutForm, OrderDraft};

/// Where a checkout currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    /// Nothing to order. No request will be made.
    EmptyCart,
    /// Waiting for the customer to submit. Holds the outcome of the last failed attempt.
    Editing { error: Option<CheckoutError> },
    Submitting,
    /// Terminal for this flow. The cart has been cleared.
    Completed { order_number: String },
}

/// One checkout attempt against the shared cart.
pub struct CheckoutFlow<A: OrderApi> {
    api: A,
    cart: CartClient,
    state: CheckoutState,
}

impl<A: OrderApi> CheckoutFlow<A> {
    /// Start a checkout bound to whatever the cart currently holds.
    #[instrument(skip(api, cart))]
    pub async fn start(api: A, cart: CartClient) -> Result<Self, CheckoutError> {
        let snapshot = cart.snapshot().await?;
        let state = if snapshot.is_empty() {
            info!("Checkout opened with an empty cart");
            CheckoutState::EmptyCart
        } else {
            CheckoutState::Editing { error: None }
        };
        Ok(Self { api, cart, state })
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Discard this flow's state and begin again against the current cart.
    pub async fn restart(self) -> Result<Self, CheckoutError> {
        Self::start(self.api, self.cart).await
    }

    /// Validate, then place the order. On success the cart is emptied; on
    /// failure the cart is left as it was so the customer can retry.
    #[instrument(skip(self, form))]
    pub async fn submit(&mut self, form: &CheckoutForm) -> Result<Order, CheckoutError> {
        if matches!(self.state, CheckoutState::Completed { .. }) {
            return Err(CheckoutError::AlreadyCompleted);
        }

        let cart = self.cart.snapshot().await?;
        let draft = match OrderDraft::build(&cart, form) {
            Ok(draft) => draft,
            Err(CheckoutError::EmptyCart) => {
                warn!("Submit attempted with an empty cart");
                self.state = CheckoutState::EmptyCart;
                return Err(CheckoutError::EmptyCart);
            }
            Err(e) => {
                warn!(error = %e, "Checkout form rejected");
                self.state = CheckoutState::Editing {
                    error: Some(e.clone()),
                };
                return Err(e);
            }
        };

        info!(
            restaurant_id = draft.restaurant_id,
            lines = draft.items.len(),
            "Submitting order"
        );
        self.state = CheckoutState::Submitting;

        let order = match self.api.create_order(draft.into()).await {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Order submission failed");
                let failure = CheckoutError::Rejected {
                    message: e.server_message().map(str::to_string),
                };
                self.state = CheckoutState::Editing {
                    error: Some(failure.clone()),
                };
                return Err(failure);
            }
        };

        info!(order_number = %order.order_number, total = order.total, "Order placed");
        if let Err(e) = self.cart.clear().await {
            warn!(error = %e, "Order placed but the cart could not be cleared");
        }
        self.state = CheckoutState::Completed {
            order_number: order.order_number.clone(),
        };
        Ok(order)
    }
}
