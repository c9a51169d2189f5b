use crate::api::{CreateOrderRequest, OrderLineRequest};
use crate::cart::CartState;
use crate::domain::RestaurantId;

use super::{CheckoutError, Field};

/// What the customer typed on the checkout page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

impl CheckoutForm {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Reports the first required field that is blank after trimming.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        [
            (Field::Name, &self.name),
            (Field::Phone, &self.phone),
            (Field::Address, &self.address),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(CheckoutError::MissingField(field)))
    }
}

/// The one-shot order built from the cart and the form at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub restaurant_id: RestaurantId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub notes: Option<String>,
    pub items: Vec<OrderLineRequest>,
}

impl OrderDraft {
    pub fn build(cart: &CartState, form: &CheckoutForm) -> Result<Self, CheckoutError> {
        let restaurant_id = match cart.restaurant_id() {
            Some(id) if !cart.is_empty() => id,
            _ => return Err(CheckoutError::EmptyCart),
        };
        form.validate()?;

        let notes = form.notes.trim();
        Ok(Self {
            restaurant_id,
            customer_name: form.name.trim().to_string(),
            customer_phone: form.phone.trim().to_string(),
            customer_address: form.address.trim().to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            items: cart
                .lines()
                .iter()
                .map(|line| OrderLineRequest {
                    menu_item_id: line.item.id,
                    quantity: line.quantity,
                })
                .collect(),
        })
    }
}

impl From<OrderDraft> for CreateOrderRequest {
    fn from(draft: OrderDraft) -> Self {
        Self {
            restaurant_id: draft.restaurant_id,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            customer_address: draft.customer_address,
            notes: draft.notes,
            items: draft.items,
        }
    }
}
