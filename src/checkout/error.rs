use std::fmt;

use thiserror::Error;

use crate::cart::CartError;

/// Contact fields a customer must fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Address,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Address => "address",
        })
    }
}

pub const GENERIC_FAILURE: &str = "Failed to place order";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Missing required field: {0}")]
    MissingField(Field),
    #[error("Order rejected: {}", describe(.message))]
    Rejected { message: Option<String> },
    #[error("Checkout already completed")]
    AlreadyCompleted,
    #[error(transparent)]
    Cart(#[from] CartError),
}

fn describe(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no details")
}

impl CheckoutError {
    /// Text suitable for showing to the customer.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => "Your cart is empty".to_string(),
            CheckoutError::MissingField(_) => "Please fill in all required fields".to_string(),
            CheckoutError::Rejected { message } => {
                message.clone().unwrap_or_else(|| GENERIC_FAILURE.to_string())
            }
            CheckoutError::AlreadyCompleted => "This order was already placed".to_string(),
            CheckoutError::Cart(_) => GENERIC_FAILURE.to_string(),
        }
    }
}
