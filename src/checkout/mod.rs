//! Turning the cart into a placed order.

pub mod error;
pub mod flow;
pub mod form;

pub use error::*;
pub use flow::*;
pub use form::*;
