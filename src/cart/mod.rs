//! The in-progress order selection and the rules that keep it to one restaurant.

mod actions;
pub mod error;
pub mod state;

pub use actions::*;
pub use error::*;
pub use state::*;
