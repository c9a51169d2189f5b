#[macro_use]
mod macros;

pub mod cart_client;
pub mod http_client;

pub use cart_client::CartClient;
pub use http_client::{HttpApiClient, UploadKind};
