use std::sync::Arc;

use tracing::{error, info, warn};

use crate::actor_framework::StoreActor;
use crate::api::ApiError;
use crate::auth::AuthClient;
use crate::cart::CartState;
use crate::checkout::{CheckoutError, CheckoutFlow};
use crate::clients::{CartClient, HttpApiClient};
use crate::config::Config;
use crate::console::{ConsoleError, OrderConsole};
use crate::session::FileSessionStore;

/// Everything a running client needs, wired together.
///
/// Owns the cart actor and hands out flows that share it with the REST client.
pub struct ClientSystem {
    pub cart_client: CartClient,
    pub api: HttpApiClient,
    pub sessions: Arc<FileSessionStore>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ClientSystem {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let (cart_actor, cart_store) = StoreActor::new(config.cart_buffer, CartState::default());
        let cart_client = CartClient::new(cart_store);
        let cart_handle = tokio::spawn(cart_actor.run());

        let sessions = Arc::new(FileSessionStore::new(config.session_file.clone()));
        let api = HttpApiClient::new(&config.api_url, config.timeout)?
            .with_session_store(sessions.clone());

        info!(api_url = %api.base_url(), "Client system started");
        Ok(Self {
            cart_client,
            api,
            sessions,
            handles: vec![cart_handle],
        })
    }

    pub fn auth(&self) -> AuthClient<HttpApiClient, Arc<FileSessionStore>> {
        AuthClient::new(self.api.clone(), self.sessions.clone())
    }

    pub async fn checkout(&self) -> Result<CheckoutFlow<HttpApiClient>, CheckoutError> {
        CheckoutFlow::start(self.api.clone(), self.cart_client.clone()).await
    }

    pub async fn console(&self) -> Result<OrderConsole<HttpApiClient>, ConsoleError> {
        OrderConsole::open(self.api.clone(), self.sessions.as_ref()).await
    }

    /// Stops the cart actor and waits for it. Cart handles still held elsewhere,
    /// such as an open checkout, fail from here on instead of keeping it alive.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down client system...");
        if let Err(e) = self.cart_client.stop().await {
            warn!(error = %e, "Cart actor already gone");
        }
        drop(self.cart_client);
        drop(self.api);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Client system shutdown complete.");
        Ok(())
    }
}
