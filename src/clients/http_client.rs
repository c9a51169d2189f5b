use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, IntoUrl, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::api::{
    ApiError, AuthApi, CatalogApi, CreateOrderRequest, OrderApi, StatusUpdateRequest,
    UploadResponse,
};
use crate::domain::{
    LoginRequest, MenuItem, MenuItemDraft, MenuItemId, Order, OrderId, OrderStatus,
    RegisterRequest, Restaurant, RestaurantDraft, RestaurantId, Session, UserId,
};
use crate::session::SessionStore;

/// Error body produced by the server for every rejected request.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Which upload endpoint an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Restaurant,
    MenuItem,
}

impl UploadKind {
    fn path(self) -> &'static str {
        match self {
            UploadKind::Restaurant => "/upload/restaurant",
            UploadKind::MenuItem => "/upload/menu-item",
        }
    }
}

/// REST client for the marketplace server.
///
/// When a session store is attached, every request carries the stored bearer token.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: Url,
    sessions: Option<Arc<dyn SessionStore>>,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Config(format!("{base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            sessions: None,
        })
    }

    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve an image reference returned by the server into a fetchable URL.
    pub fn image_url(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with("http") {
            return path.to_string();
        }
        format!("{}{}", self.base_url.origin().ascii_serialization(), path)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Base URL extended with `segments`, each percent-encoded as a single path segment.
    fn segment_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_to(method, self.url(path))
    }

    fn request_to(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let builder = self.http.request(method, url);
        let token = match self.sessions.as_ref().map(|store| store.get()) {
            Some(Ok(session)) => session.map(|s| s.token),
            Some(Err(e)) => {
                warn!(error = %e, "Could not read session, sending anonymous request");
                None
            }
            None => None,
        };
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        debug!("Sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());
        warn!(status = status.as_u16(), message = ?message, "Request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        Self::send(builder)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::fetch(self.request(Method::GET, path)).await
    }

    // -------------------------------------------------------------------------
    // Merchant management
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn get_restaurants_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Restaurant>, ApiError> {
        let url = self.segment_url(&["restaurants", "category", category])?;
        Self::fetch(self.request_to(Method::GET, url)).await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_restaurant(
        &self,
        draft: &RestaurantDraft,
        owner_id: UserId,
    ) -> Result<Restaurant, ApiError> {
        let builder = self
            .request(Method::POST, "/restaurants")
            .query(&[("ownerId", owner_id)])
            .json(draft);
        Self::fetch(builder).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        draft: &RestaurantDraft,
    ) -> Result<Restaurant, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/restaurants/{id}"))
            .json(draft);
        Self::fetch(builder).await
    }

    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, id: RestaurantId) -> Result<(), ApiError> {
        Self::send(self.request(Method::DELETE, &format!("/restaurants/{id}"))).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem, ApiError> {
        self.get(&format!("/menu-items/{id}")).await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_menu_item(&self, draft: &MenuItemDraft) -> Result<MenuItem, ApiError> {
        Self::fetch(self.request(Method::POST, "/menu-items").json(draft)).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_menu_item(
        &self,
        id: MenuItemId,
        draft: &MenuItemDraft,
    ) -> Result<MenuItem, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/menu-items/{id}"))
            .json(draft);
        Self::fetch(builder).await
    }

    #[instrument(skip(self))]
    pub async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), ApiError> {
        Self::send(self.request(Method::DELETE, &format!("/menu-items/{id}"))).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_order_by_number(&self, order_number: &str) -> Result<Order, ApiError> {
        let url = self.segment_url(&["orders", "number", order_number])?;
        Self::fetch(self.request_to(Method::GET, url)).await
    }

    #[instrument(skip(self))]
    pub async fn get_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, ApiError> {
        self.get(&format!("/orders/status/{status}")).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        Self::send(self.request(Method::DELETE, &format!("/orders/{id}"))).await?;
        Ok(())
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(
        &self,
        kind: UploadKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        Self::fetch(self.request(Method::POST, kind.path()).multipart(form)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_file(&self, file_url: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::DELETE, "/upload")
            .query(&[("url", file_url)]);
        Self::send(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderApi for HttpApiClient {
    #[instrument(skip(self, request), fields(restaurant_id = request.restaurant_id, lines = request.items.len()))]
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, ApiError> {
        Self::fetch(self.request(Method::POST, "/orders").json(&request)).await
    }

    #[instrument(skip(self))]
    async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{id}")).await
    }

    #[instrument(skip(self))]
    async fn get_orders_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, ApiError> {
        self.get(&format!("/orders/restaurant/{restaurant_id}")).await
    }

    #[instrument(skip(self))]
    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/orders/{id}/status"))
            .json(&StatusUpdateRequest { status });
        Self::fetch(builder).await
    }
}

#[async_trait]
impl CatalogApi for HttpApiClient {
    #[instrument(skip(self))]
    async fn get_all_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.get("/restaurants").await
    }

    #[instrument(skip(self))]
    async fn get_restaurant_by_id(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        self.get(&format!("/restaurants/{id}")).await
    }

    #[instrument(skip(self))]
    async fn get_restaurant_by_owner_id(&self, owner_id: UserId) -> Result<Restaurant, ApiError> {
        self.get(&format!("/restaurants/owner/{owner_id}")).await
    }

    #[instrument(skip(self))]
    async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>, ApiError> {
        let builder = self
            .request(Method::GET, "/restaurants/search")
            .query(&[("q", query)]);
        Self::fetch(builder).await
    }

    #[instrument(skip(self))]
    async fn get_menu_items_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, ApiError> {
        self.get(&format!("/menu-items/restaurant/{restaurant_id}"))
            .await
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn login(&self, request: LoginRequest) -> Result<Session, ApiError> {
        Self::fetch(self.request(Method::POST, "/auth/login").json(&request)).await
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn register(&self, request: RegisterRequest) -> Result<Session, ApiError> {
        Self::fetch(self.request(Method::POST, "/auth/register").json(&request)).await
    }
}
