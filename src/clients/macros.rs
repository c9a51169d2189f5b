/// Generate a `CartClient` method that dispatches one `CartAction` and returns
/// the cart it produced, with tracing and error mapping.
macro_rules! cart_method {
    ($(#[$meta:meta])* fn $method:ident($($param:ident: $param_type:ty),*) => $action:expr) => {
        $(#[$meta])*
        #[tracing::instrument(skip(self))]
        pub async fn $method(&self, $($param: $param_type),*) -> Result<CartState, CartError> {
            tracing::debug!("Sending request");
            self.inner.dispatch($action).await.map_err(CartError::from)
        }
    };
}
