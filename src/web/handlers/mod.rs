pub mod interest_handlers;
pub mod listing_handlers;

use crate::error::MarketError;
use actix_web::web;

/// sled calls block the current thread, so they run on actix's blocking pool.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, MarketError>
where
    F: FnOnce() -> Result<T, MarketError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| MarketError::Internal(e.to_string()))?
}
