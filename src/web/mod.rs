//! HTTP/JSON surface over [`MarketService`].

pub mod errors;
pub mod handlers;
pub mod identity;
pub mod routes;

use crate::config::AppConfig;
use crate::service::MarketService;
use std::sync::Arc;

pub use routes::configure_app_routes;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MarketService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service: MarketService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}
