//! Application state for plate-server

use std::sync::Arc;

use crate::auth::JwtService;
use crate::config::Config;
use crate::db::{PgStore, Store};
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistent store (PostgreSQL in production)
    pub store: Arc<dyn Store>,
    /// Bearer-token verifier
    pub jwt: JwtService,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Connect the database and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store = PgStore::connect(config).await?;
        Ok(Self::with_store(Arc::new(store), config))
    }

    pub fn with_store(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            store,
            jwt: JwtService::new(&config.jwt_secret),
            cors_origins: config.cors_origins.clone(),
        }
    }
}
