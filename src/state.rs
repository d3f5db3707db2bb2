use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{init_schema, Store, StoreError};
use crate::middleware::Credentials;
use crate::services::CatalogService;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub catalog: CatalogService,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    /// Open the store and run schema creation + seeding. Completes before any route is served.
    pub async fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store = Store::connect(&config.database).await?;
        init_schema(&store).await?;

        Ok(Self {
            credentials: Arc::new(Credentials::from(&config.security)),
            catalog: CatalogService::new(store.clone()),
            store,
            config: Arc::new(config),
        })
    }
}
