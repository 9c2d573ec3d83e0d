use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    config,
    store::{DataStore, PgStore},
};

/// State shared by every worker. Handlers borrow the store for the
/// span of one request.
#[derive(Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    store: Arc<dyn DataStore>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    /// Connects to the configured Postgres databases and applies any
    /// pending migrations on the primary.
    #[tracing::instrument(skip_all, name = "app.init")]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let store = PgStore::connect(&cfg.db)
            .await
            .change_context(AppError)
            .attach_printable("could not connect to the database")?;

        store
            .migrate()
            .await
            .change_context(AppError)
            .attach_printable("could not apply database migrations")?;

        Ok(Self::with_store(cfg, Arc::new(store)))
    }

    #[must_use]
    pub fn with_store(cfg: config::Server, store: Arc<dyn DataStore>) -> Self {
        Self {
            config: Arc::new(cfg),
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
