//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
}

impl AppState {
    /// Create a new application state around an open pool
    pub fn new(config: Config, db: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, db }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Largest accepted upload in bytes
    pub fn max_file_size(&self) -> usize {
        self.inner.config.upload.max_file_size
    }
}
