//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::db;
use crate::services::{DirectoryService, PageLimits};
use crate::storage::{DirectoryStore, MemoryDirectoryStore, PgDirectoryStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Category and convention storage.
    store: Arc<dyn DirectoryStore>,

    /// Directory operations over `store`.
    directory: DirectoryService,
}

impl AppState {
    /// Create application state, connecting to the configured backend.
    ///
    /// For PostgreSQL this also applies pending migrations.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn DirectoryStore> = match config.storage_backend {
            StorageBackend::Postgres => {
                let pool = db::create_pool(config)
                    .await
                    .context("failed to create database pool")?;

                db::run_migrations(&pool)
                    .await
                    .context("failed to run migrations")?;

                Arc::new(PgDirectoryStore::new(pool))
            }
            StorageBackend::Memory => Arc::new(MemoryDirectoryStore::new()),
        };

        info!(backend = store.backend(), "storage initialized");

        Ok(Self::from_store(
            store,
            PageLimits {
                default_limit: config.default_page_limit,
                max_limit: config.max_page_limit,
            },
        ))
    }

    /// Build state around an existing store.
    pub fn from_store(store: Arc<dyn DirectoryStore>, limits: PageLimits) -> Self {
        let directory = DirectoryService::new(store.clone(), limits);
        Self {
            inner: Arc::new(AppStateInner { store, directory }),
        }
    }

    /// Get the storage backend.
    pub fn store(&self) -> &Arc<dyn DirectoryStore> {
        &self.inner.store
    }

    /// Get the directory service.
    pub fn directory(&self) -> &DirectoryService {
        &self.inner.directory
    }

    /// Check if the storage backend is healthy.
    pub async fn storage_healthy(&self) -> bool {
        self.inner.store.healthy().await
    }
}
