//! PostgreSQL implementation of DirectoryStore.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    CATEGORY_SLUG_TAKEN, CONVENTION_SLUG_TAKEN, DirectoryStore, StoreError, StoreResult,
};
use crate::db;
use crate::listing::ListingQuery;
use crate::models::{Category, Convention, NewCategory, NewConvention};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgDirectoryStore {
    pool: PgPool,
}

impl PgDirectoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique violation that slipped past the slug pre-check to a conflict.
fn on_insert(e: anyhow::Error, conflict: &str) -> StoreError {
    let unique_violation = e
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation());

    if unique_violation {
        tracing::debug!(error = %e, "unique violation on insert");
        StoreError::Conflict(conflict.to_string())
    } else {
        StoreError::Other(e)
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn healthy(&self) -> bool {
        db::check_health(&self.pool).await
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(Category::list(&self.pool).await?)
    }

    async fn find_category_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(Category::find_by_id(&self.pool, id).await?)
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        Ok(Category::find_by_slug(&self.pool, slug).await?)
    }

    async fn create_category(&self, input: &NewCategory) -> StoreResult<Category> {
        Category::create(&self.pool, input)
            .await
            .map_err(|e| on_insert(e, CATEGORY_SLUG_TAKEN))
    }

    async fn conventions_in_category(&self, category_id: Uuid) -> StoreResult<Vec<Convention>> {
        Ok(Convention::list_by_category(&self.pool, category_id).await?)
    }

    async fn find_convention_by_slug(&self, slug: &str) -> StoreResult<Option<Convention>> {
        Ok(Convention::find_by_slug(&self.pool, slug).await?)
    }

    async fn create_convention(&self, input: &NewConvention) -> StoreResult<Convention> {
        Convention::create(&self.pool, input)
            .await
            .map_err(|e| on_insert(e, CONVENTION_SLUG_TAKEN))
    }

    async fn count_conventions(&self, query: &ListingQuery) -> StoreResult<u64> {
        Ok(Convention::count(&self.pool, query).await?)
    }

    async fn fetch_conventions(&self, query: &ListingQuery) -> StoreResult<Vec<Convention>> {
        Ok(Convention::fetch(&self.pool, query).await?)
    }
}
