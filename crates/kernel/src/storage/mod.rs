//! Storage abstraction for the convention directory.
//!
//! All category and convention reads/writes go through [`DirectoryStore`].
//! Two implementations exist:
//!
//! - [`PgDirectoryStore`] - PostgreSQL, listings rendered to SQL
//! - [`MemoryDirectoryStore`] - in-process, listings evaluated with
//!   [`Predicate::matches`](crate::listing::Predicate::matches)
//!
//! Both must return the same records for the same [`ListingQuery`].

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryDirectoryStore;
pub use postgres::PgDirectoryStore;

use crate::listing::ListingQuery;
use crate::models::{Category, Convention, NewCategory, NewConvention};

/// Storage failures surfaced to the service layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key (slug) is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Category and convention persistence.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Short backend name, reported by the health check.
    fn backend(&self) -> &'static str;

    /// Whether the backend can currently serve requests.
    async fn healthy(&self) -> bool;

    /// All categories ordered by name.
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category_by_id(&self, id: Uuid) -> StoreResult<Option<Category>>;

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>>;

    /// Insert a category. A taken slug yields [`StoreError::Conflict`].
    async fn create_category(&self, input: &NewCategory) -> StoreResult<Category>;

    /// All conventions in a category ordered by start date.
    async fn conventions_in_category(&self, category_id: Uuid) -> StoreResult<Vec<Convention>>;

    async fn find_convention_by_slug(&self, slug: &str) -> StoreResult<Option<Convention>>;

    /// Insert a convention. A taken slug yields [`StoreError::Conflict`].
    async fn create_convention(&self, input: &NewConvention) -> StoreResult<Convention>;

    /// Number of conventions matching the query's predicate.
    async fn count_conventions(&self, query: &ListingQuery) -> StoreResult<u64>;

    /// One sorted page of conventions matching the query.
    async fn fetch_conventions(&self, query: &ListingQuery) -> StoreResult<Vec<Convention>>;
}

pub(crate) const CATEGORY_SLUG_TAKEN: &str = "Category with this slug already exists";
pub(crate) const CONVENTION_SLUG_TAKEN: &str = "Convention with this slug already exists";
