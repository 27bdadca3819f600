//! In-memory implementation of DirectoryStore.
//!
//! Used for development without a database and by the HTTP integration
//! tests. Listings evaluate the predicate tree directly.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{
    CATEGORY_SLUG_TAKEN, CONVENTION_SLUG_TAKEN, DirectoryStore, StoreError, StoreResult,
};
use crate::listing::{ListingQuery, SortField, SortOrder};
use crate::models::{Category, CategorySummary, Convention, NewCategory, NewConvention};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    conventions: Vec<Convention>,
}

/// Store holding all records in process memory.
#[derive(Default)]
pub struct MemoryDirectoryStore {
    tables: RwLock<Tables>,
}

impl MemoryDirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(&self, query: &ListingQuery) -> Vec<Convention> {
        self.tables
            .read()
            .conventions
            .iter()
            .filter(|c| query.predicate.matches(c))
            .cloned()
            .collect()
    }
}

fn compare(a: &Convention, b: &Convention, field: SortField) -> Ordering {
    match field {
        SortField::StartDate => a.start_date.cmp(&b.start_date),
        SortField::EndDate => a.end_date.cmp(&b.end_date),
        SortField::Name => a.name.cmp(&b.name),
        SortField::City => a.city.cmp(&b.city),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn healthy(&self) -> bool {
        true
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let mut categories = self.tables.read().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_category_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self
            .tables
            .read()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        Ok(self
            .tables
            .read()
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn create_category(&self, input: &NewCategory) -> StoreResult<Category> {
        let mut tables = self.tables.write();
        if tables.categories.iter().any(|c| c.slug == input.slug) {
            return Err(StoreError::Conflict(CATEGORY_SLUG_TAKEN.to_string()));
        }

        let category = input.clone().into_category(Utc::now());
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn conventions_in_category(&self, category_id: Uuid) -> StoreResult<Vec<Convention>> {
        let mut conventions: Vec<Convention> = self
            .tables
            .read()
            .conventions
            .iter()
            .filter(|c| c.category_id == category_id)
            .cloned()
            .collect();
        conventions.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(conventions)
    }

    async fn find_convention_by_slug(&self, slug: &str) -> StoreResult<Option<Convention>> {
        Ok(self
            .tables
            .read()
            .conventions
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn create_convention(&self, input: &NewConvention) -> StoreResult<Convention> {
        let mut tables = self.tables.write();
        if tables.conventions.iter().any(|c| c.slug == input.slug) {
            return Err(StoreError::Conflict(CONVENTION_SLUG_TAKEN.to_string()));
        }
        let Some(category) = tables
            .categories
            .iter()
            .find(|c| c.id == input.category_id)
            .map(CategorySummary::from)
        else {
            return Err(StoreError::Other(anyhow::anyhow!(
                "category {} does not exist",
                input.category_id
            )));
        };

        let convention = input.clone().into_convention(category, Utc::now());
        tables.conventions.push(convention.clone());
        Ok(convention)
    }

    async fn count_conventions(&self, query: &ListingQuery) -> StoreResult<u64> {
        Ok(self.matching(query).len() as u64)
    }

    async fn fetch_conventions(&self, query: &ListingQuery) -> StoreResult<Vec<Convention>> {
        let mut conventions = self.matching(query);
        conventions.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            let ordering = match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then(a.id.cmp(&b.id))
        });

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        Ok(conventions
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect())
    }
}
