//! Directory service: the operations behind the category and convention
//! endpoints, independent of HTTP.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::listing::{ConventionQueryBuilder, ListingPage, ListingParams, Pagination};
use crate::models::{Category, Convention, CreateCategory, CreateConvention};
use crate::storage::{CATEGORY_SLUG_TAKEN, CONVENTION_SLUG_TAKEN, DirectoryStore};

/// Page size bounds for convention listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Limit used when the request names none.
    pub default_limit: u32,
    /// Larger requested limits are capped to this, when set.
    pub max_limit: Option<u32>,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: crate::listing::types::DEFAULT_PAGE_LIMIT,
            max_limit: None,
        }
    }
}

/// A category, optionally with its conventions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListing {
    #[serde(flatten)]
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conventions: Option<Vec<Convention>>,
}

/// A category with its conventions split around `now`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub upcoming: Vec<Convention>,
    pub past: Vec<Convention>,
}

/// A convention with its upcoming flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConventionDetail {
    #[serde(flatten)]
    pub convention: Convention,
    pub is_upcoming: bool,
}

/// Category and convention operations over a [`DirectoryStore`].
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn DirectoryStore>,
    limits: PageLimits,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DirectoryStore>, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    pub fn store(&self) -> &Arc<dyn DirectoryStore> {
        &self.store
    }

    /// All categories by name, with their conventions when asked.
    pub async fn list_categories(&self, with_conventions: bool) -> AppResult<Vec<CategoryListing>> {
        let categories = self.store.list_categories().await?;

        let mut listings = Vec::with_capacity(categories.len());
        for category in categories {
            let conventions = if with_conventions {
                Some(self.store.conventions_in_category(category.id).await?)
            } else {
                None
            };
            listings.push(CategoryListing {
                category,
                conventions,
            });
        }

        Ok(listings)
    }

    /// A category with upcoming and past conventions.
    pub async fn category_detail(&self, slug: &str) -> AppResult<CategoryDetail> {
        self.category_detail_at(slug, Utc::now()).await
    }

    pub async fn category_detail_at(
        &self,
        slug: &str,
        now: DateTime<Utc>,
    ) -> AppResult<CategoryDetail> {
        let category = self
            .store
            .find_category_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound("Category not found"))?;

        let upcoming_filter = ConventionQueryBuilder::new().filter_upcoming_at(now).build();
        let (upcoming, past) = self
            .store
            .conventions_in_category(category.id)
            .await?
            .into_iter()
            .partition(|c| upcoming_filter.matches(c));

        Ok(CategoryDetail {
            category,
            upcoming,
            past,
        })
    }

    pub async fn create_category(&self, input: CreateCategory) -> AppResult<Category> {
        let input = input.validate()?;

        if self.store.find_category_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::Conflict(CATEGORY_SLUG_TAKEN.to_string()));
        }

        let category = self.store.create_category(&input).await?;
        info!(slug = %category.slug, id = %category.id, "category created");
        Ok(category)
    }

    /// Filtered, sorted, paginated convention listing.
    pub async fn list_conventions(
        &self,
        params: ListingParams,
    ) -> AppResult<ListingPage<Convention>> {
        let request = params.into_request()?;
        let mut query = request.to_query(self.limits.default_limit);

        if let Some(max) = self.limits.max_limit {
            if query.limit > max {
                warn!(requested = query.limit, max, "listing limit capped");
                query.limit = max;
            }
        }

        debug!(predicate = ?query.predicate, page = query.page, limit = query.limit, "listing conventions");

        let (total, data) = tokio::try_join!(
            self.store.count_conventions(&query),
            self.store.fetch_conventions(&query),
        )?;

        Ok(ListingPage {
            data,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }

    pub async fn convention_detail(&self, slug: &str) -> AppResult<ConventionDetail> {
        let convention = self
            .store
            .find_convention_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound("Convention not found"))?;

        let is_upcoming = convention.is_upcoming_at(Utc::now());
        Ok(ConventionDetail {
            convention,
            is_upcoming,
        })
    }

    /// Create a convention after checking its category and slug.
    pub async fn create_convention(&self, input: CreateConvention) -> AppResult<Convention> {
        let input = input.validate()?;

        if self
            .store
            .find_category_by_id(input.category_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Category not found"));
        }

        if self
            .store
            .find_convention_by_slug(&input.slug)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(CONVENTION_SLUG_TAKEN.to_string()));
        }

        let convention = self.store.create_convention(&input).await?;
        info!(slug = %convention.slug, category = %convention.category.slug, "convention created");
        Ok(convention)
    }
}
