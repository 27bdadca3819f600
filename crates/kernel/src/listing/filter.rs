//! Filter criteria accepted by the convention listing.
//!
//! Every field is optional. The criteria are conjunctive: a convention
//! must satisfy all present fields. Text search is the one disjunctive
//! filter (name OR description) and is still ANDed with the rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Window used by the overlap filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Optional constraints for a convention listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConventionFilters {
    /// Case-insensitive substring match on city.
    pub city: Option<String>,
    /// Case-insensitive substring match on region.
    pub region: Option<String>,
    /// Case-insensitive substring match on country.
    pub country: Option<String>,
    /// Exact postal code.
    pub postal_code: Option<String>,
    /// Inclusive lower bound on start date.
    pub start_date_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on start date.
    pub start_date_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on end date.
    pub end_date_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on end date.
    pub end_date_before: Option<DateTime<Utc>>,
    /// Conventions whose dates overlap this window.
    pub date_between: Option<DateWindow>,
    /// Exact category id.
    pub category_id: Option<Uuid>,
    /// Exact slug of the related category.
    pub category_slug: Option<String>,
    pub is_popular: Option<bool>,
    pub is_verified: Option<bool>,
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
}

impl ConventionFilters {
    /// Create an empty set of criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn city<S: Into<String>>(mut self, city: S) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn country<S: Into<String>>(mut self, country: S) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn postal_code<S: Into<String>>(mut self, postal_code: S) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    pub fn start_date_after(mut self, date: DateTime<Utc>) -> Self {
        self.start_date_after = Some(date);
        self
    }

    pub fn start_date_before(mut self, date: DateTime<Utc>) -> Self {
        self.start_date_before = Some(date);
        self
    }

    pub fn end_date_after(mut self, date: DateTime<Utc>) -> Self {
        self.end_date_after = Some(date);
        self
    }

    pub fn end_date_before(mut self, date: DateTime<Utc>) -> Self {
        self.end_date_before = Some(date);
        self
    }

    pub fn date_between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_between = Some(DateWindow::new(start, end));
        self
    }

    pub fn category_id(mut self, id: Uuid) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn category_slug<S: Into<String>>(mut self, slug: S) -> Self {
        self.category_slug = Some(slug.into());
        self
    }

    pub fn popular(mut self, popular: bool) -> Self {
        self.is_popular = Some(popular);
        self
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.is_verified = Some(verified);
        self
    }

    pub fn search<S: Into<String>>(mut self, query: S) -> Self {
        self.search = Some(query.into());
        self
    }
}
