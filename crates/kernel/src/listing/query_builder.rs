//! Fluent builder composing a convention [`Predicate`] from individual filters.
//!
//! Each filter method merges its constraint into the accumulated state and
//! returns the builder for chaining. Empty text values are ignored, so
//! callers may pass user input unconditionally.
//!
//! Composition is last-write-wins per field and operator: `startDate >= a`
//! followed by `startDate <= b` yields a range, while two `startDate >=`
//! bounds keep only the later one. Overlap windows are the exception and
//! accumulate as independent AND groups.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::filter::{ConventionFilters, DateWindow};
use super::predicate::{CategoryColumn, ConventionColumn, Operator, Predicate};

/// Bounds accumulated on one date column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DateBounds {
    gte: Option<DateTime<Utc>>,
    lte: Option<DateTime<Utc>>,
    lt: Option<DateTime<Utc>>,
}

impl DateBounds {
    fn push_clauses(&self, column: ConventionColumn, clauses: &mut Vec<Predicate>) {
        if let Some(date) = self.gte {
            clauses.push(Predicate::convention(column, Operator::Gte, date));
        }
        if let Some(date) = self.lte {
            clauses.push(Predicate::convention(column, Operator::Lte, date));
        }
        if let Some(date) = self.lt {
            clauses.push(Predicate::convention(column, Operator::Lt, date));
        }
    }
}

/// Query builder for convention listings.
///
/// One instance per request; not meant to be shared across tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConventionQueryBuilder {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
    start_date: DateBounds,
    end_date: DateBounds,
    overlaps: Vec<DateWindow>,
    category_id: Option<Uuid>,
    category_slug: Option<String>,
    is_popular: Option<bool>,
    is_verified: Option<bool>,
    search: Option<String>,
}

impl ConventionQueryBuilder {
    /// Create a builder with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on city.
    pub fn filter_by_city(&mut self, city: &str) -> &mut Self {
        if !city.is_empty() {
            self.city = Some(city.to_string());
        }
        self
    }

    /// Case-insensitive substring match on region.
    pub fn filter_by_region(&mut self, region: &str) -> &mut Self {
        if !region.is_empty() {
            self.region = Some(region.to_string());
        }
        self
    }

    /// Case-insensitive substring match on country.
    pub fn filter_by_country(&mut self, country: &str) -> &mut Self {
        if !country.is_empty() {
            self.country = Some(country.to_string());
        }
        self
    }

    /// Exact postal code.
    pub fn filter_by_postal_code(&mut self, postal_code: &str) -> &mut Self {
        if !postal_code.is_empty() {
            self.postal_code = Some(postal_code.to_string());
        }
        self
    }

    /// `startDate >= date`.
    pub fn filter_by_start_date_after(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.start_date.gte = Some(date);
        self
    }

    /// `startDate <= date`.
    pub fn filter_by_start_date_before(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.start_date.lte = Some(date);
        self
    }

    /// `endDate >= date`.
    pub fn filter_by_end_date_after(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.end_date.gte = Some(date);
        self
    }

    /// `endDate <= date`.
    pub fn filter_by_end_date_before(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.end_date.lte = Some(date);
        self
    }

    /// Conventions overlapping `[start, end]`:
    /// `startDate <= end AND endDate >= start`.
    pub fn filter_by_date_between(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> &mut Self {
        self.overlaps.push(DateWindow::new(start, end));
        self
    }

    /// Conventions starting now or later. `now` is read at call time.
    pub fn filter_upcoming(&mut self) -> &mut Self {
        self.filter_upcoming_at(Utc::now())
    }

    /// Conventions starting at or after `now`.
    pub fn filter_upcoming_at(&mut self, now: DateTime<Utc>) -> &mut Self {
        self.start_date.gte = Some(now);
        self
    }

    /// Conventions that ended before now. `now` is read at call time.
    pub fn filter_past(&mut self) -> &mut Self {
        self.filter_past_at(Utc::now())
    }

    /// Conventions that ended strictly before `now`.
    pub fn filter_past_at(&mut self, now: DateTime<Utc>) -> &mut Self {
        self.end_date.lt = Some(now);
        self
    }

    pub fn filter_by_category_id(&mut self, category_id: Uuid) -> &mut Self {
        self.category_id = Some(category_id);
        self
    }

    /// Match on the related category's slug.
    pub fn filter_by_category_slug(&mut self, slug: &str) -> &mut Self {
        if !slug.is_empty() {
            self.category_slug = Some(slug.to_string());
        }
        self
    }

    pub fn filter_popular(&mut self, is_popular: bool) -> &mut Self {
        self.is_popular = Some(is_popular);
        self
    }

    pub fn filter_verified(&mut self, is_verified: bool) -> &mut Self {
        self.is_verified = Some(is_verified);
        self
    }

    /// Case-insensitive match on name OR description.
    pub fn search(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.search = Some(text.to_string());
        }
        self
    }

    /// Apply every present field of `filters`, in declaration order.
    pub fn apply_filters(&mut self, filters: &ConventionFilters) -> &mut Self {
        if let Some(ref city) = filters.city {
            self.filter_by_city(city);
        }
        if let Some(ref region) = filters.region {
            self.filter_by_region(region);
        }
        if let Some(ref country) = filters.country {
            self.filter_by_country(country);
        }
        if let Some(ref postal_code) = filters.postal_code {
            self.filter_by_postal_code(postal_code);
        }

        if let Some(date) = filters.start_date_after {
            self.filter_by_start_date_after(date);
        }
        if let Some(date) = filters.start_date_before {
            self.filter_by_start_date_before(date);
        }
        if let Some(date) = filters.end_date_after {
            self.filter_by_end_date_after(date);
        }
        if let Some(date) = filters.end_date_before {
            self.filter_by_end_date_before(date);
        }
        if let Some(window) = filters.date_between {
            self.filter_by_date_between(window.start, window.end);
        }

        if let Some(category_id) = filters.category_id {
            self.filter_by_category_id(category_id);
        }
        if let Some(ref slug) = filters.category_slug {
            self.filter_by_category_slug(slug);
        }
        if let Some(is_popular) = filters.is_popular {
            self.filter_popular(is_popular);
        }
        if let Some(is_verified) = filters.is_verified {
            self.filter_verified(is_verified);
        }
        if let Some(ref text) = filters.search {
            self.search(text);
        }

        self
    }

    /// Return the accumulated predicate.
    pub fn build(&self) -> Predicate {
        let mut clauses = Vec::new();

        let text_filters = [
            (ConventionColumn::City, &self.city),
            (ConventionColumn::Region, &self.region),
            (ConventionColumn::Country, &self.country),
        ];
        for (column, value) in text_filters {
            if let Some(value) = value {
                clauses.push(Predicate::convention(
                    column,
                    Operator::ContainsInsensitive,
                    value.as_str(),
                ));
            }
        }
        if let Some(ref postal_code) = self.postal_code {
            clauses.push(Predicate::convention(
                ConventionColumn::PostalCode,
                Operator::Eq,
                postal_code.as_str(),
            ));
        }

        self.start_date
            .push_clauses(ConventionColumn::StartDate, &mut clauses);
        self.end_date.push_clauses(ConventionColumn::EndDate, &mut clauses);

        for window in &self.overlaps {
            clauses.push(Predicate::All(vec![
                Predicate::convention(ConventionColumn::StartDate, Operator::Lte, window.end),
                Predicate::convention(ConventionColumn::EndDate, Operator::Gte, window.start),
            ]));
        }

        if let Some(category_id) = self.category_id {
            clauses.push(Predicate::convention(
                ConventionColumn::CategoryId,
                Operator::Eq,
                category_id,
            ));
        }
        if let Some(ref slug) = self.category_slug {
            clauses.push(Predicate::category(
                CategoryColumn::Slug,
                Operator::Eq,
                slug.as_str(),
            ));
        }
        if let Some(is_popular) = self.is_popular {
            clauses.push(Predicate::convention(
                ConventionColumn::IsPopular,
                Operator::Eq,
                is_popular,
            ));
        }
        if let Some(is_verified) = self.is_verified {
            clauses.push(Predicate::convention(
                ConventionColumn::IsVerified,
                Operator::Eq,
                is_verified,
            ));
        }
        if let Some(ref text) = self.search {
            clauses.push(Predicate::Any(vec![
                Predicate::convention(
                    ConventionColumn::Name,
                    Operator::ContainsInsensitive,
                    text.as_str(),
                ),
                Predicate::convention(
                    ConventionColumn::Description,
                    Operator::ContainsInsensitive,
                    text.as_str(),
                ),
            ]));
        }

        Predicate::All(clauses)
    }

    /// Clear all accumulated state.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }
}
