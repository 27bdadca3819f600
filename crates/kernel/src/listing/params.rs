//! URL query parameters for the convention listing.
//!
//! Parameters arrive as raw strings and are validated here so that a
//! malformed value is reported back to the caller instead of being
//! silently dropped.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::filter::{ConventionFilters, DateWindow};
use super::query_builder::ConventionQueryBuilder;
use super::types::{ListingQuery, SortField, SortOrder};
use crate::error::FieldError;

/// Raw listing parameters as found in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub start_date_after: Option<String>,
    pub start_date_before: Option<String>,
    pub end_date_after: Option<String>,
    pub end_date_before: Option<String>,
    pub date_between_start: Option<String>,
    pub date_between_end: Option<String>,
    pub category_id: Option<String>,
    pub category_slug: Option<String>,
    pub upcoming: Option<String>,
    pub past: Option<String>,
    pub popular: Option<String>,
    pub verified: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub filters: ConventionFilters,
    pub upcoming: bool,
    pub past: bool,
    pub page: u32,
    pub limit: Option<u32>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl ListingRequest {
    /// Build the listing query.
    ///
    /// `upcoming` and `past` are applied first so that explicit date
    /// bounds on the same slot take precedence.
    pub fn to_query(&self, default_limit: u32) -> ListingQuery {
        let mut builder = ConventionQueryBuilder::new();
        if self.upcoming {
            builder.filter_upcoming();
        }
        if self.past {
            builder.filter_past();
        }
        builder.apply_filters(&self.filters);

        ListingQuery {
            predicate: builder.build(),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            page: self.page,
            limit: self.limit.unwrap_or(default_limit),
        }
    }
}

/// Collects parse failures while walking the parameters.
#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn date(&mut self, field: &str, raw: &Option<String>) -> Option<DateTime<Utc>> {
        let raw = non_empty(raw)?;
        parse_date(raw).or_else(|| {
            self.0.push(FieldError::new(
                field,
                "must be an RFC 3339 date-time or a YYYY-MM-DD date",
            ));
            None
        })
    }

    fn boolean(&mut self, field: &str, raw: &Option<String>) -> Option<bool> {
        match non_empty(raw)? {
            "true" => Some(true),
            "false" => Some(false),
            _ => {
                self.0.push(FieldError::new(field, "must be true or false"));
                None
            }
        }
    }

    fn positive(&mut self, field: &str, raw: &Option<String>) -> Option<u32> {
        let raw = non_empty(raw)?;
        match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                self.0
                    .push(FieldError::new(field, "must be a positive integer"));
                None
            }
        }
    }

    fn parsed<T: std::str::FromStr<Err = String>>(
        &mut self,
        field: &str,
        raw: &Option<String>,
    ) -> Option<T> {
        let raw = non_empty(raw)?;
        raw.parse::<T>()
            .map_err(|message| self.0.push(FieldError::new(field, message)))
            .ok()
    }
}

impl ListingParams {
    /// Validate and convert the raw parameters.
    pub fn into_request(self) -> Result<ListingRequest, Vec<FieldError>> {
        let mut errors = Errors::default();

        let category_id = non_empty(&self.category_id).and_then(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| errors.0.push(FieldError::new("categoryId", "must be a UUID")))
                .ok()
        });

        let date_between = match (
            errors.date("dateBetweenStart", &self.date_between_start),
            errors.date("dateBetweenEnd", &self.date_between_end),
        ) {
            (Some(start), Some(end)) => Some(DateWindow::new(start, end)),
            _ => None,
        };

        let filters = ConventionFilters {
            city: self.city,
            region: self.region,
            country: self.country,
            postal_code: self.postal_code,
            start_date_after: errors.date("startDateAfter", &self.start_date_after),
            start_date_before: errors.date("startDateBefore", &self.start_date_before),
            end_date_after: errors.date("endDateAfter", &self.end_date_after),
            end_date_before: errors.date("endDateBefore", &self.end_date_before),
            date_between,
            category_id,
            category_slug: self.category_slug,
            is_popular: errors.boolean("popular", &self.popular),
            is_verified: errors.boolean("verified", &self.verified),
            search: self.search,
        };

        let page = errors.positive("page", &self.page).unwrap_or(1);
        let limit = errors.positive("limit", &self.limit);
        let sort_by = errors
            .parsed::<SortField>("sortBy", &self.sort_by)
            .unwrap_or_default();
        let sort_order = errors
            .parsed::<SortOrder>("sortOrder", &self.sort_order)
            .unwrap_or_default();

        if !errors.0.is_empty() {
            return Err(errors.0);
        }

        Ok(ListingRequest {
            filters,
            upcoming: self.upcoming.as_deref() == Some("true"),
            past: self.past.as_deref() == Some("true"),
            page,
            limit,
            sort_by,
            sort_order,
        })
    }
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an RFC 3339 instant or a bare `YYYY-MM-DD` date at UTC midnight.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::listing::predicate::{ConventionColumn, Operator, Predicate};
    use chrono::TimeZone;

    fn params(pairs: &[(&str, &str)]) -> ListingParams {
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let uri: axum::http::Uri = format!("/api/conventions?{query}").parse().unwrap();
        axum::extract::Query::<ListingParams>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    #[test]
    fn empty_params_give_defaults() {
        let request = ListingParams::default().into_request().unwrap();

        assert!(request.filters.is_empty());
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, None);
        assert_eq!(request.sort_by, SortField::StartDate);
        assert_eq!(request.sort_order, SortOrder::Asc);
        assert!(request.to_query(50).predicate.is_unconstrained());
    }

    #[test]
    fn parses_camel_case_names() {
        let request = params(&[
            ("postalCode", "75015"),
            ("categorySlug", "manga-anime"),
            ("popular", "true"),
            ("verified", "false"),
            ("startDateAfter", "2024-06-01"),
            ("sortBy", "name"),
            ("sortOrder", "desc"),
            ("page", "2"),
            ("limit", "10"),
        ])
        .into_request()
        .unwrap();

        assert_eq!(request.filters.postal_code.as_deref(), Some("75015"));
        assert_eq!(request.filters.category_slug.as_deref(), Some("manga-anime"));
        assert_eq!(request.filters.is_popular, Some(true));
        assert_eq!(request.filters.is_verified, Some(false));
        assert_eq!(
            request.filters.start_date_after,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(request.sort_by, SortField::Name);
        assert_eq!(request.sort_order, SortOrder::Desc);
        assert_eq!(request.page, 2);
        assert_eq!(request.limit, Some(10));
    }

    #[test]
    fn malformed_values_are_reported_per_field() {
        let errors = params(&[
            ("startDateAfter", "next-week"),
            ("categoryId", "42"),
            ("popular", "yes"),
            ("page", "0"),
            ("sortBy", "price"),
        ])
        .into_request()
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"startDateAfter"));
        assert!(fields.contains(&"categoryId"));
        assert!(fields.contains(&"popular"));
        assert!(fields.contains(&"page"));
        assert!(fields.contains(&"sortBy"));
    }

    #[test]
    fn date_between_needs_both_ends() {
        let request = params(&[("dateBetweenStart", "2024-06-01")])
            .into_request()
            .unwrap();
        assert!(request.filters.date_between.is_none());

        let request = params(&[
            ("dateBetweenStart", "2024-06-01"),
            ("dateBetweenEnd", "2024-06-30T23:59:59Z"),
        ])
        .into_request()
        .unwrap();
        assert!(request.filters.date_between.is_some());
    }

    #[test]
    fn upcoming_only_when_true() {
        assert!(params(&[("upcoming", "true")]).into_request().unwrap().upcoming);
        assert!(!params(&[("upcoming", "1")]).into_request().unwrap().upcoming);
        assert!(!params(&[("past", "no")]).into_request().unwrap().past);
    }

    #[test]
    fn explicit_start_bound_overrides_upcoming() {
        let request = params(&[("upcoming", "true"), ("startDateAfter", "2020-01-01")])
            .into_request()
            .unwrap();
        let query = request.to_query(50);

        assert_eq!(
            query.predicate,
            Predicate::All(vec![Predicate::convention(
                ConventionColumn::StartDate,
                Operator::Gte,
                Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            )])
        );
    }

    #[test]
    fn default_limit_applies_when_absent() {
        let query = ListingParams::default()
            .into_request()
            .unwrap()
            .to_query(25);
        assert_eq!(query.limit, 25);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn parse_date_accepts_offsets() {
        let parsed = parse_date("2024-06-01T02:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert!(parse_date("01/06/2024").is_none());
    }
}
