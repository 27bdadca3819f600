//! Sorting, paging and result types for convention listings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::predicate::{ConventionColumn, Predicate};

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest row offset a listing will request.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Fields a listing can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    StartDate,
    EndDate,
    Name,
    City,
    CreatedAt,
}

impl SortField {
    /// SQL column name on the `convention` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::StartDate => ConventionColumn::StartDate.as_str(),
            Self::EndDate => ConventionColumn::EndDate.as_str(),
            Self::Name => ConventionColumn::Name.as_str(),
            Self::City => ConventionColumn::City.as_str(),
            Self::CreatedAt => "created_at",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startDate" => Ok(Self::StartDate),
            "endDate" => Ok(Self::EndDate),
            "name" => Ok(Self::Name),
            "city" => Ok(Self::City),
            "createdAt" => Ok(Self::CreatedAt),
            other => Err(format!(
                "unknown sort field '{other}', expected one of startDate, endDate, name, city, createdAt"
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}', expected asc or desc")),
        }
    }
}

/// A fully resolved listing request: filter, order and page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub predicate: Predicate,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            predicate: Predicate::always(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ListingQuery {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            ..Self::default()
        }
    }

    /// Rows to skip before the requested page, clamped to what a
    /// PostgreSQL `OFFSET` (a signed 64-bit value) accepts.
    pub fn offset(&self) -> u64 {
        let offset = u64::from(self.page.saturating_sub(1)) * u64::from(self.limit);
        offset.min(MAX_OFFSET)
    }
}

/// Paging metadata returned alongside listing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// One page of listing results.
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
