//! Convention model: dated events belonging to one category.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::category::{CategorySummary, required};
use crate::error::FieldError;
use crate::listing::{ListingQuery, ListingStatement};

/// Country assumed when a convention is created without one.
pub const DEFAULT_COUNTRY: &str = "France";

/// A convention with its category summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Convention {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique identifier.
    pub slug: String,
    pub description: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub website: Option<String>,
    pub ticket_url: Option<String>,
    /// Free-form price text, e.g. "À partir de 20€".
    pub price: Option<String>,
    pub is_popular: bool,
    pub is_verified: bool,
    pub image_url: Option<String>,
    pub category_id: Uuid,
    pub category: CategorySummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Convention {
    /// Whether the convention starts at or after `now`.
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.start_date >= now
    }
}

/// Convention row joined with its category name and slug.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConventionRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub website: Option<String>,
    pub ticket_url: Option<String>,
    pub price: Option<String>,
    pub is_popular: bool,
    pub is_verified: bool,
    pub image_url: Option<String>,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConventionRow> for Convention {
    fn from(row: ConventionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            city: row.city,
            region: row.region,
            address: row.address,
            postal_code: row.postal_code,
            country: row.country,
            start_date: row.start_date,
            end_date: row.end_date,
            website: row.website,
            ticket_url: row.ticket_url,
            price: row.price,
            is_popular: row.is_popular,
            is_verified: row.is_verified,
            image_url: row.image_url,
            category_id: row.category_id,
            category: CategorySummary {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for creating a convention.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateConvention {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub website: Option<String>,
    pub ticket_url: Option<String>,
    pub price: Option<String>,
    pub is_popular: Option<bool>,
    pub is_verified: Option<bool>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}

/// A validated convention ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConvention {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub website: Option<String>,
    pub ticket_url: Option<String>,
    pub price: Option<String>,
    pub is_popular: bool,
    pub is_verified: bool,
    pub image_url: Option<String>,
    pub category_id: Uuid,
}

impl CreateConvention {
    /// Check required fields, dates and URLs, and apply defaults.
    ///
    /// Every problem is reported, not only the first.
    pub fn validate(self) -> Result<NewConvention, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = required(&mut errors, "name", self.name);
        let slug = required(&mut errors, "slug", self.slug);
        let city = required(&mut errors, "city", self.city);
        let start_date = instant(&mut errors, "startDate", self.start_date);
        let end_date = instant(&mut errors, "endDate", self.end_date);
        let category_id = required(&mut errors, "categoryId", self.category_id).and_then(|raw| {
            Uuid::parse_str(&raw)
                .map_err(|_| errors.push(FieldError::new("categoryId", "must be a UUID")))
                .ok()
        });
        let website = absolute_url(&mut errors, "website", self.website);
        let ticket_url = absolute_url(&mut errors, "ticketUrl", self.ticket_url);
        let image_url = absolute_url(&mut errors, "imageUrl", self.image_url);

        let (Some(name), Some(slug), Some(city), Some(start_date), Some(end_date), Some(category_id)) =
            (name, slug, city, start_date, end_date, category_id)
        else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewConvention {
            id: Uuid::now_v7(),
            name,
            slug,
            description: self.description,
            city,
            region: self.region,
            address: self.address,
            postal_code: self.postal_code,
            country: self
                .country
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            start_date,
            end_date,
            website,
            ticket_url,
            price: self.price,
            is_popular: self.is_popular.unwrap_or(false),
            is_verified: self.is_verified.unwrap_or(false),
            image_url,
            category_id,
        })
    }
}

fn instant(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<String>,
) -> Option<DateTime<Utc>> {
    let raw = required(errors, field, value)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(instant) => Some(instant.with_timezone(&Utc)),
        Err(_) => {
            errors.push(FieldError::new(field, "must be an RFC 3339 date-time"));
            None
        }
    }
}

fn absolute_url(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    let raw = value?;
    match url::Url::parse(&raw) {
        Ok(_) => Some(raw),
        Err(_) => {
            errors.push(FieldError::new(field, "must be an absolute URL"));
            None
        }
    }
}

impl NewConvention {
    /// Materialize the record as stored at `now` under `category`.
    pub fn into_convention(self, category: CategorySummary, now: DateTime<Utc>) -> Convention {
        Convention {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            city: self.city,
            region: self.region,
            address: self.address,
            postal_code: self.postal_code,
            country: self.country,
            start_date: self.start_date,
            end_date: self.end_date,
            website: self.website,
            ticket_url: self.ticket_url,
            price: self.price,
            is_popular: self.is_popular,
            is_verified: self.is_verified,
            image_url: self.image_url,
            category_id: self.category_id,
            category,
            created_at: now,
            updated_at: now,
        }
    }
}

const JOINED_SELECT: &str = r#"
    SELECT convention.*, category.name AS category_name, category.slug AS category_slug
    FROM convention
    INNER JOIN category ON convention.category_id = category.id
"#;

impl Convention {
    /// Find a convention by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ConventionRow>(&format!(
            "{JOINED_SELECT} WHERE convention.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch convention by slug")?;

        Ok(row.map(Into::into))
    }

    /// All conventions of a category, ordered by start date.
    pub async fn list_by_category(pool: &PgPool, category_id: Uuid) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ConventionRow>(&format!(
            "{JOINED_SELECT} WHERE convention.category_id = $1 ORDER BY convention.start_date, convention.id"
        ))
        .bind(category_id)
        .fetch_all(pool)
        .await
        .context("failed to list conventions for category")?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert a new convention and return it with its category.
    pub async fn create(pool: &PgPool, input: &NewConvention) -> Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO convention (
                id, name, slug, description, city, region, address, postal_code, country,
                start_date, end_date, website, ticket_url, price, is_popular, is_verified,
                image_url, category_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(input.id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.city)
        .bind(&input.region)
        .bind(&input.address)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.website)
        .bind(&input.ticket_url)
        .bind(&input.price)
        .bind(input.is_popular)
        .bind(input.is_verified)
        .bind(&input.image_url)
        .bind(input.category_id)
        .execute(pool)
        .await
        .context("failed to create convention")?;

        Self::find_by_slug(pool, &input.slug)
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to fetch created convention"))
    }

    /// Count conventions matching a listing query.
    pub async fn count(pool: &PgPool, query: &ListingQuery) -> Result<u64> {
        let sql = ListingStatement::new(query).build_count();
        let total: i64 = sqlx::query_scalar(&sql)
            .fetch_one(pool)
            .await
            .context("failed to count conventions")?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// Fetch one page of conventions matching a listing query.
    pub async fn fetch(pool: &PgPool, query: &ListingQuery) -> Result<Vec<Self>> {
        let sql = ListingStatement::new(query).build();
        let rows = sqlx::query_as::<_, ConventionRow>(&sql)
            .fetch_all(pool)
            .await
            .context("failed to list conventions")?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
