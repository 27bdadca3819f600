//! Category model: named groups of conventions (e.g. "Manga / Anime").

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::FieldError;

/// A category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Human-readable name.
    pub name: String,

    /// URL-safe unique identifier.
    pub slug: String,

    pub description: Option<String>,

    /// Icon hint for clients (an emoji or icon name).
    pub icon: Option<String>,

    /// Display color, usually a hex code.
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The part of a category embedded in each convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// Request body for creating a category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// A validated category ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl CreateCategory {
    /// Check required fields and assign an id.
    pub fn validate(self) -> Result<NewCategory, Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = required(&mut errors, "name", self.name);
        let slug = required(&mut errors, "slug", self.slug);

        match (name, slug) {
            (Some(name), Some(slug)) if errors.is_empty() => Ok(NewCategory {
                id: Uuid::now_v7(),
                name,
                slug,
                description: self.description,
                icon: self.icon,
                color: self.color,
            }),
            _ => Err(errors),
        }
    }
}

impl NewCategory {
    /// Materialize the record as stored at `now`.
    pub fn into_category(self, now: DateTime<Utc>) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            icon: self.icon,
            color: self.color,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Take a non-blank string or record a field error.
pub(crate) fn required(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

const COLUMNS: &str = "id, name, slug, description, icon, color, created_at, updated_at";

impl Category {
    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM category WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category")?;

        Ok(category)
    }

    /// Find a category by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM category WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category by slug")?;

        Ok(category)
    }

    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let categories = sqlx::query_as::<_, Self>(&format!(
            "SELECT {COLUMNS} FROM category ORDER BY name, id"
        ))
        .fetch_all(pool)
        .await
        .context("failed to list categories")?;

        Ok(categories)
    }

    /// Insert a new category.
    pub async fn create(pool: &PgPool, input: &NewCategory) -> Result<Self> {
        let category = sqlx::query_as::<_, Self>(&format!(
            r#"
            INSERT INTO category (id, name, slug, description, icon, color)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(input.id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.icon)
        .bind(&input.color)
        .fetch_one(pool)
        .await
        .context("failed to create category")?;

        Ok(category)
    }
}
