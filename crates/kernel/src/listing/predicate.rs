//! Storage-agnostic predicate tree for convention queries.
//!
//! A [`Predicate`] says which convention records match. It can be
//! evaluated in process with [`Predicate::matches`] or rendered to SQL
//! by [`ListingStatement`](super::statement::ListingStatement).

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Convention;

/// Filterable columns of the `convention` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConventionColumn {
    Name,
    Description,
    City,
    Region,
    Country,
    PostalCode,
    StartDate,
    EndDate,
    CategoryId,
    IsPopular,
    IsVerified,
}

impl ConventionColumn {
    /// SQL column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::City => "city",
            Self::Region => "region",
            Self::Country => "country",
            Self::PostalCode => "postal_code",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::CategoryId => "category_id",
            Self::IsPopular => "is_popular",
            Self::IsVerified => "is_verified",
        }
    }
}

/// Filterable columns of the related `category` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryColumn {
    Slug,
}

impl CategoryColumn {
    /// SQL column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slug => "slug",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Gte,
    Lte,
    Lt,
    /// Case-insensitive substring match (ILIKE %value%).
    ContainsInsensitive,
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Instant(DateTime<Utc>),
    Bool(bool),
    Id(Uuid),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Instant(d) => write!(f, "{}", d.to_rfc3339()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Id(u) => write!(f, "{u}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Instant(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Id(value)
    }
}

/// A single column comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition<C> {
    pub column: C,
    pub operator: Operator,
    pub value: Value,
}

/// Boolean expression over convention records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Comparison on a convention column.
    Convention(Condition<ConventionColumn>),
    /// Comparison on the related category (requires a join).
    Category(Condition<CategoryColumn>),
    /// Conjunction. Empty matches everything.
    All(Vec<Predicate>),
    /// Disjunction. Empty matches nothing.
    Any(Vec<Predicate>),
}

impl Default for Predicate {
    fn default() -> Self {
        Self::always()
    }
}

impl Predicate {
    /// Predicate matching every record.
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    pub fn convention(column: ConventionColumn, operator: Operator, value: impl Into<Value>) -> Self {
        Predicate::Convention(Condition {
            column,
            operator,
            value: value.into(),
        })
    }

    pub fn category(column: CategoryColumn, operator: Operator, value: impl Into<Value>) -> Self {
        Predicate::Category(Condition {
            column,
            operator,
            value: value.into(),
        })
    }

    /// True when the predicate places no constraint on records.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Predicate::All(children) => children.iter().all(Predicate::is_unconstrained),
            _ => false,
        }
    }

    /// True when the predicate touches the related category.
    pub fn references_category(&self) -> bool {
        match self {
            Predicate::Category(_) => true,
            Predicate::Convention(_) => false,
            Predicate::All(children) | Predicate::Any(children) => {
                children.iter().any(Predicate::references_category)
            }
        }
    }

    /// Evaluate against a convention record.
    ///
    /// Comparisons against a missing optional column never match, which
    /// mirrors SQL NULL semantics.
    pub fn matches(&self, convention: &Convention) -> bool {
        match self {
            Predicate::Convention(c) => {
                compare(convention_field(convention, c.column), c.operator, &c.value)
            }
            Predicate::Category(c) => {
                compare(category_field(convention, c.column), c.operator, &c.value)
            }
            Predicate::All(children) => children.iter().all(|p| p.matches(convention)),
            Predicate::Any(children) => children.iter().any(|p| p.matches(convention)),
        }
    }
}

/// Borrowed view of a record field.
enum Field<'a> {
    Text(&'a str),
    Instant(DateTime<Utc>),
    Bool(bool),
    Id(Uuid),
    Null,
}

fn convention_field(convention: &Convention, column: ConventionColumn) -> Field<'_> {
    fn text(value: Option<&str>) -> Field<'_> {
        value.map_or(Field::Null, Field::Text)
    }

    match column {
        ConventionColumn::Name => Field::Text(&convention.name),
        ConventionColumn::Description => text(convention.description.as_deref()),
        ConventionColumn::City => Field::Text(&convention.city),
        ConventionColumn::Region => text(convention.region.as_deref()),
        ConventionColumn::Country => Field::Text(&convention.country),
        ConventionColumn::PostalCode => text(convention.postal_code.as_deref()),
        ConventionColumn::StartDate => Field::Instant(convention.start_date),
        ConventionColumn::EndDate => Field::Instant(convention.end_date),
        ConventionColumn::CategoryId => Field::Id(convention.category_id),
        ConventionColumn::IsPopular => Field::Bool(convention.is_popular),
        ConventionColumn::IsVerified => Field::Bool(convention.is_verified),
    }
}

fn category_field(convention: &Convention, column: CategoryColumn) -> Field<'_> {
    match column {
        CategoryColumn::Slug => Field::Text(&convention.category.slug),
    }
}

fn compare(field: Field<'_>, operator: Operator, value: &Value) -> bool {
    let ordering = match (field, value) {
        (Field::Text(field), Value::Text(value)) => {
            if operator == Operator::ContainsInsensitive {
                return field.to_lowercase().contains(&value.to_lowercase());
            }
            field.cmp(value.as_str())
        }
        (Field::Instant(field), Value::Instant(value)) => field.cmp(value),
        (Field::Bool(field), Value::Bool(value)) => field.cmp(value),
        (Field::Id(field), Value::Id(value)) => field.cmp(value),
        _ => return false,
    };

    match operator {
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Gte => ordering != Ordering::Less,
        Operator::Lte => ordering != Ordering::Greater,
        Operator::Lt => ordering == Ordering::Less,
        Operator::ContainsInsensitive => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::CategorySummary;
    use chrono::TimeZone;

    fn sample() -> Convention {
        let category_id = Uuid::now_v7();
        Convention {
            id: Uuid::now_v7(),
            name: "Japan Expo".to_string(),
            slug: "japan-expo".to_string(),
            description: None,
            city: "Villepinte".to_string(),
            region: Some("Île-de-France".to_string()),
            address: None,
            postal_code: Some("93420".to_string()),
            country: "France".to_string(),
            start_date: Utc.with_ymd_and_hms(2024, 7, 5, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 7, 8, 0, 0, 0).unwrap(),
            website: None,
            ticket_url: None,
            price: None,
            is_popular: true,
            is_verified: false,
            image_url: None,
            category_id,
            category: CategorySummary {
                id: category_id,
                name: "Manga / Anime".to_string(),
                slug: "manga-anime".to_string(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_all_matches_everything() {
        assert!(Predicate::always().matches(&sample()));
        assert!(Predicate::always().is_unconstrained());
        assert!(Predicate::All(vec![Predicate::always()]).is_unconstrained());
    }

    #[test]
    fn empty_any_matches_nothing() {
        assert!(!Predicate::Any(vec![]).matches(&sample()));
        assert!(!Predicate::Any(vec![]).is_unconstrained());
    }

    #[test]
    fn contains_is_case_insensitive() {
        let p = Predicate::convention(ConventionColumn::Name, Operator::ContainsInsensitive, "JAPAN");
        assert!(p.matches(&sample()));

        let p = Predicate::convention(ConventionColumn::Region, Operator::ContainsInsensitive, "île");
        assert!(p.matches(&sample()));
    }

    #[test]
    fn null_columns_never_match() {
        let p = Predicate::convention(
            ConventionColumn::Description,
            Operator::ContainsInsensitive,
            "",
        );
        assert!(!p.matches(&sample()));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 7, 5, 0, 0, 0).unwrap();
        let gte = Predicate::convention(ConventionColumn::StartDate, Operator::Gte, start);
        let lte = Predicate::convention(ConventionColumn::StartDate, Operator::Lte, start);
        let lt = Predicate::convention(ConventionColumn::StartDate, Operator::Lt, start);

        assert!(gte.matches(&sample()));
        assert!(lte.matches(&sample()));
        assert!(!lt.matches(&sample()));
    }

    #[test]
    fn mismatched_value_types_do_not_match() {
        let p = Predicate::convention(ConventionColumn::IsPopular, Operator::Eq, "true");
        assert!(!p.matches(&sample()));
    }

    #[test]
    fn category_conditions_use_related_row() {
        let p = Predicate::category(CategoryColumn::Slug, Operator::Eq, "manga-anime");
        assert!(p.matches(&sample()));
        assert!(p.references_category());

        let p = Predicate::category(CategoryColumn::Slug, Operator::Eq, "automobile");
        assert!(!p.matches(&sample()));
    }

    #[test]
    fn predicate_serializes_as_tree() {
        let p = Predicate::All(vec![Predicate::convention(
            ConventionColumn::City,
            Operator::ContainsInsensitive,
            "paris",
        )]);
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["all"][0]["convention"]["column"], "city");
        assert_eq!(json["all"][0]["convention"]["operator"], "contains_insensitive");
        assert_eq!(json["all"][0]["convention"]["value"], "paris");
    }
}
