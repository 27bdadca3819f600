//! Convention directory test utilities.
//!
//! Fixture builders producing JSON request bodies for the category and
//! convention endpoints, plus assertion helpers for JSON responses.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

/// Create a test category with default values.
pub fn test_category(name: &str, slug: &str) -> TestCategory {
    TestCategory {
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        icon: None,
        color: None,
    }
}

/// A test category builder.
#[derive(Debug, Clone)]
pub struct TestCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl TestCategory {
    /// Set a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set a display color.
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Set an icon.
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// The `POST /api/categories` body.
    pub fn to_json(&self) -> JsonValue {
        let mut body = json!({
            "name": self.name,
            "slug": self.slug,
        });
        insert_opt(&mut body, "description", &self.description);
        insert_opt(&mut body, "icon", &self.icon);
        insert_opt(&mut body, "color", &self.color);
        body
    }
}

/// Create a test convention in `category_id`, starting `start` and lasting two days.
pub fn test_convention(
    name: &str,
    slug: &str,
    category_id: Uuid,
    start: DateTime<Utc>,
) -> TestConvention {
    TestConvention {
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        city: "Paris".to_string(),
        region: None,
        postal_code: None,
        country: None,
        start_date: start,
        end_date: start + Duration::days(2),
        website: None,
        price: None,
        is_popular: false,
        is_verified: false,
        category_id,
    }
}

/// A test convention builder.
#[derive(Debug, Clone)]
pub struct TestConvention {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub website: Option<String>,
    pub price: Option<String>,
    pub is_popular: bool,
    pub is_verified: bool,
    pub category_id: Uuid,
}

impl TestConvention {
    /// Set the city.
    pub fn in_city(mut self, city: &str) -> Self {
        self.city = city.to_string();
        self
    }

    /// Set the region.
    pub fn in_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Set the postal code.
    pub fn with_postal_code(mut self, postal_code: &str) -> Self {
        self.postal_code = Some(postal_code.to_string());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the end date.
    pub fn ending(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = end;
        self
    }

    /// Set the website.
    pub fn with_website(mut self, website: &str) -> Self {
        self.website = Some(website.to_string());
        self
    }

    /// Set the price text.
    pub fn with_price(mut self, price: &str) -> Self {
        self.price = Some(price.to_string());
        self
    }

    /// Mark as popular.
    pub fn popular(mut self) -> Self {
        self.is_popular = true;
        self
    }

    /// Mark as verified.
    pub fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }

    /// The `POST /api/conventions` body.
    pub fn to_json(&self) -> JsonValue {
        let mut body = json!({
            "name": self.name,
            "slug": self.slug,
            "city": self.city,
            "startDate": self.start_date.to_rfc3339(),
            "endDate": self.end_date.to_rfc3339(),
            "isPopular": self.is_popular,
            "isVerified": self.is_verified,
            "categoryId": self.category_id.to_string(),
        });
        insert_opt(&mut body, "description", &self.description);
        insert_opt(&mut body, "region", &self.region);
        insert_opt(&mut body, "postalCode", &self.postal_code);
        insert_opt(&mut body, "country", &self.country);
        insert_opt(&mut body, "website", &self.website);
        insert_opt(&mut body, "price", &self.price);
        body
    }
}

fn insert_opt(body: &mut JsonValue, key: &str, value: &Option<String>) {
    if let (Some(obj), Some(value)) = (body.as_object_mut(), value) {
        obj.insert(key.to_string(), JsonValue::String(value.clone()));
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }

    /// Assert that `data` is an array whose `slug`s are exactly `expected`, in order.
    pub fn slugs(data: &Value, expected: &[&str]) {
        let actual: Vec<&str> = data
            .as_array()
            .map(|items| items.iter().filter_map(|i| i["slug"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(actual, expected, "slug mismatch in {data}");
    }

    /// Assert that the error body names `field` in its details.
    pub fn error_detail(body: &Value, field: &str) {
        let found = body["details"]
            .as_array()
            .is_some_and(|details| details.iter().any(|d| d["field"] == field));
        assert!(found, "Expected error detail for '{field}', got: {body}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn convention_json_uses_wire_names() {
        let id = Uuid::now_v7();
        let body = test_convention("Japan Expo", "japan-expo", id, Utc::now())
            .with_postal_code("93420")
            .popular()
            .to_json();

        assert_eq!(body["postalCode"], "93420");
        assert_eq!(body["isPopular"], true);
        assert_eq!(body["categoryId"], id.to_string());
        assert!(body.get("website").is_none());
    }

    #[test]
    fn category_json_skips_unset_fields() {
        let body = test_category("Automobile", "automobile")
            .with_color("#EF4444")
            .to_json();

        assert_eq!(body["color"], "#EF4444");
        assert!(body.get("icon").is_none());
    }
}
