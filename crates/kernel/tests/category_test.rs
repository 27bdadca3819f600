#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Category endpoint integration tests.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use conventions_test_utils::{assert, test_category, test_convention};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn create_and_list_categories_by_name() {
    let app = TestApp::new();
    app.create_category(&test_category("Manga / Anime", "manga-anime").with_color("#8B5CF6"))
        .await;
    app.create_category(&test_category("Automobile", "automobile").with_icon("🚗"))
        .await;

    let (status, body) = app.get("/api/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert::slugs(&body, &["automobile", "manga-anime"]);
    assert_eq!(body[0]["icon"], "🚗");
    assert_eq!(body[1]["color"], "#8B5CF6");
    assert!(body[0].get("conventions").is_none());
}

#[tokio::test]
async fn list_with_conventions_embeds_them_by_start_date() {
    let app = TestApp::new();
    let manga = app
        .create_category(&test_category("Manga / Anime", "manga-anime"))
        .await;
    app.create_category(&test_category("Automobile", "automobile"))
        .await;
    let now = Utc::now();
    app.create_convention(&test_convention("Later", "later", manga, now + Duration::days(60)))
        .await;
    app.create_convention(&test_convention("Sooner", "sooner", manga, now + Duration::days(5)))
        .await;

    let (_, body) = app.get("/api/categories?withConventions=true").await;

    assert_eq!(body[0]["conventions"], json!([]));
    assert::slugs(&body[1]["conventions"], &["sooner", "later"]);
}

#[tokio::test]
async fn missing_name_is_invalid() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/categories", &json!({ "slug": "nameless" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert::error_detail(&body, "name");
}

#[tokio::test]
async fn duplicate_category_slug_conflicts() {
    let app = TestApp::new();
    let category = test_category("Automobile", "automobile");
    app.create_category(&category).await;

    let (status, body) = app.post_json("/api/categories", &category.to_json()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Category with this slug already exists");
}

#[tokio::test]
async fn category_detail_splits_upcoming_and_past() {
    let app = TestApp::new();
    let manga = app
        .create_category(&test_category("Manga / Anime", "manga-anime"))
        .await;
    let now = Utc::now();
    app.create_convention(&test_convention("Past", "past", manga, now - Duration::days(100)))
        .await;
    app.create_convention(&test_convention("Next", "next", manga, now + Duration::days(100)))
        .await;

    let (status, body) = app.get("/api/categories/manga-anime").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "manga-anime");
    assert::slugs(&body["upcoming"], &["next"]);
    assert::slugs(&body["past"], &["past"]);
}

#[tokio::test]
async fn unknown_category_slug_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/categories/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Category not found");
}

#[tokio::test]
async fn health_reports_storage_backend() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}
