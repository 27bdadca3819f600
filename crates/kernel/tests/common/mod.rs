#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Each [`TestApp`] wraps the real router over a fresh in-memory store,
//! so tests are isolated and need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use conventions_kernel::AppState;
use conventions_kernel::routes;
use conventions_kernel::services::PageLimits;
use conventions_kernel::storage::MemoryDirectoryStore;
use conventions_test_utils::{TestCategory, TestConvention};

/// Test application using the real routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create an app over an empty in-memory store.
    pub fn new() -> Self {
        Self::with_limits(PageLimits::default())
    }

    pub fn with_limits(limits: PageLimits) -> Self {
        let state = AppState::from_store(Arc::new(MemoryDirectoryStore::new()), limits);
        Self {
            router: routes::app(state.clone()),
            state,
        }
    }

    /// Send a request and return the status and parsed JSON body.
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Create a category through the API and return its id.
    pub async fn create_category(&self, category: &TestCategory) -> Uuid {
        let (status, body) = self.post_json("/api/categories", &category.to_json()).await;
        assert_eq!(status, StatusCode::CREATED, "category creation failed: {body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Create a convention through the API and return its body.
    pub async fn create_convention(&self, convention: &TestConvention) -> Value {
        let (status, body) = self
            .post_json("/api/conventions", &convention.to_json())
            .await;
        assert_eq!(status, StatusCode::CREATED, "convention creation failed: {body}");
        body
    }
}
