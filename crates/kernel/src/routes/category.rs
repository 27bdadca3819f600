//! Category API routes.

use axum::{
    Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{Category, CreateCategory};
use crate::services::{CategoryDetail, CategoryListing};
use crate::state::AppState;

/// Create the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/{slug}", get(get_category))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCategoriesQuery {
    with_conventions: Option<String>,
}

async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListCategoriesQuery>,
) -> AppResult<Json<Vec<CategoryListing>>> {
    let with_conventions = query.with_conventions.as_deref() == Some("true");
    let categories = state.directory().list_categories(with_conventions).await?;
    Ok(Json(categories))
}

async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<CategoryDetail>> {
    let detail = state.directory().category_detail(&slug).await?;
    Ok(Json(detail))
}

async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CreateCategory>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let category = state.directory().create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
