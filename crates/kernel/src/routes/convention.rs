//! Convention API routes.

use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};

use crate::error::{AppError, AppResult};
use crate::listing::{ListingPage, ListingParams};
use crate::models::{Convention, CreateConvention};
use crate::services::ConventionDetail;
use crate::state::AppState;

/// Create the convention router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/conventions",
            get(list_conventions).post(create_convention),
        )
        .route("/api/conventions/{slug}", get(get_convention))
}

async fn list_conventions(
    State(state): State<AppState>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> AppResult<Json<ListingPage<Convention>>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let page = state.directory().list_conventions(params).await?;
    Ok(Json(page))
}

async fn get_convention(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ConventionDetail>> {
    let detail = state.directory().convention_detail(&slug).await?;
    Ok(Json(detail))
}

async fn create_convention(
    State(state): State<AppState>,
    body: Result<Json<CreateConvention>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Convention>)> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let convention = state.directory().create_convention(input).await?;
    Ok((StatusCode::CREATED, Json(convention)))
}
