use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{error::Result, handlers::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
    #[serde(default)]
    pub force: bool,
}

/// Refresh the snapshot from the remote API
pub async fn refresh(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Result<impl IntoResponse> {
    let outcome = state.controller.refresh(params.force).await?;
    Ok((StatusCode::OK, Json(outcome)))
}

/// Invalidate the refresh window and the cached view
pub async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.clear_caches().await;
    StatusCode::NO_CONTENT
}

/// Get all derived view rows
pub async fn get_all_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rows = state.controller.load().await?;
    Ok((StatusCode::OK, Json(rows.as_ref().clone())))
}

/// Get one derived view row by ID
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let row = state.controller.load_user(id).await?;
    Ok((StatusCode::OK, Json(row)))
}

/// Summary statistics of the current snapshot
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.controller.stats().await?;
    Ok((StatusCode::OK, Json(stats)))
}
