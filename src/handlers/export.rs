use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    error::Result,
    handlers::AppState,
    services::export_service::{ChartKind, CSV_FILE_NAME},
};

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}

/// Derived view as a CSV download
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.controller.export_csv().await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(CSV_FILE_NAME)),
        ],
        body,
    ))
}

/// One chart as a standalone HTML download
pub async fn export_chart(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse> {
    let kind: ChartKind = kind.parse()?;
    let html = state.controller.export_chart(kind).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(kind.file_name())),
        ],
        html,
    ))
}
