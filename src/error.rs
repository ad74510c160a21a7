use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Remote API responded with status {status}")]
    RemoteFetch { status: u16 },

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("No data available, trigger a refresh from the API first")]
    NoData,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Export error: {0}")]
    Export(String),
}

/// Failures of the fetch-and-replace pipeline other than a bad status code.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

// Convert AppError to an HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::RemoteFetch { status } => (
                StatusCode::BAD_GATEWAY,
                format!("Error fetching users from the API ({status})"),
            ),
            AppError::Pipeline(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Refreshing data failed".into(),
            ),
            AppError::NoData => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into()),
            AppError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Export failed".into()),
        };

        tracing::error!(?self);
        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export(err.to_string())
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::RemoteFetch { status: 500 }, StatusCode::BAD_GATEWAY),
            (
                AppError::Pipeline(PipelineError::Storage(sqlx::Error::RowNotFound)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::NoData, StatusCode::NOT_FOUND),
            (AppError::UserNotFound, StatusCode::NOT_FOUND),
            (AppError::Database(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::BadRequest("kind".into()), StatusCode::BAD_REQUEST),
            (AppError::Export("csv".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
