pub mod export;
pub mod user;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::controller::Controller;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Controller>,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/refresh", post(user::refresh))
        .route("/api/cache/clear", post(user::clear_cache))
        .route("/api/users", get(user::get_all_users))
        .route("/api/users/{id}", get(user::get_user_by_id))
        .route("/api/stats", get(user::get_stats))
        .route("/api/export/users.csv", get(export::export_csv))
        .route("/api/export/charts/{kind}", get(export::export_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "Users dashboard is running."
}
