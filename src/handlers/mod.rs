pub mod api;
pub mod dashboard;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(dashboard::index))
        // Partials
        .route("/dashboard/table", post(dashboard::table_partial))
        // API (JSON for charts)
        .route("/api/dashboard", post(dashboard::data))
        .route("/api/months", get(api::months))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
