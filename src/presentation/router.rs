// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, get_dataset, health_check, list_sources};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sources", get(list_sources))
        .route("/datasets/:source", get(get_dataset))
        .route("/dashboards/:source", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
