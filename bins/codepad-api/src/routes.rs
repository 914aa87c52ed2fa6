use crate::handlers;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/execute", post(handlers::execute_code))
        .route("/debug/step", post(handlers::debug_step))
        .route("/share", post(handlers::share_snippet).get(handlers::get_shared_snippet))
        .route("/s/:id", get(handlers::get_snippet_by_path))
        .route("/languages", get(handlers::list_languages))
        .route("/status", get(handlers::health_check))
        .route("/metrics", get(handlers::export_metrics))
}
