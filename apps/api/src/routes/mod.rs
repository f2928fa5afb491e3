pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::service_info))
        .route("/health", get(health::health_handler))
        .route("/api/v1/parse", post(handlers::handle_parse))
        .route("/api/v1/status/:id", get(handlers::handle_status))
        .route("/api/v1/resume/:id", delete(handlers::handle_delete))
        .with_state(state)
}
