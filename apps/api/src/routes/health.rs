use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-parser-api"
    }))
}

/// GET /
/// Service info: environment and the configured model names.
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "resume-parser-api",
        "env": state.config.env,
        "models": {
            "flash": state.config.gemini_model_flash,
            "pro": state.config.gemini_model_pro,
        }
    }))
}
