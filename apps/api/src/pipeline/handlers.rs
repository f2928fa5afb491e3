use axum::{
    extract::{Path, State},
    Json,
};
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::fields::{FieldMap, PipelineResult, ScoreSet};
use crate::models::job::{Job, JobStatus, Telemetry};
use crate::pipeline::orchestrator::{self, PipelineInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub file_base64: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub target_role: Option<String>,
    pub model_override: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub scores: ScoreSet,
    pub fields: FieldMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub telemetry: Telemetry,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: JobStatus,
    pub result: PipelineResult,
    pub telemetry: Telemetry,
}

/// POST /api/v1/parse
///
/// Decodes the uploaded file, runs the pipeline inline, and stores the
/// terminal job under a fresh id. Malformed payloads fail loudly here;
/// everything past this point degrades instead of erroring.
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    let file_bytes = base64::engine::general_purpose::STANDARD
        .decode(req.file_base64.as_bytes())
        .map_err(|_| AppError::Validation("fileBase64 is not valid base64".to_string()))?;
    if file_bytes.is_empty() {
        return Err(AppError::Validation(
            "fileBase64 decoded to an empty file".to_string(),
        ));
    }

    let request_id = Uuid::new_v4();
    let received_at = Utc::now();
    let started = std::time::Instant::now();

    let input = PipelineInput {
        file_bytes,
        file_name: req.file_name,
        mime_type: req.mime_type,
        target_role: req.target_role,
        model_override: req.model_override.clone(),
    };
    let result = orchestrator::run(input, state.enricher.as_ref()).await;

    let status = if result.error.is_some() {
        JobStatus::Blocked
    } else {
        JobStatus::Done
    };
    // Only report a model when enrichment could actually run.
    let model_used = state.config.gemini_api_key.as_ref().map(|_| {
        req.model_override
            .unwrap_or_else(|| state.config.gemini_model_flash.clone())
    });
    let telemetry = Telemetry {
        request_id,
        received_at,
        processing_ms: Some(started.elapsed().as_millis() as i64),
        model_used,
        pipeline_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    info!(%request_id, ?status, "parse request processed");

    state.jobs.write().await.insert(
        request_id,
        Job {
            status,
            result: result.clone(),
            telemetry: telemetry.clone(),
        },
    );

    Ok(Json(ParseResponse {
        id: request_id,
        status,
        text: result.text,
        scores: result.scores,
        fields: result.fields,
        error: result.error,
        telemetry,
    }))
}

/// GET /api/v1/status/:id
pub async fn handle_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusResponse>, AppError> {
    let jobs = state.jobs.read().await;
    let job = jobs
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(StatusResponse {
        id,
        status: job.status,
        result: job.result.clone(),
        telemetry: job.telemetry.clone(),
    }))
}

/// DELETE /api/v1/resume/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.jobs.write().await.remove(&id) {
        Some(_) => Ok(Json(json!({"deleted": true, "id": id}))),
        None => Err(AppError::NotFound(format!("Job {id} not found"))),
    }
}
