use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fields::PipelineResult;

/// Terminal state of a parse job. The pipeline completes inline in the
/// handler, so stored jobs are never observed mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Done,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    pub request_id: Uuid,
    pub received_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    pub pipeline_version: String,
}

/// One stored parse job: terminal status, the pipeline output, and the
/// request telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub status: JobStatus,
    pub result: PipelineResult,
    pub telemetry: Telemetry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(JobStatus::Done).unwrap(), json!("done"));
        assert_eq!(
            serde_json::to_value(JobStatus::Blocked).unwrap(),
            json!("blocked")
        );
    }

    #[test]
    fn test_telemetry_skips_absent_fields() {
        let telemetry = Telemetry {
            request_id: Uuid::new_v4(),
            received_at: Utc::now(),
            processing_ms: None,
            model_used: None,
            pipeline_version: "0.1.0".to_string(),
        };
        let value = serde_json::to_value(&telemetry).unwrap();
        assert!(value.get("processing_ms").is_none());
        assert!(value.get("model_used").is_none());
        assert_eq!(value["pipeline_version"], json!("0.1.0"));
    }
}
