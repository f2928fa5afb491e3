//! Pipeline orchestration: a small stage machine tying extraction,
//! screening, field recognition, scoring, and enrichment together.
//!
//! The machine has exactly one early exit: a failed safety screen moves to
//! `Blocked` and nothing downstream runs: no recognizers, no scoring, and
//! no remote model call.

use tracing::debug;

use crate::llm_client::FieldEnricher;
use crate::models::fields::{FieldMap, FieldValue, PipelineResult, ScoreSet};
use crate::pipeline::{document, fields, merge, safety, scoring};

/// Extracted text shorter than this is assumed to be a scan that needs OCR.
const OCR_THRESHOLD_CHARS: usize = 200;

/// Everything one invocation needs. Owned by the caller; no state is shared
/// across invocations.
#[derive(Debug, Default)]
pub struct PipelineInput {
    pub file_bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub target_role: Option<String>,
    pub model_override: Option<String>,
}

/// Pipeline stages. `Blocked` and `Finalizing` are terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Extracting,
    Screening,
    ExtractingFields,
    Scoring,
    Enriching,
    Finalizing,
    Blocked,
}

/// Runs the full pipeline over one document. Only the enrichment stage may
/// suspend; its failures are absorbed by the enricher and never abort the
/// run.
pub async fn run(input: PipelineInput, enricher: &dyn FieldEnricher) -> PipelineResult {
    let mut stage = Stage::Extracting;
    let mut text = String::new();
    let mut field_map = FieldMap::new();
    let mut scores = ScoreSet::default();
    let mut remote: Option<FieldMap> = None;
    let mut block_reason: Option<String> = None;

    loop {
        debug!(?stage, "pipeline stage");
        stage = match stage {
            Stage::Extracting => {
                text = document::extract_text(
                    &input.file_bytes,
                    input.mime_type.as_deref(),
                    input.file_name.as_deref(),
                );
                Stage::Screening
            }
            Stage::Screening => {
                let verdict = safety::screen(&text);
                if verdict.safe {
                    Stage::ExtractingFields
                } else {
                    block_reason = verdict.reason;
                    Stage::Blocked
                }
            }
            Stage::ExtractingFields => {
                field_map = fields::extract_fields(&text);
                Stage::Scoring
            }
            Stage::Scoring => {
                scores = scoring::score(&text, input.target_role.as_deref());
                Stage::Enriching
            }
            Stage::Enriching => {
                remote = enricher
                    .enrich(&text, input.model_override.as_deref())
                    .await;
                Stage::Finalizing
            }
            Stage::Finalizing => {
                let mut merged = merge::merge(field_map, remote.take());
                append_status_fields(&mut merged, &text);
                return PipelineResult {
                    text: Some(text),
                    scores,
                    fields: merged,
                    error: None,
                };
            }
            Stage::Blocked => {
                let reason = block_reason
                    .take()
                    .unwrap_or_else(|| "suspicious content detected".to_string());
                return blocked_result(reason);
            }
        };
    }
}

/// Appends the synthetic status fields after the merge so neither the
/// recognizers nor the remote model can overwrite them.
fn append_status_fields(fields: &mut FieldMap, text: &str) {
    let needs_ocr = text.len() < OCR_THRESHOLD_CHARS;
    fields.insert(
        "needsOcr".to_string(),
        FieldValue::new(needs_ocr, 0.9).with_status(
            "ocr_status",
            if needs_ocr { "queued" } else { "not_required" },
        ),
    );
    // The external scan dependency is declared but not wired up; the field
    // stays a stub so clients can see the gap.
    fields.insert(
        "antivirus".to_string(),
        FieldValue::new("pending", 0.5)
            .with_status("scan_status", "not_implemented")
            .with_status("note", "stub"),
    );
}

fn blocked_result(reason: String) -> PipelineResult {
    let mut fields = FieldMap::new();
    fields.insert(
        "needsOcr".to_string(),
        FieldValue::new(false, 0.9).with_status("ocr_status", "blocked"),
    );
    fields.insert(
        "antivirus".to_string(),
        FieldValue::new("failed", 0.5).with_status("scan_status", "blocked"),
    );
    PipelineResult {
        text: None,
        scores: ScoreSet::default(),
        fields,
        error: Some(reason),
    }
}
