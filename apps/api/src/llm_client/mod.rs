/// LLM Client: the single point of entry for all Gemini API calls in this
/// service.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// The pipeline consumes enrichment only through the `FieldEnricher`
/// capability, which reports "produced fields" or "absent", never an error.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use crate::models::fields::FieldMap;
use prompts::{EXTRACT_FIELDS_SYSTEM, MAX_DOCUMENT_CHARS};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_RETRIES: u32 = 3;
const TEMPERATURE: f32 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("API key not configured")]
    MissingApiKey,

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let joined: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// The single Gemini client used by the service. Wraps the
/// `generateContent` endpoint with retry logic; the API key is optional and
/// its absence surfaces as `LlmError::MissingApiKey` so callers can treat a
/// keyless deployment as "enrichment off".
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    default_model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, default_model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            default_model,
        }
    }

    /// Sends document text (truncated to the character budget) through the
    /// field-extraction prompt. Retries on 429 and 5xx with exponential
    /// backoff.
    pub async fn extract_fields(
        &self,
        document_text: &str,
        model_override: Option<&str>,
    ) -> Result<GeminiResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let model = model_override.unwrap_or(&self.default_model);
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");

        let truncated = truncate_chars(document_text, MAX_DOCUMENT_CHARS);
        let request_body = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part {
                        text: EXTRACT_FIELDS_SYSTEM.to_string(),
                    },
                    Part {
                        text: format!("Resume text:\n{truncated}"),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .query(&[("key", api_key)])
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let gemini_response: GeminiResponse = response.json().await?;
            debug!(
                "LLM call succeeded (model: {model}, candidates: {})",
                gemini_response.candidates.len()
            );
            return Ok(gemini_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Capability for remote field enrichment. Implementations either produce a
/// field map or report absence; transport and parse failures must collapse
/// to absence so the pipeline never aborts on them.
#[async_trait]
pub trait FieldEnricher: Send + Sync {
    async fn enrich(&self, document_text: &str, model_override: Option<&str>) -> Option<FieldMap>;
}

/// Gemini-backed enricher. Missing key, transport error, non-JSON output,
/// and a malformed `fields` object all collapse to `None`.
pub struct GeminiEnricher {
    client: GeminiClient,
}

impl GeminiEnricher {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FieldEnricher for GeminiEnricher {
    async fn enrich(&self, document_text: &str, model_override: Option<&str>) -> Option<FieldMap> {
        let response = match self
            .client
            .extract_fields(document_text, model_override)
            .await
        {
            Ok(r) => r,
            Err(LlmError::MissingApiKey) => {
                debug!("Gemini API key not set; skipping enrichment");
                return None;
            }
            Err(e) => {
                warn!("Enrichment call failed, continuing with heuristics: {e}");
                return None;
            }
        };

        let text = response.text()?;
        let fields = parse_remote_fields(&text);
        if fields.is_none() {
            warn!("Enrichment output was not a parseable field map");
        }
        fields
    }
}

/// Parses model output into a field map. Requires an object carrying a
/// `fields` object whose entries have the `{value, confidence}` shape;
/// anything else is absence.
pub fn parse_remote_fields(text: &str) -> Option<FieldMap> {
    let value = extract_json_object(text)?;
    let fields = value.get("fields")?.clone();
    serde_json::from_value::<FieldMap>(fields).ok()
}

/// Pulls a JSON object out of model text: strips markdown code fences, and
/// if the remainder still does not parse, falls back to the outermost brace
/// span.
fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let text = strip_json_fences(text);
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<serde_json::Value>(&text[start..=end])
        .ok()
        .filter(|v| v.is_object())
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
