use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single recognized attribute: a value (string, list, or bool), a
/// confidence in [0, 1], and any extra status keys the field carries
/// (e.g. `ocr_status` on `needsOcr`). The extra keys are flattened so the
/// wire shape stays `{value, confidence, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: Value,
    pub confidence: f64,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub status: Map<String, Value>,
}

impl FieldValue {
    pub fn new(value: impl Into<Value>, confidence: f64) -> Self {
        Self {
            value: value.into(),
            confidence,
            status: Map::new(),
        }
    }

    pub fn with_status(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.status.insert(key.to_string(), value.into());
        self
    }

    /// Whether the field carries an actual value. Empty strings, empty
    /// lists, and nulls do not count; booleans and numbers always do.
    pub fn has_value(&self) -> bool {
        match &self.value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}

/// Field name → value map. Later inserts overwrite earlier ones for the
/// same key; key order is irrelevant, so a BTreeMap keeps serialization
/// deterministic.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// The three quality scores, each in [0, 100]. All zero when no text was
/// extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub readability: u32,
    pub ats: u32,
    #[serde(rename = "match")]
    pub role_match: u32,
}

/// Final output of one pipeline invocation. Constructed once, never
/// mutated afterward. If `error` is set the screener blocked the document:
/// `text` is absent and all scores are zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub scores: ScoreSet,
    pub fields: FieldMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_serializes_flat() {
        let field = FieldValue::new(true, 0.9).with_status("ocr_status", "queued");
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({"value": true, "confidence": 0.9, "ocr_status": "queued"})
        );
    }

    #[test]
    fn test_field_value_round_trips_extra_keys() {
        let json = r#"{"value": "pending", "confidence": 0.5, "scan_status": "not_implemented", "note": "stub"}"#;
        let field: FieldValue = serde_json::from_str(json).unwrap();
        assert_eq!(field.value, json!("pending"));
        assert_eq!(field.status["scan_status"], json!("not_implemented"));
        assert_eq!(serde_json::from_str::<FieldValue>(json).unwrap(), field);
    }

    #[test]
    fn test_has_value_empty_string_is_absent() {
        assert!(!FieldValue::new("", 0.9).has_value());
        assert!(FieldValue::new("Engineer", 0.9).has_value());
    }

    #[test]
    fn test_has_value_empty_list_is_absent() {
        assert!(!FieldValue::new(Vec::<String>::new(), 0.6).has_value());
        assert!(FieldValue::new(vec!["https://a.example"], 0.6).has_value());
    }

    #[test]
    fn test_has_value_bool_always_counts() {
        assert!(FieldValue::new(false, 0.9).has_value());
    }

    #[test]
    fn test_score_set_match_key_rename() {
        let scores = ScoreSet {
            readability: 50,
            ats: 65,
            role_match: 40,
        };
        let value = serde_json::to_value(scores).unwrap();
        assert_eq!(value, json!({"readability": 50, "ats": 65, "match": 40}));
    }

    #[test]
    fn test_pipeline_result_skips_absent_keys() {
        let result = PipelineResult {
            text: None,
            scores: ScoreSet::default(),
            fields: FieldMap::new(),
            error: Some("blocked".to_string()),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("text").is_none());
        assert_eq!(value["error"], json!("blocked"));
    }
}
