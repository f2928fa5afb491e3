//! Enrichment merge: remote-model fields layered over heuristic fields.

use crate::models::fields::FieldMap;

/// Merges optional remote-model fields into the heuristic map. A remote
/// entry replaces the heuristic one only when it carries a non-empty value;
/// keys the remote map lacks keep their heuristic entry. `None` means the
/// remote call was skipped or produced nothing usable.
pub fn merge(heuristic: FieldMap, remote: Option<FieldMap>) -> FieldMap {
    let mut merged = heuristic;
    if let Some(remote) = remote {
        for (key, field) in remote {
            if field.has_value() {
                merged.insert(key, field);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::FieldValue;
    use serde_json::json;

    fn heuristic() -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("role".to_string(), FieldValue::new("Engineer", 0.65));
        map.insert(
            "email".to_string(),
            FieldValue::new("jane@example.com", 0.9),
        );
        map
    }

    #[test]
    fn test_no_remote_fields_leaves_heuristics_untouched() {
        let merged = merge(heuristic(), None);
        assert_eq!(merged, heuristic());
    }

    #[test]
    fn test_remote_overrides_with_non_empty_value() {
        let mut remote = FieldMap::new();
        remote.insert(
            "role".to_string(),
            FieldValue::new("Senior Engineer", 0.95),
        );
        let merged = merge(heuristic(), Some(remote));
        assert_eq!(merged["role"].value, json!("Senior Engineer"));
        assert_eq!(merged["role"].confidence, 0.95);
        // Untouched key survives.
        assert_eq!(merged["email"].value, json!("jane@example.com"));
    }

    #[test]
    fn test_remote_empty_value_keeps_heuristic() {
        let mut remote = FieldMap::new();
        remote.insert("role".to_string(), FieldValue::new("", 0.95));
        let merged = merge(heuristic(), Some(remote));
        assert_eq!(merged["role"].value, json!("Engineer"));
        assert_eq!(merged["role"].confidence, 0.65);
    }

    #[test]
    fn test_remote_adds_keys_heuristics_missed() {
        let mut remote = FieldMap::new();
        remote.insert("location".to_string(), FieldValue::new("Berlin", 0.8));
        let merged = merge(heuristic(), Some(remote));
        assert_eq!(merged["location"].value, json!("Berlin"));
        assert_eq!(merged.len(), 3);
    }
}
