//! Heuristic field extraction: deterministic, pattern-based recognizers.
//!
//! Every recognizer takes the first occurrence in document order rather than
//! scoring alternatives; simplicity over precision is intentional. A field is
//! omitted entirely when its recognizer finds nothing, never emitted null.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::fields::{FieldMap, FieldValue};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

// Candidate runs of digits with separators; real phones are confirmed by
// counting at least 9 digits afterward.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{7,}\d").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).unwrap());

static EXPERIENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})\s*\+?\s*years").unwrap());

const MAX_LINKS: usize = 5;
const ROLE_SCAN_LINES: usize = 6;

const ROLE_KEYWORDS: &[&str] = &[
    "engineer",
    "developer",
    "designer",
    "product",
    "data",
    "analyst",
    "manager",
];

/// Ordered buckets: the first bucket whose keyword appears in the role line
/// wins, so "product data engineer" resolves to engineering.
const FUNCTION_AREAS: &[(&str, &[&str])] = &[
    ("engineering", &["engineer", "developer", "software", "devops", "sre"]),
    ("product", &["product"]),
    ("design", &["designer", "design", "ux", "ui"]),
    ("data", &["data", "analyst", "analytics", "scientist"]),
    ("sales", &["sales", "account executive"]),
    ("marketing", &["marketing", "growth", "seo"]),
    ("operations", &["operations", "ops", "logistics"]),
    ("finance", &["finance", "accounting", "controller"]),
    ("hr", &["hr", "people", "recruit", "talent"]),
];

/// Markers that make a short line read as a location when no comma is present.
const LOCATION_MARKERS: &[&str] = &[
    "remote",
    "hybrid",
    "united states",
    "usa",
    "united kingdom",
    "uk",
    "canada",
    "india",
    "germany",
    "france",
    "netherlands",
    "spain",
    "australia",
    "singapore",
    "brazil",
    "poland",
    "ireland",
];

/// Applies every recognizer to the text and returns the resulting field map.
/// Pure function of the text: same input, same output.
pub fn extract_fields(text: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(m) = EMAIL_RE.find(text) {
        fields.insert("email".to_string(), FieldValue::new(m.as_str(), 0.9));
    }

    if let Some(phone) = find_phone(text) {
        fields.insert("phone".to_string(), FieldValue::new(phone, 0.7));
    }

    let links: Vec<&str> = LINK_RE.find_iter(text).map(|m| m.as_str()).collect();
    if !links.is_empty() {
        fields.insert(
            "links".to_string(),
            FieldValue::new(links.iter().take(MAX_LINKS).copied().collect::<Vec<_>>(), 0.6),
        );
    }
    if let Some(url) = links.iter().find(|l| l.contains("linkedin.com")) {
        fields.insert("linkedinUrl".to_string(), FieldValue::new(*url, 0.85));
    }
    if let Some(url) = links.iter().find(|l| l.contains("github.com")) {
        fields.insert("githubUrl".to_string(), FieldValue::new(*url, 0.85));
    }

    // Name and location both hang off the top of the document.
    match lines.first() {
        Some(first) if accept_name(first) => {
            fields.insert("name".to_string(), FieldValue::new(*first, 0.7));
            if let Some(second) = lines.get(1) {
                if looks_like_location(second) {
                    fields.insert("location".to_string(), FieldValue::new(*second, 0.7));
                }
            }
        }
        Some(first) => {
            if first.split_whitespace().count() <= 6 && looks_like_location(first) {
                fields.insert(
                    "location".to_string(),
                    FieldValue::new(*first, default_confidence(first)),
                );
            }
        }
        None => {}
    }

    let role_line = lines.iter().take(ROLE_SCAN_LINES).copied().find(|line| {
        let lower = line.to_lowercase();
        ROLE_KEYWORDS.iter().any(|k| lower.contains(k))
    });
    if let Some(role) = role_line {
        fields.insert("role".to_string(), FieldValue::new(role, 0.65));
        if let Some(area) = function_area(role) {
            fields.insert("functionArea".to_string(), FieldValue::new(area, 0.6));
        }
    }

    if let Some(caps) = EXPERIENCE_RE.captures(text) {
        if let Ok(years) = caps[1].parse::<u32>() {
            fields.insert(
                "experience".to_string(),
                FieldValue::new(experience_band(years), 0.6),
            );
        }
    }

    fields
}

fn find_phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| candidate.chars().filter(char::is_ascii_digit).count() >= 9)
        .map(str::to_string)
}

/// A candidate name is the first non-blank line when it has 2-4 words, no
/// digits, no comma, and every word in title case. Honorifics and many
/// non-Latin names fail this test, a known heuristic gap.
fn accept_name(line: &str) -> bool {
    if line.contains(',') {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    words
        .iter()
        .all(|w| is_title_case(w) && !w.chars().any(|c| c.is_ascii_digit()))
}

fn is_title_case(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(char::is_lowercase),
        _ => false,
    }
}

fn looks_like_location(line: &str) -> bool {
    if line.contains(',') {
        return true;
    }
    let lower = line.to_lowercase();
    LOCATION_MARKERS.iter().any(|m| lower.contains(m))
}

fn default_confidence(value: &str) -> f64 {
    if value.len() > 3 {
        0.8
    } else {
        0.5
    }
}

fn function_area(role_line: &str) -> Option<&'static str> {
    let lower = role_line.to_lowercase();
    FUNCTION_AREAS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(area, _)| *area)
}

fn experience_band(years: u32) -> &'static str {
    match years {
        0..=1 => "0-1",
        2..=3 => "1-3",
        4..=5 => "3-5",
        6..=10 => "5-10",
        _ => "10+",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "Jane Doe\n\
        Berlin, Germany\n\
        Senior Software Engineer\n\
        Contact: jane.doe@example.com and jane2@x.org\n\
        Phone: +49 (30) 1234-5678\n\
        https://linkedin.com/in/janedoe and https://github.com/janedoe\n\
        8 years of experience building backend systems";

    #[test]
    fn test_email_takes_first_match() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields["email"].value, json!("jane.doe@example.com"));
        assert_eq!(fields["email"].confidence, 0.9);
    }

    #[test]
    fn test_phone_requires_nine_digits() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields["phone"].value, json!("+49 (30) 1234-5678"));
        assert_eq!(fields["phone"].confidence, 0.7);

        // Eight digits with separators is not enough.
        assert!(!extract_fields("call 1234-5678 today").contains_key("phone"));
    }

    #[test]
    fn test_links_capped_at_five() {
        let text = (1..=7)
            .map(|i| format!("https://example.com/{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let fields = extract_fields(&text);
        let links = fields["links"].value.as_array().unwrap();
        assert_eq!(links.len(), 5);
        assert_eq!(links[0], json!("https://example.com/1"));
        assert_eq!(fields["links"].confidence, 0.6);
    }

    #[test]
    fn test_linkedin_and_github_urls() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(
            fields["linkedinUrl"].value,
            json!("https://linkedin.com/in/janedoe")
        );
        assert_eq!(
            fields["githubUrl"].value,
            json!("https://github.com/janedoe")
        );
        assert_eq!(fields["linkedinUrl"].confidence, 0.85);
    }

    #[test]
    fn test_name_from_title_case_first_line() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields["name"].value, json!("Jane Doe"));
        assert_eq!(fields["name"].confidence, 0.7);
    }

    #[test]
    fn test_name_rejects_digits_commas_and_case() {
        assert!(!extract_fields("Jane Doe 2nd\nBerlin").contains_key("name"));
        assert!(!extract_fields("Doe, Jane\nBerlin").contains_key("name"));
        assert!(!extract_fields("JANE DOE\nBerlin").contains_key("name"));
        assert!(!extract_fields("Jane\nBerlin").contains_key("name"));
    }

    #[test]
    fn test_location_second_line_after_name() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields["location"].value, json!("Berlin, Germany"));
        assert_eq!(fields["location"].confidence, 0.7);
    }

    #[test]
    fn test_location_marker_without_comma() {
        let fields = extract_fields("Jane Doe\nRemote\nSoftware Engineer");
        assert_eq!(fields["location"].value, json!("Remote"));
    }

    #[test]
    fn test_location_fallback_first_line_uses_length_confidence() {
        // First line is not an acceptable name, but is short and
        // location-like; confidence comes from the length default.
        let fields = extract_fields("Berlin, Germany\njane@example.com");
        assert_eq!(fields["location"].value, json!("Berlin, Germany"));
        assert_eq!(fields["location"].confidence, 0.8);

        let fields = extract_fields("UK\njane@example.com");
        assert_eq!(fields["location"].confidence, 0.5);
    }

    #[test]
    fn test_role_from_first_six_lines() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields["role"].value, json!("Senior Software Engineer"));
        assert_eq!(fields["role"].confidence, 0.65);
    }

    #[test]
    fn test_role_outside_scan_window_is_missed() {
        let text = "One\nTwo\nThree\nFour\nFive\nSix\nSenior Engineer";
        assert!(!extract_fields(text).contains_key("role"));
    }

    #[test]
    fn test_function_area_first_bucket_wins() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields["functionArea"].value, json!("engineering"));
        assert_eq!(fields["functionArea"].confidence, 0.6);

        // "Product Data Engineer" contains keywords from three buckets;
        // engineering is ordered first.
        let fields = extract_fields("Jane Doe\nProduct Data Engineer");
        assert_eq!(fields["functionArea"].value, json!("engineering"));
    }

    #[test]
    fn test_function_area_absent_without_role() {
        let fields = extract_fields("Jane Doe\nBerlin, Germany");
        assert!(!fields.contains_key("role"));
        assert!(!fields.contains_key("functionArea"));
    }

    #[test]
    fn test_experience_bucketing() {
        let cases = [
            ("1 year... 1 years of work", "0-1"),
            ("3 years of experience", "1-3"),
            ("5+ years of experience", "3-5"),
            ("7 years shipping software", "5-10"),
            ("12 years", "10+"),
        ];
        for (text, band) in cases {
            let fields = extract_fields(text);
            assert_eq!(fields["experience"].value, json!(band), "text: {text}");
            assert_eq!(fields["experience"].confidence, 0.6);
        }
    }

    #[test]
    fn test_fields_omitted_when_unrecognized() {
        let fields = extract_fields("lowercase note with nothing useful");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(extract_fields(SAMPLE), extract_fields(SAMPLE));
    }
}
