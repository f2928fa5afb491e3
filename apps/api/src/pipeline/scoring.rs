//! Quality scoring: three independent 0-100 axes computed from the text.

use crate::models::fields::ScoreSet;

const LONG_TEXT_CHARS: usize = 1500;
const MEDIUM_TEXT_CHARS: usize = 700;

const SECTION_HEADINGS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "projects",
    "summary",
    "profile",
];

/// Scores the text on readability, ATS-friendliness, and match against an
/// optional target role. Pure and deterministic; empty text scores zero on
/// every axis.
pub fn score(text: &str, target_role: Option<&str>) -> ScoreSet {
    ScoreSet {
        readability: readability_score(text),
        ats: ats_score(text),
        role_match: match_score(text, target_role),
    }
}

/// Length component plus bullet-density component, clamped to [10, 100]
/// once any text exists.
fn readability_score(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let length_points = if text.len() > LONG_TEXT_CHARS {
        40
    } else if text.len() > MEDIUM_TEXT_CHARS {
        20
    } else {
        10
    };

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let bullets = lines
        .iter()
        .filter(|l| l.starts_with('-') || l.starts_with('\u{2022}') || l.starts_with('*'))
        .count();
    let ratio = if lines.is_empty() {
        0.0
    } else {
        bullets as f64 / lines.len() as f64
    };
    let bullet_points = if ratio >= 0.30 {
        40
    } else if ratio >= 0.15 {
        20
    } else {
        10
    };

    (length_points + bullet_points).clamp(10, 100)
}

/// Section-heading count plus length, plus a flat 20, clamped to [10, 100].
fn ats_score(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let lower = text.to_lowercase();
    let headings = SECTION_HEADINGS
        .iter()
        .filter(|&&h| lower.contains(h))
        .count();
    let heading_points = if headings >= 3 {
        40
    } else if headings >= 2 {
        20
    } else {
        10
    };
    let length_points = if text.len() > LONG_TEXT_CHARS { 30 } else { 15 };

    (heading_points + length_points + 20).clamp(10, 100)
}

/// Counts how many whitespace-separated tokens of the target role appear
/// (as substrings) in the text; 20 points per hit, capped at 100.
fn match_score(text: &str, target_role: Option<&str>) -> u32 {
    let target = match target_role {
        Some(t) => t,
        None => return 0,
    };
    if text.is_empty() {
        return 0;
    }

    let haystack = text.to_lowercase();
    let hits = target
        .to_lowercase()
        .split_whitespace()
        .filter(|token| haystack.contains(token))
        .count() as u32;

    (hits * 20).min(100)
}
