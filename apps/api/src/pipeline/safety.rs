//! Content safety screening: a hard gate between text extraction and
//! everything downstream. Runs before field extraction and before any
//! remote model call.

/// Known prompt-injection phrases, matched case-insensitively as plain
/// substrings. Ordered table: extending the screen means adding a row here,
/// not touching control flow.
const INJECTION_PHRASES: &[&str] = &[
    "ignore previous instructions",
    "ignore all previous instructions",
    "disregard previous instructions",
    "disregard all previous",
    "forget your instructions",
    "new instructions:",
    "system prompt",
    "you are now",
    "override all rules",
    "act as a",
    "do anything now",
    "jailbreak",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenResult {
    pub safe: bool,
    pub reason: Option<String>,
}

/// Scans extracted text for adversarial instruction phrases. The first
/// matching phrase short-circuits; empty text is always safe.
pub fn screen(text: &str) -> ScreenResult {
    let lower = text.to_lowercase();
    for phrase in INJECTION_PHRASES {
        if lower.contains(phrase) {
            return ScreenResult {
                safe: false,
                reason: Some(format!("suspicious content detected: \"{phrase}\"")),
            };
        }
    }
    ScreenResult {
        safe: true,
        reason: None,
    }
}
