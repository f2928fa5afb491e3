// Resume parsing pipeline: text extraction, safety screening, heuristic
// recognizers, quality scoring, enrichment merge, and the orchestrating
// stage machine. All model calls go through llm_client; no direct Gemini
// calls here.

pub mod document;
pub mod fields;
pub mod handlers;
pub mod merge;
pub mod orchestrator;
pub mod safety;
pub mod scoring;
