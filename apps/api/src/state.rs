use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::llm_client::FieldEnricher;
use crate::models::job::Job;

/// In-memory job bookkeeping. This is the only shared state in the service;
/// the pipeline core itself is a pure function of its inputs.
pub type JobStore = Arc<RwLock<HashMap<Uuid, Job>>>;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable enrichment backend. Default: GeminiEnricher.
    pub enricher: Arc<dyn FieldEnricher>,
    pub jobs: JobStore,
}
