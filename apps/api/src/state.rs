use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::metrics::store::QualityLogStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Language-model collaborator used for extraction, generation and judging.
    pub llm: Arc<dyn LanguageModel>,
    /// Append-only judge log backing the quality metrics endpoint.
    pub quality_log: Arc<dyn QualityLogStore>,
    pub config: Config,
}
