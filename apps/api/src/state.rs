use crate::analysis::{AnalysisPipeline, SessionStore};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    /// Extractor, fetcher and matcher behind trait objects; swapped for fakes in tests.
    pub pipeline: AnalysisPipeline,
    pub sessions: SessionStore,
}
