//! Analysis Pipeline: extract, fetch, match, suggest.
//!
//! Extraction and fetching run concurrently and must both succeed before the
//! matcher sees anything. Failure anywhere aborts the whole run: no partial
//! result leaves this module.

use std::sync::Arc;
use std::time::Instant;

use reqwest::Url;
use tracing::{debug, info};

use crate::analysis::errors::AnalysisError;
use crate::extraction::DocumentExtractor;
use crate::matching::{InsufficientDataError, Matcher, SkillsTaxonomy};
use crate::models::{AnalysisReport, AnalysisResult, JobPosting, ResumeFile, Suggestion};
use crate::posting::PostingFetcher;
use crate::suggestions::generate_suggestions;

#[derive(Clone)]
pub struct AnalysisPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    fetcher: Arc<dyn PostingFetcher>,
    matcher: Arc<dyn Matcher>,
    taxonomy: Arc<SkillsTaxonomy>,
}

impl AnalysisPipeline {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        fetcher: Arc<dyn PostingFetcher>,
        matcher: Arc<dyn Matcher>,
        taxonomy: Arc<SkillsTaxonomy>,
    ) -> Self {
        Self {
            extractor,
            fetcher,
            matcher,
            taxonomy,
        }
    }

    /// Runs a full analysis for one resume/posting pair.
    pub async fn run(&self, resume: &ResumeFile, url: &Url) -> Result<AnalysisReport, AnalysisError> {
        let started = Instant::now();
        debug!(file = resume.file_name(), %url, "Starting analysis");

        let (resume_text, posting) = tokio::try_join!(
            async {
                self.extractor
                    .extract_text(resume)
                    .await
                    .map_err(AnalysisError::from)
            },
            async {
                self.fetcher
                    .fetch_posting(url)
                    .await
                    .map_err(AnalysisError::from)
            },
        )?;

        let (result, suggestions) = self.evaluate(&resume_text, &posting)?;

        info!(
            %url,
            matcher = self.matcher.backend(),
            score = result.score,
            suggestions = suggestions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis complete"
        );
        Ok(AnalysisReport::new(result, suggestions, &posting))
    }

    /// Pure half of the pipeline: match then suggest.
    pub fn evaluate(
        &self,
        resume_text: &str,
        posting: &JobPosting,
    ) -> Result<(AnalysisResult, Vec<Suggestion>), InsufficientDataError> {
        let result = self.matcher.analyze(resume_text, posting)?;
        let suggestions = generate_suggestions(&result, posting, &self.taxonomy);
        Ok((result, suggestions))
    }
}
