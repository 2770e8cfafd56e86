//! Resume text extraction.
//!
//! The pipeline only sees the [`DocumentExtractor`] trait, so tests and
//! alternative backends can stand in for the file-format readers.

pub mod document;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ResumeFile;

pub use document::FileTextExtractor;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("no readable text found in '{0}'")]
    NoText(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Turns an uploaded resume into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, file: &ResumeFile) -> Result<String, ExtractionError>;
}
