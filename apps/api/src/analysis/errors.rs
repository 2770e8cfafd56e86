use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::matching::InsufficientDataError;
use crate::posting::{FetchError, ParseError, PostingError};

/// The one message users see for any failure after validation.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "There was an error analyzing your resume. Please try again.";

/// Input rejected before the pipeline starts. Messages are user-facing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid file type ({0}). Please upload a PDF or DOC/DOCX file.")]
    UnsupportedFileType(String),

    #[error("File too large. Please upload a file smaller than 5MB.")]
    FileTooLarge { max: usize },

    #[error("URL required. Please enter a job posting URL.")]
    MissingUrl,

    #[error("Invalid URL. Please enter a valid URL for the job posting.")]
    InvalidUrl(String),

    #[error("Invalid URL. Only http and https job posting links are supported, got '{0}'.")]
    UnsupportedScheme(String),

    #[error("Missing form field '{0}'.")]
    MissingField(&'static str),
}

/// Anything that can stop an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("resume extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("job posting fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("job posting parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("not enough data to match: {0}")]
    InsufficientData(#[from] InsufficientDataError),
}

impl From<PostingError> for AnalysisError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Fetch(e) => AnalysisError::Fetch(e),
            PostingError::Parse(e) => AnalysisError::Parse(e),
        }
    }
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Validation(_) => ErrorKind::Validation,
            AnalysisError::Extraction(_) => ErrorKind::Extraction,
            AnalysisError::Fetch(_) => ErrorKind::Fetch,
            AnalysisError::Parse(_) => ErrorKind::Parse,
            AnalysisError::InsufficientData(_) => ErrorKind::InsufficientData,
        }
    }
}

/// Error class recorded on a failed session. Details stay in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Extraction,
    Fetch,
    Parse,
    InsufficientData,
}

impl ErrorKind {
    pub fn user_message(self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }
}
