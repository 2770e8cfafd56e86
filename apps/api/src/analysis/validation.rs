//! Input checks that run before any analysis work starts.

use bytes::Bytes;
use reqwest::Url;

use crate::analysis::errors::ValidationError;
use crate::models::resume::MAX_RESUME_BYTES;
use crate::models::{DocumentKind, ResumeFile};

/// Accepts a PDF, DOC or DOCX upload of at most [`MAX_RESUME_BYTES`].
/// The type is checked first.
pub fn validate_resume_upload(
    file_name: &str,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<ResumeFile, ValidationError> {
    let kind = content_type
        .and_then(DocumentKind::from_mime)
        .ok_or_else(|| {
            ValidationError::UnsupportedFileType(content_type.unwrap_or("unknown").to_string())
        })?;

    if data.len() > MAX_RESUME_BYTES {
        return Err(ValidationError::FileTooLarge {
            max: MAX_RESUME_BYTES,
        });
    }

    Ok(ResumeFile::new(file_name, kind, data))
}

/// Parses a job posting link. Only absolute http(s) URLs with a host pass.
pub fn validate_job_url(input: &str) -> Result<Url, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::MissingUrl);
    }

    let url = Url::parse(input).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUrl(input.to_string()));
    }
    Ok(url)
}
