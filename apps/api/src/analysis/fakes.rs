//! In-memory extractor and fetcher used by the analysis and router tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use crate::extraction::{DocumentExtractor, ExtractionError};
use crate::models::resume::MIME_PDF;
use crate::models::{DocumentKind, JobPosting, KeywordEntry, Requirement, ResumeFile};
use crate::posting::{FetchError, PostingError, PostingFetcher};

pub const RESUME_TEXT: &str =
    "Agile delivery lead with Team Leadership experience across three product squads.";

pub fn sample_posting() -> JobPosting {
    let mut posting = JobPosting::new("https://jobs.example.com/pm");
    posting.title = Some("Senior Project Manager".to_string());
    posting.company = Some("Tech Innovations Inc.".to_string());
    posting.keywords = vec![
        KeywordEntry::plain("Agile"),
        KeywordEntry::plain("Scrum"),
        KeywordEntry::plain("Team Leadership"),
    ];
    posting.requirements = vec![Requirement::required("Agile delivery")];
    posting
}

pub fn pdf_resume() -> ResumeFile {
    ResumeFile::new("resume.pdf", DocumentKind::Pdf, Bytes::from_static(b"%PDF-1.4"))
}

pub fn pdf_bytes() -> (&'static str, &'static [u8]) {
    (MIME_PDF, b"%PDF-1.4 fake")
}

pub struct FakeExtractor {
    text: Option<String>,
    delay: Duration,
}

impl FakeExtractor {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DocumentExtractor for FakeExtractor {
    async fn extract_text(&self, file: &ResumeFile) -> Result<String, ExtractionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.text
            .clone()
            .ok_or_else(|| ExtractionError::NoText(file.file_name().to_string()))
    }
}

pub enum FakeFetcher {
    Posting(JobPosting),
    Status(u16),
}

impl FakeFetcher {
    pub fn posting(posting: JobPosting) -> Self {
        FakeFetcher::Posting(posting)
    }

    pub fn status(status: u16) -> Self {
        FakeFetcher::Status(status)
    }
}

#[async_trait]
impl PostingFetcher for FakeFetcher {
    async fn fetch_posting(&self, url: &Url) -> Result<JobPosting, PostingError> {
        match self {
            FakeFetcher::Posting(posting) => {
                let mut posting = posting.clone();
                posting.url = url.to_string();
                Ok(posting)
            }
            FakeFetcher::Status(status) => Err(FetchError::Status { status: *status }.into()),
        }
    }
}
