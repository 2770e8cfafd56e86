//! Job posting retrieval: fetch a posting page and parse it into a [`JobPosting`].

pub mod fetcher;
pub mod html;
pub mod keywords;
pub mod sections;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::models::JobPosting;

pub use fetcher::{parse_posting, HttpPostingFetcher};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("posting host answered with status {status}")]
    Status { status: u16 },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("posting page contains no readable text")]
    EmptyDocument,

    #[error("invalid selector: {0}")]
    Selector(String),
}

#[derive(Debug, Error)]
pub enum PostingError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Retrieves and parses the posting behind a URL.
#[async_trait]
pub trait PostingFetcher: Send + Sync {
    async fn fetch_posting(&self, url: &Url) -> Result<JobPosting, PostingError>;
}
