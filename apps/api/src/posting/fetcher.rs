use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::matching::SkillsTaxonomy;
use crate::models::JobPosting;
use crate::posting::html::{parse_page, Line, LineKind};
use crate::posting::keywords::{build_keyword_inventory, KeywordSources};
use crate::posting::sections::{assign_sections, extract_requirements, raw_text};
use crate::posting::{FetchError, ParseError, PostingError, PostingFetcher};

/// Status some job boards answer automated clients with.
const BOT_DETECTION_STATUS: u16 = 999;

/// Fetches posting pages over HTTP and parses them in-process.
#[derive(Debug, Clone)]
pub struct HttpPostingFetcher {
    client: Client,
    taxonomy: Arc<SkillsTaxonomy>,
}

impl HttpPostingFetcher {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        taxonomy: Arc<SkillsTaxonomy>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, taxonomy })
    }
}

#[async_trait]
impl PostingFetcher for HttpPostingFetcher {
    async fn fetch_posting(&self, url: &Url) -> Result<JobPosting, PostingError> {
        debug!(%url, "Fetching job posting");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from)?;

        let status = response.status();
        if status.as_u16() == BOT_DETECTION_STATUS {
            warn!(%url, "Received 999 status - likely bot detection");
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let html = response.text().await.map_err(FetchError::from)?;
        debug!(%url, bytes = html.len(), "Fetched posting page");

        let posting = parse_posting(url.as_str(), &html, &self.taxonomy)?;
        info!(
            %url,
            title = posting.title.as_deref().unwrap_or("-"),
            requirements = posting.requirements.len(),
            keywords = posting.keywords.len(),
            "Parsed job posting"
        );
        Ok(posting)
    }
}

/// Parses a posting page into a [`JobPosting`].
pub fn parse_posting(
    url: &str,
    html: &str,
    taxonomy: &SkillsTaxonomy,
) -> Result<JobPosting, ParseError> {
    let page = parse_page(html)?;

    let mut lines = page.lines;
    let (qualifications, declared_skills) = match page.structured {
        Some(structured) => (structured.qualifications, structured.skills),
        None => (Vec::new(), Vec::new()),
    };
    if !qualifications.is_empty() {
        lines.push(Line::new("Qualifications", LineKind::Heading));
        lines.extend(
            qualifications
                .into_iter()
                .map(|q| Line::new(q, LineKind::ListItem)),
        );
    }

    let sectioned = assign_sections(&lines);
    let keywords = build_keyword_inventory(&KeywordSources {
        title: page.title.as_deref(),
        company: page.company.as_deref(),
        lines: &sectioned,
        declared_skills: &declared_skills,
        taxonomy,
    });

    let mut posting = JobPosting::new(url);
    posting.requirements = extract_requirements(&sectioned);
    posting.keywords = keywords;
    posting.raw_text = raw_text(&sectioned);
    posting.title = page.title;
    posting.company = page.company;
    Ok(posting)
}
