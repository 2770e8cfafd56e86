use serde::{Deserialize, Serialize};

use crate::models::analysis::PostingSummary;

/// A single requirement statement taken from the posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub text: String,
    #[serde(default = "default_required")]
    pub is_required: bool,
}

fn default_required() -> bool {
    true
}

impl Requirement {
    pub fn required(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_required: true,
        }
    }

    pub fn preferred(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_required: false,
        }
    }
}

/// A single keyword from the posting, weighted by position and frequency.
///
/// Deserializes from either a bare string or the full object, so callers of the
/// JSON API can send `["Agile", "Scrum"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "KeywordInput")]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, preferred=0.7, responsibilities=0.6, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

impl KeywordEntry {
    pub fn new(keyword: impl Into<String>, frequency: u32, position_weight: f32) -> Self {
        Self {
            keyword: keyword.into(),
            frequency,
            position_weight,
            weighted_score: frequency as f32 * position_weight,
        }
    }

    /// A keyword with no frequency information.
    pub fn plain(keyword: impl Into<String>) -> Self {
        Self::new(keyword, 1, 1.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordInput {
    Plain(String),
    #[serde(rename_all = "camelCase")]
    Weighted {
        keyword: String,
        #[serde(default = "default_frequency")]
        frequency: u32,
        #[serde(default = "default_weight")]
        position_weight: f32,
        weighted_score: Option<f32>,
    },
}

fn default_frequency() -> u32 {
    1
}

fn default_weight() -> f32 {
    1.0
}

impl From<KeywordInput> for KeywordEntry {
    fn from(input: KeywordInput) -> Self {
        match input {
            KeywordInput::Plain(keyword) => KeywordEntry::plain(keyword),
            KeywordInput::Weighted {
                keyword,
                frequency,
                position_weight,
                weighted_score,
            } => KeywordEntry {
                weighted_score: weighted_score.unwrap_or(frequency as f32 * position_weight),
                keyword,
                frequency,
                position_weight,
            },
        }
    }
}

/// A job posting as the matcher sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
    #[serde(default)]
    pub raw_text: String,
}

impl JobPosting {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            company: None,
            requirements: Vec::new(),
            keywords: Vec::new(),
            raw_text: String::new(),
        }
    }

    pub fn summary(&self) -> PostingSummary {
        PostingSummary {
            url: self.url.clone(),
            title: self.title.clone(),
            company: self.company.clone(),
        }
    }

    /// Every piece of posting text that may mention a skill: title, body,
    /// requirement statements and keyword labels.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(title) = self.title.as_deref() {
            parts.push(title);
        }
        parts.push(&self.raw_text);
        parts.extend(self.requirements.iter().map(|r| r.text.as_str()));
        parts.extend(self.keywords.iter().map(|k| k.keyword.as_str()));
        parts.join("\n")
    }
}
