use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::posting::JobPosting;

/// Matched and missing terms for one posting vocabulary.
///
/// Both lists keep posting order, hold no duplicates and never share an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.missing.is_empty()
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Every vocabulary entry, matched ones first.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.matched
            .iter()
            .chain(self.missing.iter())
            .map(String::as_str)
    }
}

/// Output of the matcher for one resume/posting pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub keyword_match: u8,
    pub skills_match: u8,
    pub requirements_match: u8,
    pub keywords: MatchSet,
    pub skills: MatchSet,
    /// Requirement statements split by whether the resume covers them.
    #[serde(default)]
    pub requirements: MatchSet,
}

impl AnalysisResult {
    /// A perfect result has nothing left to suggest.
    pub fn is_perfect(&self) -> bool {
        self.score == 100 && !self.keywords.has_missing() && !self.skills.has_missing()
    }
}

/// Severity tier of a suggestion. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Critical,
    Important,
    Recommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub text: String,
    pub rationale: String,
}

impl Suggestion {
    pub fn new(
        category: SuggestionCategory,
        text: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            category,
            text: text.into(),
            rationale: rationale.into(),
        }
    }
}

/// The posting fields worth echoing back next to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingSummary {
    pub url: String,
    pub title: Option<String>,
    pub company: Option<String>,
}

/// Everything one successful pipeline run commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub suggestions: Vec<Suggestion>,
    pub posting: PostingSummary,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(result: AnalysisResult, suggestions: Vec<Suggestion>, posting: &JobPosting) -> Self {
        Self {
            result,
            suggestions,
            posting: posting.summary(),
            analyzed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(score: u8, missing_keywords: &[&str], missing_skills: &[&str]) -> AnalysisResult {
        AnalysisResult {
            score,
            keyword_match: score,
            skills_match: score,
            requirements_match: score,
            keywords: MatchSet {
                matched: vec!["Agile".to_string()],
                missing: missing_keywords.iter().map(|s| s.to_string()).collect(),
            },
            skills: MatchSet {
                matched: vec![],
                missing: missing_skills.iter().map(|s| s.to_string()).collect(),
            },
            requirements: MatchSet::default(),
        }
    }

    #[test]
    fn test_category_order_is_severity_order() {
        assert!(SuggestionCategory::Critical < SuggestionCategory::Important);
        assert!(SuggestionCategory::Important < SuggestionCategory::Recommendation);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&SuggestionCategory::Recommendation).unwrap();
        assert_eq!(json, r#""recommendation""#);
    }

    #[test]
    fn test_result_serializes_camel_case_sub_scores() {
        let value = serde_json::to_value(result_with(80, &[], &[])).unwrap();
        assert_eq!(value["keywordMatch"], 80);
        assert_eq!(value["skillsMatch"], 80);
        assert_eq!(value["requirementsMatch"], 80);
        assert_eq!(value["keywords"]["matched"][0], "Agile");
    }

    #[test]
    fn test_perfect_requires_full_score_and_no_gaps() {
        assert!(result_with(100, &[], &[]).is_perfect());
        assert!(!result_with(100, &["Scrum"], &[]).is_perfect());
        assert!(!result_with(100, &[], &["Jira"]).is_perfect());
        assert!(!result_with(99, &[], &[]).is_perfect());
    }

    #[test]
    fn test_vocabulary_chains_matched_then_missing() {
        let set = MatchSet {
            matched: vec!["a".to_string()],
            missing: vec!["b".to_string()],
        };
        assert_eq!(set.vocabulary().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
