//! Matcher: pluggable, trait-based comparison of resume text against a job posting.
//!
//! Default: `KeywordMatcher` (pure-Rust, deterministic, no I/O).
//!
//! `AppState` holds the matcher as `Arc<dyn Matcher>` inside the analysis pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::matching::normalize::{
    contains_all, is_numeric, phrase_key, terms, LabelForm, TextTokens, REQUIREMENT_FILLER,
};
use crate::matching::scoring::{compute_combined_score, Coverage, ScoringWeights};
use crate::matching::taxonomy::SkillsTaxonomy;
use crate::models::{AnalysisResult, JobPosting, KeywordEntry, MatchSet, Requirement};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsufficientDataError {
    #[error("resume text is empty")]
    EmptyResume,

    #[error("job posting has no usable requirements or keywords")]
    EmptyPosting,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The matcher trait. Implement this to swap backends without touching the
/// pipeline or the handlers.
pub trait Matcher: Send + Sync {
    fn analyze(
        &self,
        resume_text: &str,
        posting: &JobPosting,
    ) -> Result<AnalysisResult, InsufficientDataError>;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatcher: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Token-set matcher.
///
/// Algorithm:
/// 1. Normalize the resume into a token set (case-folded, stop words removed, stemmed)
/// 2. keywords: posting keyword vocabulary, present when all its tokens are in the set
/// 3. skills: taxonomy terms found in the posting, present when found in the resume
/// 4. requirements: statements whose constituent keywords are all in the set
/// 5. score = 0.4 × keyword + 0.3 × skills + 0.3 × requirements, rounded
pub struct KeywordMatcher {
    taxonomy: Arc<SkillsTaxonomy>,
    weights: ScoringWeights,
}

impl KeywordMatcher {
    pub fn new(taxonomy: Arc<SkillsTaxonomy>) -> Self {
        Self {
            taxonomy,
            weights: ScoringWeights::default(),
        }
    }
}

impl Matcher for KeywordMatcher {
    fn analyze(
        &self,
        resume_text: &str,
        posting: &JobPosting,
    ) -> Result<AnalysisResult, InsufficientDataError> {
        compute_match(resume_text, posting, &self.taxonomy, &self.weights)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core matching algorithm
// ────────────────────────────────────────────────────────────────────────────

fn compute_match(
    resume_text: &str,
    posting: &JobPosting,
    taxonomy: &SkillsTaxonomy,
    weights: &ScoringWeights,
) -> Result<AnalysisResult, InsufficientDataError> {
    let resume = TextTokens::new(resume_text);
    let resume_tokens = &resume.stems;
    if resume_tokens.is_empty() {
        return Err(InsufficientDataError::EmptyResume);
    }
    if posting.requirements.is_empty() && posting.keywords.is_empty() {
        return Err(InsufficientDataError::EmptyPosting);
    }

    let (keywords, keyword_coverage) = partition(
        keyword_vocabulary(&posting.keywords)
            .into_iter()
            .map(|(label, form)| {
                let present = resume.contains(&form);
                (label, present)
            }),
    );

    let posting_tokens = TextTokens::new(&posting.searchable_text()).stems;
    let (skills, skills_coverage) = partition(
        taxonomy
            .present_in(&posting_tokens)
            .into_iter()
            .map(|term| (term.name.clone(), term.is_present(resume_tokens))),
    );

    let (requirements, requirements_coverage) = partition(
        requirement_vocabulary(&posting.requirements)
            .into_iter()
            .map(|(label, tokens)| {
                let present = contains_all(resume_tokens, &tokens);
                (label, present)
            }),
    );

    let keyword_match = keyword_coverage.percent();
    let skills_match = skills_coverage.percent();
    let requirements_match = requirements_coverage.percent();

    let score = compute_combined_score(keyword_match, skills_match, requirements_match, weights)
        .ok_or(InsufficientDataError::EmptyPosting)?;

    Ok(AnalysisResult {
        score,
        // Nothing to match counts as nothing missing.
        keyword_match: keyword_match.unwrap_or(100),
        skills_match: skills_match.unwrap_or(100),
        requirements_match: requirements_match.unwrap_or(100),
        keywords,
        skills,
        requirements,
    })
}

/// Deduplicated posting keywords with their comparison form. First spelling
/// wins; labels without any words are dropped.
fn keyword_vocabulary(keywords: &[KeywordEntry]) -> Vec<(String, LabelForm)> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .filter_map(|entry| {
            let label = entry.keyword.trim();
            let form = LabelForm::of(label);
            if form.is_empty() || !seen.insert(form.key()) {
                return None;
            }
            Some((label.to_string(), form))
        })
        .collect()
}

/// Deduplicated requirement statements with their constituent keywords.
/// Statements with no constituent keywords left are skipped.
pub(crate) fn requirement_vocabulary(requirements: &[Requirement]) -> Vec<(String, Vec<String>)> {
    let mut seen = HashSet::new();
    requirements
        .iter()
        .filter_map(|requirement| {
            let label = requirement.text.trim();
            let tokens = requirement_constituents(label);
            if tokens.is_empty() || !seen.insert(phrase_key(label)) {
                return None;
            }
            Some((label.to_string(), tokens))
        })
        .collect()
}

/// Normalized keywords of a requirement statement, minus numbers and filler
/// words such as "experience" or "years".
pub(crate) fn requirement_constituents(text: &str) -> Vec<String> {
    terms(text, REQUIREMENT_FILLER)
        .into_iter()
        .map(|t| t.normalized)
        .filter(|token| !is_numeric(token))
        .collect()
}

/// Splits labelled presence flags into a match set, preserving input order.
fn partition(items: impl Iterator<Item = (String, bool)>) -> (MatchSet, Coverage) {
    let mut set = MatchSet::default();
    for (label, present) in items {
        if present {
            set.matched.push(label);
        } else {
            set.missing.push(label);
        }
    }
    let coverage = Coverage::new(set.matched.len(), set.matched.len() + set.missing.len());
    (set, coverage)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
