//! Suggestion Generator: turns matcher gaps into ordered, human-readable advice.
//!
//! Rule-based and pure. Missing items the posting stresses most become
//! `critical`, the rest `important`; formatting and quantification advice is
//! always `recommendation`.

use std::collections::HashMap;

use crate::matching::normalize::{count_occurrences, normalize, phrase_key, LabelForm};
use crate::matching::SkillsTaxonomy;
use crate::models::{AnalysisResult, JobPosting, MatchSet, Suggestion, SuggestionCategory};
use crate::suggestions::templates::*;

/// Items at or above this share of the top importance in their vocabulary are critical.
const CRITICAL_SHARE: f32 = 0.6;
/// Terms quoted in one rationale before the rest are summarized as "N more".
const MAX_LISTED_TERMS: usize = 4;
/// Requirement statements turned into suggestions, per tier.
const MAX_REQUIREMENT_SUGGESTIONS: usize = 3;
/// Requirements coverage below this asks the user to restructure.
const LOW_REQUIREMENTS_MATCH: u8 = 50;

/// Generates suggestions ordered critical → important → recommendation.
///
/// Returns an empty list only for a perfect result. `taxonomy` supplies the
/// aliases counted as mentions of a missing skill.
pub fn generate_suggestions(
    result: &AnalysisResult,
    posting: &JobPosting,
    taxonomy: &SkillsTaxonomy,
) -> Vec<Suggestion> {
    if result.is_perfect() {
        return Vec::new();
    }

    let mut suggestions = Vec::new();

    let keyword_weights = keyword_importance(posting);
    let keyword_tiers = split_by_importance(&result.keywords, |label| {
        keyword_weights
            .get(&LabelForm::of(label).key())
            .copied()
            .unwrap_or_default()
    });

    let posting_sequence = normalize(&posting.searchable_text());
    let skill_tiers = split_by_importance(&result.skills, |label| {
        let mentions = match taxonomy.find(label) {
            Some(term) => term.occurrences(&posting_sequence),
            None => count_occurrences(&posting_sequence, &normalize(label)),
        };
        mentions.max(1) as f32
    });

    let (unmet_required, unmet_preferred) = unmet_requirements(&result.requirements, posting);

    // Critical
    if !keyword_tiers.critical.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionCategory::Critical,
            MISSING_KEYWORDS_TEXT,
            MISSING_KEYWORDS_RATIONALE.replace("{terms}", &format_terms(&keyword_tiers.critical)),
        ));
    }
    if !skill_tiers.critical.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionCategory::Critical,
            CRITICAL_SKILLS_TEXT,
            CRITICAL_SKILLS_RATIONALE.replace("{terms}", &format_terms(&skill_tiers.critical)),
        ));
    }
    for requirement in unmet_required.iter().take(MAX_REQUIREMENT_SUGGESTIONS) {
        suggestions.push(Suggestion::new(
            SuggestionCategory::Critical,
            REQUIRED_TEXT.replace("{requirement}", requirement),
            REQUIRED_RATIONALE,
        ));
    }

    // Important
    if !keyword_tiers.important.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionCategory::Important,
            SECONDARY_KEYWORDS_TEXT,
            SECONDARY_KEYWORDS_RATIONALE
                .replace("{terms}", &format_terms(&keyword_tiers.important)),
        ));
    }
    if !skill_tiers.important.is_empty() {
        suggestions.push(Suggestion::new(
            SuggestionCategory::Important,
            SKILLS_SECTION_TEXT,
            SKILLS_SECTION_RATIONALE.replace("{terms}", &format_terms(&skill_tiers.important)),
        ));
    }
    for requirement in unmet_preferred.iter().take(MAX_REQUIREMENT_SUGGESTIONS) {
        suggestions.push(Suggestion::new(
            SuggestionCategory::Important,
            PREFERRED_TEXT.replace("{requirement}", requirement),
            PREFERRED_RATIONALE,
        ));
    }
    if !result.requirements.is_empty() && result.requirements_match < LOW_REQUIREMENTS_MATCH {
        let total = result.requirements.matched.len() + result.requirements.missing.len();
        suggestions.push(Suggestion::new(
            SuggestionCategory::Important,
            HIGHLIGHT_EXPERIENCE_TEXT,
            HIGHLIGHT_EXPERIENCE_RATIONALE
                .replace("{covered}", &result.requirements.matched.len().to_string())
                .replace("{total}", &total.to_string()),
        ));
    }

    // Recommendation
    suggestions.push(Suggestion::new(
        SuggestionCategory::Recommendation,
        QUANTIFY_TEXT,
        QUANTIFY_RATIONALE,
    ));
    suggestions.push(Suggestion::new(
        SuggestionCategory::Recommendation,
        SUMMARY_TEXT,
        SUMMARY_RATIONALE.replace("{role}", &describe_role(posting)),
    ));
    suggestions.push(Suggestion::new(
        SuggestionCategory::Recommendation,
        FORMAT_TEXT,
        FORMAT_RATIONALE,
    ));

    // Stable: keeps generation order inside each category.
    suggestions.sort_by_key(|s| s.category);
    suggestions
}

/// Missing items of one vocabulary, split into severity tiers.
#[derive(Debug, Default)]
struct Tiers {
    critical: Vec<String>,
    important: Vec<String>,
}

/// Splits `set.missing` by importance relative to the most important item of
/// the whole vocabulary. Each tier is ordered by descending importance.
fn split_by_importance(set: &MatchSet, importance: impl Fn(&str) -> f32) -> Tiers {
    let max = set
        .vocabulary()
        .map(&importance)
        .fold(0.0_f32, f32::max);
    let threshold = max * CRITICAL_SHARE;

    let mut ranked: Vec<(&String, f32)> = set
        .missing
        .iter()
        .map(|label| (label, importance(label.as_str())))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut tiers = Tiers::default();
    for (label, weight) in ranked {
        if weight >= threshold {
            tiers.critical.push(label.clone());
        } else {
            tiers.important.push(label.clone());
        }
    }
    tiers
}

/// Highest weighted score per normalized keyword.
fn keyword_importance(posting: &JobPosting) -> HashMap<String, f32> {
    let mut weights: HashMap<String, f32> = HashMap::new();
    for entry in &posting.keywords {
        let slot = weights.entry(LabelForm::of(&entry.keyword).key()).or_default();
        *slot = slot.max(entry.weighted_score);
    }
    weights
}

/// Missing requirement statements split into (required, preferred).
/// Statements not found in the posting are treated as required.
fn unmet_requirements<'a>(
    requirements: &'a MatchSet,
    posting: &JobPosting,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let preferred: HashMap<String, bool> = posting
        .requirements
        .iter()
        .map(|r| (phrase_key(&r.text), !r.is_required))
        .collect();

    requirements
        .missing
        .iter()
        .map(String::as_str)
        .partition(|text| !preferred.get(&phrase_key(text)).copied().unwrap_or(false))
}

/// Quotes terms as `"A", "B" and "C"`, summarizing anything past the limit.
fn format_terms(terms: &[String]) -> String {
    let quoted: Vec<String> = terms
        .iter()
        .take(MAX_LISTED_TERMS)
        .map(|t| format!("\"{t}\""))
        .collect();
    let rest = terms.len().saturating_sub(MAX_LISTED_TERMS);

    match (quoted.split_last(), rest) {
        (None, _) => String::new(),
        (Some((last, [])), 0) => last.clone(),
        (Some((last, init)), 0) => format!("{} and {last}", init.join(", ")),
        (Some(_), rest) => format!("{} and {rest} more", quoted.join(", ")),
    }
}

fn describe_role(posting: &JobPosting) -> String {
    match (posting.title.as_deref(), posting.company.as_deref()) {
        (Some(title), Some(company)) => format!("the {title} role at {company}"),
        (Some(title), None) => format!("the {title} role"),
        (None, Some(company)) => format!("this position at {company}"),
        (None, None) => "this position".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
