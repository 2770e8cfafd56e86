//! Keyword inventory: the weighted vocabulary a resume is scored against.
//!
//! Candidates come from four places: taxonomy skills mentioned in the posting,
//! capitalized multi-word phrases, acronyms, and content words repeated at
//! least twice. Each keeps its first-seen spelling.
//!
//! `frequency` counts mentions across the posting, `position_weight` is the
//! highest section weight the keyword appears under (title 1.0, requirements
//! 0.8, preferred 0.7, responsibilities 0.6, other 0.5, about 0.3), and
//! `weighted_score = frequency * position_weight`.

use std::collections::{HashMap, HashSet};

use crate::matching::normalize::{
    count_occurrences, is_stop_word, literal_words, normalize, phrase_key, terms, token_set,
    LabelForm, REQUIREMENT_FILLER,
};
use crate::matching::SkillsTaxonomy;
use crate::models::KeywordEntry;
use crate::posting::html::LineKind;
use crate::posting::sections::{Section, SectionedLine, TITLE_WEIGHT};

/// Keywords kept per posting, highest weighted score first.
pub const MAX_KEYWORDS: usize = 25;
const MIN_REPEATS: usize = 2;
const MIN_PHRASE_WORDS: usize = 2;
const MAX_PHRASE_WORDS: usize = 4;
const MIN_WORD_LEN: usize = 3;

const IGNORED_ACRONYMS: &[&str] = &["US", "USA", "UK", "EU", "EEO", "EOE", "LLC", "INC", "LTD"];

/// Everything the inventory is built from.
pub struct KeywordSources<'a> {
    pub title: Option<&'a str>,
    pub company: Option<&'a str>,
    pub lines: &'a [SectionedLine],
    /// Skills the page declares explicitly (JSON-LD `skills`).
    pub declared_skills: &'a [String],
    pub taxonomy: &'a SkillsTaxonomy,
}

/// A weighted block of posting text.
struct Unit<'a> {
    text: &'a str,
    weight: f32,
    tokens: Vec<String>,
    literal: Vec<String>,
}

struct Candidate {
    label: String,
    forms: Vec<Vec<String>>,
    /// Forms are literal words rather than stems.
    literal: bool,
    declared: bool,
}

#[derive(Default)]
struct Candidates {
    list: Vec<Candidate>,
    keys: HashSet<String>,
}

impl Candidates {
    fn add(&mut self, label: &str, forms: Vec<Vec<String>>, declared: bool) {
        let candidate = Candidate {
            label: label.to_string(),
            forms,
            literal: false,
            declared,
        };
        self.push(phrase_key(label), candidate);
    }

    fn add_phrase(&mut self, label: &str, declared: bool) {
        match LabelForm::of(label) {
            LabelForm::Stemmed(form) => self.add(label, vec![form], declared),
            // "IT" and the like: nothing survives stemming, count the literal words.
            form @ LabelForm::Literal(_) => {
                let candidate = Candidate {
                    label: label.to_string(),
                    forms: vec![form.tokens().to_vec()],
                    literal: true,
                    declared,
                };
                self.push(form.key(), candidate);
            }
        }
    }

    fn push(&mut self, key: String, mut candidate: Candidate) {
        candidate.forms.retain(|f| !f.is_empty());
        if key.is_empty() || candidate.forms.is_empty() || !self.keys.insert(key) {
            return;
        }
        self.list.push(candidate);
    }

    /// True when a single token is already a whole form of some candidate.
    fn has_exact_form(&self, token: &str) -> bool {
        self.list
            .iter()
            .flat_map(|c| c.forms.iter())
            .any(|form| form.len() == 1 && form[0] == token)
    }

    /// True when a token appears inside any candidate form.
    fn covers(&self, token: &str) -> bool {
        self.list
            .iter()
            .flat_map(|c| c.forms.iter())
            .any(|form| form.iter().any(|t| t == token))
    }
}

/// Builds the posting's keyword inventory, capped at [`MAX_KEYWORDS`].
pub fn build_keyword_inventory(sources: &KeywordSources<'_>) -> Vec<KeywordEntry> {
    let units = weighted_units(sources);
    let mut candidates = Candidates::default();

    for unit in &units {
        let unit_tokens: HashSet<String> = unit.tokens.iter().cloned().collect();
        for skill in sources.taxonomy.present_in(&unit_tokens) {
            candidates.add(&skill.name, skill.forms().to_vec(), false);
        }
        for phrase in capitalized_phrases(unit.text) {
            candidates.add_phrase(&phrase, false);
        }
        for acronym in acronyms(unit.text) {
            if !candidates.has_exact_form(&phrase_key(&acronym)) {
                candidates.add_phrase(&acronym, false);
            }
        }
    }

    for skill in sources.declared_skills {
        candidates.add_phrase(skill, true);
    }

    for word in repeated_words(&units) {
        if !candidates.covers(&phrase_key(&word)) {
            candidates.add_phrase(&word, false);
        }
    }

    let company_tokens = sources.company.map(token_set).unwrap_or_default();
    let about_weight = Section::About.weight();

    let mut entries: Vec<KeywordEntry> = candidates
        .list
        .into_iter()
        .filter(|c| !is_company_name(c, &company_tokens))
        .filter_map(|c| {
            let (frequency, weight) = frequency_and_weight(&c, &units);
            let weight = match weight {
                Some(w) => w,
                None if c.declared => Section::Requirements.weight(),
                None => return None,
            };
            // Keywords seen only in the about/benefits blurb describe the employer.
            if weight <= about_weight && !c.declared {
                return None;
            }
            Some(KeywordEntry::new(c.label, frequency.max(1), weight))
        })
        .collect();

    // Stable: ties keep first-seen order.
    entries.sort_by(|a, b| {
        b.weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(MAX_KEYWORDS);
    entries
}

fn weighted_units<'a>(sources: &KeywordSources<'a>) -> Vec<Unit<'a>> {
    let title = sources.title.map(|text| (text, TITLE_WEIGHT));
    let body = sources
        .lines
        .iter()
        .filter(|line| line.kind != LineKind::Heading)
        .map(|line| (line.text.as_str(), line.section.weight()));

    title
        .into_iter()
        .chain(body)
        .map(|(text, weight)| Unit {
            text,
            weight,
            tokens: normalize(text),
            literal: literal_words(text),
        })
        .collect()
}

/// Total mentions and the highest weight among units mentioning the candidate.
fn frequency_and_weight(candidate: &Candidate, units: &[Unit<'_>]) -> (u32, Option<f32>) {
    let mut frequency = 0usize;
    let mut weight: Option<f32> = None;
    for unit in units {
        let sequence = if candidate.literal {
            &unit.literal
        } else {
            &unit.tokens
        };
        // Max, not sum: a name and its alias often cover the same words.
        let count = candidate
            .forms
            .iter()
            .map(|form| count_occurrences(sequence, form))
            .max()
            .unwrap_or(0);
        if count > 0 {
            frequency += count;
            weight = Some(weight.map_or(unit.weight, |w| w.max(unit.weight)));
        }
    }
    (u32::try_from(frequency).unwrap_or(u32::MAX), weight)
}

fn is_company_name(candidate: &Candidate, company_tokens: &HashSet<String>) -> bool {
    !company_tokens.is_empty()
        && candidate
            .forms
            .iter()
            .all(|form| form.iter().all(|t| company_tokens.contains(t)))
}

fn strip_word(raw: &str) -> &str {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase) && !is_stop_word(&word.to_lowercase())
}

/// Runs of 2-4 capitalized words not broken by punctuation.
///
/// A sentence-initial word only counts when the whole line is title case,
/// so "Lead Agile ceremonies" yields nothing while "Stakeholder Management"
/// is kept.
fn capitalized_phrases(text: &str) -> Vec<String> {
    let raw_words: Vec<&str> = text.split_whitespace().collect();
    let title_case = raw_words
        .iter()
        .map(|w| strip_word(w))
        .filter(|w| !w.is_empty() && !is_stop_word(&w.to_lowercase()))
        .all(is_capitalized);

    let mut phrases = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut sentence_start = true;

    let mut flush = |run: &mut Vec<&str>| {
        if (MIN_PHRASE_WORDS..=MAX_PHRASE_WORDS).contains(&run.len()) {
            phrases.push(run.join(" "));
        }
        run.clear();
    };

    for raw in raw_words {
        let word = strip_word(raw);
        let starts_sentence = sentence_start;
        sentence_start = raw.ends_with(['.', '!', '?', ':']);

        if word.is_empty() || !is_capitalized(word) || (starts_sentence && !title_case) {
            flush(&mut run);
        } else {
            run.push(word);
        }
        if raw.ends_with([',', ';', ':', '.', '!', '?', ')']) || raw.starts_with('(') {
            flush(&mut run);
        }
    }
    flush(&mut run);
    phrases
}

/// Upper-case tokens such as `AWS`, `PMP` or `SQL`.
fn acronyms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| {
            (2..=6).contains(&word.len())
                && word.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                && word.chars().filter(char::is_ascii_uppercase).count() >= 2
                && !IGNORED_ACRONYMS.contains(word)
        })
        .map(str::to_string)
        .collect()
}

/// Content words mentioned at least twice, first-seen spelling, in order.
fn repeated_words(units: &[Unit<'_>]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<(String, String)> = Vec::new();

    for unit in units {
        for term in terms(unit.text, REQUIREMENT_FILLER) {
            if term.raw.chars().count() < MIN_WORD_LEN || !term.raw.chars().all(char::is_alphabetic)
            {
                continue;
            }
            let count = counts.entry(term.normalized.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push((term.normalized, term.raw));
            }
            *count += 1;
        }
    }

    first_seen
        .into_iter()
        .filter(|(key, _)| counts.get(key).copied().unwrap_or(0) >= MIN_REPEATS)
        .map(|(_, raw)| raw)
        .collect()
}
