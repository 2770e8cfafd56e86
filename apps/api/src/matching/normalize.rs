//! Text normalization shared by the matcher, the posting parser and the
//! suggestion generator: case folding, tokenization, stop-word removal and
//! Snowball stemming.

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "d", "did", "do", "does", "doing", "down", "during", "e.g",
    "each", "etc", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "i", "i.e", "if", "in", "into",
    "is", "it", "its", "itself", "just", "ll", "m", "may", "me", "might", "more", "most", "must",
    "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "re", "s", "same", "shall", "she",
    "should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "us", "ve", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "within", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Words that pad requirement statements without naming anything a resume
/// could demonstrate.
pub const REQUIREMENT_FILLER: &[&str] = &[
    "ability", "able", "demonstrated", "excellent", "experience", "experienced", "familiar",
    "familiarity", "good", "great", "hands-on", "knowledge", "least", "minimum", "plus",
    "preferred", "proficiency", "proficient", "proven", "required", "skill", "skills", "solid",
    "strong", "understanding", "work", "working", "year", "years",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// True when a token carries no letters (`5`, `5+`, `2019`).
pub fn is_numeric(token: &str) -> bool {
    !token.chars().any(char::is_alphabetic)
}

/// Splits text into lowercase words.
///
/// `+` and `#` stay attached to a word (`c++`, `c#`) and `.` is kept only
/// between alphanumerics (`node.js`), so trailing sentence periods drop off.
pub fn split_words(text: &str) -> Vec<String> {
    split_raw(text).into_iter().map(|w| w.to_lowercase()).collect()
}

/// Word splitting behind [`split_words`], with the original case kept.
fn split_raw(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let keep = c.is_alphanumeric()
            || ((c == '+' || c == '#') && !current.is_empty())
            || (c == '.'
                && !current.is_empty()
                && chars.get(i + 1).is_some_and(|next| next.is_alphanumeric()));

        if keep {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Words of a text as written: acronyms (`IT`, `QA`) keep their case,
/// everything else is case-folded.
pub fn literal_words(text: &str) -> Vec<String> {
    split_raw(text)
        .into_iter()
        .map(|word| if is_acronym(&word) { word } else { word.to_lowercase() })
        .collect()
}

fn is_acronym(word: &str) -> bool {
    word.chars().filter(|c| c.is_alphabetic()).count() >= 2 && !word.chars().any(char::is_lowercase)
}

/// A raw word paired with its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub raw: String,
    pub normalized: String,
}

/// Tokenizes and normalizes text, keeping word order and duplicates.
/// Words listed in `extra_stop` are dropped alongside the stop words.
pub fn terms(text: &str, extra_stop: &[&str]) -> Vec<Term> {
    let stemmer = Stemmer::create(Algorithm::English);
    split_words(text)
        .into_iter()
        .filter(|word| !is_stop_word(word) && !extra_stop.contains(&word.as_str()))
        .map(|raw| {
            let normalized = if raw.chars().all(char::is_alphabetic) {
                stemmer.stem(&raw).into_owned()
            } else {
                raw.clone()
            };
            Term { raw, normalized }
        })
        .collect()
}

/// Normalized tokens in text order.
pub fn normalize(text: &str) -> Vec<String> {
    terms(text, &[]).into_iter().map(|t| t.normalized).collect()
}

/// Set of normalized tokens present in the text.
pub fn token_set(text: &str) -> HashSet<String> {
    normalize(text).into_iter().collect()
}

/// Stable key identifying a phrase regardless of case, inflection or stop words.
pub fn phrase_key(text: &str) -> String {
    normalize(text).join(" ")
}

/// How a vocabulary label is compared against other text.
///
/// Labels compare on their stemmed content tokens. A label made only of stop
/// words (`IT`, `A/B`) has none left, so it compares on its literal words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelForm {
    Stemmed(Vec<String>),
    Literal(Vec<String>),
}

impl LabelForm {
    pub fn of(label: &str) -> Self {
        let stemmed = normalize(label);
        if stemmed.is_empty() {
            LabelForm::Literal(literal_words(label))
        } else {
            LabelForm::Stemmed(stemmed)
        }
    }

    pub fn tokens(&self) -> &[String] {
        match self {
            LabelForm::Stemmed(tokens) | LabelForm::Literal(tokens) => tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, LabelForm::Literal(_))
    }

    /// Deduplication key. Literal keys are marked so they never equal a stem key.
    pub fn key(&self) -> String {
        match self {
            LabelForm::Stemmed(tokens) => tokens.join(" "),
            LabelForm::Literal(tokens) => format!("={}", tokens.join(" ")),
        }
    }
}

/// Stemmed and literal word sets of one text.
#[derive(Debug, Clone, Default)]
pub struct TextTokens {
    pub stems: HashSet<String>,
    pub literal: HashSet<String>,
}

impl TextTokens {
    pub fn new(text: &str) -> Self {
        Self {
            stems: token_set(text),
            literal: literal_words(text).into_iter().collect(),
        }
    }

    /// True when every token of the label is in the matching set.
    pub fn contains(&self, form: &LabelForm) -> bool {
        match form {
            LabelForm::Stemmed(tokens) => contains_all(&self.stems, tokens),
            LabelForm::Literal(tokens) => contains_all(&self.literal, tokens),
        }
    }
}

/// True when every token is present. An empty token list is never contained.
pub fn contains_all(set: &HashSet<String>, tokens: &[String]) -> bool {
    !tokens.is_empty() && tokens.iter().all(|t| set.contains(t))
}

/// Counts contiguous occurrences of `needle` inside `haystack`.
pub fn count_occurrences(haystack: &[String], needle: &[String]) -> usize {
    if needle.is_empty() || needle.len() > haystack.len() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
