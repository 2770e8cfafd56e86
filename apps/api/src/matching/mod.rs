// Resume ↔ posting matching.
// Pure code only: no I/O, no randomness, same inputs give the same result.

pub mod matcher;
pub mod normalize;
pub mod scoring;
pub mod taxonomy;

pub use matcher::{InsufficientDataError, KeywordMatcher, Matcher};
pub use taxonomy::SkillsTaxonomy;
