// Suggestion generation from match gaps.

pub mod generator;
pub mod templates;

pub use generator::generate_suggestions;
