// Plain value types shared by the pipeline stages and the HTTP layer.
// Nothing in here does I/O.

pub mod analysis;
pub mod posting;
pub mod resume;

pub use analysis::{AnalysisReport, AnalysisResult, MatchSet, Suggestion, SuggestionCategory};
pub use posting::{JobPosting, KeywordEntry, Requirement};
pub use resume::{DocumentKind, ResumeFile};
