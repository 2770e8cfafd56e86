//! Analysis orchestration: input validation, the extract → fetch → match →
//! suggest pipeline, per-user sessions and their HTTP handlers.

pub mod errors;
pub mod handlers;
pub mod pipeline;
pub mod session;
pub mod validation;

#[cfg(test)]
pub(crate) mod fakes;

pub use errors::{AnalysisError, ErrorKind, ValidationError};
pub use pipeline::AnalysisPipeline;
pub use session::{spawn_session_sweeper, SessionStore};
