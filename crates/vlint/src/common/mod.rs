//! Common infrastructure shared by the frontend, the linter and the driver

mod error;
mod span;

pub use error::{DiagnosticReporter, LintError, LintResult};
pub use span::Span;
