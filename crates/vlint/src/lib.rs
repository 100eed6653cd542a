//! vlint - static linter for synthesizable Verilog
//!
//! Reads a Verilog source file, builds a syntax tree for each module and
//! runs rule-based checks over it, reporting design problems such as
//! multi-driven registers, width overflows, inferred latches, incomplete
//! case statements and unreachable FSM states.
//!
//! ## Architecture
//!
//! The linter is organized into:
//! - **Frontend** (`frontend/`): Verilog lexing and parsing
//! - **Lint** (`lint/`): Width inference, constant folding and the checks
//! - **Driver** (`driver/`): Per-file pipeline and configuration
//! - **Common** (`common/`): Shared infrastructure (errors, spans, diagnostics)

pub mod common;
pub mod driver;
pub mod frontend;
pub mod lint;

// Re-exports for convenience
pub use common::{DiagnosticReporter, LintError, LintResult, Span};
pub use driver::{LintConfig, ReportFormat, SourceContext, lint_source};
pub use lint::{LintReport, Linter, Violation, ViolationKind};
