//! Lint driver: source text in, per-module reports out

use log::{debug, info};

use crate::common::{DiagnosticReporter, LintResult};
use crate::frontend::VerilogFrontend;
use crate::lint::{LintReport, lint_module};

/// How violations reach the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Numbered banner report per module, printed by the caller
    #[default]
    Report,
    /// One source-annotated warning per violation, emitted while linting
    Diagnostics,
}

/// Lint run configuration
#[derive(Debug, Clone, Default)]
pub struct LintConfig {
    pub format: ReportFormat,
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub verbose: bool,
}

/// The file being linted and where its diagnostics go
pub struct SourceContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> SourceContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self {
            filename,
            file_id,
            reporter,
        }
    }
}

/// Parse `source` and lint every module in it, each with fresh analysis state
pub fn lint_source(
    source: &str,
    ctx: &SourceContext,
    config: &LintConfig,
) -> LintResult<Vec<LintReport>> {
    let file = VerilogFrontend::new().parse(source, ctx, config)?;

    let reports: Vec<LintReport> = file.modules.iter().map(lint_module).collect();

    if config.format == ReportFormat::Diagnostics {
        for violation in reports.iter().flat_map(|report| &report.violations) {
            ctx.reporter.report_violation(ctx.file_id, violation);
        }
    }

    if config.verbose {
        for report in &reports {
            info!(
                "module {}: {} violation(s)",
                report.module,
                report.violations.len()
            );
        }
    }

    debug!(
        "{}: {} module(s), {} violation(s)",
        ctx.filename,
        reports.len(),
        reports.iter().map(|r| r.violations.len()).sum::<usize>()
    );
    Ok(reports)
}
