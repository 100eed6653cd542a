//! Static analysis of parsed Verilog modules
//!
//! Each module is analyzed on its own with fresh tables; violations are
//! collected in discovery order and never abort the analysis.

mod analyzer;
mod expr;
mod number;
mod report;
mod state;
mod stmt;
mod violation;

pub use analyzer::Linter;
pub use expr::ExprResult;
pub use number::{ConstantValue, DEFAULT_WIDTH, parse_number};
pub use report::LintReport;
pub use state::{Driver, LintState};
pub use violation::{Violation, ViolationKind};

use crate::frontend::verilog::ast::Module;

/// Analyze one module and package the result
pub fn lint_module(module: &Module) -> LintReport {
    LintReport::new(module.name.clone(), Linter::new().analyze_module(module))
}
