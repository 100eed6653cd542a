//! Human-readable violation report

use super::violation::Violation;
use std::fmt;

const RULE: &str = "====================================";

/// Violations found in one module, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    pub module: String,
    pub violations: Vec<Violation>,
}

impl LintReport {
    pub fn new(module: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            module: module.into(),
            violations,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.message.as_str())
    }
}

impl fmt::Display for LintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "        LINTER VIOLATION REPORT       ")?;
        writeln!(f, "  module: {}", self.module)?;
        writeln!(f, "{}", RULE)?;
        if self.is_clean() {
            writeln!(f, "  No violations found. Clean code!")?;
        } else {
            for (i, violation) in self.violations.iter().enumerate() {
                writeln!(f, " [{}] {}", i + 1, violation)?;
            }
        }
        writeln!(f, "{}", RULE)
    }
}
