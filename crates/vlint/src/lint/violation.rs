//! Design violations found by the linter

use crate::common::Span;
use std::fmt;

/// Kinds of design problems the linter reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// `=` in edge-triggered logic, or `<=` in combinational logic
    AssignmentStyle,
    /// One register written from more than one block
    MultiDriven,
    /// Right-hand side wider than the register it is assigned to
    WidthMismatch,
    /// Folded constant addition exceeding its operand width
    ConstantOverflow,
    /// `if` without `else` in combinational logic
    InferredLatch,
    /// `if` whose condition folds to zero
    UnreachableBlock,
    /// `case` without `default`
    NonFullCase,
    /// State parameter never matched by any case arm
    UnreachableState,
    /// Register declared but never written
    UninitializedRegister,
}

impl ViolationKind {
    pub fn code(self) -> &'static str {
        match self {
            ViolationKind::AssignmentStyle => "VL001",
            ViolationKind::MultiDriven => "VL002",
            ViolationKind::WidthMismatch => "VL003",
            ViolationKind::ConstantOverflow => "VL004",
            ViolationKind::InferredLatch => "VL005",
            ViolationKind::UnreachableBlock => "VL006",
            ViolationKind::NonFullCase => "VL007",
            ViolationKind::UnreachableState => "VL008",
            ViolationKind::UninitializedRegister => "VL009",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViolationKind::AssignmentStyle => "assignment style does not match block kind",
            ViolationKind::MultiDriven => "register driven by multiple blocks",
            ViolationKind::WidthMismatch => "assignment wider than target register",
            ViolationKind::ConstantOverflow => "constant arithmetic overflow",
            ViolationKind::InferredLatch => "latch inferred in combinational logic",
            ViolationKind::UnreachableBlock => "unreachable block",
            ViolationKind::NonFullCase => "case statement without default",
            ViolationKind::UnreachableState => "unreachable FSM state",
            ViolationKind::UninitializedRegister => "register never driven",
        }
    }
}

/// One reported problem; its `Display` form is the report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub span: Span,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
