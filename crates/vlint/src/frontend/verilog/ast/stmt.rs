//! Statement AST nodes

use super::Expr;
use crate::common::Span;

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Procedural assignment: `lhs = rhs;` (blocking) or `lhs <= rhs;`
    Assign {
        lhs: Expr,
        rhs: Expr,
        blocking: bool,
    },

    /// If statement: if (cond) then [else else]
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// Sequential block: begin ... end
    Block(Vec<Stmt>),

    /// Case statement: case (expr) arms [default] endcase
    Case {
        expr: Expr,
        arms: Vec<CaseArm>,
        default: Option<Box<Stmt>>,
    },
}

/// One `value : statement` arm of a case statement
#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    pub value: Expr,
    pub body: Stmt,
}

impl CaseArm {
    pub fn new(value: Expr, body: Stmt) -> Self {
        Self { value, body }
    }
}
