//! Module-level declarations

use super::{Expr, Stmt};
use crate::common::Span;

/// A `module ... endmodule` definition, the unit of analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub ports: Vec<Port>,
    pub items: Vec<ModuleItem>,
    pub span: Span,
}

/// `parameter NAME = value`, from the header list or the module body
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
    Inout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub direction: PortDirection,
    pub is_reg: bool,
    pub range: Option<BitRange>,
    pub name: String,
    pub span: Span,
}

/// Declared `[msb:lsb]` range
#[derive(Debug, Clone, PartialEq)]
pub struct BitRange {
    pub msb: Expr,
    pub lsb: Expr,
}

/// Items allowed in a module body
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleItem {
    Always(AlwaysBlock),
    Signal(SignalDecl),
    Assign(ContinuousAssign),
}

/// Edge qualifier of a sensitivity list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    None,
    Posedge,
    Negedge,
}

/// One entry of `@( ... )`; `@*` and `@(*)` become a single `*` entry
#[derive(Debug, Clone, PartialEq)]
pub struct Sensitivity {
    pub edge: Edge,
    pub signal: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlwaysBlock {
    pub sensitivity: Vec<Sensitivity>,
    pub body: Stmt,
    pub span: Span,
}

impl AlwaysBlock {
    /// True when no entry of the sensitivity list is edge-triggered
    pub fn is_combinational(&self) -> bool {
        self.sensitivity.iter().all(|s| s.edge == Edge::None)
    }
}

/// `reg [7:0] a, b;` or `wire c;` inside the module body
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDecl {
    pub is_reg: bool,
    pub range: Option<BitRange>,
    pub names: Vec<(String, Span)>,
    pub span: Span,
}

/// `assign lhs = rhs;`
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousAssign {
    pub lhs: Expr,
    pub rhs: Expr,
    pub span: Span,
}
