//! Procedural statement checks

use super::analyzer::Linter;
use super::expr::ExprResult;
use super::state::Driver;
use super::violation::ViolationKind;
use crate::common::Span;
use crate::frontend::verilog::ast::{CaseArm, Expr, Stmt, StmtKind};

/// The always block a statement sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BlockContext {
    pub driver: Driver,
    /// Level-sensitive block (no edge in its sensitivity list)
    pub combinational: bool,
}

impl Linter {
    pub(super) fn analyze_stmt(&mut self, stmt: &Stmt, ctx: BlockContext) {
        match &stmt.kind {
            StmtKind::Assign { lhs, rhs, blocking } => {
                self.analyze_assign(lhs, rhs, *blocking, stmt.span, ctx);
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition_result = self.evaluate(condition);
                if condition_result.value == Some(0) {
                    self.report(
                        ViolationKind::UnreachableBlock,
                        "Unreachable Block: 'if' condition evaluates to false (0).",
                        condition.span,
                    );
                }
                if ctx.combinational && else_branch.is_none() {
                    self.report(
                        ViolationKind::InferredLatch,
                        "Infer Latch: 'if' statement without 'else' branch.",
                        stmt.span,
                    );
                }

                self.analyze_stmt(then_branch, ctx);
                if let Some(else_branch) = else_branch {
                    self.analyze_stmt(else_branch, ctx);
                }
            }
            StmtKind::Block(stmts) => {
                for stmt in stmts {
                    self.analyze_stmt(stmt, ctx);
                }
            }
            StmtKind::Case { expr, arms, default } => {
                self.analyze_case(expr, arms, default.as_deref(), stmt.span, ctx);
            }
        }
    }

    fn analyze_assign(
        &mut self,
        lhs: &Expr,
        rhs: &Expr,
        blocking: bool,
        span: Span,
        ctx: BlockContext,
    ) {
        let rhs_result = self.evaluate(rhs);

        if blocking && !ctx.combinational {
            self.report(
                ViolationKind::AssignmentStyle,
                format!(
                    "Blocking Assignment in Sequential Logic: '{}' assigned with '=' inside an edge-triggered block.",
                    lhs
                ),
                span,
            );
        } else if !blocking && ctx.combinational {
            self.report(
                ViolationKind::AssignmentStyle,
                format!(
                    "Non-Blocking Assignment in Combinational Logic: '{}' assigned with '<=' inside a combinational block.",
                    lhs
                ),
                span,
            );
        }

        self.check_assignment_target(lhs, rhs_result, ctx.driver, span);
    }

    fn analyze_case(
        &mut self,
        expr: &Expr,
        arms: &[CaseArm],
        default: Option<&Stmt>,
        span: Span,
        ctx: BlockContext,
    ) {
        self.evaluate(expr);

        match default {
            Some(default) => self.analyze_stmt(default, ctx),
            None => self.report(
                ViolationKind::NonFullCase,
                "Non Full/Parallel Case: 'case' missing 'default'.",
                span,
            ),
        }

        for arm in arms {
            if let Some(name) = arm.value.as_identifier() {
                self.state.mark_case_value_used(name);
            }
            self.analyze_stmt(&arm.body, ctx);
        }
    }

    /// Driver and width bookkeeping shared by procedural and continuous
    /// assignments. Only plain identifier targets are tracked.
    pub(super) fn check_assignment_target(
        &mut self,
        lhs: &Expr,
        rhs: ExprResult,
        driver: Driver,
        span: Span,
    ) {
        let Some(name) = lhs.as_identifier() else {
            return;
        };

        if self.state.record_write(name, driver) {
            self.report(
                ViolationKind::MultiDriven,
                format!("Multi-Driven Register: '{}' is driven by multiple blocks.", name),
                span,
            );
        }

        if let Some(target_width) = self.state.width(name) {
            if rhs.width > target_width {
                self.report(
                    ViolationKind::WidthMismatch,
                    format!(
                        "Structural Width Mismatch (Carry Overflow): Assigning a {}-bit mathematical result to a {}-bit register '{}'.",
                        rhs.width, target_width, name
                    ),
                    span,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::verilog::Parser;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<ViolationKind> {
        let module = Parser::new(source).unwrap().parse().unwrap().modules.remove(0);
        Linter::new()
            .analyze_module(&module)
            .into_iter()
            .map(|v| v.kind)
            .collect()
    }

    #[test]
    fn test_blocking_in_sequential_block() {
        let source = "module m(input clk, output reg q); always @(posedge clk) q = 1'b1; endmodule";

        assert_eq!(kinds(source), vec![ViolationKind::AssignmentStyle]);
    }

    #[test]
    fn test_non_blocking_in_combinational_block() {
        let source = "module m(input a, output reg q); always @(*) q <= a; endmodule";

        assert_eq!(kinds(source), vec![ViolationKind::AssignmentStyle]);
    }

    #[test]
    fn test_correct_styles_are_clean() {
        let source = "module m(input clk, input a, output reg q, output reg r);
            always @(posedge clk) q <= a;
            always @(a) r = a;
        endmodule";

        assert_eq!(kinds(source), vec![]);
    }

    #[test]
    fn test_if_without_else_in_combinational_block() {
        let source = "module m(input a, output reg q);
            always @(*) begin q = 1'b0; if (a) q = 1'b1; end
        endmodule";

        assert_eq!(kinds(source), vec![ViolationKind::InferredLatch]);
    }

    #[test]
    fn test_if_without_else_in_sequential_block_is_fine() {
        let source = "module m(input clk, input a, output reg q);
            always @(posedge clk) if (a) q <= 1'b1;
        endmodule";

        assert_eq!(kinds(source), vec![]);
    }

    #[test]
    fn test_false_condition_is_unreachable() {
        let source = "module m(input clk, output reg q);
            always @(posedge clk) if (1'b0) q <= 1'b1; else q <= 1'b0;
        endmodule";

        assert_eq!(kinds(source), vec![ViolationKind::UnreachableBlock]);
    }

    #[test]
    fn test_case_without_default() {
        let source = "module m(input [1:0] s, output reg q);
            always @(*) case (s) 2'd0: q = 1'b0; 2'd1: q = 1'b1; endcase
        endmodule";

        assert_eq!(kinds(source), vec![ViolationKind::NonFullCase]);
    }

    #[test]
    fn test_default_is_analyzed_before_arms() {
        let source = "module m(input clk, input [1:0] s, output reg q);
            always @(posedge clk) case (s)
                2'd0: q <= 1'b0;
                default: q = 1'b1;
            endcase
        endmodule";
        let module = Parser::new(source).unwrap().parse().unwrap().modules.remove(0);

        let violations = Linter::new().analyze_module(&module);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::AssignmentStyle);
        assert!(violations[0].message.contains("'q'"));
    }

    #[test]
    fn test_two_blocks_driving_one_register() {
        let source = "module m(input clk, input a, output reg q);
            always @(posedge clk) q <= a;
            always @(posedge clk) q <= 1'b0;
        endmodule";

        assert_eq!(kinds(source), vec![ViolationKind::MultiDriven]);
    }

    #[test]
    fn test_repeated_writes_in_one_block_are_fine() {
        let source = "module m(input clk, input a, output reg q);
            always @(posedge clk) begin q <= 1'b0; if (a) q <= 1'b1; end
        endmodule";

        assert_eq!(kinds(source), vec![]);
    }

    #[test]
    fn test_wider_result_than_target() {
        let source = "module m(input clk, input [7:0] a, input [7:0] b, output reg [7:0] s);
            always @(posedge clk) s <= a + b;
        endmodule";
        let module = Parser::new(source).unwrap().parse().unwrap().modules.remove(0);

        let violations = Linter::new().analyze_module(&module);

        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "Structural Width Mismatch (Carry Overflow): Assigning a 9-bit mathematical result to a 8-bit register 's'."
        );
    }

    #[test]
    fn test_select_targets_are_not_tracked() {
        let source = "module m(input clk, input [7:0] a, output reg [7:0] q);
            always @(posedge clk) q[3:0] <= a + a;
            always @(posedge clk) q[7:4] <= a;
        endmodule";

        // q is still reported as never driven by a whole-register write
        assert_eq!(kinds(source), vec![ViolationKind::UninitializedRegister]);
    }
}
