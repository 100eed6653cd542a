//! Expression evaluation: bit-width inference and constant folding

use super::analyzer::Linter;
use super::number::{DEFAULT_WIDTH, parse_number};
use super::violation::ViolationKind;
use crate::common::Span;
use crate::frontend::verilog::ast::{BinaryOp, BitRange, Expr, ExprKind};

/// Width of an expression, and its value when it folds to a constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprResult {
    pub value: Option<u64>,
    pub width: u32,
}

impl ExprResult {
    pub fn constant(value: u64, width: u32) -> Self {
        Self { value: Some(value), width }
    }

    pub fn unknown(width: u32) -> Self {
        Self { value: None, width }
    }
}

/// All-ones mask of `width` bits
fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Width of a `[msb:lsb]` range; descending and ascending ranges alike
fn range_span(msb: u64, lsb: u64) -> u32 {
    u32::try_from(msb.abs_diff(lsb).saturating_add(1)).unwrap_or(u32::MAX)
}

impl Linter {
    /// Infer the width of `expr` and fold it when possible. Never changes the
    /// tables; may report constant overflow.
    pub(super) fn evaluate(&mut self, expr: &Expr) -> ExprResult {
        match &expr.kind {
            ExprKind::Identifier(name) => {
                if let Some(value) = self.state.parameter_value(name) {
                    ExprResult::constant(value, DEFAULT_WIDTH)
                } else if let Some(width) = self.state.width(name) {
                    ExprResult::unknown(width)
                } else {
                    ExprResult::unknown(DEFAULT_WIDTH)
                }
            }
            ExprKind::Number(text) => match parse_number(text) {
                Some(constant) => ExprResult::constant(constant.value, constant.width),
                None => ExprResult::unknown(DEFAULT_WIDTH),
            },
            ExprKind::Binary { op, left, right } => self.evaluate_binary(*op, left, right, expr.span),
            ExprKind::Select { msb, lsb, .. } => {
                let msb = self.evaluate(msb);
                let width = match lsb {
                    None => 1,
                    Some(lsb) => match (msb.value, self.evaluate(lsb).value) {
                        (Some(msb), Some(lsb)) => range_span(msb, lsb),
                        _ => 1,
                    },
                };
                ExprResult::unknown(width)
            }
        }
    }

    fn evaluate_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> ExprResult {
        let left = self.evaluate(left);
        let right = self.evaluate(right);

        let operand_width = left.width.max(right.width);
        let result_width = match op {
            // Carry or borrow out
            BinaryOp::Add | BinaryOp::Sub => operand_width.saturating_add(1),
            BinaryOp::Mul => left.width.saturating_add(right.width),
            BinaryOp::Shl | BinaryOp::Shr => left.width,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Ge
            | BinaryOp::Le
            | BinaryOp::LogicalAnd
            | BinaryOp::LogicalOr => 1,
            _ => operand_width,
        };

        let (Some(a), Some(b)) = (left.value, right.value) else {
            return ExprResult::unknown(result_width);
        };

        match op {
            BinaryOp::Add => {
                let overflows = mask(operand_width)
                    .checked_sub(b)
                    .is_none_or(|headroom| a > headroom);
                if overflows {
                    self.report(
                        ViolationKind::ConstantOverflow,
                        format!("Constant Math Overflow: {} + {}", a, b),
                        span,
                    );
                }
                ExprResult::constant(a.wrapping_add(b) & mask(result_width), result_width)
            }
            // Wraps like the two's-complement hardware does
            BinaryOp::Sub => {
                ExprResult::constant(a.wrapping_sub(b) & mask(result_width), result_width)
            }
            _ => ExprResult::unknown(result_width),
        }
    }

    /// Width declared by an optional `[msb:lsb]`; scalar when absent or not constant
    pub(super) fn range_width(&mut self, range: Option<&BitRange>) -> u32 {
        let Some(range) = range else {
            return 1;
        };
        let msb = self.evaluate(&range.msb);
        let lsb = self.evaluate(&range.lsb);
        match (msb.value, lsb.value) {
            (Some(msb), Some(lsb)) => range_span(msb, lsb),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::verilog::Parser;
    use crate::frontend::verilog::ast::ModuleItem;
    use crate::lint::Violation;

    /// Evaluate the right-hand side of the first continuous assignment in
    /// `module m(...); <body> endmodule`, after seeding the tables
    fn eval_in(ports: &str, body: &str) -> (ExprResult, Vec<Violation>) {
        let source = format!("module m({}); {} endmodule", ports, body);
        let module = Parser::new(&source).unwrap().parse().unwrap().modules.remove(0);

        let mut linter = Linter::new();
        linter.seed_declarations(&module);
        let rhs = module
            .items
            .iter()
            .find_map(|item| match item {
                ModuleItem::Assign(assign) => Some(&assign.rhs),
                _ => None,
            })
            .unwrap();
        let result = linter.evaluate(rhs);
        (result, linter.into_violations())
    }

    fn eval(expr: &str) -> ExprResult {
        eval_in("input [7:0] a, b", &format!("assign y = {};", expr)).0
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(eval("a"), ExprResult::unknown(8));
        assert_eq!(eval("nowhere"), ExprResult::unknown(32));

        let (result, _) = eval_in("input a", "parameter P = 5; assign y = P;");
        assert_eq!(result, ExprResult::constant(5, 32));
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("8'hFF"), ExprResult::constant(255, 8));
        assert_eq!(eval("4'b10x0"), ExprResult::unknown(32));
    }

    #[test]
    fn test_add_and_sub_widen_by_one() {
        assert_eq!(eval("a + b"), ExprResult::unknown(9));
        assert_eq!(eval("a - 4'd1"), ExprResult::unknown(9));
        assert_eq!(eval("8'd3 + 8'd4"), ExprResult::constant(7, 9));
    }

    #[test]
    fn test_subtraction_wraps_to_result_width() {
        assert_eq!(eval("4'd1 - 4'd2"), ExprResult::constant(0b11111, 5));
    }

    #[test]
    fn test_multiplication_sums_widths() {
        assert_eq!(eval("a * 4'd3"), ExprResult::unknown(12));
        // Not folded
        assert_eq!(eval("8'd2 * 8'd3"), ExprResult::unknown(16));
    }

    #[test]
    fn test_shifts_keep_left_width() {
        assert_eq!(eval("a << 16'd2"), ExprResult::unknown(8));
        assert_eq!(eval("4'd1 >> a"), ExprResult::unknown(4));
    }

    #[test]
    fn test_comparisons_and_logic_are_one_bit() {
        for op in ["==", "!=", ">=", "<=", "&&", "||"] {
            assert_eq!(eval(&format!("a {} b", op)).width, 1, "operator {}", op);
        }
        assert_eq!(eval("8'd1 == 8'd1"), ExprResult::unknown(1));
    }

    #[test]
    fn test_other_operators_keep_operand_width() {
        assert_eq!(eval("a & 16'd1"), ExprResult::unknown(16));
        assert_eq!(eval("a < b"), ExprResult::unknown(8));
    }

    #[test]
    fn test_constant_overflow_is_reported_and_still_folded() {
        let (result, violations) = eval_in("input a", "assign y = 8'hFF + 8'h01;");

        assert_eq!(result, ExprResult::constant(256, 9));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ConstantOverflow);
        assert_eq!(violations[0].message, "Constant Math Overflow: 255 + 1");
    }

    #[test]
    fn test_addend_wider_than_its_width_overflows() {
        let (_, violations) = eval_in("input a", "assign y = 4'd1 + 4'hFF;");

        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_sum_within_range_does_not_overflow() {
        let (_, violations) = eval_in("input a", "assign y = 8'd200 + 8'd55;");

        assert!(violations.is_empty());
    }

    #[test]
    fn test_wide_operands_use_full_mask() {
        let (result, violations) = eval_in("input a", "assign y = 64'd5 - 64'd6;");

        assert_eq!(result, ExprResult::constant(u64::MAX, 65));
        assert!(violations.is_empty());
    }

    #[test]
    fn test_selects() {
        assert_eq!(eval("a[3]"), ExprResult::unknown(1));
        assert_eq!(eval("a[7:4]"), ExprResult::unknown(4));
        assert_eq!(eval("a[b:0]"), ExprResult::unknown(1));
    }

    #[test]
    fn test_mask_guards_large_widths() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(8), 0xFF);
        assert_eq!(mask(64), u64::MAX);
        assert_eq!(mask(200), u64::MAX);
    }
}
