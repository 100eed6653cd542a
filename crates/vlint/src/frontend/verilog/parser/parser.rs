//! Recursive descent parser for the supported Verilog subset

use crate::common::{LintError, LintResult, Span};
use crate::frontend::verilog::ast::*;
use crate::frontend::verilog::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for Verilog modules
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> LintResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse every module in the source
    pub fn parse(&mut self) -> LintResult<SourceFile> {
        let mut modules = Vec::new();

        while !self.at_end() {
            modules.push(self.parse_module()?);
        }

        if modules.is_empty() {
            return Err(LintError::parser("no module definition found", self.current.span));
        }

        Ok(SourceFile::new(modules))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> LintResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> LintResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> LintResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_identifier(&mut self) -> LintResult<(String, Span)> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let span = self.advance()?.span;
            Ok((name, span))
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    fn unexpected(&self, expected: &str) -> LintError {
        LintError::parser(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.span,
        )
    }

    // =========================================================================
    // Module structure
    // =========================================================================

    fn parse_module(&mut self) -> LintResult<Module> {
        let start = self.expect(TokenKind::Module)?.span;
        let (name, _) = self.expect_identifier()?;

        // #(parameter WIDTH = 8, DEPTH = 4)
        let mut parameters = Vec::new();
        if self.match_token(&TokenKind::Hash)? {
            self.expect(TokenKind::LParen)?;
            if !self.check(&TokenKind::RParen) {
                loop {
                    self.match_token(&TokenKind::Parameter)?;
                    parameters.push(self.parse_parameter_assignment()?);
                    if !self.match_token(&TokenKind::Comma)? {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        // (input clk, output reg [7:0] q)
        let mut ports: Vec<Port> = Vec::new();
        if self.match_token(&TokenKind::LParen)? {
            if !self.check(&TokenKind::RParen) {
                loop {
                    let port = self.parse_port(ports.last())?;
                    ports.push(port);
                    if !self.match_token(&TokenKind::Comma)? {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
        }
        self.expect(TokenKind::Semi)?;

        let mut items = Vec::new();
        while !self.check(&TokenKind::EndModule) {
            match &self.current.kind {
                TokenKind::Reg | TokenKind::Wire => {
                    items.push(ModuleItem::Signal(self.parse_signal_decl()?));
                }
                TokenKind::Assign => {
                    items.push(ModuleItem::Assign(self.parse_continuous_assign()?));
                }
                TokenKind::Always => {
                    items.push(ModuleItem::Always(self.parse_always_block()?));
                }
                TokenKind::Parameter | TokenKind::Localparam => {
                    self.advance()?;
                    loop {
                        parameters.push(self.parse_parameter_assignment()?);
                        if !self.match_token(&TokenKind::Comma)? {
                            break;
                        }
                    }
                    self.expect(TokenKind::Semi)?;
                }
                _ => return Err(self.unexpected("module item or 'endmodule'")),
            }
        }
        let end = self.expect(TokenKind::EndModule)?.span;

        Ok(Module {
            name,
            parameters,
            ports,
            items,
            span: start.merge(end),
        })
    }

    fn parse_parameter_assignment(&mut self) -> LintResult<Parameter> {
        let (name, span) = self.expect_identifier()?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let span = span.merge(value.span);
        Ok(Parameter { name, value, span })
    }

    /// `<direction> [reg|wire] [range] <name>`; a bare name repeats the
    /// previous port's declaration, as in `input a, b`.
    fn parse_port(&mut self, previous: Option<&Port>) -> LintResult<Port> {
        let start = self.current.span;
        let direction = match self.current.kind {
            TokenKind::Input => Some(PortDirection::Input),
            TokenKind::Output => Some(PortDirection::Output),
            TokenKind::Inout => Some(PortDirection::Inout),
            _ => None,
        };

        let (direction, is_reg, range) = match (direction, previous) {
            (Some(direction), _) => {
                self.advance()?;
                let is_reg = if self.match_token(&TokenKind::Reg)? {
                    true
                } else {
                    self.match_token(&TokenKind::Wire)?;
                    false
                };
                (direction, is_reg, self.parse_optional_range()?)
            }
            (None, Some(previous)) => (previous.direction, previous.is_reg, previous.range.clone()),
            (None, None) => return Err(self.unexpected("port direction")),
        };

        let (name, name_span) = self.expect_identifier()?;
        Ok(Port {
            direction,
            is_reg,
            range,
            name,
            span: start.merge(name_span),
        })
    }

    fn parse_optional_range(&mut self) -> LintResult<Option<BitRange>> {
        if !self.match_token(&TokenKind::LBracket)? {
            return Ok(None);
        }
        let msb = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let lsb = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;
        Ok(Some(BitRange { msb, lsb }))
    }

    fn parse_signal_decl(&mut self) -> LintResult<SignalDecl> {
        let keyword = self.advance()?;
        let is_reg = matches!(keyword.kind, TokenKind::Reg);
        let range = self.parse_optional_range()?;

        let mut names = Vec::new();
        loop {
            names.push(self.expect_identifier()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        let end = self.expect(TokenKind::Semi)?.span;

        Ok(SignalDecl {
            is_reg,
            range,
            names,
            span: keyword.span.merge(end),
        })
    }

    fn parse_continuous_assign(&mut self) -> LintResult<ContinuousAssign> {
        let start = self.expect(TokenKind::Assign)?.span;
        let lhs = self.parse_lvalue()?;
        self.expect(TokenKind::Eq)?;
        let rhs = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi)?.span;

        Ok(ContinuousAssign {
            lhs,
            rhs,
            span: start.merge(end),
        })
    }

    /// `always @(posedge clk or negedge rst_n)`, `always @(a, b)`, `always @*`
    fn parse_always_block(&mut self) -> LintResult<AlwaysBlock> {
        let start = self.expect(TokenKind::Always)?.span;
        self.expect(TokenKind::At)?;

        let mut sensitivity = Vec::new();
        if self.match_token(&TokenKind::Star)? {
            sensitivity.push(Sensitivity { edge: Edge::None, signal: "*".to_string() });
        } else {
            self.expect(TokenKind::LParen)?;
            if self.match_token(&TokenKind::Star)? {
                sensitivity.push(Sensitivity { edge: Edge::None, signal: "*".to_string() });
            } else {
                loop {
                    let edge = if self.match_token(&TokenKind::Posedge)? {
                        Edge::Posedge
                    } else if self.match_token(&TokenKind::Negedge)? {
                        Edge::Negedge
                    } else {
                        Edge::None
                    };
                    let (signal, _) = self.expect_identifier()?;
                    sensitivity.push(Sensitivity { edge, signal });

                    if !(self.match_token(&TokenKind::Or)? || self.match_token(&TokenKind::Comma)?) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        let body = self.parse_stmt()?;
        let span = start.merge(body.span);
        Ok(AlwaysBlock { sensitivity, body, span })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_stmt(&mut self) -> LintResult<Stmt> {
        match &self.current.kind {
            TokenKind::Begin => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::Case => self.parse_case(),
            TokenKind::Identifier(_) => self.parse_procedural_assign(),
            _ => Err(self.unexpected("statement")),
        }
    }

    fn parse_block(&mut self) -> LintResult<Stmt> {
        let start = self.expect(TokenKind::Begin)?.span;

        // Named blocks: begin : label
        if self.match_token(&TokenKind::Colon)? {
            self.expect_identifier()?;
        }

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::End) {
            if self.at_end() {
                return Err(self.unexpected("'end'"));
            }
            stmts.push(self.parse_stmt()?);
        }
        let end = self.expect(TokenKind::End)?.span;

        Ok(Stmt::new(StmtKind::Block(stmts), start.merge(end)))
    }

    fn parse_if(&mut self) -> LintResult<Stmt> {
        let start = self.expect(TokenKind::If)?.span;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = Box::new(self.parse_stmt()?);
        // Dangling else binds to the innermost if
        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        let end = else_branch.as_ref().map_or(then_branch.span, |e| e.span);
        Ok(Stmt::new(
            StmtKind::If { condition, then_branch, else_branch },
            start.merge(end),
        ))
    }

    fn parse_case(&mut self) -> LintResult<Stmt> {
        let start = self.expect(TokenKind::Case)?.span;
        self.expect(TokenKind::LParen)?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;

        let mut arms = Vec::new();
        let mut default = None;
        while !self.check(&TokenKind::EndCase) {
            if self.at_end() {
                return Err(self.unexpected("'endcase'"));
            }

            if self.check(&TokenKind::Default) {
                let keyword = self.advance()?;
                if default.is_some() {
                    return Err(LintError::parser("duplicate 'default' in case statement", keyword.span));
                }
                self.match_token(&TokenKind::Colon)?;
                default = Some(Box::new(self.parse_stmt()?));
            } else {
                let value = self.parse_expr()?;
                self.expect(TokenKind::Colon)?;
                let body = self.parse_stmt()?;
                arms.push(CaseArm::new(value, body));
            }
        }
        let end = self.expect(TokenKind::EndCase)?.span;

        Ok(Stmt::new(StmtKind::Case { expr, arms, default }, start.merge(end)))
    }

    fn parse_procedural_assign(&mut self) -> LintResult<Stmt> {
        let lhs = self.parse_lvalue()?;
        let blocking = if self.match_token(&TokenKind::Eq)? {
            true
        } else if self.match_token(&TokenKind::LtEq)? {
            false
        } else {
            return Err(self.unexpected("'=' or '<='"));
        };
        let rhs = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi)?.span;

        let span = lhs.span.merge(end);
        Ok(Stmt::new(StmtKind::Assign { lhs, rhs, blocking }, span))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_lvalue(&mut self) -> LintResult<Expr> {
        let (name, span) = self.expect_identifier()?;
        self.parse_select_suffix(Expr::new(ExprKind::Identifier(name), span))
    }

    fn parse_expr(&mut self) -> LintResult<Expr> {
        self.parse_binary(0)
    }

    /// Precedence climbing; every level is left-associative
    fn parse_binary(&mut self, min_precedence: u8) -> LintResult<Expr> {
        let mut left = self.parse_primary()?;

        while let Some((op, precedence)) = binary_op(&self.current.kind) {
            if precedence < min_precedence {
                break;
            }
            self.advance()?;
            let right = self.parse_binary(precedence + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
                span,
            );
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> LintResult<Expr> {
        match &self.current.kind {
            TokenKind::Identifier(_) => self.parse_lvalue(),
            TokenKind::Number(text) => {
                let text = text.clone();
                let span = self.advance()?.span;
                Ok(Expr::new(ExprKind::Number(text), span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Minus | TokenKind::Bang | TokenKind::Tilde => Err(LintError::parser(
                format!("unary operator {} is not supported", self.current.kind),
                self.current.span,
            )),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_select_suffix(&mut self, base: Expr) -> LintResult<Expr> {
        if !self.match_token(&TokenKind::LBracket)? {
            return Ok(base);
        }
        let msb = Box::new(self.parse_expr()?);
        let lsb = if self.match_token(&TokenKind::Colon)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let end = self.expect(TokenKind::RBracket)?.span;

        let span = base.span.merge(end);
        Ok(Expr::new(ExprKind::Select { base: Box::new(base), msb, lsb }, span))
    }
}

/// Binary operator for a token, with its binding power
fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::PipePipe => (BinaryOp::LogicalOr, 1),
        TokenKind::AmpAmp => (BinaryOp::LogicalAnd, 2),
        TokenKind::Pipe => (BinaryOp::BitOr, 3),
        TokenKind::Caret => (BinaryOp::BitXor, 4),
        TokenKind::Amp => (BinaryOp::BitAnd, 5),
        TokenKind::EqEq => (BinaryOp::Eq, 6),
        TokenKind::NotEq => (BinaryOp::Ne, 6),
        TokenKind::Lt => (BinaryOp::Lt, 7),
        TokenKind::LtEq => (BinaryOp::Le, 7),
        TokenKind::Gt => (BinaryOp::Gt, 7),
        TokenKind::GtEq => (BinaryOp::Ge, 7),
        TokenKind::Shl => (BinaryOp::Shl, 8),
        TokenKind::Shr => (BinaryOp::Shr, 8),
        TokenKind::Plus => (BinaryOp::Add, 9),
        TokenKind::Minus => (BinaryOp::Sub, 9),
        TokenKind::Star => (BinaryOp::Mul, 10),
        TokenKind::Slash => (BinaryOp::Div, 10),
        TokenKind::Percent => (BinaryOp::Mod, 10),
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> Module {
        let mut parser = Parser::new(source).unwrap();
        let mut file = parser.parse().unwrap();
        assert_eq!(file.modules.len(), 1);
        file.modules.remove(0)
    }

    #[test]
    fn test_parse_counter() {
        let source = r"
            module counter #(parameter WIDTH = 8) (
                input clk,
                input rst,
                output reg [WIDTH-1:0] count
            );
                // This is a line comment
                always @(posedge clk or posedge rst) begin
                    if (rst)
                        count <= 8'h00; /* reset count */
                    else
                        count <= count + 1;
                end
            endmodule
        ";
        let module = parse_one(source);

        assert_eq!(module.name, "counter");
        assert_eq!(module.parameters.len(), 1);
        assert_eq!(module.parameters[0].name, "WIDTH");
        assert_eq!(module.ports.len(), 3);
        assert_eq!(module.ports[2].direction, PortDirection::Output);
        assert!(module.ports[2].is_reg);
        assert!(module.ports[2].range.is_some());

        assert_eq!(module.items.len(), 1);
        if let ModuleItem::Always(block) = &module.items[0] {
            assert_eq!(block.sensitivity.len(), 2);
            assert!(!block.is_combinational());
            assert!(matches!(block.body.kind, StmtKind::Block(ref stmts) if stmts.len() == 1));
        } else {
            panic!("expected always block");
        }
    }

    #[test]
    fn test_ports_inherit_previous_declaration() {
        let module = parse_one("module m(input [3:0] a, b, output reg q); endmodule");

        assert_eq!(module.ports.len(), 3);
        assert_eq!(module.ports[1].name, "b");
        assert_eq!(module.ports[1].direction, PortDirection::Input);
        assert!(module.ports[1].range.is_some());
        assert!(module.ports[2].is_reg);
    }

    #[test]
    fn test_body_items() {
        let source = "
            module m(input a, output y);
                localparam STATE_IDLE = 0, STATE_RUN = 1;
                reg [1:0] state, next;
                wire w;
                assign y = a & w;
                always @* next = state;
            endmodule
        ";
        let module = parse_one(source);

        assert_eq!(module.parameters.len(), 2);
        assert_eq!(module.items.len(), 4);
        assert!(matches!(&module.items[0], ModuleItem::Signal(s) if s.is_reg && s.names.len() == 2));
        assert!(matches!(&module.items[1], ModuleItem::Signal(s) if !s.is_reg));
        assert!(matches!(&module.items[2], ModuleItem::Assign(_)));
        if let ModuleItem::Always(block) = &module.items[3] {
            assert!(block.is_combinational());
            assert!(matches!(block.body.kind, StmtKind::Assign { blocking: true, .. }));
        } else {
            panic!("expected always block");
        }
    }

    #[test]
    fn test_operator_precedence() {
        let module = parse_one("module m(output y); assign y = a + b * c == d; endmodule");

        let ModuleItem::Assign(assign) = &module.items[0] else {
            panic!("expected continuous assignment");
        };
        assert_eq!(assign.rhs.to_string(), "((a + (b * c)) == d)");
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let module = parse_one("module m(output y); assign y = a - b - c; endmodule");

        let ModuleItem::Assign(assign) = &module.items[0] else {
            panic!("expected continuous assignment");
        };
        assert_eq!(assign.rhs.to_string(), "((a - b) - c)");
    }

    #[test]
    fn test_case_with_default_and_selects() {
        let source = "
            module m(input clk, output reg [7:0] q);
                always @(posedge clk)
                    case (q[1:0])
                        2'b00: q[0] <= 1;
                        S1 : begin : arm q <= 0; end
                        default q <= q;
                    endcase
            endmodule
        ";
        let module = parse_one(source);

        let ModuleItem::Always(block) = &module.items[0] else {
            panic!("expected always block");
        };
        let StmtKind::Case { expr, arms, default } = &block.body.kind else {
            panic!("expected case statement");
        };
        assert_eq!(expr.to_string(), "q[1:0]");
        assert_eq!(arms.len(), 2);
        assert_eq!(arms[1].value.as_identifier(), Some("S1"));
        assert!(default.is_some());
        if let StmtKind::Assign { lhs, .. } = &arms[0].body.kind {
            assert_eq!(lhs.as_identifier(), None);
        } else {
            panic!("expected assignment");
        }
    }

    #[test]
    fn test_multiple_modules() {
        let source = "module a(); endmodule module b(input x); endmodule";
        let file = Parser::new(source).unwrap().parse().unwrap();

        assert_eq!(file.modules.len(), 2);
        assert_eq!(file.modules[1].name, "b");
    }

    #[test]
    fn test_missing_semicolon_is_an_error() {
        let source = "module m(output reg q); always @(*) q = 1 endmodule";
        let err = Parser::new(source).unwrap().parse().unwrap_err();

        assert!(matches!(err, LintError::Parser { .. }));
    }

    #[test]
    fn test_unary_operator_is_rejected() {
        let source = "module m(input a, output y); assign y = !a; endmodule";
        let err = Parser::new(source).unwrap().parse().unwrap_err();

        assert!(err.to_string().contains("unary operator"));
    }

    #[test]
    fn test_empty_source_is_an_error() {
        let err = Parser::new("// nothing here").unwrap().parse().unwrap_err();

        assert!(matches!(err, LintError::Parser { .. }));
    }
}
