//! Verilog frontend
//!
//! This frontend handles:
//! - Lexing Verilog source into tokens
//! - Parsing tokens into the module AST the linter consumes

pub mod ast;
pub mod lexer;
pub mod parser;

use log::debug;

use crate::common::LintResult;
use crate::driver::{LintConfig, SourceContext};

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

/// Verilog language frontend
pub struct VerilogFrontend;

impl VerilogFrontend {
    pub fn new() -> Self {
        Self
    }

    /// Turn source text into a syntax tree, reporting failures through the
    /// context's diagnostic reporter before returning them
    pub fn parse(
        &self,
        source: &str,
        ctx: &SourceContext,
        config: &LintConfig,
    ) -> LintResult<SourceFile> {
        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            match self.dump_tokens(source) {
                Ok(dump) => {
                    eprintln!("=== Verilog Tokens ===");
                    eprint!("{}", dump);
                    eprintln!("=== End Tokens ===\n");
                }
                Err(e) => {
                    ctx.reporter.report_error(ctx.file_id, &e);
                    return Err(e);
                }
            }
        }

        // Phase 2: Parsing
        debug!("parsing {}", ctx.filename);
        let file = match Parser::new(source).and_then(|mut parser| parser.parse()) {
            Ok(file) => file,
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        };
        debug!("parsed {} module(s) from {}", file.modules.len(), ctx.filename);

        if config.dump_ast {
            eprintln!("=== Verilog AST ===");
            eprintln!("{:#?}", file);
            eprintln!("=== End AST ===\n");
        }

        Ok(file)
    }

    pub fn dump_tokens(&self, source: &str) -> LintResult<String> {
        let lexer = Lexer::new(source);
        let tokens = lexer.tokenize_all()?;
        let mut output = String::new();
        for token in &tokens {
            output.push_str(&format!("{:?}\n", token));
        }
        Ok(output)
    }
}

impl Default for VerilogFrontend {
    fn default() -> Self {
        Self::new()
    }
}
