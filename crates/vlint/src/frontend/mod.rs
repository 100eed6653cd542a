//! Language frontends
//!
//! A frontend is responsible for:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST
//!
//! Semantic checks live in [`crate::lint`], which only sees the AST.

pub mod verilog;

pub use verilog::VerilogFrontend;
