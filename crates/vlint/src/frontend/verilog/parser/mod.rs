//! Parser module for building the Verilog AST

mod parser;

pub use parser::Parser;
