//! Abstract Syntax Tree definitions

mod expr;
mod stmt;
mod decl;

pub use expr::*;
pub use stmt::*;
pub use decl::*;

/// A complete source file; each module is linted on its own
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub modules: Vec<Module>,
}

impl SourceFile {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }
}
