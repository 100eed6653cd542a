//! Token definitions for the Verilog lexer

use crate::common::Span;
use logos::Logos;
use std::fmt;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All token kinds in the supported Verilog subset
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]  // Skip whitespace
#[logos(skip r"//[^\n]*")]      // Skip line comments
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")] // Skip block comments
pub enum TokenKind {
    // === Keywords ===
    #[token("module")]
    Module,
    #[token("endmodule")]
    EndModule,
    #[token("input")]
    Input,
    #[token("output")]
    Output,
    #[token("inout")]
    Inout,
    #[token("reg")]
    Reg,
    #[token("wire")]
    Wire,
    #[token("parameter")]
    Parameter,
    #[token("localparam")]
    Localparam,
    #[token("assign")]
    Assign,
    #[token("always")]
    Always,
    #[token("posedge")]
    Posedge,
    #[token("negedge")]
    Negedge,
    #[token("or")]
    Or,
    #[token("begin")]
    Begin,
    #[token("end")]
    End,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("case")]
    Case,
    #[token("endcase")]
    EndCase,
    #[token("default")]
    Default,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Literals ===
    // Raw text is kept; the linter decides what the digits mean. Don't-care
    // and high-impedance digits lex fine and are rejected later.
    #[regex(r"[0-9][0-9_]*('[0-9a-zA-Z_?]*)?", |lex| lex.slice().to_string())]
    #[regex(r"'[0-9a-zA-Z_?]+", |lex| lex.slice().to_string())]
    Number(String),

    // === Operators ===
    #[token("<=")]
    LtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,

    // === Punctuation ===
    #[token("@")]
    At,
    #[token("#")]
    Hash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    /// End of input (never produced by logos)
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Module => "'module'",
            TokenKind::EndModule => "'endmodule'",
            TokenKind::Input => "'input'",
            TokenKind::Output => "'output'",
            TokenKind::Inout => "'inout'",
            TokenKind::Reg => "'reg'",
            TokenKind::Wire => "'wire'",
            TokenKind::Parameter => "'parameter'",
            TokenKind::Localparam => "'localparam'",
            TokenKind::Assign => "'assign'",
            TokenKind::Always => "'always'",
            TokenKind::Posedge => "'posedge'",
            TokenKind::Negedge => "'negedge'",
            TokenKind::Or => "'or'",
            TokenKind::Begin => "'begin'",
            TokenKind::End => "'end'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::Case => "'case'",
            TokenKind::EndCase => "'endcase'",
            TokenKind::Default => "'default'",
            TokenKind::Identifier(name) => return write!(f, "identifier '{}'", name),
            TokenKind::Number(text) => return write!(f, "number '{}'", text),
            TokenKind::LtEq => "'<='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::GtEq => "'>='",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::Bang => "'!'",
            TokenKind::Eq => "'='",
            TokenKind::At => "'@'",
            TokenKind::Hash => "'#'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::Eof => "end of file",
        };
        f.write_str(text)
    }
}
