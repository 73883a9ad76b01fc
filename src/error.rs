//! Error types for the translation pipeline.
//!
//! Each stage has its own error struct; [`TranslateError`] wraps them for the
//! convenience entry points in the crate root.

use crate::token::Token;
use std::fmt;

/// Lexer error: an unrecognized or unterminated construct in the source text.
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub character: char,
}

impl LexError {
    pub fn new(message: impl Into<String>, line: usize, character: char) -> Self {
        Self {
            message: message.into(),
            line,
            character,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}: {} ('{}')",
            self.line, self.message, self.character
        )
    }
}

impl std::error::Error for LexError {}

/// Parser error: the token stream did not match the grammar.
///
/// `expected` describes what the parser was looking for; `actual` is the
/// offending token, which carries its own kind, text, and line.
#[derive(Debug)]
pub struct ParseError {
    pub line: usize,
    pub expected: String,
    pub actual: Token,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}: expected {}, found {}",
            self.line, self.expected, self.actual
        )
    }
}

impl std::error::Error for ParseError {}

/// Generator error: the AST contains a node the target language has no rule
/// for, and the generator is running in strict mode.
#[derive(Debug)]
pub struct UnsupportedError {
    pub node_kind: &'static str,
}

impl fmt::Display for UnsupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported construct: {}", self.node_kind)
    }
}

impl std::error::Error for UnsupportedError {}

/// Any error produced by a full source-to-source translation.
#[derive(Debug)]
pub enum TranslateError {
    Lex(LexError),
    Parse(ParseError),
    Unsupported(UnsupportedError),
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Lex(e) => write!(f, "{}", e),
            TranslateError::Parse(e) => write!(f, "{}", e),
            TranslateError::Unsupported(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<LexError> for TranslateError {
    fn from(err: LexError) -> Self {
        TranslateError::Lex(err)
    }
}

impl From<ParseError> for TranslateError {
    fn from(err: ParseError) -> Self {
        TranslateError::Parse(err)
    }
}

impl From<UnsupportedError> for TranslateError {
    fn from(err: UnsupportedError) -> Self {
        TranslateError::Unsupported(err)
    }
}
