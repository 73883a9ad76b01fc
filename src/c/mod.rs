//! C-subset front end: lexer and recursive-descent parser.

pub mod lexer;
pub mod parser;

pub use lexer::Lexer;
pub use parser::Parser;
