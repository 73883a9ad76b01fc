//! Token types shared by the C and Java front ends.
//!
//! Both lexers produce the same [`Token`] shape; each front end only emits
//! the kinds its language actually has (for example only the C lexer emits
//! [`TokenKind::Define`], and only the Java lexer emits [`TokenKind::Dot`]).

use std::fmt;

/// Every token kind either front end can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    IntLit,
    FloatLit,
    CharLit,
    StrLit,

    // Identifiers
    Ident,

    // Type keywords
    KwInt,
    KwFloat,
    KwDouble,
    KwChar,
    KwVoid,
    KwUnsigned,
    KwBool,
    KwBoolean,
    KwString,

    // Control keywords
    KwIf,
    KwElse,
    KwFor,
    KwWhile,
    KwDo,
    KwSwitch,
    KwCase,
    KwDefault,
    KwBreak,
    KwContinue,
    KwReturn,

    // C I/O keywords
    KwPrintf,
    KwScanf,

    // Java keywords
    KwNew,
    KwClass,
    KwPublic,
    KwPrivate,
    KwStatic,
    KwImport,
    KwTrue,
    KwFalse,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    Shl,   // <<
    Shr,   // >>

    // Assignment
    Assign,    // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Ternary
    Question, // ?
    Colon,    // :

    // Member access (Java only)
    Dot, // .

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,

    // `#define NAME VALUE`; the token text holds everything after the
    // directive word
    Define,

    // End of file
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::IntLit => "int literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::CharLit => "char literal",
            TokenKind::StrLit => "string literal",
            TokenKind::Ident => "identifier",
            TokenKind::KwInt => "'int'",
            TokenKind::KwFloat => "'float'",
            TokenKind::KwDouble => "'double'",
            TokenKind::KwChar => "'char'",
            TokenKind::KwVoid => "'void'",
            TokenKind::KwUnsigned => "'unsigned'",
            TokenKind::KwBool => "'bool'",
            TokenKind::KwBoolean => "'boolean'",
            TokenKind::KwString => "'String'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwElse => "'else'",
            TokenKind::KwFor => "'for'",
            TokenKind::KwWhile => "'while'",
            TokenKind::KwDo => "'do'",
            TokenKind::KwSwitch => "'switch'",
            TokenKind::KwCase => "'case'",
            TokenKind::KwDefault => "'default'",
            TokenKind::KwBreak => "'break'",
            TokenKind::KwContinue => "'continue'",
            TokenKind::KwReturn => "'return'",
            TokenKind::KwPrintf => "'printf'",
            TokenKind::KwScanf => "'scanf'",
            TokenKind::KwNew => "'new'",
            TokenKind::KwClass => "'class'",
            TokenKind::KwPublic => "'public'",
            TokenKind::KwPrivate => "'private'",
            TokenKind::KwStatic => "'static'",
            TokenKind::KwImport => "'import'",
            TokenKind::KwTrue => "'true'",
            TokenKind::KwFalse => "'false'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Assign => "'='",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Question => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Define => "'#define'",
            TokenKind::Eof => "end of file",
        };
        write!(f, "{}", s)
    }
}

/// A single token: its kind, the source text it covers, and the line it
/// starts on.
///
/// String and char literal tokens keep their surrounding quotes in `text`,
/// with backslash escapes passed through verbatim; the parser strips quotes
/// where it needs the inner text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// A token whose text is implied by its kind (operators, punctuation).
    pub fn symbol(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::IntLit => write!(f, "int literal {}", self.text),
            TokenKind::FloatLit => write!(f, "float literal {}", self.text),
            TokenKind::CharLit => write!(f, "char literal {}", self.text),
            TokenKind::StrLit => write!(f, "string literal {}", self.text),
            TokenKind::Ident => write!(f, "identifier '{}'", self.text),
            TokenKind::Define => write!(f, "'#define {}'", self.text),
            _ => write!(f, "{}", self.kind),
        }
    }
}
