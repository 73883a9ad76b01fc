//! Lexer for the C subset.
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. `#define` directives are captured as a single [`TokenKind::Define`]
//! token holding the rest of the line; every other preprocessor directive is
//! silently skipped. String and char literals keep their surrounding quotes
//! and pass backslash escapes through verbatim, so generators can re-emit
//! them without re-escaping.

use crate::error::LexError;
use crate::token::{Token, TokenKind};

/// Lexer for C source code.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input. The stream always ends with a single
    /// `Eof` token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::symbol(TokenKind::Eof, self.line));
                break;
            }

            if self.peek() == Some('#') {
                if let Some(token) = self.preprocessor_directive()? {
                    tokens.push(token);
                }
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let line = self.line;
        let ch = self.advance().ok_or_else(|| {
            LexError::new("unexpected end of file", line, ' ')
        })?;

        match ch {
            '"' => self.string_literal(line),
            '\'' => self.char_literal(line),
            '0'..='9' => self.number_literal(ch, line),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, line)),

            // Two-character operators before their one-character prefixes
            '+' => {
                if self.peek() == Some('+') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::PlusPlus, line))
                } else if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::PlusEq, line))
                } else {
                    Ok(Token::symbol(TokenKind::Plus, line))
                }
            }
            '-' => {
                if self.peek() == Some('-') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::MinusMinus, line))
                } else if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::MinusEq, line))
                } else {
                    Ok(Token::symbol(TokenKind::Minus, line))
                }
            }
            '*' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::StarEq, line))
                } else {
                    Ok(Token::symbol(TokenKind::Star, line))
                }
            }
            '/' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::SlashEq, line))
                } else {
                    Ok(Token::symbol(TokenKind::Slash, line))
                }
            }
            '%' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::PercentEq, line))
                } else {
                    Ok(Token::symbol(TokenKind::Percent, line))
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::EqEq, line))
                } else {
                    Ok(Token::symbol(TokenKind::Assign, line))
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::NotEq, line))
                } else {
                    Ok(Token::symbol(TokenKind::Bang, line))
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::Le, line))
                } else if self.peek() == Some('<') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::Shl, line))
                } else {
                    Ok(Token::symbol(TokenKind::Lt, line))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::Ge, line))
                } else if self.peek() == Some('>') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::Shr, line))
                } else {
                    Ok(Token::symbol(TokenKind::Gt, line))
                }
            }
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::AndAnd, line))
                } else {
                    Ok(Token::symbol(TokenKind::Amp, line))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    Ok(Token::symbol(TokenKind::OrOr, line))
                } else {
                    Ok(Token::symbol(TokenKind::Pipe, line))
                }
            }
            '^' => Ok(Token::symbol(TokenKind::Caret, line)),
            '~' => Ok(Token::symbol(TokenKind::Tilde, line)),
            '?' => Ok(Token::symbol(TokenKind::Question, line)),
            ':' => Ok(Token::symbol(TokenKind::Colon, line)),
            '(' => Ok(Token::symbol(TokenKind::LParen, line)),
            ')' => Ok(Token::symbol(TokenKind::RParen, line)),
            '{' => Ok(Token::symbol(TokenKind::LBrace, line)),
            '}' => Ok(Token::symbol(TokenKind::RBrace, line)),
            '[' => Ok(Token::symbol(TokenKind::LBracket, line)),
            ']' => Ok(Token::symbol(TokenKind::RBracket, line)),
            ';' => Ok(Token::symbol(TokenKind::Semicolon, line)),
            ',' => Ok(Token::symbol(TokenKind::Comma, line)),

            _ => Err(LexError::new("unexpected character", line, ch)),
        }
    }

    /// String literal, quotes kept, escapes passed through verbatim.
    fn string_literal(&mut self, line: usize) -> Result<Token, LexError> {
        let mut text = String::from("\"");

        loop {
            match self.advance() {
                Some('"') => {
                    text.push('"');
                    return Ok(Token::new(TokenKind::StrLit, text, line));
                }
                Some('\\') => {
                    text.push('\\');
                    let next = self.advance().ok_or_else(|| {
                        LexError::new("unterminated string literal", line, '"')
                    })?;
                    text.push(next);
                }
                Some(ch) => text.push(ch),
                None => {
                    return Err(LexError::new(
                        "unterminated string literal",
                        line,
                        '"',
                    ));
                }
            }
        }
    }

    /// Char literal, quotes kept, escapes passed through verbatim.
    fn char_literal(&mut self, line: usize) -> Result<Token, LexError> {
        let mut text = String::from("'");

        loop {
            match self.advance() {
                Some('\'') => {
                    text.push('\'');
                    return Ok(Token::new(TokenKind::CharLit, text, line));
                }
                Some('\\') => {
                    text.push('\\');
                    let next = self.advance().ok_or_else(|| {
                        LexError::new("unterminated char literal", line, '\'')
                    })?;
                    text.push(next);
                }
                Some(ch) => text.push(ch),
                None => {
                    return Err(LexError::new(
                        "unterminated char literal",
                        line,
                        '\'',
                    ));
                }
            }
        }
    }

    /// Numeric literal: digits with at most one '.'. A trailing `f`/`F`
    /// suffix is consumed (not kept in the text) and upgrades the kind.
    fn number_literal(
        &mut self,
        first_digit: char,
        line: usize,
    ) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(first_digit);
        let mut is_float = false;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.' && !is_float {
                is_float = true;
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.peek(), Some('f') | Some('F')) {
            self.advance();
            is_float = true;
        }

        let kind = if is_float {
            TokenKind::FloatLit
        } else {
            TokenKind::IntLit
        };
        Ok(Token::new(kind, text, line))
    }

    fn identifier_or_keyword(&mut self, first_char: char, line: usize) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match ident.as_str() {
            "int" => TokenKind::KwInt,
            "float" => TokenKind::KwFloat,
            "double" => TokenKind::KwDouble,
            "char" => TokenKind::KwChar,
            "void" => TokenKind::KwVoid,
            "unsigned" => TokenKind::KwUnsigned,
            "bool" => TokenKind::KwBool,
            "if" => TokenKind::KwIf,
            "else" => TokenKind::KwElse,
            "for" => TokenKind::KwFor,
            "while" => TokenKind::KwWhile,
            "do" => TokenKind::KwDo,
            "switch" => TokenKind::KwSwitch,
            "case" => TokenKind::KwCase,
            "default" => TokenKind::KwDefault,
            "break" => TokenKind::KwBreak,
            "continue" => TokenKind::KwContinue,
            "return" => TokenKind::KwReturn,
            "printf" => TokenKind::KwPrintf,
            "scanf" => TokenKind::KwScanf,
            _ => TokenKind::Ident,
        };

        Token::new(kind, ident, line)
    }

    /// `#define NAME VALUE` becomes a `Define` token whose text is the rest
    /// of the line; any other directive is skipped to end of line.
    fn preprocessor_directive(&mut self) -> Result<Option<Token>, LexError> {
        let line = self.line;
        self.advance(); // consume '#'

        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphabetic() {
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let mut rest = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            rest.push(ch);
            self.advance();
        }

        if word == "define" {
            let text = rest.trim().to_string();
            if text.is_empty() {
                return Err(LexError::new("empty #define directive", line, '#'));
            }
            return Ok(Some(Token::new(TokenKind::Define, text, line)));
        }

        Ok(None)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_line = self.line;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new("unterminated block comment", start_line, '*'))
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("int main() { return 0; }").tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::KwInt);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].text, "main");
        assert_eq!(tokens[2].kind, TokenKind::LParen);
        assert_eq!(tokens[3].kind, TokenKind::RParen);
        assert_eq!(tokens[4].kind, TokenKind::LBrace);
        assert_eq!(tokens[5].kind, TokenKind::KwReturn);
        assert_eq!(tokens[6].kind, TokenKind::IntLit);
        assert_eq!(tokens[6].text, "0");
        assert_eq!(tokens[7].kind, TokenKind::Semicolon);
        assert_eq!(tokens[8].kind, TokenKind::RBrace);
        assert_eq!(tokens[9].kind, TokenKind::Eof);
    }

    #[test]
    fn test_two_char_operators_before_one_char() {
        assert_eq!(
            kinds("a==b"),
            vec![
                TokenKind::Ident,
                TokenKind::EqEq,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("++ -- += -= <= >= << >> && ||"),
            vec![
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::Shl,
                TokenKind::Shr,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = Lexer::new("int x; // trailing\nint y; /* block\n*/ int z;")
            .tokenize()
            .unwrap();
        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(idents, vec!["x", "y", "z"]);
        // block comment newlines still advance line numbers
        assert_eq!(tokens.last().unwrap().line, 3);
    }

    #[test]
    fn test_string_literal_keeps_quotes_and_escapes() {
        let tokens = Lexer::new(r#"printf("hi\n");"#).tokenize().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::StrLit);
        assert_eq!(tokens[1].text, r#""hi\n""#);
    }

    #[test]
    fn test_char_literal_keeps_quotes() {
        let tokens = Lexer::new(r"char c = '\n';").tokenize().unwrap();
        assert_eq!(tokens[3].kind, TokenKind::CharLit);
        assert_eq!(tokens[3].text, r"'\n'");
    }

    #[test]
    fn test_float_literals() {
        let tokens = Lexer::new("3.14 2.5f 7").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::FloatLit);
        assert_eq!(tokens[0].text, "3.14");
        assert_eq!(tokens[1].kind, TokenKind::FloatLit);
        assert_eq!(tokens[1].text, "2.5");
        assert_eq!(tokens[2].kind, TokenKind::IntLit);
    }

    #[test]
    fn test_define_captured() {
        let tokens = Lexer::new("#define SIZE 100\nint x;").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Define);
        assert_eq!(tokens[0].text, "SIZE 100");
        assert_eq!(tokens[1].kind, TokenKind::KwInt);
    }

    #[test]
    fn test_include_skipped() {
        let tokens = Lexer::new("#include <stdio.h>\nint x;").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::KwInt);
    }

    #[test]
    fn test_unknown_character_reports_line() {
        let err = Lexer::new("int x;\n@").tokenize().unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.character, '@');
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(Lexer::new("/* never closed").tokenize().is_err());
    }
}
