//! Lexer for the Java subset.
//!
//! Same shape as the C lexer with a Java keyword set, a `.` token for
//! member access, and no preprocessor handling. Literals keep their quotes
//! with escapes passed through verbatim, exactly as the C lexer does.

use crate::error::LexError;
use crate::token::{Token, TokenKind};

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

    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::symbol(TokenKind::Eof, self.line));
                break;
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
            '0'..='9' => Ok(self.number_literal(ch, line)),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, line)),

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
            '.' => Ok(Token::symbol(TokenKind::Dot, line)),
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

    fn number_literal(&mut self, first_digit: char, line: usize) -> Token {
        let mut text = String::new();
        text.push(first_digit);
        let mut is_float = false;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.' && !is_float && self.peek_ahead(1).map_or(false, |c| c.is_ascii_digit()) {
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
        Token::new(kind, text, line)
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
            "boolean" => TokenKind::KwBoolean,
            "String" => TokenKind::KwString,
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
            "new" => TokenKind::KwNew,
            "class" => TokenKind::KwClass,
            "public" => TokenKind::KwPublic,
            "private" => TokenKind::KwPrivate,
            "static" => TokenKind::KwStatic,
            "import" => TokenKind::KwImport,
            "true" => TokenKind::KwTrue,
            "false" => TokenKind::KwFalse,
            _ => TokenKind::Ident,
        };

        Token::new(kind, ident, line)
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

    #[test]
    fn test_java_keywords() {
        let tokens = Lexer::new("public static void main boolean String true false")
            .tokenize()
            .unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::KwPublic,
                TokenKind::KwStatic,
                TokenKind::KwVoid,
                TokenKind::Ident,
                TokenKind::KwBoolean,
                TokenKind::KwString,
                TokenKind::KwTrue,
                TokenKind::KwFalse,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dot_is_a_token() {
        let tokens = Lexer::new("System.out.println").tokenize().unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[3].kind, TokenKind::Dot);
    }

    #[test]
    fn test_method_call_on_int_literal_receiver_not_confused() {
        // "5.f()" is not a float; the dot only fuses when a digit follows
        let tokens = Lexer::new("x.put(5, 6)").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[2].text, "put");
    }

    #[test]
    fn test_float_suffix() {
        let tokens = Lexer::new("float f = 2.5f;").tokenize().unwrap();
        assert_eq!(tokens[3].kind, TokenKind::FloatLit);
        assert_eq!(tokens[3].text, "2.5");
    }

    #[test]
    fn test_generic_angle_brackets() {
        let tokens = Lexer::new("HashMap<Integer, Integer>").tokenize().unwrap();
        assert_eq!(tokens[0].text, "HashMap");
        assert_eq!(tokens[1].kind, TokenKind::Lt);
        assert_eq!(tokens[4].kind, TokenKind::Gt);
    }
}
