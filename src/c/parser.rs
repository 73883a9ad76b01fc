//! Recursive-descent parser for the C subset.
//!
//! Consumes the token stream from [`Lexer`] and produces the
//! language-neutral [`Program`]. No backtracking: every decision is made
//! from the current token plus bounded lookahead, and the one ambiguous
//! form (one- vs two-dimensional bracket suffixes) is resolved by a
//! bracket-depth forward scan shared by declarations, assignments, and
//! accesses.

use crate::ast::*;
use crate::c::lexer::Lexer;
use crate::error::{LexError, ParseError};
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Lex the source and set up a parser over the resulting tokens.
    pub fn new(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program: `#define` captures and function
    /// definitions, in source order.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Define) {
                let token = self.advance_token();
                let (name, value) = match token.text.split_once(char::is_whitespace) {
                    Some((n, v)) => (n.to_string(), v.trim().to_string()),
                    None => (token.text.clone(), String::new()),
                };
                program.items.push(AstNode::Define { name, value });
                continue;
            }

            program.items.push(self.parse_function()?);
        }

        Ok(program)
    }

    /// Parse `type name(params) { body }`. The function named `main` is
    /// tagged as the entry point and its parameter list is dropped.
    fn parse_function(&mut self) -> Result<AstNode, ParseError> {
        let return_type = self.expect_type("a return type")?;
        let name = self.expect_identifier("a function name")?;

        self.expect(TokenKind::LParen, "'(' after function name")?;
        let mut params = self.parse_params()?;
        self.expect(TokenKind::RParen, "')' after parameters")?;

        let body = self.parse_block()?;

        let is_entry = name == "main";
        if is_entry {
            params.clear();
        }

        Ok(AstNode::Function {
            return_type,
            name,
            params,
            body,
            is_entry,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(TokenKind::RParen) {
            return Ok(params);
        }

        // (void) means no parameters
        if self.check(TokenKind::KwVoid)
            && self.peek_ahead_kind(1) == TokenKind::RParen
        {
            self.advance_token();
            return Ok(params);
        }

        loop {
            let ty = self.expect_type("a parameter type")?;
            let name = self.expect_identifier("a parameter name")?;
            let mut is_array = false;
            if self.match_kind(TokenKind::LBracket) {
                self.expect(TokenKind::RBracket, "']' after array parameter")?;
                is_array = true;
            }
            params.push(Param { ty, name, is_array });

            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse `{ statements }`.
    fn parse_block(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        match self.peek_kind() {
            k if is_type_keyword(k) => self.parse_declaration(),
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwFor => self.parse_for(),
            TokenKind::KwWhile => self.parse_while(),
            TokenKind::KwDo => self.parse_do_while(),
            TokenKind::KwSwitch => self.parse_switch(),
            TokenKind::KwBreak => {
                self.advance_token();
                self.expect(TokenKind::Semicolon, "';' after 'break'")?;
                Ok(AstNode::Break)
            }
            TokenKind::KwContinue => {
                self.advance_token();
                self.expect(TokenKind::Semicolon, "';' after 'continue'")?;
                Ok(AstNode::Continue)
            }
            TokenKind::KwReturn => {
                self.advance_token();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                };
                self.expect(TokenKind::Semicolon, "';' after return value")?;
                Ok(AstNode::Return { value })
            }
            TokenKind::KwPrintf => self.parse_printf(),
            TokenKind::KwScanf => self.parse_scanf(),
            TokenKind::Ident => self.parse_identifier_statement(),
            _ => Err(self.error("a statement")),
        }
    }

    /// Scalar, 1-D array, and 2-D array declarations.
    fn parse_declaration(&mut self) -> Result<AstNode, ParseError> {
        let ty = self.expect_type("a type")?;
        let name = self.expect_identifier("a variable name")?;

        if self.check(TokenKind::LBracket) {
            if self.is_2d_ahead() {
                self.expect(TokenKind::LBracket, "'['")?;
                let rows = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "']' after row count")?;
                self.expect(TokenKind::LBracket, "'[' for column count")?;
                let cols = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "']' after column count")?;
                self.expect(TokenKind::Semicolon, "';' after declaration")?;
                return Ok(AstNode::ArrayDecl2D {
                    ty,
                    name,
                    rows: Box::new(rows),
                    cols: Box::new(cols),
                });
            }

            self.expect(TokenKind::LBracket, "'['")?;
            let size = if self.check(TokenKind::RBracket) {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.expect(TokenKind::RBracket, "']' after array size")?;

            if self.match_kind(TokenKind::Assign) {
                let init = self.parse_initializer_list()?;
                self.expect(TokenKind::Semicolon, "';' after declaration")?;
                // An initializer list supplies the size; keep only one.
                return Ok(AstNode::ArrayDecl {
                    ty,
                    name,
                    size: None,
                    init: Some(init),
                });
            }

            let size = size.ok_or_else(|| self.error("an array size or initializer"))?;
            self.expect(TokenKind::Semicolon, "';' after declaration")?;
            return Ok(AstNode::ArrayDecl {
                ty,
                name,
                size: Some(Box::new(size)),
                init: None,
            });
        }

        let init = if self.match_kind(TokenKind::Assign) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "';' after declaration")?;
        Ok(AstNode::VarDecl { ty, name, init })
    }

    fn parse_initializer_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        self.expect(TokenKind::LBrace, "'{' to start initializer list")?;
        let mut values = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                values.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}' after initializer list")?;
        Ok(values)
    }

    /// `if`/`else if` chains flatten into one branch list.
    fn parse_if(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::KwIf, "'if'")?;
        self.expect(TokenKind::LParen, "'(' after 'if'")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after condition")?;
        let body = self.parse_block()?;

        let mut branches = vec![Branch { cond, body }];
        let mut else_block = None;

        while self.match_kind(TokenKind::KwElse) {
            if self.match_kind(TokenKind::KwIf) {
                self.expect(TokenKind::LParen, "'(' after 'else if'")?;
                let cond = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')' after condition")?;
                let body = self.parse_block()?;
                branches.push(Branch { cond, body });
            } else {
                else_block = Some(self.parse_block()?);
                break;
            }
        }

        Ok(AstNode::If {
            branches,
            else_block,
        })
    }

    fn parse_for(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::KwFor, "'for'")?;
        self.expect(TokenKind::LParen, "'(' after 'for'")?;

        let init = self.parse_for_init()?;
        self.expect(TokenKind::Semicolon, "';' after loop initializer")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "';' after loop condition")?;
        let update = self.parse_update()?;
        self.expect(TokenKind::RParen, "')' after loop update")?;

        let body = self.parse_block()?;

        Ok(AstNode::For {
            init: Box::new(init),
            cond: Box::new(cond),
            update: Box::new(update),
            body,
        })
    }

    /// Loop initializer: a declaration with an initial value, or an
    /// assignment to an existing variable.
    fn parse_for_init(&mut self) -> Result<AstNode, ParseError> {
        if is_type_keyword(self.peek_kind()) {
            let ty = self.expect_type("a type")?;
            let name = self.expect_identifier("a variable name")?;
            self.expect(TokenKind::Assign, "'=' in loop initializer")?;
            let init = self.parse_expression()?;
            return Ok(AstNode::VarDecl {
                ty,
                name,
                init: Some(Box::new(init)),
            });
        }

        let name = self.expect_identifier("a loop variable")?;
        self.expect(TokenKind::Assign, "'=' in loop initializer")?;
        let value = self.parse_expression()?;
        Ok(AstNode::Assign {
            name,
            value: Box::new(value),
        })
    }

    /// Loop update: `i++`, `i--`, `i += e`, `i -= e`, or `i = e`.
    fn parse_update(&mut self) -> Result<AstNode, ParseError> {
        let name = self.expect_identifier("a loop variable")?;
        match self.peek_kind() {
            TokenKind::PlusPlus => {
                self.advance_token();
                Ok(AstNode::Update {
                    name,
                    op: UpdateOp::Inc,
                    value: None,
                })
            }
            TokenKind::MinusMinus => {
                self.advance_token();
                Ok(AstNode::Update {
                    name,
                    op: UpdateOp::Dec,
                    value: None,
                })
            }
            TokenKind::PlusEq => {
                self.advance_token();
                let value = self.parse_expression()?;
                Ok(AstNode::Update {
                    name,
                    op: UpdateOp::AddAssign,
                    value: Some(Box::new(value)),
                })
            }
            TokenKind::MinusEq => {
                self.advance_token();
                let value = self.parse_expression()?;
                Ok(AstNode::Update {
                    name,
                    op: UpdateOp::SubAssign,
                    value: Some(Box::new(value)),
                })
            }
            TokenKind::Assign => {
                self.advance_token();
                let value = self.parse_expression()?;
                Ok(AstNode::Update {
                    name,
                    op: UpdateOp::Set,
                    value: Some(Box::new(value)),
                })
            }
            _ => Err(self.error("a loop update")),
        }
    }

    fn parse_while(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::KwWhile, "'while'")?;
        self.expect(TokenKind::LParen, "'(' after 'while'")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after condition")?;
        let body = self.parse_block()?;
        Ok(AstNode::While {
            cond: Box::new(cond),
            body,
        })
    }

    fn parse_do_while(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::KwDo, "'do'")?;
        let body = self.parse_block()?;
        self.expect(TokenKind::KwWhile, "'while' after do block")?;
        self.expect(TokenKind::LParen, "'(' after 'while'")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after condition")?;
        self.expect(TokenKind::Semicolon, "';' after do-while")?;
        Ok(AstNode::DoWhile {
            body,
            cond: Box::new(cond),
        })
    }

    fn parse_switch(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::KwSwitch, "'switch'")?;
        self.expect(TokenKind::LParen, "'(' after 'switch'")?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')' after switch expression")?;
        self.expect(TokenKind::LBrace, "'{' to open switch body")?;

        let mut cases = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            if self.match_kind(TokenKind::KwCase) {
                let value = self.parse_expression()?;
                self.expect(TokenKind::Colon, "':' after case value")?;
                let body = self.parse_case_body()?;
                cases.push(SwitchCase::Case { value, body });
            } else if self.match_kind(TokenKind::KwDefault) {
                self.expect(TokenKind::Colon, "':' after 'default'")?;
                let body = self.parse_case_body()?;
                cases.push(SwitchCase::Default { body });
            } else {
                return Err(self.error("'case' or 'default'"));
            }
        }

        self.expect(TokenKind::RBrace, "'}' to close switch body")?;
        Ok(AstNode::Switch {
            expr: Box::new(expr),
            cases,
        })
    }

    fn parse_case_body(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut body = Vec::new();
        while !matches!(
            self.peek_kind(),
            TokenKind::KwCase
                | TokenKind::KwDefault
                | TokenKind::RBrace
                | TokenKind::Eof
        ) {
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    /// `printf("fmt", args...);`
    fn parse_printf(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::KwPrintf, "'printf'")?;
        self.expect(TokenKind::LParen, "'(' after 'printf'")?;
        let fmt = self.expect(TokenKind::StrLit, "a format string")?;
        let mut args = Vec::new();
        while self.match_kind(TokenKind::Comma) {
            args.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RParen, "')' after printf arguments")?;
        self.expect(TokenKind::Semicolon, "';' after printf")?;
        Ok(AstNode::Print {
            format: Some(unquote(&fmt.text)),
            args,
            newline: false,
        })
    }

    /// `scanf("fmt", &a, &b);` — the `&` is dropped from each target.
    fn parse_scanf(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::KwScanf, "'scanf'")?;
        self.expect(TokenKind::LParen, "'(' after 'scanf'")?;
        let fmt = self.expect(TokenKind::StrLit, "a format string")?;
        let mut targets = Vec::new();
        while self.match_kind(TokenKind::Comma) {
            self.match_kind(TokenKind::Amp);
            targets.push(self.expect_identifier("a scanf target")?);
        }
        self.expect(TokenKind::RParen, "')' after scanf arguments")?;
        self.expect(TokenKind::Semicolon, "';' after scanf")?;
        Ok(AstNode::Scan {
            format: unquote(&fmt.text),
            targets,
        })
    }

    /// Statements that start with an identifier: array assignments (1-D or
    /// 2-D, decided by the bracket scan), calls, compound assignments,
    /// increments, and plain assignments.
    fn parse_identifier_statement(&mut self) -> Result<AstNode, ParseError> {
        let name = self.expect_identifier("an identifier")?;

        match self.peek_kind() {
            TokenKind::LBracket => {
                if self.is_2d_ahead() {
                    self.expect(TokenKind::LBracket, "'['")?;
                    let row = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']' after row index")?;
                    self.expect(TokenKind::LBracket, "'[' for column index")?;
                    let col = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']' after column index")?;
                    self.expect(TokenKind::Assign, "'=' in array assignment")?;
                    let value = self.parse_expression()?;
                    self.expect(TokenKind::Semicolon, "';' after assignment")?;
                    Ok(AstNode::ArrayAssign2D {
                        name,
                        row: Box::new(row),
                        col: Box::new(col),
                        value: Box::new(value),
                    })
                } else {
                    self.expect(TokenKind::LBracket, "'['")?;
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket, "']' after index")?;
                    self.expect(TokenKind::Assign, "'=' in array assignment")?;
                    let value = self.parse_expression()?;
                    self.expect(TokenKind::Semicolon, "';' after assignment")?;
                    Ok(AstNode::ArrayAssign {
                        name,
                        index: Box::new(index),
                        value: Box::new(value),
                    })
                }
            }
            TokenKind::LParen => {
                self.advance_token();
                let args = self.parse_call_args()?;
                self.expect(TokenKind::Semicolon, "';' after call")?;
                Ok(AstNode::CallStmt { name, args })
            }
            TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq => {
                let op = match self.advance_token().kind {
                    TokenKind::PlusEq => BinOp::Add,
                    TokenKind::MinusEq => BinOp::Sub,
                    TokenKind::StarEq => BinOp::Mul,
                    TokenKind::SlashEq => BinOp::Div,
                    _ => BinOp::Mod,
                };
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';' after assignment")?;
                Ok(AstNode::CompoundAssign {
                    name,
                    op,
                    value: Box::new(value),
                })
            }
            TokenKind::PlusPlus => {
                self.advance_token();
                self.expect(TokenKind::Semicolon, "';' after '++'")?;
                Ok(AstNode::Update {
                    name,
                    op: UpdateOp::Inc,
                    value: None,
                })
            }
            TokenKind::MinusMinus => {
                self.advance_token();
                self.expect(TokenKind::Semicolon, "';' after '--'")?;
                Ok(AstNode::Update {
                    name,
                    op: UpdateOp::Dec,
                    value: None,
                })
            }
            TokenKind::Assign => {
                self.advance_token();
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semicolon, "';' after assignment")?;
                Ok(AstNode::Assign {
                    name,
                    value: Box::new(value),
                })
            }
            _ => Err(self.error("an assignment or call")),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after arguments")?;
        Ok(args)
    }

    // ── Expression grammar, lowest to highest precedence ──

    pub fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Result<AstNode, ParseError> {
        let cond = self.parse_logical_or()?;
        if self.match_kind(TokenKind::Question) {
            let then_val = self.parse_expression()?;
            self.expect(TokenKind::Colon, "':' in ternary expression")?;
            let else_val = self.parse_expression()?;
            return Ok(AstNode::Ternary {
                cond: Box::new(cond),
                then_val: Box::new(then_val),
                else_val: Box::new(else_val),
            });
        }
        Ok(cond)
    }

    fn parse_logical_or(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_logical_and()?;
        while self.match_kind(TokenKind::OrOr) {
            let rhs = self.parse_logical_and()?;
            lhs = binary(BinOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_logical_and(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_bit_or()?;
        while self.match_kind(TokenKind::AndAnd) {
            let rhs = self.parse_bit_or()?;
            lhs = binary(BinOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_bit_or(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_bit_xor()?;
        while self.match_kind(TokenKind::Pipe) {
            let rhs = self.parse_bit_xor()?;
            lhs = binary(BinOp::BitOr, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_bit_xor(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_bit_and()?;
        while self.match_kind(TokenKind::Caret) {
            let rhs = self.parse_bit_and()?;
            lhs = binary(BinOp::BitXor, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_bit_and(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_equality()?;
        while self.match_kind(TokenKind::Amp) {
            let rhs = self.parse_equality()?;
            lhs = binary(BinOp::BitAnd, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Ne,
                _ => break,
            };
            self.advance_token();
            let rhs = self.parse_relational()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_shift()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            self.advance_token();
            let rhs = self.parse_shift()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_shift(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Shl => BinOp::Shl,
                TokenKind::Shr => BinOp::Shr,
                _ => break,
            };
            self.advance_token();
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance_token();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance_token();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Bang => Some(UnOp::Not),
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Tilde => Some(UnOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            self.advance_token();
            let operand = self.parse_unary()?;
            return Ok(AstNode::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        match self.peek_kind() {
            TokenKind::IntLit => Ok(AstNode::IntLit(self.advance_token().text)),
            TokenKind::FloatLit => Ok(AstNode::FloatLit(self.advance_token().text)),
            TokenKind::CharLit => Ok(AstNode::CharLit(self.advance_token().text)),
            TokenKind::StrLit => Ok(AstNode::StrLit(self.advance_token().text)),
            TokenKind::KwTrue => {
                self.advance_token();
                Ok(AstNode::BoolLit(true))
            }
            TokenKind::KwFalse => {
                self.advance_token();
                Ok(AstNode::BoolLit(false))
            }
            TokenKind::LParen => {
                self.advance_token();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')' after expression")?;
                Ok(expr)
            }
            TokenKind::Ident => {
                let name = self.advance_token().text;
                match self.peek_kind() {
                    TokenKind::LParen => {
                        self.advance_token();
                        let args = self.parse_call_args()?;
                        Ok(AstNode::Call { name, args })
                    }
                    TokenKind::LBracket => {
                        if self.is_2d_ahead() {
                            self.expect(TokenKind::LBracket, "'['")?;
                            let row = self.parse_expression()?;
                            self.expect(TokenKind::RBracket, "']' after row index")?;
                            self.expect(TokenKind::LBracket, "'[' for column index")?;
                            let col = self.parse_expression()?;
                            self.expect(TokenKind::RBracket, "']' after column index")?;
                            Ok(AstNode::ArrayAccess2D {
                                name,
                                row: Box::new(row),
                                col: Box::new(col),
                            })
                        } else {
                            self.advance_token();
                            let index = self.parse_expression()?;
                            self.expect(TokenKind::RBracket, "']' after index")?;
                            Ok(AstNode::ArrayAccess {
                                name,
                                index: Box::new(index),
                            })
                        }
                    }
                    _ => Ok(AstNode::Ident(name)),
                }
            }
            _ => Err(self.error("an expression")),
        }
    }

    /// Bracket-depth scan: with the cursor on a `[`, walk forward until the
    /// depth returns to zero and report whether another `[` follows. Used
    /// uniformly for declarations, assignments, and accesses.
    fn is_2d_ahead(&self) -> bool {
        let mut depth: usize = 0;
        let mut pos = self.position;
        while pos < self.tokens.len() {
            match self.tokens[pos].kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                    if depth == 0 {
                        return self
                            .tokens
                            .get(pos + 1)
                            .map(|t| t.kind == TokenKind::LBracket)
                            .unwrap_or(false);
                    }
                }
                TokenKind::Semicolon | TokenKind::Eof => return false,
                _ => {}
            }
            pos += 1;
        }
        false
    }

    // ── Cursor helpers ──

    fn peek(&self) -> &Token {
        // The token stream always ends with Eof and the cursor never moves
        // past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_ahead_kind(&self, n: usize) -> TokenKind {
        let pos = (self.position + n).min(self.tokens.len() - 1);
        self.tokens[pos].kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance_token();
            true
        } else {
            false
        }
    }

    fn advance_token(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        expected: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance_token())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        if self.check(TokenKind::Ident) {
            Ok(self.advance_token().text)
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_type(&mut self, expected: &str) -> Result<String, ParseError> {
        if is_type_keyword(self.peek_kind()) {
            let mut ty = self.advance_token().text;
            // pointer types read as part of the type, so char* maps cleanly
            while self.check(TokenKind::Star) {
                self.advance_token();
                ty.push('*');
            }
            Ok(ty)
        } else {
            Err(self.error(expected))
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        let actual = self.peek().clone();
        ParseError {
            line: actual.line,
            expected: expected.to_string(),
            actual,
        }
    }
}

fn is_type_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KwInt
            | TokenKind::KwFloat
            | TokenKind::KwDouble
            | TokenKind::KwChar
            | TokenKind::KwVoid
            | TokenKind::KwUnsigned
            | TokenKind::KwBool
    )
}

fn binary(op: BinOp, lhs: AstNode, rhs: AstNode) -> AstNode {
    AstNode::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Strip the surrounding quotes from a literal token's text.
fn unquote(text: &str) -> String {
    text[1..text.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source)
            .expect("lexing should succeed")
            .parse_program()
            .expect("parsing should succeed")
    }

    fn main_body(program: &Program) -> &[AstNode] {
        for item in &program.items {
            if let AstNode::Function { body, is_entry, .. } = item {
                if *is_entry {
                    return body;
                }
            }
        }
        panic!("no entry function");
    }

    #[test]
    fn test_var_decl_roundtrip() {
        let program = parse("int main() { int x = 5; return 0; }");
        let body = main_body(&program);
        assert_eq!(
            body[0],
            AstNode::VarDecl {
                ty: "int".to_string(),
                name: "x".to_string(),
                init: Some(Box::new(AstNode::IntLit("5".to_string()))),
            }
        );
    }

    #[test]
    fn test_entry_function_tagged_and_stripped() {
        let program = parse("int main() { return 0; }");
        match &program.items[0] {
            AstNode::Function {
                name,
                is_entry,
                params,
                ..
            } => {
                assert_eq!(name, "main");
                assert!(is_entry);
                assert!(params.is_empty());
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_2d_access_with_expression_row() {
        let program = parse("int main() { int x = m[i + 1][j]; return 0; }");
        let body = main_body(&program);
        match &body[0] {
            AstNode::VarDecl { init: Some(init), .. } => match init.as_ref() {
                AstNode::ArrayAccess2D { name, row, col } => {
                    assert_eq!(name, "m");
                    assert!(matches!(row.as_ref(), AstNode::Binary { op: BinOp::Add, .. }));
                    assert_eq!(col.as_ref(), &AstNode::Ident("j".to_string()));
                }
                other => panic!("expected 2-D access, got {:?}", other),
            },
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_1d_access_with_nested_brackets_stays_1d() {
        let program = parse("int main() { int x = a[b[0]]; return 0; }");
        let body = main_body(&program);
        match &body[0] {
            AstNode::VarDecl { init: Some(init), .. } => {
                assert!(matches!(init.as_ref(), AstNode::ArrayAccess { .. }));
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_array_decl_size_xor_init() {
        let program = parse("int main() { int a[5]; int b[] = {1, 2, 3}; return 0; }");
        let body = main_body(&program);
        match &body[0] {
            AstNode::ArrayDecl { size, init, .. } => {
                assert!(size.is_some());
                assert!(init.is_none());
            }
            other => panic!("expected array declaration, got {:?}", other),
        }
        match &body[1] {
            AstNode::ArrayDecl { size, init, .. } => {
                assert!(size.is_none());
                let init = init.as_ref().unwrap();
                assert_eq!(init.len(), 3);
                assert_eq!(init[0], AstNode::IntLit("1".to_string()));
                assert_eq!(init[2], AstNode::IntLit("3".to_string()));
            }
            other => panic!("expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_chain_flattened() {
        let program = parse(
            "int main() { if (x > 0) { y = 1; } else if (x < 0) { y = 2; } else { y = 3; } return 0; }",
        );
        let body = main_body(&program);
        match &body[0] {
            AstNode::If {
                branches,
                else_block,
            } => {
                assert_eq!(branches.len(), 2);
                assert!(else_block.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_printf_and_scanf() {
        let program =
            parse(r#"int main() { scanf("%d", &x); printf("x=%d\n", x); return 0; }"#);
        let body = main_body(&program);
        assert_eq!(
            body[0],
            AstNode::Scan {
                format: "%d".to_string(),
                targets: vec!["x".to_string()],
            }
        );
        match &body[1] {
            AstNode::Print { format, args, .. } => {
                assert_eq!(format.as_deref(), Some(r"x=%d\n"));
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected print, got {:?}", other),
        }
    }

    #[test]
    fn test_define_captured_as_item() {
        let program = parse("#define SIZE 100\nint main() { return 0; }");
        assert_eq!(
            program.items[0],
            AstNode::Define {
                name: "SIZE".to_string(),
                value: "100".to_string(),
            }
        );
    }

    #[test]
    fn test_ternary_and_compound_assign() {
        let program = parse("int main() { x += y > 0 ? 1 : 2; return 0; }");
        let body = main_body(&program);
        match &body[0] {
            AstNode::CompoundAssign { op, value, .. } => {
                assert_eq!(*op, BinOp::Add);
                assert!(matches!(value.as_ref(), AstNode::Ternary { .. }));
            }
            other => panic!("expected compound assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_switch_with_break() {
        let program = parse(
            "int main() { switch (x) { case 1: y = 1; break; default: y = 0; } return 0; }",
        );
        let body = main_body(&program);
        match &body[0] {
            AstNode::Switch { cases, .. } => {
                assert_eq!(cases.len(), 2);
                match &cases[0] {
                    SwitchCase::Case { body, .. } => {
                        assert_eq!(body.len(), 2);
                        assert_eq!(body[1], AstNode::Break);
                    }
                    other => panic!("expected case, got {:?}", other),
                }
            }
            other => panic!("expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_error_reports_expected_and_actual() {
        let err = Parser::new("int main() { int ; }")
            .expect("lexing should succeed")
            .parse_program()
            .unwrap_err();
        assert_eq!(err.expected, "a variable name");
        assert_eq!(err.line, 1);
    }
}
