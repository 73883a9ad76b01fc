//! Recursive-descent parser for the Java subset.
//!
//! Accepts a single `public class` wrapper of static methods and hoists the
//! methods straight into [`Program`] items, so the generators see the same
//! shape regardless of source language. `HashMap` declarations and
//! `put`/`get`/`containsKey` calls become first-class map nodes. The 2-D
//! bracket ambiguity is resolved with the same bracket-depth scan the C
//! parser uses.

use crate::ast::*;
use crate::error::{LexError, ParseError};
use crate::java::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse `import` lines (skipped), the class wrapper, and its methods.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while self.match_kind(TokenKind::KwImport) {
            while !self.match_kind(TokenKind::Semicolon) {
                if self.check(TokenKind::Eof) {
                    return Err(self.error("';' to end import"));
                }
                self.advance_token();
            }
        }

        self.match_kind(TokenKind::KwPublic);
        self.expect(TokenKind::KwClass, "'class'")?;
        self.expect_identifier("a class name")?;
        self.expect(TokenKind::LBrace, "'{' after class name")?;

        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            program.items.push(self.parse_method()?);
        }

        self.expect(TokenKind::RBrace, "'}' to close class")?;
        Ok(program)
    }

    /// One static method, hoisted to a top-level function. `main` is tagged
    /// as the entry point and its `String[] args` parameter is dropped.
    fn parse_method(&mut self) -> Result<AstNode, ParseError> {
        while matches!(
            self.peek_kind(),
            TokenKind::KwPublic | TokenKind::KwPrivate | TokenKind::KwStatic
        ) {
            self.advance_token();
        }

        let return_type = self.expect_type("a return type")?;
        let name = self.expect_identifier("a method name")?;

        self.expect(TokenKind::LParen, "'(' after method name")?;
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

        loop {
            let ty = self.expect_type("a parameter type")?;
            let mut is_array = false;
            if self.match_kind(TokenKind::LBracket) {
                self.expect(TokenKind::RBracket, "']' in array parameter")?;
                is_array = true;
            }
            let name = self.expect_identifier("a parameter name")?;
            params.push(Param { ty, name, is_array });

            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

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
            k if is_type_keyword(k) => self.parse_declaration(None),
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
            TokenKind::Ident => {
                let text = self.peek().text.clone();
                if text == "System" {
                    self.parse_sysout()
                } else if text == "HashMap" && self.peek_ahead_kind(1) == TokenKind::Lt {
                    self.parse_map_decl()
                } else if self.peek_ahead_kind(1) == TokenKind::Ident {
                    // `Type name ...` with a user-written type name
                    let ty = self.advance_token().text;
                    self.parse_declaration(Some(ty))
                } else {
                    self.parse_identifier_statement()
                }
            }
            _ => Err(self.error("a statement")),
        }
    }

    /// Scalar and array declarations. Java puts the brackets on the type
    /// (`int[] a`), and array declarations always carry a `new` or literal
    /// initializer.
    fn parse_declaration(&mut self, ty: Option<String>) -> Result<AstNode, ParseError> {
        let ty = match ty {
            Some(t) => t,
            None => self.expect_type("a type")?,
        };

        let mut dims = 0;
        while self.match_kind(TokenKind::LBracket) {
            self.expect(TokenKind::RBracket, "']' in array type")?;
            dims += 1;
        }

        let name = self.expect_identifier("a variable name")?;

        if dims == 0 {
            let init = if self.match_kind(TokenKind::Assign) {
                Some(Box::new(self.parse_expression()?))
            } else {
                None
            };
            self.expect(TokenKind::Semicolon, "';' after declaration")?;
            return Ok(AstNode::VarDecl { ty, name, init });
        }

        self.expect(TokenKind::Assign, "'=' in array declaration")?;

        if self.check(TokenKind::LBrace) {
            if dims != 1 {
                return Err(self.error("'new' in 2-D array declaration"));
            }
            let init = self.parse_initializer_list()?;
            self.expect(TokenKind::Semicolon, "';' after declaration")?;
            return Ok(AstNode::ArrayDecl {
                ty,
                name,
                size: None,
                init: Some(init),
            });
        }

        self.expect(TokenKind::KwNew, "'new' or an initializer list")?;
        self.expect_type("an element type after 'new'")?;
        self.expect(TokenKind::LBracket, "'[' after element type")?;
        let size = self.parse_expression()?;
        self.expect(TokenKind::RBracket, "']' after array size")?;

        if dims == 2 {
            self.expect(TokenKind::LBracket, "'[' for column count")?;
            let cols = self.parse_expression()?;
            self.expect(TokenKind::RBracket, "']' after column count")?;
            self.expect(TokenKind::Semicolon, "';' after declaration")?;
            return Ok(AstNode::ArrayDecl2D {
                ty,
                name,
                rows: Box::new(size),
                cols: Box::new(cols),
            });
        }

        self.expect(TokenKind::Semicolon, "';' after declaration")?;
        Ok(AstNode::ArrayDecl {
            ty,
            name,
            size: Some(Box::new(size)),
            init: None,
        })
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

    /// `HashMap<K, V> name = new HashMap<>();`
    fn parse_map_decl(&mut self) -> Result<AstNode, ParseError> {
        self.advance_token(); // HashMap
        self.expect(TokenKind::Lt, "'<' after 'HashMap'")?;
        let key_ty = self.expect_type("a key type")?;
        self.expect(TokenKind::Comma, "',' between map type arguments")?;
        let val_ty = self.expect_type("a value type")?;
        self.expect(TokenKind::Gt, "'>' after map type arguments")?;
        let name = self.expect_identifier("a map name")?;
        self.expect(TokenKind::Assign, "'=' in map declaration")?;
        self.expect(TokenKind::KwNew, "'new' in map declaration")?;
        let ctor = self.expect_identifier("'HashMap'")?;
        if ctor != "HashMap" {
            return Err(self.error("'HashMap'"));
        }
        self.expect(TokenKind::Lt, "'<' in map constructor")?;
        self.expect(TokenKind::Gt, "'>' in map constructor")?;
        self.expect(TokenKind::LParen, "'(' in map constructor")?;
        self.expect(TokenKind::RParen, "')' in map constructor")?;
        self.expect(TokenKind::Semicolon, "';' after map declaration")?;

        Ok(AstNode::MapDecl {
            key_ty,
            val_ty,
            name,
        })
    }

    /// `System.out.println(...)`, `System.out.print(...)`,
    /// `System.out.printf(...)`.
    fn parse_sysout(&mut self) -> Result<AstNode, ParseError> {
        self.advance_token(); // System
        self.expect(TokenKind::Dot, "'.' after 'System'")?;
        let out = self.expect_identifier("'out'")?;
        if out != "out" {
            return Err(self.error("'out'"));
        }
        self.expect(TokenKind::Dot, "'.' after 'out'")?;
        let method = self.expect_identifier("'println', 'print', or 'printf'")?;
        self.expect(TokenKind::LParen, "'(' after output method")?;

        let node = match method.as_str() {
            "println" | "print" => {
                let newline = method == "println";
                if self.check(TokenKind::RParen) {
                    AstNode::Print {
                        format: Some(String::new()),
                        args: Vec::new(),
                        newline,
                    }
                } else {
                    let arg = self.parse_expression()?;
                    match arg {
                        AstNode::StrLit(text) => AstNode::Print {
                            format: Some(unquote(&text)),
                            args: Vec::new(),
                            newline,
                        },
                        other => AstNode::Print {
                            format: None,
                            args: vec![other],
                            newline,
                        },
                    }
                }
            }
            "printf" => {
                let fmt = self.expect(TokenKind::StrLit, "a format string")?;
                let mut args = Vec::new();
                while self.match_kind(TokenKind::Comma) {
                    args.push(self.parse_expression()?);
                }
                AstNode::Print {
                    format: Some(unquote(&fmt.text)),
                    args,
                    newline: false,
                }
            }
            _ => return Err(self.error("'println', 'print', or 'printf'")),
        };

        self.expect(TokenKind::RParen, "')' after output arguments")?;
        self.expect(TokenKind::Semicolon, "';' after output statement")?;
        Ok(node)
    }

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

    /// Statements that start with a plain identifier: map calls, method
    /// calls, array assignments, compound assignments, and assignments.
    fn parse_identifier_statement(&mut self) -> Result<AstNode, ParseError> {
        let name = self.expect_identifier("an identifier")?;

        match self.peek_kind() {
            TokenKind::Dot => {
                self.advance_token();
                let method = self.expect_identifier("a method name")?;
                self.expect(TokenKind::LParen, "'(' after method name")?;
                let args = self.parse_call_args()?;
                self.expect(TokenKind::Semicolon, "';' after call")?;

                if method == "put" {
                    if args.len() != 2 {
                        return Err(self.error("two arguments to 'put'"));
                    }
                    let mut args = args.into_iter();
                    let key = args.next().ok_or_else(|| self.error("a key"))?;
                    let value = args.next().ok_or_else(|| self.error("a value"))?;
                    return Ok(AstNode::MapPut {
                        map: name,
                        key: Box::new(key),
                        value: Box::new(value),
                    });
                }

                Ok(AstNode::CallStmt {
                    name: format!("{}.{}", name, method),
                    args,
                })
            }
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
                    TokenKind::Dot => {
                        self.advance_token();
                        let method = self.expect_identifier("a method name")?;
                        self.expect(TokenKind::LParen, "'(' after method name")?;
                        let args = self.parse_call_args()?;

                        match method.as_str() {
                            "get" if args.len() == 1 => {
                                let key = args.into_iter().next().ok_or_else(|| self.error("a key"))?;
                                Ok(AstNode::MapGet {
                                    map: name,
                                    key: Box::new(key),
                                })
                            }
                            "containsKey" if args.len() == 1 => {
                                let key = args.into_iter().next().ok_or_else(|| self.error("a key"))?;
                                Ok(AstNode::MapContains {
                                    map: name,
                                    key: Box::new(key),
                                })
                            }
                            _ => Ok(AstNode::Call {
                                name: format!("{}.{}", name, method),
                                args,
                            }),
                        }
                    }
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

    /// Same bracket-depth scan as the C parser, applied at every bracketed
    /// call site.
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

    /// Accept type keywords and bare identifiers (boxed types like
    /// `Integer`, user classes) as type names.
    fn expect_type(&mut self, expected: &str) -> Result<String, ParseError> {
        if is_type_keyword(self.peek_kind()) || self.check(TokenKind::Ident) {
            Ok(self.advance_token().text)
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
            | TokenKind::KwBoolean
            | TokenKind::KwString
    )
}

fn binary(op: BinOp, lhs: AstNode, rhs: AstNode) -> AstNode {
    AstNode::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

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
    fn test_class_wrapper_and_main() {
        let program = parse(
            "public class Main { public static void main(String[] args) { int x = 1; } }",
        );
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
    fn test_imports_skipped() {
        let program = parse(
            "import java.util.HashMap;\nimport java.util.Scanner;\npublic class Main { public static void main(String[] args) { } }",
        );
        assert_eq!(program.items.len(), 1);
    }

    #[test]
    fn test_map_declaration_and_put() {
        let program = parse(
            "public class Main { public static void main(String[] args) { HashMap<Integer, Integer> ages = new HashMap<>(); ages.put(1, 30); } }",
        );
        let body = main_body(&program);
        assert_eq!(
            body[0],
            AstNode::MapDecl {
                key_ty: "Integer".to_string(),
                val_ty: "Integer".to_string(),
                name: "ages".to_string(),
            }
        );
        assert!(matches!(&body[1], AstNode::MapPut { map, .. } if map == "ages"));
    }

    #[test]
    fn test_map_get_and_contains_as_expressions() {
        let program = parse(
            "public class Main { public static void main(String[] args) { int a = ages.get(1); if (ages.containsKey(2)) { a = 0; } } }",
        );
        let body = main_body(&program);
        match &body[0] {
            AstNode::VarDecl { init: Some(init), .. } => {
                assert!(matches!(init.as_ref(), AstNode::MapGet { .. }));
            }
            other => panic!("expected declaration, got {:?}", other),
        }
        match &body[1] {
            AstNode::If { branches, .. } => {
                assert!(matches!(branches[0].cond, AstNode::MapContains { .. }));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_println_bare_string_vs_value() {
        let program = parse(
            r#"public class Main { public static void main(String[] args) { System.out.println("hi"); System.out.println(x); } }"#,
        );
        let body = main_body(&program);
        assert_eq!(
            body[0],
            AstNode::Print {
                format: Some("hi".to_string()),
                args: Vec::new(),
                newline: true,
            }
        );
        assert_eq!(
            body[1],
            AstNode::Print {
                format: None,
                args: vec![AstNode::Ident("x".to_string())],
                newline: true,
            }
        );
    }

    #[test]
    fn test_java_array_forms() {
        let program = parse(
            "public class Main { public static void main(String[] args) { int[] a = new int[5]; int[] b = {1, 2, 3}; int[][] m = new int[3][4]; } }",
        );
        let body = main_body(&program);
        assert!(matches!(&body[0], AstNode::ArrayDecl { size: Some(_), init: None, .. }));
        match &body[1] {
            AstNode::ArrayDecl { size, init, .. } => {
                assert!(size.is_none());
                assert_eq!(init.as_ref().unwrap().len(), 3);
            }
            other => panic!("expected array declaration, got {:?}", other),
        }
        assert!(matches!(&body[2], AstNode::ArrayDecl2D { .. }));
    }

    #[test]
    fn test_2d_assignment_uses_depth_scan() {
        let program = parse(
            "public class Main { public static void main(String[] args) { m[i + 1][j] = 5; a[k] = 1; } }",
        );
        let body = main_body(&program);
        assert!(matches!(&body[0], AstNode::ArrayAssign2D { .. }));
        assert!(matches!(&body[1], AstNode::ArrayAssign { .. }));
    }

    #[test]
    fn test_boolean_literals() {
        let program = parse(
            "public class Main { public static void main(String[] args) { boolean ok = true; } }",
        );
        let body = main_body(&program);
        assert_eq!(
            body[0],
            AstNode::VarDecl {
                ty: "boolean".to_string(),
                name: "ok".to_string(),
                init: Some(Box::new(AstNode::BoolLit(true))),
            }
        );
    }
}
