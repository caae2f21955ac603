use std::rc::Rc;

use thiserror::Error;

use crate::ast::{Block, Expr, InfixOp, PrefixOp, Program, Stmt};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

// Internal unwinding marker. The human-readable diagnostic has already been
// pushed onto the error list by the time one of these is in flight.
#[derive(Error, Debug)]
#[error("statement failed to parse")]
struct ParseFail;

/// Binding strength for Pratt parsing, ordered low to high. An infix rule
/// runs while the peek token binds strictly tighter than the floor the
/// caller passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

/// Recursive-descent parser with Pratt expression parsing over a two-token
/// lookahead window.
///
/// Recovery policy: every statement attempts a full parse. On the first
/// failure inside a statement the diagnostic is recorded, the statement is
/// dropped from the program, and the parser skips ahead to the next `;` (or
/// stops at end of input) before trying the next statement. A program that
/// produced any errors must not be evaluated.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: Token<'src>,
    peek: Token<'src>,
    errors: Vec<String>,
}

impl<'src> Parser<'src> {
    pub fn new(mut lexer: Lexer<'src>) -> Parser<'src> {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Parser {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(ParseFail) => self.synchronize(),
            }
            self.advance();
        }
        Program { statements }
    }

    fn advance(&mut self) {
        self.cur = self.peek;
        self.peek = self.lexer.next_token();
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Result<(), ParseFail> {
        if self.peek_is(kind) {
            self.advance();
            Ok(())
        } else {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead",
                kind, self.peek.kind
            ));
            Err(ParseFail)
        }
    }

    fn synchronize(&mut self) {
        while !self.cur_is(TokenKind::Semicolon) && !self.cur_is(TokenKind::Eof) {
            self.advance();
        }
    }

    // Statement parsers leave `cur` on the last token of the statement; the
    // program loop advances past it.

    fn parse_statement(&mut self) -> Result<Stmt, ParseFail> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Stmt, ParseFail> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur.literal.to_string();
        self.expect_peek(TokenKind::Assign)?;
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
        Ok(Stmt::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, ParseFail> {
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
        Ok(Stmt::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseFail> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        // A trailing ';' is optional after an expression statement
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
        Ok(Stmt::Expr(expr))
    }

    /// The Pratt loop. Prefix and infix rules are closed matches over the
    /// token kind rather than registered function maps, so a new token kind
    /// without a rule is a compile-time hole instead of a runtime surprise.
    fn parse_expression(&mut self, floor: Precedence) -> Result<Expr, ParseFail> {
        let mut left = match self.cur.kind {
            TokenKind::Ident => Expr::Identifier(self.cur.literal.to_string()),
            TokenKind::Int => self.parse_integer_literal()?,
            TokenKind::Str => Expr::Str(self.cur.literal.to_string()),
            TokenKind::True => Expr::Boolean(true),
            TokenKind::False => Expr::Boolean(false),
            TokenKind::Bang => self.parse_prefix_expression(PrefixOp::Bang)?,
            TokenKind::Minus => self.parse_prefix_expression(PrefixOp::Minus)?,
            TokenKind::LParen => self.parse_grouped_expression()?,
            TokenKind::If => self.parse_if_expression()?,
            TokenKind::Function => self.parse_function_literal()?,
            TokenKind::LBracket => Expr::Array(self.parse_expression_list(TokenKind::RBracket)?),
            TokenKind::LBrace => self.parse_hash_literal()?,
            other => {
                self.errors
                    .push(format!("no prefix parse function for {} found", other));
                return Err(ParseFail);
            }
        };

        while !self.peek_is(TokenKind::Semicolon) && floor < precedence_of(self.peek.kind) {
            left = match self.peek.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Asterisk
                | TokenKind::Slash
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Eq
                | TokenKind::NotEq => {
                    self.advance();
                    self.parse_infix_expression(left)?
                }
                TokenKind::LParen => {
                    self.advance();
                    Expr::Call {
                        callee: Box::new(left),
                        arguments: self.parse_expression_list(TokenKind::RParen)?,
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.parse_index_expression(left)?
                }
                _ => break,
            };
        }
        Ok(left)
    }

    fn parse_integer_literal(&mut self) -> Result<Expr, ParseFail> {
        match self.cur.literal.parse::<i64>() {
            Ok(value) => Ok(Expr::Integer(value)),
            Err(_) => {
                self.errors.push(format!(
                    "could not parse {:?} as integer",
                    self.cur.literal
                ));
                Err(ParseFail)
            }
        }
    }

    fn parse_prefix_expression(&mut self, operator: PrefixOp) -> Result<Expr, ParseFail> {
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Ok(Expr::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Result<Expr, ParseFail> {
        let operator = match self.cur.kind {
            TokenKind::Plus => InfixOp::Plus,
            TokenKind::Minus => InfixOp::Minus,
            TokenKind::Asterisk => InfixOp::Asterisk,
            TokenKind::Slash => InfixOp::Slash,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::Gt => InfixOp::Gt,
            TokenKind::Eq => InfixOp::Eq,
            TokenKind::NotEq => InfixOp::NotEq,
            kind => unreachable!("token {} is not an infix operator", kind),
        };
        let precedence = precedence_of(self.cur.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Ok(Expr::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Result<Expr, ParseFail> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if_expression(&mut self) -> Result<Expr, ParseFail> {
        self.expect_peek(TokenKind::LParen)?;
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;
        let alternative = if self.peek_is(TokenKind::Else) {
            self.advance();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    /// Called with `cur` on `{`; returns with `cur` on the matching `}`.
    fn parse_block(&mut self) -> Result<Block, ParseFail> {
        let mut statements = Vec::new();
        self.advance();
        while !self.cur_is(TokenKind::RBrace) {
            if self.cur_is(TokenKind::Eof) {
                self.errors.push(format!(
                    "expected next token to be {}, got {} instead",
                    TokenKind::RBrace,
                    TokenKind::Eof
                ));
                return Err(ParseFail);
            }
            statements.push(self.parse_statement()?);
            self.advance();
        }
        Ok(Block { statements })
    }

    fn parse_function_literal(&mut self) -> Result<Expr, ParseFail> {
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        Ok(Expr::Function {
            parameters: Rc::new(parameters),
            body: Rc::new(body),
        })
    }

    fn parse_function_parameters(&mut self) -> Result<Vec<String>, ParseFail> {
        let mut parameters = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Ok(parameters);
        }
        self.expect_peek(TokenKind::Ident)?;
        parameters.push(self.cur.literal.to_string());
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.expect_peek(TokenKind::Ident)?;
            parameters.push(self.cur.literal.to_string());
        }
        self.expect_peek(TokenKind::RParen)?;
        Ok(parameters)
    }

    /// Comma-separated expressions terminated by `end`, shared by call
    /// arguments and array literals.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expr>, ParseFail> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.advance();
            return Ok(list);
        }
        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_peek(end)?;
        Ok(list)
    }

    fn parse_hash_literal(&mut self) -> Result<Expr, ParseFail> {
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::Colon)?;
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }
        self.expect_peek(TokenKind::RBrace)?;
        Ok(Expr::Hash(pairs))
    }

    fn parse_index_expression(&mut self, left: Expr) -> Result<Expr, ParseFail> {
        self.advance();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBracket)?;
        Ok(Expr::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }
}
