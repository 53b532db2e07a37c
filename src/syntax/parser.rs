// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recursive-descent parser.
//!
//! ```text
//! file     := [formals ':'] ('with' expr ';')* expr
//! formals  := '{' [param (',' param)* [',' '...'] | '...'] '}'
//! param    := IDENT ['?' expr]
//! expr     := select+                      (juxtaposition = application)
//! select   := atom ('.' IDENT)*
//! atom     := IDENT | STRING | INT | true | false | null | <path>
//!           | '[' select* ']' | '{' (IDENT '=' expr ';')* '}' | '(' expr ')'
//! ```
//!
//! The final body expression must be a builder applied to a record literal.
//! Expression trees deeper than [`MAX_NESTING`] are rejected.

use std::collections::BTreeSet;

use super::Span;
use super::ast::{Binding, Expr, ExprKind, File, Formals, ParamDecl};
use super::lexer::{Token, TokenKind, tokenize};
use crate::error::ParseError;

/// Parse a complete specification file.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a valid specification.
pub fn parse_file(source: &str) -> Result<File, ParseError> {
    let mut parser = Parser::new(tokenize(source)?);
    let file = parser.file()?;
    parser.expect_eof()?;
    Ok(file)
}

/// Parse a standalone expression, as used for command-line overrides.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a single valid expression.
pub fn parse_expr(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokenize(source)?);
    let expr = parser.expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

/// Deepest expression tree accepted, counting brackets, applications and
/// attribute selections.
pub const MAX_NESTING: usize = 256;

/// An expression with the height of its tree.
type Parsed = (Expr, usize);

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Open brackets, braces and parentheses around the current token.
    depth: usize,
}

impl Parser {
    const fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    const fn too_deep(span: Span) -> ParseError {
        ParseError::NestingTooDeep {
            span,
            limit: MAX_NESTING,
        }
    }

    fn enter(&mut self, span: Span) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(Self::too_deep(span));
        }
        self.depth += 1;
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Height of a node whose tallest child is `child` high.
    const fn node_height(child: usize, span: Span) -> Result<usize, ParseError> {
        if child >= MAX_NESTING {
            Err(Self::too_deep(span))
        } else {
            Ok(child + 1)
        }
    }

    fn peek(&self) -> &Token {
        // tokenize() always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                expected: expected.to_string(),
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.to_string(),
                span: token.span,
            }
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Span, ParseError> {
        if self.peek_kind() == kind {
            Ok(self.bump().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(String, Span), ParseError> {
        match self.peek_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                Ok((name, self.bump().span))
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if *self.peek_kind() == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn file(&mut self) -> Result<File, ParseError> {
        let formals = if *self.peek_kind() == TokenKind::LBrace {
            let formals = self.formals()?;
            self.expect(&TokenKind::Colon, "':' after parameter list")?;
            formals
        } else {
            Formals::default()
        };

        let mut namespaces = Vec::new();
        while *self.peek_kind() == TokenKind::With {
            self.bump();
            namespaces.push(self.expr()?);
            self.expect(&TokenKind::Semicolon, "';' after 'with' expression")?;
        }

        let body = self.expr()?;
        let (builder, record) = split_builder_call(body)?;
        Ok(File {
            formals,
            namespaces,
            builder,
            record,
        })
    }

    fn formals(&mut self) -> Result<Formals, ParseError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut formals = Formals::default();
        let mut seen = BTreeSet::new();

        loop {
            match self.peek_kind() {
                TokenKind::RBrace => {
                    self.bump();
                    return Ok(formals);
                }
                TokenKind::Ellipsis => {
                    self.bump();
                    formals.ellipsis = true;
                    self.expect(&TokenKind::RBrace, "'}' after '...'")?;
                    return Ok(formals);
                }
                _ => {}
            }

            let (name, span) = self.expect_ident("parameter name")?;
            if !seen.insert(name.clone()) {
                return Err(ParseError::DuplicateParameter { name, span });
            }

            let default = if *self.peek_kind() == TokenKind::Question {
                self.bump();
                Some(self.expr()?)
            } else {
                None
            };
            formals.params.push(ParamDecl {
                name,
                default,
                span,
            });

            match self.peek_kind() {
                TokenKind::Comma => {
                    self.bump();
                }
                TokenKind::RBrace => {}
                _ => return Err(self.unexpected("',' or '}' in parameter list")),
            }
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.application().map(|(expr, _)| expr)
    }

    fn application(&mut self) -> Result<Parsed, ParseError> {
        let (mut expr, mut height) = self.select()?;
        while starts_atom(self.peek_kind()) {
            let (arg, arg_height) = self.select()?;
            let span = expr.span;
            height = Self::node_height(height.max(arg_height), span)?;
            expr = Expr::new(
                ExprKind::Apply {
                    func: Box::new(expr),
                    arg: Box::new(arg),
                },
                span,
            );
        }
        Ok((expr, height))
    }

    fn select(&mut self) -> Result<Parsed, ParseError> {
        let (mut expr, mut height) = self.atom()?;
        while *self.peek_kind() == TokenKind::Dot {
            self.bump();
            let attr = match self.peek_kind() {
                TokenKind::Ident(name) | TokenKind::Str(name) => name.clone(),
                _ => return Err(self.unexpected("attribute name after '.'")),
            };
            let span = self.bump().span;
            height = Self::node_height(height, span)?;
            expr = Expr::new(
                ExprKind::Select {
                    target: Box::new(expr),
                    attr,
                },
                span,
            );
        }
        Ok((expr, height))
    }

    fn atom(&mut self) -> Result<Parsed, ParseError> {
        let token = self.peek().clone();
        let kind = match token.kind {
            TokenKind::Ident(name) => {
                self.bump();
                ExprKind::Ident(name)
            }
            TokenKind::Str(value) => {
                self.bump();
                ExprKind::Str(value)
            }
            TokenKind::Int(value) => {
                self.bump();
                ExprKind::Int(value)
            }
            TokenKind::True => {
                self.bump();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.bump();
                ExprKind::Bool(false)
            }
            TokenKind::Null => {
                self.bump();
                ExprKind::Null
            }
            TokenKind::LookupPath(path) => {
                self.bump();
                ExprKind::LookupPath(path)
            }
            TokenKind::LBracket => {
                self.bump();
                self.enter(token.span)?;
                let mut items = Vec::new();
                let mut tallest = 0;
                while *self.peek_kind() != TokenKind::RBracket {
                    if *self.peek_kind() == TokenKind::Eof {
                        return Err(self.unexpected("']'"));
                    }
                    let (item, height) = self.select()?;
                    tallest = tallest.max(height);
                    items.push(item);
                }
                self.bump();
                self.leave();
                let height = Self::node_height(tallest, token.span)?;
                return Ok((Expr::new(ExprKind::List(items), token.span), height));
            }
            TokenKind::LBrace => {
                self.bump();
                self.enter(token.span)?;
                let (bindings, tallest) = self.bindings()?;
                self.leave();
                let height = Self::node_height(tallest, token.span)?;
                return Ok((Expr::new(ExprKind::AttrSet(bindings), token.span), height));
            }
            TokenKind::LParen => {
                self.bump();
                self.enter(token.span)?;
                let inner = self.application()?;
                self.expect(&TokenKind::RParen, "')'")?;
                self.leave();
                return Ok(inner);
            }
            _ => return Err(self.unexpected("expression")),
        };
        Ok((Expr::new(kind, token.span), 1))
    }

    /// Bindings of an attribute set, after the opening brace, with the
    /// height of the tallest value.
    fn bindings(&mut self) -> Result<(Vec<Binding>, usize), ParseError> {
        let mut bindings = Vec::new();
        let mut tallest = 0;
        loop {
            if *self.peek_kind() == TokenKind::RBrace {
                self.bump();
                return Ok((bindings, tallest));
            }

            let (name, span) = match self.peek_kind() {
                TokenKind::Ident(name) | TokenKind::Str(name) => {
                    let name = name.clone();
                    (name, self.bump().span)
                }
                _ => return Err(self.unexpected("attribute name or '}'")),
            };
            self.expect(&TokenKind::Equals, "'=' after attribute name")?;
            let (value, height) = self.application()?;
            tallest = tallest.max(height);
            self.expect(&TokenKind::Semicolon, "';' after attribute value")?;
            bindings.push(Binding { name, value, span });
        }
    }
}

const fn starts_atom(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Str(_)
            | TokenKind::Int(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::LookupPath(_)
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::LParen
    )
}

/// Split `builder { ... }` into the builder expression and the record fields.
///
/// Duplicate field names are kept: rejecting them is the builder's job,
/// after field names have been canonicalized.
fn split_builder_call(body: Expr) -> Result<(Expr, Vec<Binding>), ParseError> {
    let span = body.span;
    let ExprKind::Apply { func, arg } = body.kind else {
        return Err(ParseError::InvalidBody {
            span,
            message: "expected a builder applied to a record literal".to_string(),
        });
    };
    let arg = *arg;
    let arg_span = arg.span;
    let ExprKind::AttrSet(record) = arg.kind else {
        return Err(ParseError::InvalidBody {
            span: arg_span,
            message: "builder argument must be a record literal".to_string(),
        });
    };
    if matches!(func.kind, ExprKind::Apply { .. }) {
        return Err(ParseError::InvalidBody {
            span: func.span,
            message: "builder must be a single name, not an application".to_string(),
        });
    }
    Ok((*func, record))
}
