// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tokenizer for shell expressions.
//!
//! ```text
//! trivia:   whitespace, # line comments, /* block comments */
//! ident:    [A-Za-z_][A-Za-z0-9_'-]*   (with/true/false/null are keywords)
//! string:   "..." with \n \t \r \" \\ \$ escapes, or ''indented''
//! path:     <channel>
//! punct:    { } [ ] ( ) : ; , ? = . ...
//! ```

use super::Span;
use crate::error::ParseError;

/// Token kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Int(i64),
    LookupPath(String),
    With,
    True,
    False,
    Null,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Semicolon,
    Comma,
    Question,
    Equals,
    Dot,
    Ellipsis,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::Str(_) => write!(f, "string"),
            Self::Int(value) => write!(f, "integer {value}"),
            Self::LookupPath(path) => write!(f, "'<{path}>'"),
            Self::With => write!(f, "'with'"),
            Self::True => write!(f, "'true'"),
            Self::False => write!(f, "'false'"),
            Self::Null => write!(f, "'null'"),
            Self::LBrace => write!(f, "'{{'"),
            Self::RBrace => write!(f, "'}}'"),
            Self::LBracket => write!(f, "'['"),
            Self::RBracket => write!(f, "']'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::Colon => write!(f, "':'"),
            Self::Semicolon => write!(f, "';'"),
            Self::Comma => write!(f, "','"),
            Self::Question => write!(f, "'?'"),
            Self::Equals => write!(f, "'='"),
            Self::Dot => write!(f, "'.'"),
            Self::Ellipsis => write!(f, "'...'"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Split `source` into tokens. The last token is always [`TokenKind::Eof`].
///
/// # Errors
///
/// Returns a [`ParseError`] on unknown characters, unterminated strings or
/// comments, bad escapes and integer overflow.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    const fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.span();
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(ParseError::UnterminatedComment { span: start }),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;
        let span = self.span();
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span,
            });
        };

        let kind = match ch {
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '?' => self.single(TokenKind::Question),
            '=' => self.single(TokenKind::Equals),
            '.' if self.peek_at(1) == Some('.') && self.peek_at(2) == Some('.') => {
                self.bump();
                self.bump();
                self.single(TokenKind::Ellipsis)
            }
            '.' => self.single(TokenKind::Dot),
            '"' => self.string(span)?,
            '\'' if self.peek_at(1) == Some('\'') => self.indented_string(span)?,
            '<' => self.lookup_path(span)?,
            c if c.is_ascii_digit() => self.integer(span)?,
            c if c.is_alphabetic() || c == '_' => self.ident(),
            other => return Err(ParseError::UnexpectedChar { ch: other, span }),
        };

        Ok(Token { kind, span })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn ident(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '\'' | '-') {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        match name.as_str() {
            "with" => TokenKind::With,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(name),
        }
    }

    fn integer(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        let mut digits = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            digits.push(c);
            self.bump();
        }
        digits
            .parse::<i64>()
            .map(TokenKind::Int)
            .map_err(|_| ParseError::IntegerOverflow { span })
    }

    fn lookup_path(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        let mut len = 1;
        while let Some(c) = self.peek_at(len) {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/') {
                len += 1;
            } else {
                break;
            }
        }
        if len == 1 || self.peek_at(len) != Some('>') {
            return Err(ParseError::UnexpectedChar { ch: '<', span });
        }

        self.bump();
        let path: String = (1..len).filter_map(|_| self.bump()).collect();
        self.bump();
        Ok(TokenKind::LookupPath(path))
    }

    fn string(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        self.bump();
        let mut value = String::new();
        loop {
            let escape_span = self.span();
            match self.bump() {
                None => return Err(ParseError::UnterminatedString { span }),
                Some('"') => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(c @ ('"' | '\\' | '$')) => value.push(c),
                    Some(c) => return Err(ParseError::InvalidEscape { ch: c, span: escape_span }),
                    None => return Err(ParseError::UnterminatedString { span }),
                },
                Some('$') if self.peek() == Some('{') => {
                    return Err(interpolation_error(escape_span));
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn indented_string(&mut self, span: Span) -> Result<TokenKind, ParseError> {
        self.bump();
        self.bump();
        let mut raw = String::new();
        loop {
            let here = self.span();
            match self.bump() {
                None => return Err(ParseError::UnterminatedString { span }),
                Some('\'') if self.peek() == Some('\'') => match self.peek_at(1) {
                    Some('\'') => {
                        self.bump();
                        self.bump();
                        raw.push_str("''");
                    }
                    Some('$') => {
                        self.bump();
                        self.bump();
                        raw.push('$');
                    }
                    _ => {
                        self.bump();
                        return Ok(TokenKind::Str(strip_indentation(&raw)));
                    }
                },
                Some('$') if self.peek() == Some('{') => return Err(interpolation_error(here)),
                Some(c) => raw.push(c),
            }
        }
    }
}

fn interpolation_error(span: Span) -> ParseError {
    ParseError::UnexpectedToken {
        expected: "plain string".to_string(),
        found: "interpolation '${'".to_string(),
        span,
    }
}

/// Remove the common leading indentation of an `''indented''` string.
///
/// A whitespace-only first line and a whitespace-only last line are dropped.
fn strip_indentation(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() > 1 && lines[0].trim().is_empty() {
        lines.remove(0);
    }

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    let mut out = lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    if let Some(pos) = out.rfind('\n')
        && out[pos + 1..].trim().is_empty()
    {
        out.truncate(pos + 1);
    }
    out
}
