// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shell expression front end.
//!
//! ```text
//! source text --> lexer::tokenize --> Vec<Token>
//!                                        |
//!                                        v
//!                              parser::parse_file --> ast::File
//!
//! { pkgs ? import <nixpkgs> {} }:   <- formals (parameter bindings)
//! with pkgs;                         <- namespace opening
//! mkShell {                          <- builder application
//!   nativeBuildInputs = [ rustup ];  <- record literal
//! }
//! ```
//!
//! Only the subset needed to describe an environment is accepted: no
//! `let`, no recursion, no string interpolation.

pub mod ast;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;

use serde::Serialize;

pub use ast::File;
pub use parser::{parse_expr, parse_file};

/// Source position (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
