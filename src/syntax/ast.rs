// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Syntax tree for shell expressions.

use super::Span;

/// A parsed specification file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    /// Parameter list (`{ a ? default, b }:`), empty when the file has none.
    pub formals: Formals,
    /// `with <expr>;` directives, outermost first.
    pub namespaces: Vec<Expr>,
    /// Expression naming the builder (`mkShell`, `pkgs.mkShell`).
    pub builder: Expr,
    /// Fields of the record literal passed to the builder.
    pub record: Vec<Binding>,
}

/// Declared parameters of a specification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Formals {
    pub params: Vec<ParamDecl>,
    /// `...` present: undeclared overrides are accepted and ignored.
    pub ellipsis: bool,
}

/// One entry of the parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub default: Option<Expr>,
    pub span: Span,
}

/// `name = value;` inside an attribute set.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// Expression node with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
    /// `<channel>`
    LookupPath(String),
    List(Vec<Expr>),
    AttrSet(Vec<Binding>),
    /// `target.attr`
    Select { target: Box<Expr>, attr: String },
    /// `func arg`
    Apply { func: Box<Expr>, arg: Box<Expr> },
}

impl Expr {
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Identifier name if this node is a bare identifier.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

// Constructors for specifications assembled in code. Nodes built this way
// carry a default (0:0) span.
impl Expr {
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()), Span::default())
    }

    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Str(value.into()), Span::default())
    }

    #[must_use]
    pub fn lookup_path(channel: impl Into<String>) -> Self {
        Self::new(ExprKind::LookupPath(channel.into()), Span::default())
    }

    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::new(ExprKind::List(items.into_iter().collect()), Span::default())
    }

    #[must_use]
    pub fn attrs(bindings: impl IntoIterator<Item = Binding>) -> Self {
        Self::new(
            ExprKind::AttrSet(bindings.into_iter().collect()),
            Span::default(),
        )
    }

    #[must_use]
    pub fn select(self, attr: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Select {
                target: Box::new(self),
                attr: attr.into(),
            },
            Span::default(),
        )
    }

    #[must_use]
    pub fn apply(self, arg: Self) -> Self {
        Self::new(
            ExprKind::Apply {
                func: Box::new(self),
                arg: Box::new(arg),
            },
            Span::default(),
        )
    }

    /// `import <channel> {}`
    #[must_use]
    pub fn import(channel: impl Into<String>) -> Self {
        Self::ident("import")
            .apply(Self::lookup_path(channel))
            .apply(Self::attrs([]))
    }
}

impl Binding {
    #[must_use]
    pub fn new(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value,
            span: Span::default(),
        }
    }
}
