// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parameter bindings and caller overrides.
//!
//! ```text
//! ParameterBinding { name, default: None | Expr | Native(fn) }
//! Overrides        { name -> Value }
//!
//! per build():  override present -> override value
//!               else default     -> supplier invoked once, memoized per call
//!               else             -> MissingParameter (only if referenced)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::BoxError;
use crate::syntax::Span;
use crate::syntax::ast::Expr;
use crate::value::Value;

/// Native default supplier. Must be pure for builds to be deterministic.
pub type SupplierFn = dyn Fn() -> Result<Value, BoxError> + Send + Sync;

/// Source of a parameter's default value.
#[derive(Clone)]
pub enum DefaultSupplier {
    /// Default expression, evaluated in the scope of the parameter list.
    Expr(Expr),
    /// Rust closure, for specifications assembled in code.
    Native(Arc<SupplierFn>),
}

impl std::fmt::Debug for DefaultSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expr(expr) => f.debug_tuple("Expr").field(expr).finish(),
            Self::Native(_) => f.write_str("Native(..)"),
        }
    }
}

/// A named input of a specification.
#[derive(Debug, Clone)]
pub struct ParameterBinding {
    name: String,
    default: Option<DefaultSupplier>,
    span: Span,
}

impl ParameterBinding {
    /// Parameter that must be supplied by the caller.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            span: Span::default(),
        }
    }

    /// Parameter whose default is an expression.
    #[must_use]
    pub fn with_default_expr(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            default: Some(DefaultSupplier::Expr(expr)),
            span: Span::default(),
        }
    }

    /// Parameter whose default comes from a closure.
    #[must_use]
    pub fn with_default<F>(name: impl Into<String>, supplier: F) -> Self
    where
        F: Fn() -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            default: Some(DefaultSupplier::Native(Arc::new(supplier))),
            span: Span::default(),
        }
    }

    #[must_use]
    pub(crate) const fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn default_supplier(&self) -> Option<&DefaultSupplier> {
        self.default.as_ref()
    }

    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

/// Caller-supplied parameter values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides(BTreeMap<String, Value>);

impl Overrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier value.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
