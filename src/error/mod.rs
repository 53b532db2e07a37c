// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!        EnvspecError (~16 bytes)
//!                 |
//!     +--------+--+---+--------+
//!     |        |      |        |
//!     v        v      v        v
//!   Parse    Eval  Config   Input
//!    Box      Box    Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Parse   UnexpectedToken, UnterminatedString, InvalidBody,
//!           NestingTooDeep
//!   Eval    UnknownParameter, UnboundIdentifier, DuplicateField,
//!           DefaultSupplierFailure, TypeMismatch, ...
//!   Config  InvalidValue
//!   Input   NotFound, ReadError
//! ```
//!
//! Every [`EvalError`] aborts a build. None of them are retryable: they
//! describe a malformed specification, not a transient condition.

use thiserror::Error;

use crate::syntax::Span;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`EnvspecError`].
pub type EnvspecResult<T> = std::result::Result<T, EnvspecError>;

/// Result type for specification evaluation.
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Opaque error produced by a native default supplier.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at ~16 bytes on the stack.
#[derive(Debug, Error)]
pub enum EnvspecError {
    /// Shell expression could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] Box<ParseError>),

    /// Specification could not be built.
    #[error("evaluation error: {0}")]
    Eval(#[from] Box<EvalError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Input file error.
    #[error("input error: {0}")]
    Input(#[from] Box<InputError>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for EnvspecError {
                fn from(err: $error) -> Self {
                    EnvspecError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ParseError => Parse,
    EvalError => Eval,
    ConfigError => Config,
    InputError => Input,
}

// --- Parse Errors ---

/// Errors raised while tokenizing or parsing a shell expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// String literal without a closing quote.
    #[error("unterminated string starting at {span}")]
    UnterminatedString { span: Span },

    /// Block comment without a closing `*/`.
    #[error("unterminated comment starting at {span}")]
    UnterminatedComment { span: Span },

    /// Unsupported escape sequence inside a string.
    #[error("invalid escape '\\{ch}' at {span}")]
    InvalidEscape { ch: char, span: Span },

    /// Integer literal that does not fit in an `i64`.
    #[error("integer literal out of range at {span}")]
    IntegerOverflow { span: Span },

    /// Token did not match what the grammar expects.
    #[error("expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    /// Input ended in the middle of a construct.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// Same parameter declared twice in the formals.
    #[error("duplicate parameter '{name}' at {span}")]
    DuplicateParameter { name: String, span: Span },

    /// The body is not a builder applied to a record literal.
    #[error("invalid specification body at {span}: {message}")]
    InvalidBody { span: Span, message: String },

    /// Expression nested beyond the parser's limit.
    #[error("expression nested deeper than {limit} levels at {span}")]
    NestingTooDeep { span: Span, limit: usize },
}

// --- Evaluation Errors ---

/// Errors raised while building an environment specification.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Override names a parameter the specification does not declare.
    #[error("unknown parameter '{parameter}' (declared: {declared})")]
    UnknownParameter { parameter: String, declared: String },

    /// Identifier is bound neither lexically nor in an opened namespace.
    #[error("unbound identifier '{name}'")]
    UnboundIdentifier { name: String, span: Option<Span> },

    /// Partial record declares the same field twice.
    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    /// A default supplier failed; its error is kept as the source.
    #[error("default for parameter '{parameter}' failed: {source}")]
    DefaultSupplierFailure {
        parameter: String,
        #[source]
        source: BoxError,
    },

    /// Parameter has no override and no default.
    #[error("parameter '{parameter}' has no default and was not supplied")]
    MissingParameter { parameter: String },

    /// Default expressions reference each other in a cycle.
    #[error("infinite recursion while evaluating parameter '{parameter}'")]
    InfiniteRecursion { parameter: String },

    /// Opened namespace collides with a lexical binding and shadowing is denied.
    #[error("identifier '{name}' shadows a binding from an opened namespace")]
    ShadowedIdentifier { name: String },

    /// Value has the wrong type for where it is used.
    #[error("{context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Field not declared by the builder contract (strict mode only).
    #[error("builder '{builder}' does not declare field '{field}'")]
    UnknownField { builder: String, field: String },

    /// No builder contract registered under this name.
    #[error("unknown builder '{name}'")]
    UnknownBuilder { name: String },

    /// Lookup path names a channel the registry does not know.
    #[error("unknown channel '<{channel}>'")]
    UnknownChannel { channel: String },

    /// Attribute selection on a set that lacks the attribute.
    #[error("attribute '{attribute}' missing from {target}")]
    MissingAttribute { attribute: String, target: String },

    /// Application of something that is not a function.
    #[error("attempt to call a value of type {found}")]
    NotCallable { found: &'static str },
}

impl EvalError {
    /// Build an [`EvalError::UnboundIdentifier`] without location.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self::UnboundIdentifier {
            name: name.into(),
            span: None,
        }
    }

    /// Build an [`EvalError::DuplicateField`].
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self::DuplicateField {
            field: field.into(),
        }
    }

    /// Name of the offending parameter, identifier or field, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::UnknownParameter { parameter, .. }
            | Self::DefaultSupplierFailure { parameter, .. }
            | Self::MissingParameter { parameter }
            | Self::InfiniteRecursion { parameter } => Some(parameter),
            Self::UnboundIdentifier { name, .. }
            | Self::ShadowedIdentifier { name }
            | Self::UnknownBuilder { name } => Some(name),
            Self::DuplicateField { field } | Self::UnknownField { field, .. } => Some(field),
            Self::UnknownChannel { channel } => Some(channel),
            Self::MissingAttribute { attribute, .. } => Some(attribute),
            Self::TypeMismatch { .. } | Self::NotCallable { .. } => None,
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Input Errors ---

/// Errors reading a specification file.
#[derive(Debug, Error)]
pub enum InputError {
    /// Specification file does not exist.
    #[error("specification file not found: {0}")]
    NotFound(String),

    /// Specification file exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
