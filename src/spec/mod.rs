// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment specifications.
//!
//! ```text
//! Specification (parsed once, shared read-only)
//!        |
//!        | build(&Overrides)               one call = one frame
//!        v
//! Uninitialized
//!   -> ParametersResolved   unknown overrides rejected, defaults bound lazily
//!   -> NamespaceOpened      `with` expressions evaluated, in order
//!   -> RecordMerged         record literal evaluated, merged over contract
//!   -> Finalized            EnvironmentSpecification (immutable)
//! ```
//!
//! A [`Specification`] holds no per-call state, so any number of threads
//! may call [`Specification::build`] on it at once.

pub mod context;
pub mod environment;
pub mod eval;
pub mod param;
pub mod record;
pub mod scope;
pub mod stage;


use std::path::Path;

use tracing::{debug, info, info_span};

use crate::error::{EnvspecResult, EvalError, EvalResult, InputError, ParseError};
use crate::syntax::ast::{Binding, Expr};
use crate::syntax::{self, File};

pub use context::SpecContext;
pub use environment::EnvironmentSpecification;
pub use param::{DefaultSupplier, Overrides, ParameterBinding};
pub use record::{BuilderContract, BuilderRegistry, FieldKind, FieldSpec, MergePolicy};
pub use stage::Stage;

use eval::Evaluator;
use stage::StageTracker;

/// A parameterized environment template.
#[derive(Debug, Clone)]
pub struct Specification {
    parameters: Vec<ParameterBinding>,
    open_ended: bool,
    namespaces: Vec<Expr>,
    builder: Expr,
    record: Vec<Binding>,
    context: SpecContext,
}

#[bon::bon]
impl Specification {
    /// Assemble a specification in code.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::DuplicateParameter`] if two parameters share a
    /// name.
    #[builder]
    pub fn new(
        #[builder(default)] parameters: Vec<ParameterBinding>,
        #[builder(default)] open_ended: bool,
        #[builder(default)] namespaces: Vec<Expr>,
        #[builder(into)] builder: String,
        #[builder(default)] record: Vec<Binding>,
        #[builder(default)] context: SpecContext,
    ) -> Result<Self, ParseError> {
        let mut seen = std::collections::BTreeSet::new();
        for parameter in &parameters {
            if !seen.insert(parameter.name()) {
                return Err(ParseError::DuplicateParameter {
                    name: parameter.name().to_string(),
                    span: parameter.span(),
                });
            }
        }
        Ok(Self {
            parameters,
            open_ended,
            namespaces,
            builder: Expr::ident(builder),
            record,
            context,
        })
    }
}

impl Specification {
    /// Parse shell-expression text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EnvspecError::Parse`] on malformed input.
    pub fn parse(source: &str) -> EnvspecResult<Self> {
        Ok(Self::from_ast(syntax::parse_file(source)?))
    }

    /// Read and parse a specification file.
    ///
    /// # Errors
    ///
    /// Returns an input error if the file is missing or unreadable, or a
    /// parse error on malformed input.
    pub fn from_file(path: impl AsRef<Path>) -> EnvspecResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                InputError::NotFound(path.display().to_string())
            } else {
                InputError::ReadError {
                    path: path.display().to_string(),
                    source,
                }
            }
        })?;
        debug!(path = %path.display(), bytes = source.len(), "read specification");
        Self::parse(&source)
    }

    /// Convert a parsed file. The parser already rejected duplicate
    /// parameters.
    #[must_use]
    pub fn from_ast(file: File) -> Self {
        let parameters = file
            .formals
            .params
            .into_iter()
            .map(|decl| {
                let binding = match decl.default {
                    Some(expr) => ParameterBinding::with_default_expr(decl.name, expr),
                    None => ParameterBinding::required(decl.name),
                };
                binding.at(decl.span)
            })
            .collect();
        Self {
            parameters,
            open_ended: file.formals.ellipsis,
            namespaces: file.namespaces,
            builder: file.builder,
            record: file.record,
            context: SpecContext::default(),
        }
    }

    /// Replace the registry, builder contracts and resolution settings.
    #[must_use]
    pub fn with_context(mut self, context: SpecContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterBinding] {
        &self.parameters
    }

    /// Whether undeclared overrides are accepted (`...` in the formals).
    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        self.open_ended
    }

    #[must_use]
    pub const fn context(&self) -> &SpecContext {
        &self.context
    }

    /// Build the environment specification.
    ///
    /// Each call gets a fresh frame: defaults are invoked at most once per
    /// call and only if referenced. Nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvalError`] hit; the build is aborted.
    pub fn build(&self, overrides: &Overrides) -> EvalResult<EnvironmentSpecification> {
        let span = info_span!(
            "build",
            parameters = self.parameters.len(),
            overrides = overrides.len()
        );
        let _enter = span.enter();

        let mut stage = StageTracker::new();
        self.check_overrides(overrides)?;
        let mut evaluator = Evaluator::new(&self.context, &self.parameters, overrides);
        stage.advance();

        for namespace in &self.namespaces {
            evaluator.open_namespace(namespace)?;
        }
        stage.advance();

        let builder = evaluator.builder(&self.builder)?;
        let contract = self.context.builders().get(&builder)?;
        let record = evaluator.record(&self.record)?;
        let fields = record::merge(&contract, record, self.context.resolution().strict_fields)?;
        stage.advance();

        let spec = EnvironmentSpecification::new(builder, fields, evaluator.into_shadowed());
        stage.advance();
        debug_assert!(stage.current().is_terminal());

        info!(
            builder = spec.builder(),
            fields = spec.fields().len(),
            shadowed = spec.shadowed().len(),
            "built environment specification"
        );
        Ok(spec)
    }

    fn check_overrides(&self, overrides: &Overrides) -> EvalResult<()> {
        for name in overrides.names() {
            if self.parameters.iter().any(|p| p.name() == name) {
                continue;
            }
            if self.open_ended {
                debug!(parameter = name, "ignoring undeclared override");
                continue;
            }
            let declared = self
                .parameters
                .iter()
                .map(ParameterBinding::name)
                .collect::<Vec<_>>();
            return Err(EvalError::UnknownParameter {
                parameter: name.to_string(),
                declared: if declared.is_empty() {
                    "none".to_string()
                } else {
                    declared.join(", ")
                },
            });
        }
        Ok(())
    }
}
