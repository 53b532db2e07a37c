// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Expression evaluation within one build.
//!
//! ```text
//! Evaluator (one per build call, never shared)
//!   frame:       name -> Evaluating | Ready(value)
//!   namespaces:  [with #0, with #1, ...]
//!   shadows:     ShadowTracker
//!
//! eval(expr, depth): `depth` is how many namespaces are visible.
//!   `with` #k sees namespaces 0..k, default expressions see none.
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use super::context::SpecContext;
use super::param::{DefaultSupplier, Overrides, ParameterBinding};
use super::record::{PartialRecord, canonical_field_name};
use super::scope::{Namespace, ShadowTracker};
use crate::error::{EvalError, EvalResult};
use crate::syntax::Span;
use crate::syntax::ast::{Binding, Expr, ExprKind};
use crate::value::{Builtin, Value};

#[derive(Debug)]
enum Slot {
    Evaluating,
    Ready(Value),
}

pub(crate) struct Evaluator<'a> {
    context: &'a SpecContext,
    parameters: &'a [ParameterBinding],
    overrides: &'a Overrides,
    frame: RefCell<BTreeMap<String, Slot>>,
    namespaces: Vec<Namespace>,
    shadows: ShadowTracker,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(
        context: &'a SpecContext,
        parameters: &'a [ParameterBinding],
        overrides: &'a Overrides,
    ) -> Self {
        Self {
            context,
            parameters,
            overrides,
            frame: RefCell::new(BTreeMap::new()),
            namespaces: Vec::new(),
            shadows: ShadowTracker::new(context.resolution().shadowing),
        }
    }

    /// Evaluate a `with` expression and push it as the innermost namespace.
    pub(crate) fn open_namespace(&mut self, expr: &Expr) -> EvalResult<()> {
        let value = self.eval(expr, self.namespaces.len())?;
        let namespace = Namespace::open(describe(expr), value)?;
        debug!(namespace = namespace.label(), "opened namespace");
        self.namespaces.push(namespace);
        Ok(())
    }

    /// Resolve the builder expression to a builder name.
    pub(crate) fn builder(&self, expr: &Expr) -> EvalResult<String> {
        match self.eval(expr, self.namespaces.len())? {
            Value::Builder(name) => Ok(name),
            other => Err(EvalError::TypeMismatch {
                context: format!("builder '{}'", describe(expr)),
                expected: "builder",
                found: other.type_name(),
            }),
        }
    }

    /// Evaluate the record literal into a partial record.
    ///
    /// Duplicate canonical names are rejected before any value is evaluated.
    pub(crate) fn record(&self, bindings: &[Binding]) -> EvalResult<PartialRecord> {
        let mut seen = BTreeSet::new();
        for binding in bindings {
            let canonical = canonical_field_name(&binding.name);
            if !seen.insert(canonical.clone()) {
                return Err(EvalError::duplicate_field(canonical));
            }
        }

        let depth = self.namespaces.len();
        let mut record = PartialRecord::new();
        for binding in bindings {
            record.insert(&binding.name, self.eval(&binding.value, depth)?)?;
        }
        Ok(record)
    }

    pub(crate) fn into_shadowed(self) -> BTreeSet<String> {
        self.shadows.into_shadowed()
    }

    pub(crate) fn eval(&self, expr: &Expr, depth: usize) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Ident(name) => self.lookup(name, expr.span, depth),
            ExprKind::Str(value) => Ok(Value::Str(value.clone())),
            ExprKind::Int(value) => Ok(Value::Int(*value)),
            ExprKind::Bool(value) => Ok(Value::Bool(*value)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::LookupPath(channel) => Ok(Value::Channel(channel.clone())),
            ExprKind::List(items) => items
                .iter()
                .map(|item| self.eval(item, depth))
                .collect::<EvalResult<Vec<_>>>()
                .map(Value::List),
            ExprKind::AttrSet(bindings) => {
                let mut attrs = BTreeMap::new();
                for binding in bindings {
                    if attrs.contains_key(&binding.name) {
                        return Err(EvalError::duplicate_field(binding.name.clone()));
                    }
                    attrs.insert(binding.name.clone(), self.eval(&binding.value, depth)?);
                }
                Ok(Value::Attrs(attrs))
            }
            ExprKind::Select { target, attr } => {
                let value = self.eval(target, depth)?;
                value.attr(attr).ok_or_else(|| EvalError::MissingAttribute {
                    attribute: attr.clone(),
                    target: match &value {
                        Value::PackageSet(set) => format!("package set <{}>", set.channel()),
                        other => format!("'{}' ({})", describe(target), other.type_name()),
                    },
                })
            }
            ExprKind::Apply { func, arg } => {
                let func = self.eval(func, depth)?;
                let arg = self.eval(arg, depth)?;
                self.apply(func, arg)
            }
        }
    }

    fn lookup(&self, name: &str, span: Span, depth: usize) -> EvalResult<Value> {
        let visible = &self.namespaces[..depth.min(self.namespaces.len())];

        let lexical = match self.parameter(name) {
            Some(result) => Some(result?),
            None => builtin(name),
        };
        if let Some(value) = lexical {
            if let Some(namespace) = visible.iter().rev().find(|ns| ns.contains(name)) {
                self.shadows.observe(name, namespace.label())?;
            }
            return Ok(value);
        }

        let unbound = || EvalError::UnboundIdentifier {
            name: name.to_string(),
            span: Some(span),
        };
        let innermost = visible
            .iter()
            .rposition(|ns| ns.contains(name))
            .ok_or_else(unbound)?;
        if let Some(outer) = visible[..innermost].iter().rev().find(|ns| ns.contains(name)) {
            self.shadows.observe(name, outer.label())?;
        }
        visible[innermost].get(name).ok_or_else(unbound)
    }

    /// Value of a declared parameter, `None` if `name` is not a parameter.
    fn parameter(&self, name: &str) -> Option<EvalResult<Value>> {
        let binding = self.parameters.iter().find(|p| p.name() == name)?;
        Some(self.resolve(binding))
    }

    fn resolve(&self, binding: &ParameterBinding) -> EvalResult<Value> {
        let name = binding.name();
        if let Some(value) = self.overrides.get(name) {
            return Ok(value.clone());
        }

        let cached = self.frame.borrow().get(name).map(|slot| match slot {
            Slot::Ready(value) => Ok(value.clone()),
            Slot::Evaluating => Err(EvalError::InfiniteRecursion {
                parameter: name.to_string(),
            }),
        });
        if let Some(result) = cached {
            return result;
        }

        let supplier = binding
            .default_supplier()
            .ok_or_else(|| EvalError::MissingParameter {
                parameter: name.to_string(),
            })?;

        self.frame
            .borrow_mut()
            .insert(name.to_string(), Slot::Evaluating);
        debug!(parameter = name, "invoking default supplier");

        let result = match supplier {
            DefaultSupplier::Expr(expr) => self.eval(expr, 0).map_err(|err| match err {
                EvalError::InfiniteRecursion { .. } => err,
                other => EvalError::DefaultSupplierFailure {
                    parameter: name.to_string(),
                    source: Box::new(other),
                },
            }),
            DefaultSupplier::Native(supplier) => {
                supplier().map_err(|source| EvalError::DefaultSupplierFailure {
                    parameter: name.to_string(),
                    source,
                })
            }
        };

        match result {
            Ok(value) => {
                trace!(parameter = name, value = value.type_name(), "default ready");
                self.frame
                    .borrow_mut()
                    .insert(name.to_string(), Slot::Ready(value.clone()));
                Ok(value)
            }
            Err(err) => {
                self.frame.borrow_mut().remove(name);
                Err(err)
            }
        }
    }

    fn apply(&self, func: Value, arg: Value) -> EvalResult<Value> {
        match func {
            Value::Builtin(Builtin::Import) => match arg {
                Value::Channel(channel) => Ok(Value::Builtin(Builtin::ChannelFunction(channel))),
                other => Err(EvalError::TypeMismatch {
                    context: "import".to_string(),
                    expected: "lookup path",
                    found: other.type_name(),
                }),
            },
            Value::Builtin(Builtin::ChannelFunction(channel)) => match arg {
                Value::Attrs(options) => {
                    debug!(channel = %channel, "opening channel");
                    let set = self.context.registry().open(&channel, &options)?;
                    Ok(Value::PackageSet(set))
                }
                other => Err(EvalError::TypeMismatch {
                    context: format!("import <{channel}>"),
                    expected: "attribute set",
                    found: other.type_name(),
                }),
            },
            Value::Builder(name) => Err(EvalError::TypeMismatch {
                context: format!("nested builder call '{name}'"),
                expected: "builder at the top of the file",
                found: arg.type_name(),
            }),
            other => Err(EvalError::NotCallable {
                found: other.type_name(),
            }),
        }
    }
}

fn builtin(name: &str) -> Option<Value> {
    match name {
        "import" => Some(Value::Builtin(Builtin::Import)),
        _ => None,
    }
}

/// Short source-like rendering of an expression for labels and messages.
pub(crate) fn describe(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::LookupPath(channel) => format!("<{channel}>"),
        ExprKind::Select { target, attr } => format!("{}.{attr}", describe(target)),
        ExprKind::Apply { func, arg } => format!("{} {}", describe(func), describe(arg)),
        ExprKind::AttrSet(bindings) if bindings.is_empty() => "{ }".to_string(),
        ExprKind::AttrSet(_) => "{ ... }".to_string(),
        ExprKind::List(_) => "[ ... ]".to_string(),
        ExprKind::Str(value) => format!("{value:?}"),
        ExprKind::Int(value) => value.to_string(),
        ExprKind::Bool(value) => value.to_string(),
        ExprKind::Null => "null".to_string(),
    }
}

/// Evaluate a standalone expression with no parameters or namespaces.
///
/// # Errors
///
/// Returns an [`EvalError`] if the expression does not evaluate.
pub fn evaluate(context: &SpecContext, expr: &Expr) -> EvalResult<Value> {
    let overrides = Overrides::new();
    Evaluator::new(context, &[], &overrides).eval(expr, 0)
}
