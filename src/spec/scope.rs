// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Opened namespaces and shadowing.
//!
//! ```text
//! lookup(name):
//!   1. parameters         (lexical)
//!   2. builtins           (import)
//!   3. namespaces         innermost `with` first
//!
//! lexical hit + namespace also binds name      ->  ShadowPolicy
//! namespace hit + outer namespace binds name   ->  ShadowPolicy
//!   allow: recorded
//!   warn:  recorded + tracing::warn!
//!   deny:  ShadowedIdentifier
//! ```

use std::cell::RefCell;
use std::collections::BTreeSet;

use tracing::warn;

use crate::config::types::ShadowPolicy;
use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// A value opened with `with`, resolving bare identifiers.
#[derive(Debug, Clone)]
pub struct Namespace {
    label: String,
    value: Value,
}

impl Namespace {
    /// Open `value` as a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] unless `value` is an attribute
    /// set or a package set.
    pub fn open(label: impl Into<String>, value: Value) -> EvalResult<Self> {
        let label = label.into();
        if !value.is_namespace() {
            return Err(EvalError::TypeMismatch {
                context: format!("with {label}"),
                expected: "attribute set or package set",
                found: value.type_name(),
            });
        }
        Ok(Self { label, value })
    }

    /// Source text the namespace was opened from (`pkgs`, `<nixpkgs>`).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.value.attr(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match &self.value {
            Value::Attrs(attrs) => attrs.contains_key(name),
            Value::PackageSet(set) => set.contains(name),
            _ => false,
        }
    }
}

/// Applies the shadowing policy and remembers every collision of one build.
#[derive(Debug)]
pub(crate) struct ShadowTracker {
    policy: ShadowPolicy,
    shadowed: RefCell<BTreeSet<String>>,
}

impl ShadowTracker {
    pub(crate) const fn new(policy: ShadowPolicy) -> Self {
        Self {
            policy,
            shadowed: RefCell::new(BTreeSet::new()),
        }
    }

    /// `name` resolved from an inner scope although the opened `namespace`
    /// binds it too.
    pub(crate) fn observe(&self, name: &str, namespace: &str) -> EvalResult<()> {
        match self.policy {
            ShadowPolicy::Deny => {
                return Err(EvalError::ShadowedIdentifier {
                    name: name.to_string(),
                });
            }
            ShadowPolicy::Warn => {
                // once per name and build
                if !self.shadowed.borrow().contains(name) {
                    warn!(
                        identifier = name,
                        namespace,
                        "binding shadows a name from an opened namespace"
                    );
                }
            }
            ShadowPolicy::Allow => {}
        }
        self.shadowed.borrow_mut().insert(name.to_string());
        Ok(())
    }

    pub(crate) fn into_shadowed(self) -> BTreeSet<String> {
        self.shadowed.into_inner()
    }
}
