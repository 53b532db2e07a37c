// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Partial records, builder contracts and the merge between them.
//!
//! ```text
//! BuilderContract (defaults)  +  PartialRecord (caller fields)
//!          |                              |
//!          +-------------+----------------+
//!                        v
//!                merge(): per field
//!                  absent          -> default copied unchanged
//!                  present/replace -> caller value wins
//!                  present/append  -> default ++ caller value
//!                  undeclared      -> passed through (or rejected if strict)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// How a caller-supplied field combines with the builder default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Caller value replaces the default outright.
    #[default]
    Replace,
    /// Caller sequence is appended after the default sequence.
    Append,
}

/// Accepted value shape for a builder field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Str,
    Bool,
    Int,
    /// Ordered list of package references.
    Packages,
    List,
    Any,
}

impl FieldKind {
    const fn expected(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Packages | Self::List => "list",
            Self::Any => "any value",
        }
    }

    /// Check `value` against this kind.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] naming the field (and element index
    /// for package lists) on mismatch.
    pub fn check(self, field: &str, value: &Value) -> EvalResult<()> {
        let ok = match (self, value) {
            (Self::Any, _)
            | (Self::Str, Value::Str(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::List, Value::List(_)) => true,
            (Self::Packages, Value::List(items)) => {
                if let Some((index, item)) = items
                    .iter()
                    .enumerate()
                    .find(|(_, item)| item.as_package().is_none())
                {
                    return Err(EvalError::TypeMismatch {
                        context: format!("field '{field}' element {index}"),
                        expected: "package",
                        found: item.type_name(),
                    });
                }
                true
            }
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(EvalError::TypeMismatch {
                context: format!("field '{field}'"),
                expected: self.expected(),
                found: value.type_name(),
            })
        }
    }
}

/// Declaration of one builder field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub default: Value,
    pub policy: MergePolicy,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: default.into(),
            policy: MergePolicy::Replace,
        }
    }

    /// Mark the field additive.
    #[must_use]
    pub const fn additive(mut self) -> Self {
        self.policy = MergePolicy::Append;
        self
    }
}

/// Fields, defaults and merge policies of a builder (the builder defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderContract {
    name: String,
    fields: Vec<FieldSpec>,
}

impl BuilderContract {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field; a later declaration of the same name replaces it.
    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    /// Contract of the interactive shell builder.
    #[must_use]
    pub fn mk_shell() -> Self {
        Self::new("mkShell")
            .with_field(FieldSpec::new("name", FieldKind::Str, "shell"))
            .with_field(FieldSpec::new(
                "native_build_inputs",
                FieldKind::Packages,
                Value::List(Vec::new()),
            ))
            .with_field(FieldSpec::new(
                "build_inputs",
                FieldKind::Packages,
                Value::List(Vec::new()),
            ))
            .with_field(
                FieldSpec::new("packages", FieldKind::Packages, Value::List(Vec::new())).additive(),
            )
            .with_field(FieldSpec::new("shell_hook", FieldKind::Str, ""))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Default value of every declared field.
    #[must_use]
    pub fn defaults(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect()
    }
}

/// Builder contracts addressed by builder name.
#[derive(Debug, Clone)]
pub struct BuilderRegistry {
    contracts: BTreeMap<String, Arc<BuilderContract>>,
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::empty().with_contract(BuilderContract::mk_shell())
    }
}

impl BuilderRegistry {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            contracts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_contract(mut self, contract: BuilderContract) -> Self {
        self.contracts
            .insert(contract.name.clone(), Arc::new(contract));
        self
    }

    /// Look up a contract.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownBuilder`] if no contract has this name.
    pub fn get(&self, name: &str) -> EvalResult<Arc<BuilderContract>> {
        self.contracts
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownBuilder {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }
}

/// Fields the caller set explicitly, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    fields: Vec<(String, Value)>,
}

impl PartialRecord {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field under its canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::DuplicateField`] if the canonical name is
    /// already present.
    pub fn insert(&mut self, name: &str, value: Value) -> EvalResult<()> {
        let name = canonical_field_name(name);
        if self.contains(&name) {
            return Err(EvalError::duplicate_field(name));
        }
        self.fields.push((name, value));
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Canonical snake_case field name (`nativeBuildInputs` -> `native_build_inputs`).
#[must_use]
pub fn canonical_field_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

/// Merge `record` over the defaults of `contract`.
///
/// With `strict`, fields the contract does not declare are rejected instead
/// of passed through.
///
/// # Errors
///
/// Returns [`EvalError::TypeMismatch`] for values of the wrong kind and
/// [`EvalError::UnknownField`] for undeclared fields in strict mode.
pub fn merge(
    contract: &BuilderContract,
    record: PartialRecord,
    strict: bool,
) -> EvalResult<BTreeMap<String, Value>> {
    let mut merged = contract.defaults();

    for (name, value) in record.fields {
        let Some(spec) = contract.field(&name) else {
            if strict {
                return Err(EvalError::UnknownField {
                    builder: contract.name.clone(),
                    field: name,
                });
            }
            merged.insert(name, value);
            continue;
        };

        spec.kind.check(&name, &value)?;
        let value = match (spec.policy, &spec.default, value) {
            (MergePolicy::Append, Value::List(defaults), Value::List(items)) => {
                Value::List(defaults.iter().cloned().chain(items).collect())
            }
            (_, _, value) => value,
        };
        merged.insert(name, value);
    }

    Ok(merged)
}
