// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The finished, immutable build result.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::package::PackageRef;
use crate::value::Value;

/// Merged record of a builder, ready to hand to a materializer.
///
/// Two specifications are equal when their builder and every field are
/// equal. Package references carry no filesystem paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentSpecification {
    builder: String,
    fields: BTreeMap<String, Value>,
    /// Identifiers bound both lexically and by an opened namespace.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    shadowed: BTreeSet<String>,
}

impl EnvironmentSpecification {
    pub(crate) const fn new(
        builder: String,
        fields: BTreeMap<String, Value>,
        shadowed: BTreeSet<String>,
    ) -> Self {
        Self {
            builder,
            fields,
            shadowed,
        }
    }

    #[must_use]
    pub fn builder(&self) -> &str {
        &self.builder
    }

    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Packages listed in `field`, in declaration order.
    #[must_use]
    pub fn packages(&self, field: &str) -> Vec<&PackageRef> {
        self.get(field)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_package).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn native_build_inputs(&self) -> Vec<&PackageRef> {
        self.packages("native_build_inputs")
    }

    #[must_use]
    pub const fn shadowed(&self) -> &BTreeSet<String> {
        &self.shadowed
    }

    /// Serialize as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
