// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Package sets and the registry that serves them.
//!
//! ```text
//! import <nixpkgs> { }
//!          |          \
//!          v           v
//!   PackageRegistry::open(channel, options) --> Arc<PackageSet>
//!                                                  |
//!                         +------------------------+
//!                         v                        v
//!              packages: name -> version    builders: mkShell, ...
//! ```
//!
//! The registry is read-only from the evaluator's point of view. Turning a
//! [`PackageRef`] into an installed artifact is the materializer's job.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

#[cfg(test)]
mod tests;

/// Reference to a package inside a channel.
///
/// No filesystem location is attached: paths are assigned later by the
/// materializer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    /// Attribute name inside the package set (`pkg-config`).
    pub name: String,
    /// Channel the package set was opened from (`nixpkgs`).
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl std::fmt::Display for PackageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}.{} ({version})", self.channel, self.name),
            None => write!(f, "{}.{}", self.channel, self.name),
        }
    }
}

/// A named collection of packages and builders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageSet {
    channel: String,
    packages: BTreeMap<String, Option<String>>,
    builders: BTreeSet<String>,
}

impl PackageSet {
    #[must_use]
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Self::default()
        }
    }

    /// Add a package with an optional version.
    #[must_use]
    pub fn with_package(mut self, name: impl Into<String>, version: Option<&str>) -> Self {
        self.packages
            .insert(name.into(), version.map(ToString::to_string));
        self
    }

    /// Add several unversioned packages.
    #[must_use]
    pub fn with_packages<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.packages.insert(name.into(), None);
        }
        self
    }

    /// Export a builder under `name`.
    #[must_use]
    pub fn with_builder(mut self, name: impl Into<String>) -> Self {
        self.builders.insert(name.into());
        self
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name) || self.builders.contains(name)
    }

    /// Resolve `name` to a package reference or builder.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(version) = self.packages.get(name) {
            return Some(Value::Package(PackageRef {
                name: name.to_string(),
                channel: self.channel.clone(),
                version: version.clone(),
            }));
        }
        self.builders
            .contains(name)
            .then(|| Value::Builder(name.to_string()))
    }

    /// Package names in sorted order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Builder names in sorted order.
    pub fn builder_names(&self) -> impl Iterator<Item = &str> {
        self.builders.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Source of package sets, addressed by channel name.
///
/// Implementations must be safe to share between concurrent builds.
pub trait PackageRegistry: Send + Sync + std::fmt::Debug {
    /// Open `channel` with the options passed to `import <channel> { ... }`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownChannel`] if the channel does not exist.
    fn open(&self, channel: &str, options: &BTreeMap<String, Value>) -> EvalResult<Arc<PackageSet>>;

    /// Known channel names.
    fn channels(&self) -> Vec<String>;
}

/// In-memory registry, usually populated from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    channels: BTreeMap<String, Arc<PackageSet>>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package set under its own channel name.
    #[must_use]
    pub fn with_channel(mut self, set: PackageSet) -> Self {
        self.insert(set);
        self
    }

    /// Register or replace a package set.
    pub fn insert(&mut self, set: PackageSet) {
        self.channels.insert(set.channel.clone(), Arc::new(set));
    }
}

impl PackageRegistry for StaticRegistry {
    fn open(&self, channel: &str, options: &BTreeMap<String, Value>) -> EvalResult<Arc<PackageSet>> {
        let set = self
            .channels
            .get(channel)
            .ok_or_else(|| EvalError::UnknownChannel {
                channel: channel.to_string(),
            })?;
        if !options.is_empty() {
            debug!(
                channel,
                options = ?options.keys().collect::<Vec<_>>(),
                "channel options are not interpreted by the static registry"
            );
        }
        Ok(Arc::clone(set))
    }

    fn channels(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }
}
