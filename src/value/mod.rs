// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runtime values produced by evaluating shell expressions.
//!
//! ```text
//! Value
//!   scalars     Null | Bool | Int | Str
//!   compound    List (ordered) | Attrs (sorted by key)
//!   packages    Package(PackageRef) | PackageSet(Arc<PackageSet>)
//!   callables   Channel(<name>) | Builtin | Builder(name)
//! ```
//!
//! Values are immutable once built. Package sets are shared through `Arc`
//! so cloning a value never copies a registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::package::{PackageRef, PackageSet};

#[cfg(test)]
mod tests;

/// Built-in functions available in every scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    /// `import`: turns a lookup path into a channel function.
    Import,
    /// `import <channel>`: waiting for its options attribute set.
    ChannelFunction(String),
}

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Attrs(BTreeMap<String, Value>),
    Package(PackageRef),
    PackageSet(Arc<PackageSet>),
    /// Result of a `<channel>` lookup path.
    Channel(String),
    Builtin(Builtin),
    /// Builder exported by a package set, such as `mkShell`.
    Builder(String),
}

impl Value {
    /// Short type name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Attrs(_) => "attribute set",
            Self::Package(_) => "package",
            Self::PackageSet(_) => "package set",
            Self::Channel(_) => "lookup path",
            Self::Builtin(_) => "builtin",
            Self::Builder(_) => "builder",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_package(&self) -> Option<&PackageRef> {
        match self {
            Self::Package(package) => Some(package),
            _ => None,
        }
    }

    /// Attribute lookup on attribute sets and package sets.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<Self> {
        match self {
            Self::Attrs(attrs) => attrs.get(name).cloned(),
            Self::PackageSet(set) => set.get(name),
            _ => None,
        }
    }

    /// Whether the value can be opened as a namespace.
    #[must_use]
    pub const fn is_namespace(&self) -> bool {
        matches!(self, Self::Attrs(_) | Self::PackageSet(_))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<PackageRef> for Value {
    fn from(value: PackageRef) -> Self {
        Self::Package(value)
    }
}

impl From<PackageSet> for Value {
    fn from(value: PackageSet) -> Self {
        Self::PackageSet(Arc::new(value))
    }
}

impl From<Arc<PackageSet>> for Value {
    fn from(value: Arc<PackageSet>) -> Self {
        Self::PackageSet(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl FromIterator<Self> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Str(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Attrs(attrs) => attrs.serialize(serializer),
            Self::Package(package) => package.serialize(serializer),
            Self::PackageSet(set) => tagged(serializer, "package_set", set.channel()),
            Self::Channel(channel) => tagged(serializer, "channel", channel),
            Self::Builtin(Builtin::Import) => tagged(serializer, "builtin", "import"),
            Self::Builtin(Builtin::ChannelFunction(channel)) => {
                tagged(serializer, "builtin", &format!("import <{channel}>"))
            }
            Self::Builder(name) => tagged(serializer, "builder", name),
        }
    }
}

/// Serialize opaque values as a single-entry map, e.g. `{"builder": "mkShell"}`.
fn tagged<S: Serializer>(serializer: S, tag: &str, name: &str) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(tag, name)?;
    map.end()
}
