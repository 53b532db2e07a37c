// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for envspec.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, ResolutionConfig
//! Channels: channel name -> ChannelConfig { builders, packages }
//! ```
//!
//! # Shadowing
//!
//! ```text
//! ShadowPolicy: Allow | Warn (default) | Deny
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::{LogFormat, LogLevel};
use crate::package::PackageSet;

/// What happens when an opened namespace binds a name that is already
/// bound lexically or by an inner namespace. The inner binding always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowPolicy {
    /// Record the collision silently.
    Allow,
    /// Record the collision and log a warning.
    #[default]
    Warn,
    /// Fail the build with `ShadowedIdentifier`.
    Deny,
}

impl std::fmt::Display for ShadowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Warn => write!(f, "warn"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

impl std::str::FromStr for ShadowPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "warn" => Ok(Self::Warn),
            "deny" => Ok(Self::Deny),
            _ => Err(ConfigError::InvalidValue {
                section: "resolution".to_string(),
                key: "shadowing".to_string(),
                message: format!("expected 'allow', 'warn', or 'deny', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stderr output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Format of the file log.
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_format: LogFormat::Text,
        }
    }
}

/// Identifier resolution and record checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Policy for names bound both lexically and by a `with` namespace.
    pub shadowing: ShadowPolicy,
    /// Reject record fields the builder contract does not declare.
    pub strict_fields: bool,
}

/// Contents of one channel (`[channels.<name>]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    /// Builders the channel exports (`mkShell`).
    pub builders: Vec<String>,
    /// Package attribute name -> version. An empty version means unversioned.
    pub packages: BTreeMap<String, String>,
}

impl ChannelConfig {
    /// Package set served for channel `name`.
    #[must_use]
    pub fn to_package_set(&self, name: &str) -> PackageSet {
        let set = self
            .packages
            .iter()
            .fold(PackageSet::new(name), |set, (package, version)| {
                let version = (!version.is_empty()).then_some(version.as_str());
                set.with_package(package.as_str(), version)
            });
        self.builders
            .iter()
            .fold(set, |set, builder| set.with_builder(builder.as_str()))
    }
}

/// Channels addressed by name.
pub type Channels = BTreeMap<String, ChannelConfig>;
