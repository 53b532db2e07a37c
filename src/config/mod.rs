// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for envspec.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. envspec.toml (cwd, optional)
//! 3. --ini files
//! 4. ENVSPEC_* env vars
//! 5. --set overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! ENVSPEC_GLOBAL__OUTPUT_LOG_LEVEL=4       -> global.output_log_level = 4
//! ENVSPEC_RESOLUTION__SHADOWING=deny       -> resolution.shadowing = "deny"
//! ENVSPEC_RESOLUTION__STRICT_FIELDS=true   -> resolution.strict_fields = true
//! ```
//!
//! # Channels
//!
//! ```toml
//! [channels.nixpkgs]
//! builders = ["mkShell"]
//!
//! [channels.nixpkgs.packages]
//! openssl = "3.0.13"
//! rustup = ""          # unversioned
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ConfigError, Result};
use crate::package::StaticRegistry;
use crate::spec::{BuilderRegistry, SpecContext};

use loader::ConfigLoader;
use types::{Channels, GlobalConfig, ResolutionConfig};

/// Name of the optional configuration file in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "envspec.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ENVSPEC";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Identifier resolution options.
    pub resolution: ResolutionConfig,
    /// Package sets served to `import <channel> {}`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub channels: Channels,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use envspec::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("channels.toml")
    ///     .add_toml_file_optional("envspec.toml")
    ///     .with_env_prefix("ENVSPEC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check that every builder a channel exports has a contract.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the channel and builder.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let builders = BuilderRegistry::default();
        for (channel, config) in &self.channels {
            for builder in &config.builders {
                if builders.get(builder).is_err() {
                    return Err(ConfigError::InvalidValue {
                        section: format!("channels.{channel}"),
                        key: "builders".to_string(),
                        message: format!(
                            "unknown builder '{builder}' (known: {})",
                            builders.names().collect::<Vec<_>>().join(", ")
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Registry serving the configured channels.
    #[must_use]
    pub fn registry(&self) -> StaticRegistry {
        self.channels
            .iter()
            .fold(StaticRegistry::new(), |registry, (name, channel)| {
                registry.with_channel(channel.to_package_set(name))
            })
    }

    /// Evaluation context for specifications under this configuration.
    #[must_use]
    pub fn spec_context(&self) -> SpecContext {
        SpecContext::builder()
            .with_registry(Arc::new(self.registry()))
            .with_resolution(self.resolution)
            .build()
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_resolution_options(&mut options);
        self.format_channel_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file".into(), log_file.display().to_string());
        }
        let format = match self.global.log_format {
            crate::logging::LogFormat::Text => "text",
            crate::logging::LogFormat::Json => "json",
        };
        options.insert("global.log_format".into(), format.into());
    }

    fn format_resolution_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "resolution.shadowing".into(),
            self.resolution.shadowing.to_string(),
        );
        options.insert(
            "resolution.strict_fields".into(),
            self.resolution.strict_fields.to_string(),
        );
    }

    fn format_channel_options(&self, options: &mut BTreeMap<String, String>) {
        for (name, channel) in &self.channels {
            if !channel.builders.is_empty() {
                options.insert(
                    format!("channels.{name}.builders"),
                    channel.builders.join(", "),
                );
            }
            for (package, version) in &channel.packages {
                let version = if version.is_empty() { "*" } else { version };
                options.insert(format!("channels.{name}.packages.{package}"), version.into());
            }
        }
    }
}
