// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use std::collections::BTreeMap;
use std::io::Write;

use envspec::config::Config;
use envspec::config::loader::ConfigLoader;
use envspec::config::types::ShadowPolicy;
use envspec::logging::{LogFormat, LogLevel};
use envspec::package::PackageRegistry;
use envspec::value::Value;
use tempfile::NamedTempFile;

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_empty() {
    assert_eq!(Config::parse("").unwrap(), Config::default());
}

#[test]
fn config_parse_global_section() {
    let toml = r#"
[global]
output_log_level = 2
file_log_level = 4
log_file = "envspec.log"
log_format = "json"
"#;
    let config = Config::parse(toml).unwrap();
    assert_eq!(config.global.output_log_level, LogLevel::WARN);
    assert_eq!(config.global.file_log_level, LogLevel::DEBUG);
    assert_eq!(config.global.log_format, LogFormat::Json);
}

#[test]
fn config_parse_channels() {
    let toml = r#"
[channels.nixpkgs]
builders = ["mkShell"]

[channels.nixpkgs.packages]
openssl = "3.0.13"
rustup = ""

[channels.unstable.packages]
openssl = "3.3.0"
"#;
    let config = Config::parse(toml).unwrap();
    insta::assert_snapshot!(config.format_options().join("\n"), @r"
    channels.nixpkgs.builders          = mkShell
    channels.nixpkgs.packages.openssl  = 3.0.13
    channels.nixpkgs.packages.rustup   = *
    channels.unstable.packages.openssl = 3.3.0
    global.file_log_level              = 5
    global.log_format                  = text
    global.output_log_level            = 3
    resolution.shadowing               = warn
    resolution.strict_fields           = false
    ");

    let registry = config.registry();
    assert_eq!(registry.channels(), ["nixpkgs", "unstable"]);
    let unstable = registry.open("unstable", &BTreeMap::new()).unwrap();
    assert_eq!(unstable.get("mkShell"), None);
    assert!(matches!(unstable.get("openssl"), Some(Value::Package(p)) if p.version.as_deref() == Some("3.3.0")));
}

#[test]
fn config_invalid_shadowing() {
    let err = Config::parse("[resolution]\nshadowing = \"sometimes\"").unwrap_err();
    assert!(format!("{err:#}").contains("shadowing"), "{err:#}");
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_ini_files_layer_in_order() {
    let base = toml_file("[resolution]\nshadowing = \"allow\"\nstrict_fields = true\n");
    let local = toml_file("[resolution]\nshadowing = \"deny\"\n");

    let loader = ConfigLoader::new()
        .add_toml_file(base.path())
        .add_toml_file(local.path());
    assert_eq!(loader.format_loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.resolution.shadowing, ShadowPolicy::Deny);
    assert!(config.resolution.strict_fields);
}

#[test]
fn config_env_then_set() {
    let vars = [
        ("ENVSPEC_GLOBAL__OUTPUT_LOG_LEVEL", "1"),
        ("ENVSPEC_RESOLUTION__SHADOWING", "allow"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let config = ConfigLoader::new()
        .with_env_prefix("ENVSPEC")
        .with_env_source(vars)
        .set("global.output_log_level", "6")
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.global.output_log_level, LogLevel::DUMP);
    assert_eq!(config.resolution.shadowing, ShadowPolicy::Allow);
}

#[test]
fn config_missing_required_file() {
    let err = ConfigLoader::new()
        .add_toml_file("/nonexistent/envspec.toml")
        .build();
    assert!(err.is_err());
}

#[test]
fn config_optional_file_missing_is_skipped() {
    let loader = ConfigLoader::new().add_toml_file_optional("/nonexistent/envspec.toml");
    assert!(loader.format_loaded_files().is_empty());
    assert_eq!(loader.build().unwrap(), Config::default());
}
