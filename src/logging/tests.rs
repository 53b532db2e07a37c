// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{LogConfig, LogFormat, LogLevel};

#[test]
fn test_log_level_range() {
    assert_eq!(LogLevel::from_u8(0), Some(LogLevel::SILENT));
    assert_eq!(LogLevel::from_u8(6), Some(LogLevel::DUMP));
    assert_eq!(LogLevel::from_u8(7), None);

    let err = LogLevel::new(9).unwrap_err();
    insta::assert_snapshot!(err, @"invalid value for 'log_level' in section '[global]': log level must be 0-6, got 9");
}

#[test]
fn test_log_level_filters() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(|level| (level.as_u8(), level.to_filter_string()))
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        (
            0,
            "off",
        ),
        (
            1,
            "error",
        ),
        (
            2,
            "warn",
        ),
        (
            3,
            "warn,envspec=info",
        ),
        (
            4,
            "warn,envspec=debug",
        ),
        (
            5,
            "warn,envspec=trace",
        ),
        (
            6,
            "trace",
        ),
    ]
    "#);
}

#[test]
fn test_log_level_serde() {
    let level: LogLevel = serde_json::from_str("4").expect("deserialize");
    assert_eq!(level, LogLevel::DEBUG);
    assert_eq!(serde_json::to_string(&level).expect("serialize"), "4");
    assert!(serde_json::from_str::<LogLevel>("7").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.log_file(), None);
    assert_eq!(config.file_format(), LogFormat::Text);
    assert!(!config.show_target());
}

#[test]
fn test_log_config_builder() {
    let config = LogConfig::builder()
        .with_console_level(LogLevel::WARN)
        .with_log_file("logs/envspec.log")
        .with_file_format(LogFormat::Json)
        .build();
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.log_file(), Some(Path::new("logs/envspec.log")));
    assert_eq!(config.file_format(), LogFormat::Json);
}

#[test]
fn test_log_format_serde() {
    assert_eq!(
        serde_json::from_str::<LogFormat>("\"json\"").expect("deserialize"),
        LogFormat::Json
    );
}
