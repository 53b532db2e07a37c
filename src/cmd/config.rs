// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for envspec.

use tracing::info;

use crate::config::Config;

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    if config.channels.is_empty() {
        info!("no channels configured, every import <channel> {{}} will fail");
    }
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files, as numbered by
/// [`ConfigLoader::format_loaded_files`](crate::config::loader::ConfigLoader::format_loaded_files).
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
