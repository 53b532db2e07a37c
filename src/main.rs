// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> ConfigLoader --> Config --> Logging --> Command Dispatch
//!   Build | Check | Params | Options | Inis | Version
//! ```

use std::process::ExitCode;

use anyhow::{Context, anyhow};
use envspec::cli::global::{GlobalOptions, split_override};
use envspec::cli::{self, Cli, Command};
use envspec::cmd::build::{run_build_command, run_check_command, run_params_command};
use envspec::cmd::config::{run_inis_command, run_options_command};
use envspec::config::loader::ConfigLoader;
use envspec::config::types::GlobalConfig;
use envspec::config::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use envspec::error::Result;
use envspec::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    match dispatch_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_log_config(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.clone())
        .with_file_format(global.log_format)
        .build()
}

fn dispatch_command(cli: &Cli) -> Result<()> {
    let command = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return Ok(());
        }
        Some(command) => command,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return Err(anyhow!("No command specified"));
        }
    };

    let loader = build_config_loader(&cli.global)?;
    let loaded_files = loader.format_loaded_files();
    let config = loader.build().context("failed to load configuration")?;
    let _log_guard = init_logging(&build_log_config(&config.global))
        .context("failed to initialize logging")?;

    match command {
        Command::Version => {
            handle_version_command();
            Ok(())
        }
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Inis => {
            run_inis_command(&loaded_files);
            Ok(())
        }
        Command::Build(args) => run_build_command(args, &config),
        Command::Check(args) => run_check_command(args, &config),
        Command::Params(args) => run_params_command(args, &config),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_inis {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    for option in global.to_config_overrides() {
        let (key, value) = split_override(&option)
            .ok_or_else(|| anyhow!("invalid option '{option}', expected KEY=VALUE"))?;
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}
