// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for envspec using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! envspec [global options] <command>
//! build FILE [--arg NAME EXPR]... [--argstr NAME STRING]... [--compact]
//! check FILE
//! params FILE
//! options
//! inis
//! version
//! ```

pub mod build;
pub mod global;


use crate::cli::build::{BuildArgs, FileArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Declarative development environment specifications.
#[derive(Debug, Parser)]
#[command(
    name = "envspec",
    author,
    version,
    about = "Declarative Development Environment Specifications",
    long_about = "envspec Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Evaluates a shell specification such as `shell.nix` into a\n\
                  JSON environment description.\n\n\
                  Invoking `envspec build shell.nix` prints the environment with\n\
                  every parameter at its default. Use `--arg` and `--argstr` to\n\
                  override parameters. See `envspec <command> --help` for more\n\
                  information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  By default, envspec loads `envspec.toml` from the current\n\
                  directory if it exists. Additional files given with --ini are\n\
                  loaded after it and override its values. ENVSPEC_SECTION__KEY\n\
                  environment variables come next, then --set options. Use\n\
                  --no-default-inis to only use --ini."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values from the configuration.
    Options,

    /// Lists the configuration files used by envspec.
    Inis,

    /// Builds a specification and prints it as JSON.
    Build(BuildArgs),

    /// Builds a specification with default parameters and reports the result.
    Check(FileArgs),

    /// Lists the parameters a specification declares.
    Params(FileArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
