// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build command arguments.
//!
//! ```text
//! --arg NAME EXPR      NAME = value of expression EXPR
//! --argstr NAME STR    NAME = the string STR
//!
//! A later occurrence of NAME replaces an earlier one; --argstr is
//! applied after --arg.
//! ```

use clap::ArgAction;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Specification file to build.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Overrides parameter NAME with the value of the expression EXPR,
    /// such as 'import <nixpkgs> {}'.
    #[arg(
        long = "arg",
        num_args = 2,
        value_names = ["NAME", "EXPR"],
        action = ArgAction::Append
    )]
    pub args: Vec<String>,

    /// Overrides parameter NAME with the string STRING.
    #[arg(
        long = "argstr",
        num_args = 2,
        value_names = ["NAME", "STRING"],
        action = ArgAction::Append
    )]
    pub argstrs: Vec<String>,

    /// Prints the specification on a single line.
    #[arg(long)]
    pub compact: bool,
}

impl BuildArgs {
    /// `--arg` pairs in command-line order.
    pub fn expr_args(&self) -> impl Iterator<Item = (&str, &str)> {
        pairs(&self.args)
    }

    /// `--argstr` pairs in command-line order.
    pub fn string_args(&self) -> impl Iterator<Item = (&str, &str)> {
        pairs(&self.argstrs)
    }
}

fn pairs(values: &[String]) -> impl Iterator<Item = (&str, &str)> {
    values
        .chunks_exact(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
}

/// Arguments for commands that only need a specification file.
#[derive(Debug, Clone, Default, Args)]
pub struct FileArgs {
    /// Specification file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}
