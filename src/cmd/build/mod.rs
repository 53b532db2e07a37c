// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build, check and params commands.
//!
//! ```text
//! FILE --> Specification::from_file --> with_context(Config)
//!
//! --arg NAME EXPR    --> parse_expr --> evaluate --> Value --+
//! --argstr NAME STR  --> Value::Str ---------------------------+--> Overrides
//!                                                                    |
//!                                                                    v
//!                                             Specification::build --> JSON (stdout)
//! ```

use std::path::Path;

use anyhow::{Context, anyhow};
use regex::Regex;
use tracing::{debug, info};

use crate::cli::build::{BuildArgs, FileArgs};
use crate::config::Config;
use crate::error::Result;
use crate::spec::eval::evaluate;
use crate::spec::{EnvironmentSpecification, Overrides, SpecContext, Specification};
use crate::syntax::parse_expr;

/// Identifiers accepted as override names.
const PARAMETER_NAME: &str = r"^[^\W\d][\w'-]*$";

/// Main handler for build command.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, an override is invalid, or
/// the build fails.
pub fn run_build_command(args: &BuildArgs, config: &Config) -> Result<()> {
    let spec = load_specification(&args.file, config)?;
    let overrides = collect_overrides(args, spec.context())?;
    println!("{}", render_build(&spec, &overrides, args.compact)?);
    Ok(())
}

/// Build with every parameter at its default and print a summary.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the build fails.
pub fn run_check_command(args: &FileArgs, config: &Config) -> Result<()> {
    let spec = load_specification(&args.file, config)?;
    let environment = spec
        .build(&Overrides::new())
        .with_context(|| format!("{} does not build", args.file.display()))?;
    for line in format_check(&args.file, &environment) {
        println!("{line}");
    }
    Ok(())
}

/// List declared parameters.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded.
pub fn run_params_command(args: &FileArgs, config: &Config) -> Result<()> {
    let spec = load_specification(&args.file, config)?;
    let lines = format_parameters(&spec);
    if lines.is_empty() {
        println!("No parameters declared");
    } else {
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

/// Read `path` and attach the evaluation context described by `config`.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub fn load_specification(path: &Path, config: &Config) -> Result<Specification> {
    let spec = Specification::from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(spec.with_context(config.spec_context()))
}

/// Turn `--arg` and `--argstr` pairs into overrides.
///
/// `--arg` values are evaluated without parameters or namespaces, so they
/// may only use builtins and literals.
///
/// # Errors
///
/// Returns an error if a name is not an identifier or an expression does
/// not parse or evaluate.
pub fn collect_overrides(args: &BuildArgs, context: &SpecContext) -> Result<Overrides> {
    let pattern = Regex::new(PARAMETER_NAME).context("invalid parameter name pattern")?;
    let mut overrides = Overrides::new();

    for (name, source) in args.expr_args() {
        check_name(&pattern, name)?;
        let expr = parse_expr(source)
            .with_context(|| format!("invalid expression for --arg {name}"))?;
        let value = evaluate(context, &expr)
            .with_context(|| format!("failed to evaluate --arg {name}"))?;
        debug!(parameter = name, kind = value.type_name(), "override from --arg");
        overrides.insert(name, value);
    }

    for (name, value) in args.string_args() {
        check_name(&pattern, name)?;
        debug!(parameter = name, "override from --argstr");
        overrides.insert(name, value);
    }

    Ok(overrides)
}

fn check_name(pattern: &Regex, name: &str) -> Result<()> {
    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(anyhow!("invalid parameter name '{name}'"))
    }
}

/// Build `spec` and serialize the result.
///
/// # Errors
///
/// Returns the build error, or an error if serialization fails.
pub fn render_build(spec: &Specification, overrides: &Overrides, compact: bool) -> Result<String> {
    let environment = spec.build(overrides)?;
    info!(
        builder = environment.builder(),
        native_build_inputs = environment.native_build_inputs().len(),
        "environment ready"
    );
    environment
        .to_json(!compact)
        .context("failed to serialize environment")
}

/// Summary lines printed by `check`.
#[must_use]
pub fn format_check(path: &Path, environment: &EnvironmentSpecification) -> Vec<String> {
    let inputs = environment
        .native_build_inputs()
        .iter()
        .map(|package| package.name.as_str())
        .collect::<Vec<_>>();

    let mut lines = vec![format!(
        "{}: ok ({}, {} fields)",
        path.display(),
        environment.builder(),
        environment.fields().len()
    )];
    if !inputs.is_empty() {
        lines.push(format!("native build inputs: {}", inputs.join(", ")));
    }
    if !environment.shadowed().is_empty() {
        let shadowed = environment
            .shadowed()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        lines.push(format!("shadowed: {}", shadowed.join(", ")));
    }
    lines
}

/// One line per declared parameter, aligned like `options`.
#[must_use]
pub fn format_parameters(spec: &Specification) -> Vec<String> {
    let mut rows = spec
        .parameters()
        .iter()
        .map(|parameter| {
            let kind = if parameter.has_default() {
                "default"
            } else {
                "required"
            };
            (parameter.name().to_string(), kind)
        })
        .collect::<Vec<_>>();
    if spec.is_open_ended() {
        rows.push(("...".to_string(), "open-ended"));
    }

    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    rows.into_iter()
        .map(|(name, kind)| format!("{name:<width$}  {kind}"))
        .collect()
}
