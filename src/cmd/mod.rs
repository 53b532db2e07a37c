// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   build, check, params   (specification)
//!   options, inis          (configuration)
//! ```

pub mod build;
pub mod config;
