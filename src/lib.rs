// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          build / check / params
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, channels, policy   |
//!              '-------------+-------------'
//!                            v
//!                          spec
//!            Specification::build(&Overrides)
//!          params -> with -> builder -> record
//!                  |                    |
//!                  v                    v
//!               syntax              package
//!          lexer / parser     PackageRegistry, sets
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, value     |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod package;
pub mod spec;
pub mod syntax;
pub mod value;
