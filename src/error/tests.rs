// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, EnvspecError, EnvspecResult, EvalError, InputError, ParseError};
use crate::syntax::Span;

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "resolution".to_string(),
        key: "shadowing".to_string(),
        message: "expected 'allow', 'warn', or 'deny', got 'loud'".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'shadowing' in section '[resolution]': expected 'allow', 'warn', or 'deny', got 'loud'"
    );
}

#[test]
fn test_parse_error_wrapped() {
    let err: EnvspecError = ParseError::UnterminatedString {
        span: Span::new(3, 7),
    }
    .into();
    insta::assert_snapshot!(err, @"parse error: unterminated string starting at 3:7");
}

#[test]
fn test_eval_error_messages() {
    insta::assert_snapshot!(
        EvalError::unbound("foo"),
        @"unbound identifier 'foo'"
    );
    insta::assert_snapshot!(
        EvalError::duplicate_field("native_build_inputs"),
        @"field 'native_build_inputs' is declared more than once"
    );
    insta::assert_snapshot!(
        EvalError::UnknownParameter {
            parameter: "pckgs".to_string(),
            declared: "pkgs".to_string(),
        },
        @"unknown parameter 'pckgs' (declared: pkgs)"
    );
}

#[test]
fn test_supplier_failure_exposes_source() {
    let err = EvalError::DefaultSupplierFailure {
        parameter: "pkgs".to_string(),
        source: Box::new(std::io::Error::other("offline")),
    };
    let source = std::error::Error::source(&err).expect("source");
    assert_eq!(source.to_string(), "offline");
    assert_eq!(err.subject(), Some("pkgs"));
}

#[test]
fn test_subject() {
    assert_eq!(EvalError::unbound("foo").subject(), Some("foo"));
    assert_eq!(
        EvalError::NotCallable { found: "string" }.subject(),
        None
    );
}

#[test]
fn test_input_error_display() {
    let err: EnvspecError = InputError::NotFound("shell.nix".to_string()).into();
    assert_eq!(
        err.to_string(),
        "input error: specification file not found: shell.nix"
    );
}

#[test]
fn test_envspec_error_size() {
    // thin box plus discriminant
    let size = std::mem::size_of::<EnvspecError>();
    assert!(size <= 16, "EnvspecError is {size} bytes, expected <= 16");
}

#[test]
fn test_envspec_result_size() {
    let size = std::mem::size_of::<EnvspecResult<()>>();
    assert!(size <= 16, "EnvspecResult<()> is {size} bytes, expected <= 16");
}
