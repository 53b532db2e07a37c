// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::ast::{ExprKind, File};
use super::lexer::{TokenKind, tokenize};
use super::*;
use crate::error::ParseError;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("tokenize")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn parse(source: &str) -> File {
    parse_file(source).expect("parse")
}

// =============================================================================
// Lexer
// =============================================================================

#[test]
fn test_tokenize_formals() {
    assert_eq!(
        kinds("{ pkgs ? import <nixpkgs> {} }:"),
        [
            TokenKind::LBrace,
            TokenKind::Ident("pkgs".to_string()),
            TokenKind::Question,
            TokenKind::Ident("import".to_string()),
            TokenKind::LookupPath("nixpkgs".to_string()),
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::RBrace,
            TokenKind::Colon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_identifiers_allow_dashes_and_quotes() {
    assert_eq!(
        kinds("pkg-config foo' with_x"),
        [
            TokenKind::Ident("pkg-config".to_string()),
            TokenKind::Ident("foo'".to_string()),
            TokenKind::Ident("with_x".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_and_literals() {
    assert_eq!(
        kinds("with true false null 42 ..."),
        [
            TokenKind::With,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Int(42),
            TokenKind::Ellipsis,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    let source = "# leading\nfoo /* block\n comment */ bar # trailing";
    assert_eq!(
        kinds(source),
        [
            TokenKind::Ident("foo".to_string()),
            TokenKind::Ident("bar".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_spans_are_one_based() {
    let tokens = tokenize("a\n  b").expect("tokenize");
    assert_eq!(tokens[0].span, Span::new(1, 1));
    assert_eq!(tokens[1].span, Span::new(2, 3));
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""a\n\t\"\\\$b""#),
        [TokenKind::Str("a\n\t\"\\$b".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_indented_string_strips_common_indent() {
    let source = "''\n    export RUST_LOG=debug\n      echo ''${HOME}\n  ''";
    assert_eq!(
        kinds(source)[0],
        TokenKind::Str("export RUST_LOG=debug\n  echo ${HOME}\n".to_string())
    );
}

#[test]
fn test_lexer_errors() {
    assert!(matches!(
        tokenize("\"open"),
        Err(ParseError::UnterminatedString { .. })
    ));
    assert!(matches!(
        tokenize("/* open"),
        Err(ParseError::UnterminatedComment { .. })
    ));
    assert!(matches!(
        tokenize(r#""\q""#),
        Err(ParseError::InvalidEscape { ch: 'q', .. })
    ));
    assert!(matches!(
        tokenize("99999999999999999999"),
        Err(ParseError::IntegerOverflow { .. })
    ));
    assert!(matches!(
        tokenize("a < b"),
        Err(ParseError::UnexpectedChar { ch: '<', .. })
    ));
    assert!(matches!(
        tokenize("@"),
        Err(ParseError::UnexpectedChar { ch: '@', span }) if span == Span::new(1, 1)
    ));
}

#[test]
fn test_interpolation_rejected() {
    let err = tokenize(r#""${pkgs}""#).unwrap_err();
    insta::assert_snapshot!(err, @"expected plain string, found interpolation '${' at 1:2");
}

// =============================================================================
// Parser
// =============================================================================

#[test]
fn test_parse_shell_file() {
    let file = parse(
        "{ pkgs ? import <nixpkgs> {} }:
         with pkgs;
         mkShell { nativeBuildInputs = [ rustup rustfmt pkg-config openssl ]; }",
    );

    assert_eq!(file.formals.params.len(), 1);
    assert_eq!(file.formals.params[0].name, "pkgs");
    assert!(file.formals.params[0].default.is_some());
    assert!(!file.formals.ellipsis);
    assert_eq!(file.namespaces.len(), 1);
    assert_eq!(file.namespaces[0].as_ident(), Some("pkgs"));
    assert_eq!(file.builder.as_ident(), Some("mkShell"));
    assert_eq!(file.record.len(), 1);
    assert_eq!(file.record[0].name, "nativeBuildInputs");

    let ExprKind::List(items) = &file.record[0].value.kind else {
        panic!("expected list");
    };
    let names: Vec<_> = items.iter().filter_map(|e| e.as_ident()).collect();
    assert_eq!(names, ["rustup", "rustfmt", "pkg-config", "openssl"]);
}

#[test]
fn test_default_is_application_chain() {
    let file = parse("{ pkgs ? import <nixpkgs> {} }: mkShell { }");
    let default = file.formals.params[0].default.as_ref().expect("default");

    // (import <nixpkgs>) {}
    let ExprKind::Apply { func, arg } = &default.kind else {
        panic!("expected application");
    };
    assert!(matches!(&arg.kind, ExprKind::AttrSet(b) if b.is_empty()));
    let ExprKind::Apply { func, arg } = &func.kind else {
        panic!("expected application");
    };
    assert_eq!(func.as_ident(), Some("import"));
    assert!(matches!(&arg.kind, ExprKind::LookupPath(p) if p == "nixpkgs"));
}

#[test]
fn test_formals_are_optional() {
    let file = parse("with import <nixpkgs> {}; mkShell { }");
    assert!(file.formals.params.is_empty());
    assert_eq!(file.namespaces.len(), 1);
}

#[test]
fn test_open_ended_formals() {
    assert!(parse("{ ... }: mkShell { }").formals.ellipsis);
    let file = parse("{ a, b ? 1, ... }: mkShell { }");
    assert!(file.formals.ellipsis);
    assert_eq!(file.formals.params.len(), 2);
}

#[test]
fn test_select_and_quoted_attribute_names() {
    let file = parse(r#"mkShell { "shellHook" = pkgs.hello.name; }"#);
    assert_eq!(file.record[0].name, "shellHook");
    let ExprKind::Select { target, attr } = &file.record[0].value.kind else {
        panic!("expected select");
    };
    assert_eq!(attr, "name");
    assert!(matches!(&target.kind, ExprKind::Select { attr, .. } if attr == "hello"));
}

#[test]
fn test_parenthesized_list_element() {
    let file = parse("mkShell { packages = [ (pkgs.python3) rustup ]; }");
    let ExprKind::List(items) = &file.record[0].value.kind else {
        panic!("expected list");
    };
    assert_eq!(items.len(), 2);
}

#[test]
fn test_duplicate_parameter() {
    let err = parse_file("{ pkgs, pkgs }: mkShell { }").unwrap_err();
    assert_eq!(
        err,
        ParseError::DuplicateParameter {
            name: "pkgs".to_string(),
            span: Span::new(1, 9),
        }
    );
}

#[test]
fn test_duplicate_fields_left_to_evaluation() {
    let file = parse("mkShell { name = \"a\"; name = \"b\"; }");
    assert_eq!(file.record.len(), 2);
}

#[test]
fn test_body_must_be_builder_call() {
    let err = parse_file("{ pkgs }: pkgs").unwrap_err();
    assert!(matches!(err, ParseError::InvalidBody { .. }));

    let err = parse_file("mkShell \"shell\"").unwrap_err();
    insta::assert_snapshot!(err, @"invalid specification body at 1:9: builder argument must be a record literal");

    let err = parse_file("pkgs.mkShell { } { }").unwrap_err();
    assert!(matches!(err, ParseError::InvalidBody { .. }));
}

#[test]
fn test_parse_errors_carry_location() {
    let err = parse_file("{ pkgs }:\nmkShell { name = ; }").unwrap_err();
    insta::assert_snapshot!(err, @"expected expression, found ';' at 2:18");

    let err = parse_file("mkShell { name = \"x\"").unwrap_err();
    insta::assert_snapshot!(err, @"unexpected end of input, expected ';' after attribute value");

    let err = parse_file("{ pkgs }: mkShell { } extra").unwrap_err();
    assert!(matches!(err, ParseError::InvalidBody { .. }));
}

#[test]
fn test_missing_semicolon_after_with() {
    let err = parse_file("with pkgs mkShell { }").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn test_parse_expr() {
    let expr = parse_expr("[ 1 \"two\" true null ]").expect("parse");
    let ExprKind::List(items) = expr.kind else {
        panic!("expected list");
    };
    assert_eq!(items.len(), 4);
    assert!(matches!(items[0].kind, ExprKind::Int(1)));
    assert!(matches!(items[3].kind, ExprKind::Null));

    assert!(parse_expr("a b )").is_err());
}

#[test]
fn test_deep_nesting_rejected() {
    let parens = format!("{}x", "(".repeat(100_000));
    assert!(matches!(
        parse_expr(&parens),
        Err(ParseError::NestingTooDeep { limit: parser::MAX_NESTING, .. })
    ));

    let lists = "[".repeat(100_000);
    let err = parse_file(&format!("mkShell {{ packages = {lists}; }}")).unwrap_err();
    insta::assert_snapshot!(err, @"expression nested deeper than 256 levels at 1:278");
}

#[test]
fn test_long_application_chain_rejected() {
    let chain = format!("f{}", " x".repeat(parser::MAX_NESTING));
    let err = parse_expr(&chain).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { .. }), "{err}");

    let selects = format!("pkgs{}", ".a".repeat(parser::MAX_NESTING));
    assert!(parse_expr(&selects).is_err());

    let shallow = format!("f{}", " x".repeat(parser::MAX_NESTING - 1));
    assert!(parse_expr(&shallow).is_ok());
}
