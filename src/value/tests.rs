// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use super::*;

fn rustup() -> PackageRef {
    PackageRef {
        name: "rustup".to_string(),
        channel: "nixpkgs".to_string(),
        version: Some("1.27.1".to_string()),
    }
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Null.type_name(), "null");
    assert_eq!(Value::from("x").type_name(), "string");
    assert_eq!(Value::from(vec![1_i64, 2]).type_name(), "list");
    assert_eq!(Value::from(rustup()).type_name(), "package");
    assert_eq!(Value::Channel("nixpkgs".to_string()).type_name(), "lookup path");
    assert_eq!(Value::Builtin(Builtin::Import).type_name(), "builtin");
}

#[test]
fn test_accessors() {
    let value = Value::from("shell");
    assert_eq!(value.as_str(), Some("shell"));
    assert_eq!(value.as_list(), None);
    assert_eq!(Value::from(rustup()).as_package(), Some(&rustup()));

    let list: Value = [Value::from(true), Value::Null].into_iter().collect();
    assert_eq!(list.as_list().map(<[Value]>::len), Some(2));
}

#[test]
fn test_attr_lookup() {
    let attrs = Value::Attrs(BTreeMap::from([("a".to_string(), Value::Int(1))]));
    assert_eq!(attrs.attr("a"), Some(Value::Int(1)));
    assert_eq!(attrs.attr("b"), None);
    assert!(attrs.is_namespace());

    let set = Value::from(
        PackageSet::new("nixpkgs")
            .with_package("rustup", Some("1.27.1"))
            .with_builder("mkShell"),
    );
    assert_eq!(set.attr("rustup"), Some(Value::from(rustup())));
    assert_eq!(set.attr("mkShell"), Some(Value::Builder("mkShell".to_string())));
    assert!(set.is_namespace());

    assert_eq!(Value::from("x").attr("len"), None);
    assert!(!Value::from("x").is_namespace());
}

#[test]
fn test_serialize_plain_values() {
    let value = Value::Attrs(BTreeMap::from([
        ("enabled".to_string(), Value::Bool(true)),
        ("count".to_string(), Value::Int(3)),
        ("nothing".to_string(), Value::Null),
        ("tools".to_string(), Value::from(vec![rustup()])),
    ]));
    insta::assert_snapshot!(
        serde_json::to_string(&value).expect("json"),
        @r#"{"count":3,"enabled":true,"nothing":null,"tools":[{"name":"rustup","channel":"nixpkgs","version":"1.27.1"}]}"#
    );
}

#[test]
fn test_serialize_opaque_values() {
    let values = vec![
        Value::from(PackageSet::new("nixpkgs")),
        Value::Channel("nixpkgs".to_string()),
        Value::Builtin(Builtin::Import),
        Value::Builtin(Builtin::ChannelFunction("nixpkgs".to_string())),
        Value::Builder("mkShell".to_string()),
    ];
    insta::assert_snapshot!(
        serde_json::to_string(&values).expect("json"),
        @r#"[{"package_set":"nixpkgs"},{"channel":"nixpkgs"},{"builtin":"import"},{"builtin":"import <nixpkgs>"},{"builder":"mkShell"}]"#
    );
}
