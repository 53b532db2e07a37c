// envspec: Declarative Development Environment Specifications
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use super::*;

fn nixpkgs() -> PackageSet {
    PackageSet::new("nixpkgs")
        .with_package("openssl", Some("3.0.13"))
        .with_packages(["rustup", "pkg-config"])
        .with_builder("mkShell")
}

#[test]
fn test_package_set_lookup() {
    let set = nixpkgs();

    assert_eq!(set.channel(), "nixpkgs");
    assert_eq!(set.len(), 3);
    assert!(set.contains("openssl"));
    assert!(set.contains("mkShell"));
    assert!(!set.contains("cargo"));
    assert_eq!(set.get("cargo"), None);
    assert_eq!(
        set.get("openssl"),
        Some(Value::Package(PackageRef {
            name: "openssl".to_string(),
            channel: "nixpkgs".to_string(),
            version: Some("3.0.13".to_string()),
        }))
    );
    assert_eq!(set.get("mkShell"), Some(Value::Builder("mkShell".to_string())));
}

#[test]
fn test_names_are_sorted() {
    let set = nixpkgs();
    assert_eq!(
        set.package_names().collect::<Vec<_>>(),
        ["openssl", "pkg-config", "rustup"]
    );
    assert_eq!(set.builder_names().collect::<Vec<_>>(), ["mkShell"]);
    assert!(PackageSet::new("empty").is_empty());
}

#[test]
fn test_package_ref_display() {
    let mut package = PackageRef {
        name: "openssl".to_string(),
        channel: "nixpkgs".to_string(),
        version: None,
    };
    assert_eq!(package.to_string(), "nixpkgs.openssl");
    package.version = Some("3.0.13".to_string());
    assert_eq!(package.to_string(), "nixpkgs.openssl (3.0.13)");
}

#[test]
fn test_static_registry_open() {
    let registry = StaticRegistry::new()
        .with_channel(nixpkgs())
        .with_channel(PackageSet::new("unstable"));

    assert_eq!(registry.channels(), ["nixpkgs", "unstable"]);

    let set = registry.open("nixpkgs", &BTreeMap::new()).expect("open");
    assert_eq!(set.len(), 3);

    // options are accepted but do not change the set
    let options = BTreeMap::from([("system".to_string(), Value::from("x86_64-linux"))]);
    let again = registry.open("nixpkgs", &options).expect("open");
    assert!(Arc::ptr_eq(&set, &again));
}

#[test]
fn test_static_registry_unknown_channel() {
    let err = StaticRegistry::new()
        .open("nixos-unstable", &BTreeMap::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown channel '<nixos-unstable>'");
}

#[test]
fn test_insert_replaces_channel() {
    let mut registry = StaticRegistry::new().with_channel(nixpkgs());
    registry.insert(PackageSet::new("nixpkgs").with_packages(["hello"]));
    let set = registry.open("nixpkgs", &BTreeMap::new()).expect("open");
    assert_eq!(set.package_names().collect::<Vec<_>>(), ["hello"]);
}
