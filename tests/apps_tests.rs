//! Tests for app descriptor loading and discovery order
//!
//! # Test Coverage
//!
//! - YAML and TOML descriptors load into the same flat view
//! - Fragment discovery is ordered by search path, then file name
//! - Missing search paths are skipped, malformed files are errors
//! - The merged component view is last-wins

mod common;

use brrtmvc::apps::{App, AppRegistry, ConfigError};
use common::write_file;

#[test]
fn test_load_yaml_and_toml() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "app.yaml",
        "package: shop\ncomponent:\n  users: shop::Users\n",
    );
    write_file(
        dir.path(),
        "extra.app.toml",
        "[component]\nusers = \"shop::Users\"\n",
    );

    let yaml = App::load(dir.path(), "app.yaml").unwrap();
    assert_eq!(yaml.name(), "app");
    assert_eq!(yaml.get("package"), Some("shop"));

    let toml = App::load(dir.path(), "extra.app.toml").unwrap();
    assert_eq!(toml.name(), "extra");
    assert_eq!(toml.components(), yaml.components());
}

#[test]
fn test_missing_main_app_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = App::load(dir.path(), "app.yaml").unwrap_err();
    match err {
        ConfigError::NotFound { path } => assert!(path.ends_with("app.yaml")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_malformed_descriptor_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "bad.app.yaml", "component: [unclosed\n");
    let err = AppRegistry::load_from_paths(&[dir.path()]).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
}

#[test]
fn test_discovery_order_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_file(first.path(), "zeta.app.yaml", "component.clock: a::Clock\n");
    write_file(first.path(), "alpha.app.yml", "component.users: a::Users\n");
    write_file(first.path(), "app.yaml", "package: ignored\n");
    write_file(first.path(), "notes.yaml", "component.users: ignored\n");
    write_file(second.path(), "beta.app.toml", "component.users = \"b::Users\"\n");

    let missing = first.path().join("does-not-exist");
    let registry =
        AppRegistry::load_from_paths(&[first.path(), missing.as_path(), second.path()]).unwrap();
    let names: Vec<&str> = registry.apps().iter().map(App::name).collect();
    assert_eq!(names, ["alpha", "zeta", "beta"]);

    let merged = registry.component_bindings();
    let users = merged.iter().find(|c| c.name == "users").unwrap();
    assert_eq!(users.descriptor, "b::Users");
    assert_eq!(users.app, "beta");
    let clock = merged.iter().find(|c| c.name == "clock").unwrap();
    assert_eq!(clock.app, "zeta");
}

#[test]
fn test_added_app_takes_precedence() {
    let mut registry = AppRegistry::new();
    registry.add(App::from_properties("fragment", [("component.greeter", "a::Plain")]));
    registry.add(App::from_properties("main", [("component.greeter", "a::Friendly")]));
    let merged = registry.component_bindings();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].descriptor, "a::Friendly");
    assert_eq!(registry.get("main").map(App::name), Some("main"));
}
