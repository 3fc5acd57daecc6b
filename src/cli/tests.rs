//! Unit tests for CLI parsing

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_dispatch_command_defaults() {
    let cli = Cli::try_parse_from(["brrtmvc", "dispatch", "/users/show?id=1"]).unwrap();

    match cli.command {
        Commands::Dispatch {
            target,
            method,
            form,
            session,
            include_headers,
        } => {
            assert_eq!(target, "/users/show?id=1");
            assert_eq!(method, "GET");
            assert!(form.is_none());
            assert!(session.is_none());
            assert!(!include_headers);
        }
        _ => panic!("Expected Dispatch command"),
    }
}

#[test]
fn test_dispatch_command_with_form() {
    let cli = Cli::try_parse_from([
        "brrtmvc",
        "dispatch",
        "-X",
        "post",
        "--form",
        "name=Ada",
        "-i",
        "/users/create",
    ])
    .unwrap();

    match cli.command {
        Commands::Dispatch {
            method,
            form,
            include_headers,
            ..
        } => {
            assert_eq!(method, "post");
            assert_eq!(form.as_deref(), Some("name=Ada"));
            assert!(include_headers);
        }
        _ => panic!("Expected Dispatch command"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "brrtmvc",
        "apps",
        "--json",
        "--app-path",
        "a:b",
        "--main-app",
        "main.toml",
        "--mount",
        "/shop",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Apps { json: true }));
    let config = cli.runtime_config();
    assert_eq!(config.app_paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    assert_eq!(config.main_app, "main.toml");
    assert_eq!(config.mount, "/shop");
}

#[test]
fn test_controllers_command() {
    let cli = Cli::try_parse_from(["brrtmvc", "--config-dir", "conf", "controllers"]).unwrap();
    assert!(matches!(cli.command, Commands::Controllers));
    assert_eq!(cli.runtime_config().config_dir, PathBuf::from("conf"));
}
