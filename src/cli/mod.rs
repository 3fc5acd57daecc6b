//! # CLI Module
//!
//! Command-line access to a wired dispatch core, mostly for trying routes
//! and checking configuration without an HTTP server.
//!
//! ## Commands
//!
//! ### `dispatch`
//!
//! Dispatch one request and print the response body:
//!
//! ```bash
//! brrtmvc dispatch '/users/show?id=1'
//! brrtmvc dispatch -X POST --form 'name=Ada' /users/create -i
//! ```
//!
//! ### `apps`
//!
//! List apps in precedence order and the merged component bindings, marking
//! descriptors the catalog cannot resolve:
//!
//! ```bash
//! brrtmvc apps --json
//! ```
//!
//! ### `controllers`
//!
//! List qualified controller names and their actions.
//!
//! ## Global Flags
//!
//! `--config-dir`, `--app-path`, `--main-app` and `--mount` override the
//! matching `BRRTMVC_*` environment variables.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
