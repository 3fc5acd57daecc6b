//! # Apps Module
//!
//! Configuration merge layer. Every app is a flat, dotted property map read
//! from a YAML or TOML descriptor. The main application descriptor
//! (`app.yaml` by default) supplies the controller `package`; any number of
//! fragments (`*.app.yaml`, `*.app.toml`) found on the app search path add
//! more `component.<name>=<descriptor>` bindings.
//!
//! ## Precedence
//!
//! [`AppRegistry`] keeps apps in discovery order. Components are registered
//! into the container in that order, and the container keeps the last
//! binding for a name, so later apps override earlier ones.
//!
//! ## Example Descriptor
//!
//! ```yaml
//! package: shop
//! component:
//!   users: shop::MemoryUserDirectory
//!   clock: shop::SystemClock
//! ```

mod app;
mod error;
mod registry;

pub use app::{App, COMPONENT_PREFIX};
pub use error::ConfigError;
pub use registry::{split_search_path, AppRegistry, ComponentEntry, APP_FRAGMENT_SUFFIXES};
