//! # IoC Module
//!
//! A name-keyed component container with explicit injection.
//!
//! ## Core Concepts
//!
//! - **Bindings**: a name maps to either a ready instance or a
//!   [`ComponentType`] that is default-constructed and injected on every use.
//!   Registering a name again replaces the earlier binding (last wins).
//! - **Injection**: types implementing [`Inject`] declare their slots. Each
//!   slot resolves by name first and then by the type it asks for. Unmatched
//!   slots stay `None`.
//! - **Interfaces**: instances can be registered as `Arc<dyn Trait>` and
//!   types can be exposed behind a trait with [`ComponentType::provides`].
//! - **Cycles**: constructing a component that (transitively) needs itself
//!   fails with [`ContainerError::CyclicDependency`] instead of recursing.
//! - **Catalog**: [`ComponentCatalog`] maps configuration descriptors to
//!   component types, so apps can wire components from config files.
//!
//! ## Quick Start
//!
//! ```
//! use brrtmvc::ioc::{ComponentType, Container, Inject};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct English;
//! impl Inject for English {}
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "Hello!".to_string()
//!     }
//! }
//!
//! #[derive(Default, Inject)]
//! struct Welcome {
//!     #[inject]
//!     greeter: Option<Arc<dyn Greeter>>,
//! }
//!
//! let container = Container::new();
//! container.add_type(
//!     "greeter",
//!     ComponentType::provides::<dyn Greeter, English>(|g| g),
//! );
//!
//! let mut welcome = Welcome::default();
//! container.inject(&mut welcome).unwrap();
//! assert_eq!(welcome.greeter.unwrap().greet(), "Hello!");
//! ```

mod catalog;
mod container;
mod core;
mod error;

pub use brrtmvc_macros::Inject;
pub use catalog::ComponentCatalog;
pub use container::{ComponentType, Container, Inject, Slots};
pub use error::ContainerError;
