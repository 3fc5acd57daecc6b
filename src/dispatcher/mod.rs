//! # Dispatcher Module
//!
//! Turns a [`Route`](crate::route::Route) into an
//! [`Outcome`](crate::outcome::Outcome) by finding a controller, injecting
//! it and running one of its actions.
//!
//! ## Overview
//!
//! Controllers are plain structs implementing [`Controller`]. They are
//! registered in a [`ControllerRegistry`] under a qualified name built from
//! the app package: with `package: shop`, the route `/users/show` resolves to
//! `shop.controllers.Users`, action `show`. Without a package the name is
//! `controllers.Users`. A missing controller or action segment falls back to
//! `index`.
//!
//! ## Request Flow
//!
//! 1. [`Invoker`] builds the qualified name and looks the controller up
//! 2. A fresh controller is created with `Default` and injected from the
//!    [`Container`](crate::ioc::Container)
//! 3. The action is looked up and its required parameters are checked
//! 4. The action runs with a [`Call`] giving typed parameter access
//! 5. The return value is normalized through
//!    [`IntoOutcome`](crate::outcome::IntoOutcome)
//!
//! ## Error Handling
//!
//! - Unknown controller or action: `NotFound`
//! - Missing or unparsable parameter ([`BindError`]): `BadRequest`
//! - Any other action error, injection failure or panic: `Internal`
//!
//! Panics are caught per dispatch, so a failing action never takes the
//! caller down with it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use brrtmvc::dispatcher::{Actions, Call, Controller, ControllerRegistry, Invoker};
//! use brrtmvc::ioc::{Container, Inject};
//! use brrtmvc::outcome::Outcome;
//! use brrtmvc::route::Route;
//!
//! #[derive(Default, Inject)]
//! struct Users;
//!
//! impl Users {
//!     fn show(&mut self, call: &Call<'_>) -> anyhow::Result<String> {
//!         let id: u64 = call.param("id")?;
//!         Ok(format!("user {id}"))
//!     }
//! }
//!
//! impl Controller for Users {
//!     fn actions(actions: &mut Actions<Self>) {
//!         actions.add("show", Users::show);
//!     }
//! }
//!
//! let registry = ControllerRegistry::new().with::<Users>("controllers.Users");
//! let invoker = Invoker::new(None, registry, Arc::new(Container::new()));
//! match invoker.invoke(&Route::detached("/users/show?id=7")) {
//!     Outcome::Success { content } => assert_eq!(content, "user 7"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod call;
mod controller;
mod core;

pub use call::{BindError, Call, FromParam};
pub use controller::{ActionDef, Actions, Controller, ControllerRegistry};
pub use core::{capitalize, Invoker, CONTROLLERS_PACKAGE, DEFAULT_ACTION, DEFAULT_CONTROLLER};
