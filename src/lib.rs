//! # brrtmvc
//!
//! **brrtmvc** is the request-dispatch core of a small server-side MVC framework. It turns an
//! inbound request into a `(controller, action, params)` triple, builds the controller with its
//! dependencies injected, runs the action and converts what it returns into a protocol-agnostic
//! [`Outcome`] that a transport adapter renders back to the client.
//!
//! ## Architecture
//!
//! - **[`route`]** - The immutable [`Route`] value, its parameters and session context
//! - **[`outcome`]** - [`Outcome`]: success, redirect or classified error
//! - **[`ioc`]** - Name-keyed component [`Container`](ioc::Container) with `#[derive(Inject)]`
//! - **[`apps`]** - App descriptors (YAML/TOML) and the ordered [`AppRegistry`](apps::AppRegistry)
//! - **[`dispatcher`]** - Controllers, actions and the [`Invoker`](dispatcher::Invoker)
//! - **[`server`]** - `http` request/response adapter and startup wiring
//! - **[`runtime_config`]** / **[`logging`]** - Environment driven configuration and tracing setup
//! - **[`cli`]** - The `brrtmvc` command
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Service as server::Service
//!     participant Invoker as dispatcher::Invoker
//!     participant Container as ioc::Container
//!     participant Action as Controller action
//!     participant Replier as server::Replier
//!
//!     Client->>Service: GET /users/show?id=7
//!     Service->>Service: session cookie, build_route
//!     Service->>Invoker: invoke(route)
//!     Invoker->>Invoker: {package}.controllers.Users
//!     alt Controller or action missing
//!         Invoker-->>Service: Error NotFound
//!     end
//!     Invoker->>Container: inject(Users::default())
//!     Invoker->>Action: show(call)
//!     alt Missing or invalid parameter
//!         Action-->>Invoker: BindError
//!         Invoker-->>Service: Error BadRequest
//!     end
//!     alt Action fails or panics
//!         Invoker-->>Service: Error Internal
//!     end
//!     Action-->>Invoker: String / Route / Outcome
//!     Invoker-->>Service: Outcome
//!     Service->>Replier: render(outcome)
//!     Replier-->>Client: 200 / 302 / 400 / 404 / 500
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use brrtmvc::runtime_config::RuntimeConfig;
//! use brrtmvc::server::Service;
//!
//! let config = RuntimeConfig::from_env();
//! let service = Service::bootstrap(&config, &brrtmvc::demo::catalog(), brrtmvc::demo::controllers())
//!     .expect("bootstrap");
//! let req = http::Request::get("/users/show?id=1").body(Vec::<u8>::new()).unwrap();
//! let res = service.handle(&req);
//! println!("{} {}", res.status(), res.body());
//! ```
//!
//! ## Configuration
//!
//! The main app descriptor (`config/app.yaml` by default) names the controller `package` and
//! binds components by descriptor:
//!
//! ```yaml
//! package: demo
//! title: brrtmvc demo
//! component:
//!   greeter: demo::FriendlyGreeter
//! ```
//!
//! Fragments named `*.app.yaml`, `*.app.yml` or `*.app.toml` on the app search path add more
//! bindings. The main app is registered last, so its bindings win.

extern crate self as brrtmvc;

pub mod apps;
pub mod cli;
pub mod demo;
pub mod dispatcher;
pub mod ids;
pub mod ioc;
pub mod logging;
pub mod outcome;
pub mod route;
pub mod runtime_config;
pub mod server;

pub use outcome::{ErrorKind, IntoOutcome, Outcome};
pub use route::Route;
