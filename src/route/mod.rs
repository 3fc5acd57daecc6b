//! # Route Module
//!
//! A [`Route`] is the transport-independent description of one request: the
//! controller and action names parsed from the path, an ordered multimap of
//! parameters, the literal path after the mount point, and a shared
//! [`RouteContext`] that gives access to session state.
//!
//! ## Path Decomposition
//!
//! ```rust
//! use brrtmvc::route::parse_path;
//!
//! assert_eq!(
//!     parse_path("/users/show?id=7"),
//!     (Some("users".to_string()), Some("show".to_string()))
//! );
//! assert_eq!(parse_path("/"), (None, None));
//! ```
//!
//! ## Sessions
//!
//! Routes never store the user identity themselves. It lives in a
//! [`SessionStore`] owned by the transport and is reached through the route's
//! context. Routes derived with [`Route::new_route`] share that context, so a
//! redirect target still sees the same signed-in user.
//!
//! ```rust
//! use brrtmvc::ids::SessionId;
//! use brrtmvc::route::{MemorySessionStore, Params, Route, RouteContext, SessionHandle};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemorySessionStore::new());
//! let ctx = RouteContext::with_session("/app", SessionHandle::new(store, SessionId::new()));
//! let route = Route::from_request("/users/login", Params::new(), Arc::new(ctx));
//! route.set_user_id("alice").unwrap();
//!
//! let next = route.new_route().controller("users").action("home").build();
//! assert_eq!(next.user_id().unwrap().as_deref(), Some("alice"));
//! assert_eq!(next.url(), "/app/users/home");
//! ```

mod context;
mod core;
mod params;

pub use context::{
    MemorySessionStore, RouteContext, SessionError, SessionHandle, SessionStore,
    DEFAULT_CONTROLLER, DEFAULT_MAX_SESSIONS, USER_ID_KEY,
};
pub use core::{parse_path, Route, RouteBuilder};
pub use params::{Params, MAX_INLINE_PARAMS};
