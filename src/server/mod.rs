//! # Server Module
//!
//! Transport adapter between `http` requests and the dispatch core.
//!
//! [`Service::bootstrap`] loads the apps, fills the container from the
//! component catalog and builds the [`Invoker`](crate::dispatcher::Invoker).
//! [`Service::handle`] then turns each request into a
//! [`Route`](crate::route::Route) with [`build_route`], invokes it and renders
//! the [`Outcome`](crate::outcome::Outcome) with a [`Replier`]. No socket is
//! opened here; any HTTP server that speaks `http::Request` can drive it.
//!
//! ## Status Mapping
//!
//! | Outcome | Status |
//! |---------|--------|
//! | `Success` | 200 |
//! | `Redirect` | 302 (configurable 3xx) |
//! | `Error` NotFound | 404 |
//! | `Error` BadRequest | 400 |
//! | `Error` Internal | 500, with a failure trace |

mod error;
mod request;
mod response;
mod service;

pub use error::StartupError;
pub use request::{build_route, parse_cookies, strip_mount};
pub use response::{html_escape, location, render_trace, Replier, HTML_CONTENT_TYPE, TRACE_TAB};
pub use service::{Service, APP_COMPONENT, REQUEST_ID_HEADER, SESSION_COOKIE};
