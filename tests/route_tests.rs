//! Tests for route parsing and derived routes
//!
//! # Test Coverage
//!
//! - Path decomposition into at most two non-empty segments
//! - Derived routes share the session but nothing else
//! - URL construction under a mount point

use std::sync::Arc;

use brrtmvc::ids::SessionId;
use brrtmvc::route::{
    parse_path, MemorySessionStore, Params, Route, RouteContext, SessionHandle, SessionStore,
};

fn session_context(mount: &str) -> Arc<RouteContext> {
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    Arc::new(RouteContext::with_session(
        mount,
        SessionHandle::new(store, SessionId::new()),
    ))
}

#[test]
fn test_parse_path_never_yields_empty_segments() {
    let paths = [
        "",
        "/",
        "//",
        "///x",
        "/users",
        "/users/",
        "/users//show",
        "/users/show/extra/more",
        "users/show",
        "/?id=1",
        "/users?x=/a/b",
        "/users/show#frag",
    ];
    for path in paths {
        let (controller, action) = parse_path(path);
        assert_ne!(controller.as_deref(), Some(""), "controller of {path:?}");
        assert_ne!(action.as_deref(), Some(""), "action of {path:?}");
        if controller.is_none() {
            assert!(action.is_none(), "action without controller for {path:?}");
        }
    }

    assert_eq!(parse_path("/"), (None, None));
    assert_eq!(parse_path("///x"), (Some("x".to_string()), None));
    assert_eq!(
        parse_path("/users//show"),
        (Some("users".to_string()), Some("show".to_string()))
    );
    assert_eq!(parse_path("/users?x=/a/b"), (Some("users".to_string()), None));
}

#[test]
fn test_request_route_parses_controller_action_and_params() {
    let route = Route::detached("/users/show?id=7");
    assert_eq!(route.controller(), Some("users"));
    assert_eq!(route.action(), Some("show"));
    assert_eq!(route.params().get_all("id"), ["7".to_string()]);
}

#[test]
fn test_new_route_keeps_session_only() {
    let ctx = session_context("/app");
    let mut params = Params::new();
    params.add("id", "7");
    let route = Route::from_request("/users/show?id=7", params, Arc::clone(&ctx));
    route.set_user_id("alice").unwrap();

    let derived = route.new_route().build();
    assert_eq!(derived.user_id().unwrap(), route.user_id().unwrap());
    assert_eq!(derived.user_id().unwrap().as_deref(), Some("alice"));
    assert_eq!(derived.controller(), None);
    assert_eq!(derived.action(), None);
    assert!(derived.params().is_empty());
    assert!(Arc::ptr_eq(derived.context(), route.context()));

    // identity changes are visible through both routes
    derived.set_user_id("bob").unwrap();
    assert_eq!(route.user_id().unwrap().as_deref(), Some("bob"));
}

#[test]
fn test_derived_route_paths_and_urls() {
    let ctx = session_context("/app/");
    let base = Route::from_request("/", Params::new(), ctx);

    let full = base.new_route().controller("users").action("show").build();
    assert_eq!(full.path(), "/users/show");
    assert_eq!(full.url(), "/app/users/show");

    let controller_only = base.new_route().controller("users").build();
    assert_eq!(controller_only.url(), "/app/users");

    let action_only = base.new_route().action("about").build();
    assert_eq!(action_only.controller(), Some("index"));
    assert_eq!(action_only.url(), "/app/index/about");

    let root = base.new_route().build();
    assert_eq!(root.url(), "/app/");
}

#[test]
fn test_route_without_mount_has_plain_url() {
    let route = Route::detached("users/show");
    assert_eq!(route.path(), "/users/show");
    assert_eq!(route.url(), "/users/show");
}
