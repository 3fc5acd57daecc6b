//! Tests for rendering outcomes into HTTP responses
//!
//! # Test Coverage
//!
//! - Status codes per outcome kind
//! - Redirect `Location` with ordered, repeated, percent-encoded params
//! - Escaped error messages and failure traces
//! - Writing into an existing response

mod common;

use http::header::{CONTENT_TYPE, LOCATION};
use http::StatusCode;

use brrtmvc::outcome::Outcome;
use brrtmvc::route::Params;
use brrtmvc::server::{Replier, HTML_CONTENT_TYPE};
use common::{mounted_route, fixture_invoker, route};

#[test]
fn test_success_renders_body_verbatim() {
    let res = Replier::new().render(Outcome::success("<p>hi</p>"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], HTML_CONTENT_TYPE);
    assert_eq!(res.body(), "<p>hi</p>");
}

#[test]
fn test_redirect_location_joins_repeated_keys() {
    let outcome = fixture_invoker().invoke(&route("/fixture/jump"));
    let res = Replier::new().render(outcome);
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "/fixture/landing?a=1&a=2&b=x");
}

#[test]
fn test_redirect_under_mount_encodes_params() {
    let base = mounted_route("/shop", "/", Params::new());
    let target = base
        .new_route()
        .controller("search")
        .action("run")
        .param("q", "a&b c")
        .param("tag", "ü")
        .build();
    let res = Replier::new()
        .with_redirect_status(StatusCode::SEE_OTHER)
        .render(Outcome::redirect(target));
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers()[LOCATION],
        "/shop/search/run?q=a%26b%20c&tag=%C3%BC"
    );
}

#[test]
fn test_redirect_without_params_has_no_query() {
    let target = route("/").new_route().controller("users").build();
    let res = Replier::new().render(Outcome::redirect(target));
    assert_eq!(res.headers()[LOCATION], "/users");
}

#[test]
fn test_expected_errors_have_status_and_escaped_message() {
    let res = Replier::new().render(fixture_invoker().invoke(&route("/nope")));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.body().contains("controller not found"));

    let res = Replier::new().render(Outcome::bad_request("missing parameter '<id>'"));
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.body().contains("missing parameter &#39;&lt;id&gt;&#39;"));
    assert!(!res.body().contains("<id>"));
    assert!(!res.body().contains("class=\"trace\""));
}

#[test]
fn test_internal_error_includes_message_and_trace() {
    let res = Replier::new().render(fixture_invoker().invoke(&route("/fixture/fail")));
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.body();
    assert!(body.contains("loading fixture"), "{body}");
    assert!(body.contains("database unavailable"), "{body}");
    assert!(body.contains("<br/>"), "{body}");
    assert!(body.contains("class=\"trace\""), "{body}");
}

#[test]
fn test_reply_overwrites_existing_response() {
    let mut res = http::Response::builder()
        .status(StatusCode::IM_A_TEAPOT)
        .body("stale".to_string())
        .unwrap();
    Replier::new().reply(Outcome::success("fresh"), &mut res);
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body(), "fresh");
}
