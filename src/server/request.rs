use http::header::{CONTENT_TYPE, COOKIE};
use http::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::route::{Params, Route, RouteContext};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Parse every `Cookie` header into a name/value map.
///
/// Later cookies with the same name win.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim().to_string();
            Some((name.to_string(), value))
        })
        .collect()
}

/// Remove `mount` from the front of `path`.
///
/// Returns `None` when the path lies outside the mount point. The result
/// always starts with `/`.
pub fn strip_mount<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let mount = mount.trim_end_matches('/');
    if mount.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(mount)?;
    match rest {
        "" => Some("/"),
        r if r.starts_with('/') => Some(r),
        _ => None,
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Build a [`Route`] from an HTTP request.
///
/// The mount is stripped from the path; query parameters come first, then
/// the fields of an `application/x-www-form-urlencoded` body. A path outside
/// the mount point is kept whole, so it simply fails to resolve.
pub fn build_route<B: AsRef<[u8]>>(req: &http::Request<B>, context: Arc<RouteContext>) -> Route {
    let uri = req.uri();
    let full_path = uri.path();
    let path = match strip_mount(full_path, context.mount()) {
        Some(p) => p,
        None => {
            debug!(path = %full_path, mount = %context.mount(), "Request outside mount point");
            full_path
        }
    };

    let mut params = uri.query().map(Params::from_query).unwrap_or_default();
    let query_count = params.len();

    let body = req.body().as_ref();
    if !body.is_empty() && is_form(req.headers()) {
        match std::str::from_utf8(body) {
            Ok(text) => params.extend_from_query(text),
            Err(e) => debug!(error = %e, "Form body is not UTF-8, ignored"),
        }
    }

    let relative = match uri.query() {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    };

    debug!(
        method = %req.method(),
        path = %relative,
        query_params = query_count,
        form_params = params.len() - query_count,
        "Route built"
    );
    Route::from_request(relative, params, context)
}
