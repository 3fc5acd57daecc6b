use http::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use http::StatusCode;
use tracing::{error, warn};

use crate::outcome::{ErrorKind, Outcome};
use crate::route::Route;

/// Content type of every body the replier writes.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Stand-in for a tab inside a rendered failure trace.
pub const TRACE_TAB: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Renders an [`Outcome`] into an HTTP response.
#[derive(Debug, Clone, Copy)]
pub struct Replier {
    redirect_status: StatusCode,
}

impl Default for Replier {
    fn default() -> Self {
        Self {
            redirect_status: StatusCode::FOUND,
        }
    }
}

impl Replier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status used for redirects. Anything outside 3xx is ignored.
    #[must_use]
    pub fn with_redirect_status(mut self, status: StatusCode) -> Self {
        if status.is_redirection() {
            self.redirect_status = status;
        } else {
            warn!(status = status.as_u16(), "Ignoring non-redirect status for redirects");
        }
        self
    }

    #[must_use]
    pub fn redirect_status(&self) -> StatusCode {
        self.redirect_status
    }

    /// Write `outcome` into `res`, replacing status and body.
    pub fn reply(&self, outcome: Outcome, res: &mut http::Response<String>) {
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
        match outcome {
            Outcome::Success { content } => {
                *res.status_mut() = StatusCode::OK;
                *res.body_mut() = content;
            }
            Outcome::Redirect { target } => {
                let location = location(&target);
                match HeaderValue::from_str(&location) {
                    Ok(value) => {
                        *res.status_mut() = self.redirect_status;
                        res.headers_mut().insert(LOCATION, value);
                        *res.body_mut() = String::new();
                    }
                    Err(e) => {
                        error!(location = %location, error = %e, "Redirect target is not a valid header value");
                        *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                        *res.body_mut() = error_page(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "invalid redirect target",
                            None,
                        );
                    }
                }
            }
            Outcome::Error {
                message,
                kind,
                cause,
            } => {
                let status = status_for(kind);
                *res.status_mut() = status;
                let trace = match (kind, &cause) {
                    (ErrorKind::Internal, Some(cause)) => Some(render_trace(cause)),
                    _ => None,
                };
                *res.body_mut() = error_page(status, &message, trace.as_deref());
            }
        }
    }

    /// Fresh response for `outcome`.
    #[must_use]
    pub fn render(&self, outcome: Outcome) -> http::Response<String> {
        let mut res = http::Response::new(String::new());
        self.reply(outcome, &mut res);
        res
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    StatusCode::from_u16(kind.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Redirect location: the target URL, then `?` and its percent-encoded
/// params when there are any.
#[must_use]
pub fn location(target: &Route) -> String {
    let url = target.url();
    let base = url.split_once('?').map_or(url.as_str(), |(b, _)| b);
    if target.params().is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", target.params().to_query_string())
    }
}

/// Failure trace for HTML: the error chain in `{:?}` form, escaped, with
/// line breaks as `<br/>` and tabs as [`TRACE_TAB`].
#[must_use]
pub fn render_trace(cause: &anyhow::Error) -> String {
    html_escape(&format!("{cause:?}"))
        .replace('\n', "<br/>\n")
        .replace('\t', TRACE_TAB)
}

#[must_use]
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn error_page(status: StatusCode, message: &str, trace: Option<&str>) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let mut body = format!(
        "<html><head><title>{code} {title}</title></head><body><h1>{title}</h1><p>{message}</p>",
        code = status.as_u16(),
        message = html_escape(message),
    );
    if let Some(trace) = trace {
        body.push_str("<pre class=\"trace\">");
        body.push_str(trace);
        body.push_str("</pre>");
    }
    body.push_str("</body></html>");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_trace_markup() {
        let err = anyhow::anyhow!("line one\n\tindented <tag>");
        let trace = render_trace(&err);
        assert!(trace.contains("line one<br/>"));
        assert!(trace.contains(&format!("{TRACE_TAB}indented &lt;tag&gt;")));
    }

    #[test]
    fn test_non_redirect_status_ignored() {
        let replier = Replier::new().with_redirect_status(StatusCode::OK);
        assert_eq!(replier.redirect_status(), StatusCode::FOUND);
        let replier = Replier::new().with_redirect_status(StatusCode::SEE_OTHER);
        assert_eq!(replier.redirect_status(), StatusCode::SEE_OTHER);
    }
}
