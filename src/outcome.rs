//! # Outcome Module
//!
//! Every dispatch ends in exactly one [`Outcome`]: rendered content, a
//! redirect to another [`Route`], or an error. The error variant carries an
//! [`ErrorKind`] so the transport can tell expected failures (unknown
//! controller, bad parameter) from internal ones. Only internal failures
//! carry a `cause`.

use std::fmt;

use crate::route::Route;

/// Classification of an [`Outcome::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Controller or action does not exist.
    NotFound,
    /// A required action parameter is missing or could not be coerced.
    BadRequest,
    /// The action (or the wiring around it) failed unexpectedly.
    Internal,
}

impl ErrorKind {
    /// HTTP status the transport renders for this kind.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::BadRequest => 400,
            ErrorKind::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::BadRequest => "bad request",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(s)
    }
}

/// Result of invoking an action.
///
/// Build errors with [`Outcome::not_found`], [`Outcome::bad_request`] and
/// [`Outcome::failure`]; they keep `cause` present exactly when the kind is
/// [`ErrorKind::Internal`].
#[derive(Debug)]
pub enum Outcome {
    Success {
        content: String,
    },
    Redirect {
        target: Route,
    },
    Error {
        message: String,
        kind: ErrorKind,
        cause: Option<anyhow::Error>,
    },
}

impl Outcome {
    pub fn success(content: impl Into<String>) -> Self {
        Outcome::Success {
            content: content.into(),
        }
    }

    pub fn redirect(target: impl Into<Route>) -> Self {
        Outcome::Redirect {
            target: target.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Outcome::Error {
            message: message.into(),
            kind: ErrorKind::NotFound,
            cause: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Outcome::Error {
            message: message.into(),
            kind: ErrorKind::BadRequest,
            cause: None,
        }
    }

    /// Internal failure; the message is the error's own display text.
    #[must_use]
    pub fn failure(cause: anyhow::Error) -> Self {
        Outcome::Error {
            message: cause.to_string(),
            kind: ErrorKind::Internal,
            cause: Some(cause),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Outcome::Redirect { .. })
    }

    /// Kind of the error variant, `None` for success and redirect.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Conversion of an action's return value into an [`Outcome`].
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for Route {
    fn into_outcome(self) -> Outcome {
        Outcome::Redirect { target: self }
    }
}

impl IntoOutcome for crate::route::RouteBuilder {
    fn into_outcome(self) -> Outcome {
        Outcome::Redirect {
            target: self.build(),
        }
    }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Outcome {
        Outcome::Success { content: self }
    }
}

impl IntoOutcome for &str {
    fn into_outcome(self) -> Outcome {
        Outcome::success(self)
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::success(String::new())
    }
}

impl IntoOutcome for serde_json::Value {
    fn into_outcome(self) -> Outcome {
        match self {
            serde_json::Value::String(s) => Outcome::Success { content: s },
            other => Outcome::success(other.to_string()),
        }
    }
}
