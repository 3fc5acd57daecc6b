use std::any::type_name;
use std::sync::Arc;

use crate::route::{Params, Route, RouteBuilder, RouteContext, SessionError};

/// Failure to bind a request parameter to an action argument.
///
/// Returned from [`Call`] accessors; when an action propagates it with `?`
/// the invoker reports a bad request instead of an internal error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("missing parameter '{name}'")]
    Missing { name: String },

    #[error("invalid parameter '{name}': cannot read {value:?} as {target}")]
    Invalid {
        name: String,
        value: String,
        target: &'static str,
    },
}

/// Coercion from the raw string values of one parameter key.
///
/// Scalar types read the first value and reject an empty slice; `Vec<T>`
/// reads every value.
pub trait FromParam: Sized {
    /// `Err` carries the offending raw value.
    fn from_param(values: &[String]) -> Result<Self, String>;
}

fn first(values: &[String]) -> Result<&str, String> {
    values.first().map(String::as_str).ok_or_else(String::new)
}

impl FromParam for String {
    fn from_param(values: &[String]) -> Result<Self, String> {
        first(values).map(str::to_string)
    }
}

impl FromParam for bool {
    fn from_param(values: &[String]) -> Result<Self, String> {
        let raw = first(values)?.trim();
        match raw.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" | "" => Ok(false),
            _ => Err(raw.to_string()),
        }
    }
}

macro_rules! from_param_via_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromParam for $ty {
                fn from_param(values: &[String]) -> Result<Self, String> {
                    let raw = first(values)?.trim();
                    raw.parse::<$ty>().map_err(|_| raw.to_string())
                }
            }
        )*
    };
}

from_param_via_from_str!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char);

impl<T: FromParam> FromParam for Vec<T> {
    fn from_param(values: &[String]) -> Result<Self, String> {
        values
            .iter()
            .map(|v| T::from_param(std::slice::from_ref(v)))
            .collect()
    }
}

/// Present values are wrapped in `Some`. Use [`Call::optional`] to accept a
/// missing key.
impl<T: FromParam> FromParam for Option<T> {
    fn from_param(values: &[String]) -> Result<Self, String> {
        T::from_param(values).map(Some)
    }
}

/// Everything an action can see about the request it serves.
#[derive(Debug)]
pub struct Call<'a> {
    route: &'a Route,
    controller: &'a str,
    action: &'a str,
}

impl<'a> Call<'a> {
    /// `controller` and `action` are the resolved names, defaults applied.
    pub fn new(route: &'a Route, controller: &'a str, action: &'a str) -> Self {
        Self {
            route,
            controller,
            action,
        }
    }

    #[must_use]
    pub fn route(&self) -> &'a Route {
        self.route
    }

    #[must_use]
    pub fn params(&self) -> &'a Params {
        self.route.params()
    }

    #[must_use]
    pub fn context(&self) -> &'a Arc<RouteContext> {
        self.route.context()
    }

    #[must_use]
    pub fn controller_name(&self) -> &'a str {
        self.controller
    }

    #[must_use]
    pub fn action_name(&self) -> &'a str {
        self.action
    }

    /// Required parameter.
    pub fn param<T: FromParam>(&self, name: &str) -> Result<T, BindError> {
        self.optional(name)?.ok_or_else(|| BindError::Missing {
            name: name.to_string(),
        })
    }

    /// Optional parameter: `None` when the key is absent.
    pub fn optional<T: FromParam>(&self, name: &str) -> Result<Option<T>, BindError> {
        let values = self.route.params().get_all(name);
        if values.is_empty() {
            return Ok(None);
        }
        T::from_param(values).map(Some).map_err(|value| BindError::Invalid {
            name: name.to_string(),
            value,
            target: type_name::<T>(),
        })
    }

    /// Optional parameter falling back to `T::default()` when absent.
    pub fn param_or_default<T: FromParam + Default>(&self, name: &str) -> Result<T, BindError> {
        Ok(self.optional(name)?.unwrap_or_default())
    }

    /// Signed-in user of the session behind this request.
    pub fn user_id(&self) -> Result<Option<String>, SessionError> {
        self.route.user_id()
    }

    /// Start a redirect target that keeps the current session.
    pub fn redirect_to(&self, controller: &str, action: &str) -> RouteBuilder {
        self.route.new_route().controller(controller).action(action)
    }
}
