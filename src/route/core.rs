use std::sync::Arc;

use super::context::{RouteContext, SessionError};
use super::params::Params;

/// Split a request path into `(controller, action)`.
///
/// Everything from the first `?` or `#` is ignored. The first two non-empty
/// `/`-separated segments become the controller and the action; missing
/// segments are `None`, never an empty string.
#[must_use]
pub fn parse_path(path: &str) -> (Option<String>, Option<String>) {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let mut segments = path[..end]
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let controller = segments.next();
    let action = segments.next();
    (controller, action)
}

/// Transport-independent description of a single request.
///
/// Immutable once built. The user identity lives in the session behind
/// [`RouteContext`], never in the route itself.
#[derive(Debug, Clone)]
pub struct Route {
    controller: Option<String>,
    action: Option<String>,
    params: Params,
    path: String,
    context: Arc<RouteContext>,
}

impl Route {
    /// Build a route for an inbound request.
    ///
    /// `path` is everything after the mount point, query included. The
    /// controller and action are taken from it with [`parse_path`].
    pub fn from_request(path: impl Into<String>, params: Params, context: Arc<RouteContext>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        let (controller, action) = parse_path(&path);
        Self {
            controller,
            action,
            params,
            path,
            context,
        }
    }

    /// Route for `path` with no session and no mount, params read from its
    /// query component.
    #[must_use]
    pub fn detached(path: &str) -> Self {
        let params = path
            .split_once('?')
            .map(|(_, q)| Params::from_query(q))
            .unwrap_or_default();
        Self::from_request(path, params, Arc::new(RouteContext::detached("")))
    }

    #[must_use]
    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn context(&self) -> &Arc<RouteContext> {
        &self.context
    }

    /// Transport-addressable URL: mount prefix followed by the stored path.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}", self.context.mount(), self.path)
    }

    /// Shorthand for `self.context().user_id()`.
    pub fn user_id(&self) -> Result<Option<String>, SessionError> {
        self.context.user_id()
    }

    /// Shorthand for `self.context().set_user_id(..)`.
    pub fn set_user_id(&self, user_id: impl Into<String>) -> Result<(), SessionError> {
        self.context.set_user_id(user_id)
    }

    /// Start a fresh route sharing this route's context and nothing else.
    #[must_use]
    pub fn new_route(&self) -> RouteBuilder {
        RouteBuilder::new(Arc::clone(&self.context))
    }
}

/// Builder for derived routes, mostly redirect targets.
#[derive(Debug, Clone)]
#[must_use]
pub struct RouteBuilder {
    controller: Option<String>,
    action: Option<String>,
    params: Params,
    context: Arc<RouteContext>,
}

impl RouteBuilder {
    pub fn new(context: Arc<RouteContext>) -> Self {
        Self {
            controller: None,
            action: None,
            params: Params::new(),
            context,
        }
    }

    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into()).filter(|c| !c.is_empty());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into()).filter(|a| !a.is_empty());
        self
    }

    /// Append a parameter value; repeated calls with the same key keep all values.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.add(key, value.to_string());
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Finish the route. Its path is `/{controller}/{action}` (or a prefix of
    /// it) without a query; params are rendered separately when replying.
    #[must_use]
    pub fn build(self) -> Route {
        // an action without a controller goes through the context's default controller
        let controller = match (self.controller, &self.action) {
            (None, Some(_)) => Some(self.context.default_controller().to_string()),
            (c, _) => c,
        };
        let path = match (&controller, &self.action) {
            (Some(c), Some(a)) => format!("/{c}/{a}"),
            (Some(c), None) => format!("/{c}"),
            (None, _) => "/".to_string(),
        };
        Route {
            controller,
            action: self.action,
            params: self.params,
            path,
            context: self.context,
        }
    }
}

impl From<RouteBuilder> for Route {
    fn from(builder: RouteBuilder) -> Self {
        builder.build()
    }
}
