use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use super::call::Call;
use super::controller::ControllerRegistry;
use crate::ids::RequestId;
use crate::ioc::Container;
use crate::outcome::{ErrorKind, Outcome};
use crate::route::Route;

pub use crate::route::DEFAULT_CONTROLLER;
/// Action used when the route names none.
pub const DEFAULT_ACTION: &str = "index";
/// Sub-package that holds controllers below the app package.
pub const CONTROLLERS_PACKAGE: &str = "controllers";

/// Resolves a [`Route`] to a controller action and runs it.
///
/// `invoke` always returns an [`Outcome`]: lookup failures become
/// [`ErrorKind::NotFound`], parameter failures [`ErrorKind::BadRequest`],
/// and action errors or panics [`ErrorKind::Internal`].
#[derive(Debug, Clone)]
pub struct Invoker {
    package: String,
    registry: ControllerRegistry,
    container: Arc<Container>,
    default_controller: String,
    default_action: String,
}

impl Invoker {
    /// `app_package` is the `package` of the main app; controllers then live
    /// under `{app_package}.controllers`, or `controllers` without one.
    pub fn new(app_package: Option<&str>, registry: ControllerRegistry, container: Arc<Container>) -> Self {
        let package = match app_package.map(str::trim).filter(|p| !p.is_empty()) {
            Some(pkg) => format!("{pkg}.{CONTROLLERS_PACKAGE}"),
            None => CONTROLLERS_PACKAGE.to_string(),
        };
        Self {
            package,
            registry,
            container,
            default_controller: DEFAULT_CONTROLLER.to_string(),
            default_action: DEFAULT_ACTION.to_string(),
        }
    }

    /// Override the controller and action used for routes that omit them.
    #[must_use]
    pub fn with_defaults(mut self, controller: impl Into<String>, action: impl Into<String>) -> Self {
        self.default_controller = controller.into();
        self.default_action = action.into();
        self
    }

    #[must_use]
    pub fn default_controller(&self) -> &str {
        &self.default_controller
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// `users` -> `{package}.Users`
    #[must_use]
    pub fn qualified_name(&self, controller: &str) -> String {
        format!("{}.{}", self.package, capitalize(controller))
    }

    pub fn invoke(&self, route: &Route) -> Outcome {
        self.invoke_traced(route, RequestId::new())
    }

    /// [`Invoker::invoke`] with a caller supplied request id for log correlation.
    pub fn invoke_traced(&self, route: &Route, request_id: RequestId) -> Outcome {
        let controller = route.controller().unwrap_or(self.default_controller.as_str());
        let action = route.action().unwrap_or(self.default_action.as_str());
        let qualified = self.qualified_name(controller);

        let Some(entry) = self.registry.get(&qualified) else {
            debug!(
                request_id = %request_id,
                path = %route.path(),
                controller = %qualified,
                "Controller not found"
            );
            return Outcome::not_found("controller not found");
        };

        debug!(
            request_id = %request_id,
            controller = %qualified,
            action = %action,
            params = %route.params(),
            "Invoking action"
        );

        let call = Call::new(route, controller, action);
        let start = Instant::now();
        let outcome = match catch_unwind(AssertUnwindSafe(|| entry.invoke(&self.container, &call))) {
            Ok(outcome) => outcome,
            Err(panic) => {
                let panic_message = panic_message(panic.as_ref());
                error!(
                    request_id = %request_id,
                    controller = %qualified,
                    action = %action,
                    panic_message = %panic_message,
                    "Action panicked"
                );
                Outcome::failure(anyhow::anyhow!("action panicked: {panic_message}"))
            }
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        match &outcome {
            Outcome::Success { content } => info!(
                request_id = %request_id,
                controller = %qualified,
                action = %action,
                latency_ms,
                content_len = content.len(),
                "Action completed"
            ),
            Outcome::Redirect { target } => info!(
                request_id = %request_id,
                controller = %qualified,
                action = %action,
                latency_ms,
                target = %target.url(),
                "Action redirected"
            ),
            Outcome::Error {
                message,
                kind: ErrorKind::Internal,
                cause,
            } => error!(
                request_id = %request_id,
                controller = %qualified,
                action = %action,
                latency_ms,
                message = %message,
                cause = ?cause,
                "Action failed"
            ),
            Outcome::Error { message, kind, .. } => debug!(
                request_id = %request_id,
                controller = %qualified,
                action = %action,
                kind = %kind,
                message = %message,
                "Action rejected"
            ),
        }
        outcome
    }
}

/// Upper-case the first character: `users` -> `Users`.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
