use http::header::{HeaderName, HeaderValue, SET_COOKIE};
use http::StatusCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::StartupError;
use super::request::{build_route, parse_cookies};
use super::response::Replier;
use crate::apps::{App, AppRegistry};
use crate::dispatcher::{ControllerRegistry, Invoker};
use crate::ids::{RequestId, SessionId};
use crate::ioc::{ComponentCatalog, Container};
use crate::route::{MemorySessionStore, RouteContext, SessionHandle, SessionStore};
use crate::runtime_config::RuntimeConfig;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "brrtmvc-session";
/// Header used to correlate a request with its log lines.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Container name of the main [`App`].
pub const APP_COMPONENT: &str = "app";

/// Fully wired dispatch core behind an HTTP-shaped interface.
#[derive(Clone)]
pub struct Service {
    invoker: Invoker,
    replier: Replier,
    apps: Arc<AppRegistry>,
    sessions: Arc<dyn SessionStore>,
    mount: String,
}

impl Service {
    /// Load apps, fill the container and build the invoker.
    ///
    /// Fragments from `config.app_paths` are registered first, the main app
    /// last, so the main app's component bindings win.
    pub fn bootstrap(
        config: &RuntimeConfig,
        catalog: &ComponentCatalog,
        controllers: ControllerRegistry,
    ) -> Result<Self, StartupError> {
        let start = Instant::now();
        let mut apps = AppRegistry::load_from_paths(&config.app_paths)?;
        let main_app = App::load(&config.config_dir, &config.main_app)?;
        let package = main_app.get("package").map(str::to_string);
        apps.add(main_app.clone());

        let container = Arc::new(Container::new());
        container.add_instance(APP_COMPONENT, main_app);

        for app in apps.apps() {
            for (name, descriptor) in app.components() {
                let Some(component) = catalog.resolve(&descriptor) else {
                    return Err(StartupError::ComponentResolution {
                        name,
                        descriptor,
                        app: app.name().to_string(),
                    });
                };
                debug!(component = %name, descriptor = %descriptor, app = %app.name(), "Component resolved");
                container.add_type(name, component.clone());
            }
        }

        let invoker = Invoker::new(package.as_deref(), controllers, container);
        let redirect_status =
            StatusCode::from_u16(config.redirect_status).unwrap_or(StatusCode::FOUND);

        info!(
            apps = apps.len(),
            components = invoker.container().len(),
            controllers = invoker.registry().len(),
            package = %invoker.package(),
            mount = %config.mount,
            startup_ms = start.elapsed().as_millis() as u64,
            "Service bootstrapped"
        );

        Ok(Self {
            invoker,
            replier: Replier::new().with_redirect_status(redirect_status),
            apps: Arc::new(apps),
            sessions: Arc::new(MemorySessionStore::new()),
            mount: RouteContext::detached(config.mount.as_str()).mount().to_string(),
        })
    }

    /// Replace the in-memory session store.
    #[must_use]
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = store;
        self
    }

    /// Change the controller and action used for routes that omit them.
    /// Action-only redirect targets follow the same default controller.
    #[must_use]
    pub fn with_defaults(mut self, controller: impl Into<String>, action: impl Into<String>) -> Self {
        self.invoker = self.invoker.with_defaults(controller, action);
        self
    }

    #[must_use]
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    #[must_use]
    pub fn replier(&self) -> &Replier {
        &self.replier
    }

    #[must_use]
    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    #[must_use]
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Dispatch one request and render the response.
    ///
    /// A request without a valid session cookie gets a new session, announced
    /// with `Set-Cookie`.
    pub fn handle<B: AsRef<[u8]>>(&self, req: &http::Request<B>) -> http::Response<String> {
        let start = Instant::now();
        let request_id = RequestId::from_header_or_new(
            req.headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        );

        let cookies = parse_cookies(req.headers());
        let existing = SessionId::from_cookie(cookies.get(SESSION_COOKIE).map(String::as_str));
        let session_id = existing.unwrap_or_default();

        let context = Arc::new(
            RouteContext::with_session(
                self.mount.as_str(),
                SessionHandle::new(Arc::clone(&self.sessions), session_id),
            )
            .with_default_controller(self.invoker.default_controller()),
        );
        let route = build_route(req, context);
        let outcome = self.invoker.invoke_traced(&route, request_id);
        let mut res = self.replier.render(outcome);

        if existing.is_none() {
            self.set_session_cookie(&mut res, session_id);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            res.headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        info!(
            request_id = %request_id,
            method = %req.method(),
            path = %req.uri().path(),
            status = res.status().as_u16(),
            new_session = existing.is_none(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );
        res
    }

    fn set_session_cookie(&self, res: &mut http::Response<String>, session_id: SessionId) {
        let path = if self.mount.is_empty() { "/" } else { self.mount.as_str() };
        let cookie = format!("{SESSION_COOKIE}={session_id}; Path={path}; HttpOnly; SameSite=Lax");
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                res.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Session cookie is not a valid header value"),
        }
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("invoker", &self.invoker)
            .field("replier", &self.replier)
            .field("apps", &self.apps.len())
            .field("mount", &self.mount)
            .finish()
    }
}
