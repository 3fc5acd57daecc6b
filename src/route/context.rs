use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::ids::SessionId;

/// Controller that derived routes fall back to when they name only an action.
pub const DEFAULT_CONTROLLER: &str = "index";

/// Session attribute under which the signed-in user id is kept.
pub const USER_ID_KEY: &str = "route-user-id";

/// Failure to reach session state from a route context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The context has no session attached (offline or synthetic route).
    #[error("no session is available for this route")]
    SessionUnavailable,
}

/// Per-session attribute storage owned by the transport layer.
pub trait SessionStore: Send + Sync {
    fn get(&self, session: &SessionId, key: &str) -> Option<String>;
    fn set(&self, session: &SessionId, key: &str, value: String);
    fn remove(&self, session: &SessionId, key: &str);
}

/// Default bound on the number of sessions a [`MemorySessionStore`] keeps.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct SessionEntry {
    attrs: HashMap<String, String>,
    touched: u64,
}

/// In-process session store.
///
/// Holds at most `max_sessions` sessions. Starting a session beyond that
/// evicts the least recently touched one. State is lost on restart.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, SessionEntry>,
    max_sessions: usize,
    clock: AtomicU64,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bounded to `max_sessions` (at least one).
    #[must_use]
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
            clock: AtomicU64::new(0),
        }
    }

    /// Number of sessions that currently hold at least one attribute.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[must_use]
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn evict_least_recent(&self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().touched)
            .map(|entry| *entry.key());
        if let Some(id) = oldest {
            self.sessions.remove(&id);
            debug!(session = %id, max_sessions = self.max_sessions, "Session evicted");
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session: &SessionId, key: &str) -> Option<String> {
        let mut entry = self.sessions.get_mut(session)?;
        entry.touched = self.tick();
        entry.attrs.get(key).cloned()
    }

    fn set(&self, session: &SessionId, key: &str, value: String) {
        if !self.sessions.contains_key(session) && self.sessions.len() >= self.max_sessions {
            self.evict_least_recent();
        }
        let touched = self.tick();
        let mut entry = self.sessions.entry(*session).or_insert_with(|| SessionEntry {
            attrs: HashMap::new(),
            touched,
        });
        entry.touched = touched;
        entry.attrs.insert(key.to_string(), value);
    }

    fn remove(&self, session: &SessionId, key: &str) {
        let now_empty = match self.sessions.get_mut(session) {
            Some(mut entry) => {
                entry.attrs.remove(key);
                entry.attrs.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.sessions.remove_if(session, |_, entry| entry.attrs.is_empty());
        }
    }
}

/// A live session: the store plus the id of the session within it.
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<dyn SessionStore>,
    id: SessionId,
}

impl SessionHandle {
    pub fn new(store: Arc<dyn SessionStore>, id: SessionId) -> Self {
        Self { store, id }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").field("id", &self.id).finish()
    }
}

/// Request context shared by a route and every route derived from it.
///
/// Holds the mount prefix used to build URLs and, when the transport has
/// one, the session that backs the user identity. Routes keep this behind an
/// `Arc` so they stay immutable and shareable.
#[derive(Debug, Clone, Default)]
pub struct RouteContext {
    mount: String,
    session: Option<SessionHandle>,
    default_controller: Option<String>,
}

impl RouteContext {
    /// Context without a session. User identity calls fail with
    /// [`SessionError::SessionUnavailable`].
    #[must_use]
    pub fn detached(mount: impl Into<String>) -> Self {
        Self {
            mount: normalize_mount(mount.into()),
            session: None,
            default_controller: None,
        }
    }

    pub fn with_session(mount: impl Into<String>, session: SessionHandle) -> Self {
        Self {
            mount: normalize_mount(mount.into()),
            session: Some(session),
            default_controller: None,
        }
    }

    /// Controller used by derived routes that set only an action. The
    /// dispatcher passes its own default here.
    #[must_use]
    pub fn with_default_controller(mut self, controller: impl Into<String>) -> Self {
        self.default_controller = Some(controller.into()).filter(|c| !c.is_empty());
        self
    }

    #[must_use]
    pub fn default_controller(&self) -> &str {
        self.default_controller.as_deref().unwrap_or(DEFAULT_CONTROLLER)
    }

    /// Mount prefix, empty or starting with `/` and never ending with `/`.
    #[must_use]
    pub fn mount(&self) -> &str {
        &self.mount
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    fn live_session(&self) -> Result<&SessionHandle, SessionError> {
        self.session.as_ref().ok_or(SessionError::SessionUnavailable)
    }

    /// Signed-in user of this session, if any.
    pub fn user_id(&self) -> Result<Option<String>, SessionError> {
        let session = self.live_session()?;
        Ok(session.store.get(&session.id, USER_ID_KEY))
    }

    pub fn set_user_id(&self, user_id: impl Into<String>) -> Result<(), SessionError> {
        let session = self.live_session()?;
        session.store.set(&session.id, USER_ID_KEY, user_id.into());
        Ok(())
    }

    pub fn clear_user_id(&self) -> Result<(), SessionError> {
        let session = self.live_session()?;
        session.store.remove(&session.id, USER_ID_KEY);
        Ok(())
    }
}

fn normalize_mount(mount: String) -> String {
    let trimmed = mount.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RouteContext {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        RouteContext::with_session("/app", SessionHandle::new(store, SessionId::new()))
    }

    #[test]
    fn detached_context_has_no_session() {
        let ctx = RouteContext::detached("");
        assert_eq!(ctx.user_id(), Err(SessionError::SessionUnavailable));
        assert_eq!(
            ctx.set_user_id("alice"),
            Err(SessionError::SessionUnavailable)
        );
    }

    #[test]
    fn user_id_round_trips_through_store() {
        let ctx = context();
        assert_eq!(ctx.user_id(), Ok(None));
        ctx.set_user_id("alice").unwrap();
        assert_eq!(ctx.user_id(), Ok(Some("alice".to_string())));
        ctx.clear_user_id().unwrap();
        assert_eq!(ctx.user_id(), Ok(None));
    }

    #[test]
    fn default_controller_falls_back_to_index() {
        assert_eq!(RouteContext::detached("").default_controller(), "index");
        let ctx = RouteContext::detached("").with_default_controller("home");
        assert_eq!(ctx.default_controller(), "home");
        let ctx = RouteContext::detached("").with_default_controller("");
        assert_eq!(ctx.default_controller(), "index");
    }

    #[test]
    fn mount_is_normalized() {
        assert_eq!(RouteContext::detached("app/").mount(), "/app");
        assert_eq!(RouteContext::detached("/").mount(), "");
        assert_eq!(RouteContext::detached("/shop").mount(), "/shop");
    }

    #[test]
    fn memory_store_drops_empty_sessions() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.set(&id, "k", "v".to_string());
        assert_eq!(store.len(), 1);
        store.remove(&id, "k");
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_evicts_least_recently_touched() {
        let store = MemorySessionStore::with_max_sessions(2);
        let (a, b, c) = (SessionId::new(), SessionId::new(), SessionId::new());
        store.set(&a, USER_ID_KEY, "ada".to_string());
        store.set(&b, USER_ID_KEY, "bob".to_string());
        assert_eq!(store.get(&a, USER_ID_KEY).as_deref(), Some("ada"));

        store.set(&c, USER_ID_KEY, "cy".to_string());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&b, USER_ID_KEY), None);
        assert_eq!(store.get(&a, USER_ID_KEY).as_deref(), Some("ada"));
        assert_eq!(store.get(&c, USER_ID_KEY).as_deref(), Some("cy"));

        // writing to a live session never evicts
        store.set(&a, "theme", "dark".to_string());
        assert_eq!(store.len(), 2);
    }
}
