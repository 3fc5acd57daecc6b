use std::any::type_name;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::call::{BindError, Call};
use crate::ioc::{Container, Inject};
use crate::outcome::{IntoOutcome, Outcome};

/// A controller: default-constructible, injectable, with named actions.
///
/// A fresh instance is built and injected for every dispatch, so controllers
/// may keep per-request state in `&mut self`.
///
/// ```rust
/// use brrtmvc::dispatcher::{Actions, Call, Controller};
/// use brrtmvc::ioc::Inject;
///
/// #[derive(Default, Inject)]
/// struct Users;
///
/// impl Users {
///     fn show(&mut self, call: &Call<'_>) -> anyhow::Result<String> {
///         let id: u64 = call.param("id")?;
///         Ok(format!("user {id}"))
///     }
/// }
///
/// impl Controller for Users {
///     fn actions(actions: &mut Actions<Self>) {
///         actions.add("show", Users::show).requires(["id"]);
///     }
/// }
/// ```
pub trait Controller: Inject + Default + Send + 'static {
    fn actions(actions: &mut Actions<Self>);
}

type ActionFn<C> = dyn Fn(&mut C, &Call<'_>) -> anyhow::Result<Outcome> + Send + Sync;

/// One registered action.
pub struct ActionDef<C> {
    handler: Arc<ActionFn<C>>,
    required: Vec<String>,
}

impl<C> ActionDef<C> {
    /// Declare parameters that must be present before the action runs.
    pub fn requires<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }
}

/// Action table of a controller, filled by [`Controller::actions`].
pub struct Actions<C> {
    actions: HashMap<String, ActionDef<C>>,
}

impl<C> Default for Actions<C> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<C: 'static> Actions<C> {
    /// Register `handler` as action `name`, replacing an earlier one.
    pub fn add<R, F>(&mut self, name: &str, handler: F) -> &mut ActionDef<C>
    where
        F: Fn(&mut C, &Call<'_>) -> anyhow::Result<R> + Send + Sync + 'static,
        R: IntoOutcome,
    {
        let def = ActionDef {
            handler: Arc::new(move |controller: &mut C, call: &Call<'_>| {
                handler(controller, call).map(IntoOutcome::into_outcome)
            }),
            required: Vec::new(),
        };
        match self.actions.entry(name.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(def);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(def),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ActionDef<C>> {
        self.actions.get(name)
    }

    /// Action names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Type-erased controller as stored in the registry.
pub(crate) trait ControllerEntry: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn action_names(&self) -> Vec<&str>;
    /// Build and inject a controller, find the action and run it.
    fn invoke(&self, container: &Container, call: &Call<'_>) -> Outcome;
}

struct TypedEntry<C: Controller> {
    actions: Actions<C>,
}

impl<C: Controller> ControllerEntry for TypedEntry<C> {
    fn type_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn action_names(&self) -> Vec<&str> {
        self.actions.names()
    }

    fn invoke(&self, container: &Container, call: &Call<'_>) -> Outcome {
        let mut controller = C::default();
        if let Err(err) = container.inject(&mut controller) {
            return Outcome::failure(anyhow::Error::new(err));
        }

        let Some(action) = self.actions.get(call.action_name()) else {
            return Outcome::not_found("action not found");
        };

        if let Some(missing) = action.required.iter().find(|p| !call.params().contains(p)) {
            return Outcome::bad_request(
                BindError::Missing {
                    name: missing.clone(),
                }
                .to_string(),
            );
        }

        match (action.handler)(&mut controller, call) {
            Ok(outcome) => outcome,
            Err(err) => match err.downcast_ref::<BindError>() {
                Some(bind) => Outcome::bad_request(bind.to_string()),
                None => Outcome::failure(err),
            },
        }
    }
}

/// Explicit table from qualified controller names (`{package}.{Name}`) to
/// controllers.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn ControllerEntry>>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` under `qualified_name`, e.g. `"controllers.Users"` or
    /// `"shop.controllers.Users"`. A second registration replaces the first.
    pub fn register<C: Controller>(&mut self, qualified_name: impl Into<String>) -> &mut Self {
        let qualified_name = qualified_name.into();
        let mut actions = Actions::<C>::default();
        C::actions(&mut actions);
        let action_count = actions.len();

        if self
            .controllers
            .insert(qualified_name.clone(), Arc::new(TypedEntry { actions }))
            .is_some()
        {
            warn!(controller = %qualified_name, "Replaced existing controller");
        }
        info!(
            controller = %qualified_name,
            type_name = type_name::<C>(),
            actions = action_count,
            total_controllers = self.controllers.len(),
            "Controller registered"
        );
        self
    }

    /// Builder-style [`ControllerRegistry::register`].
    #[must_use]
    pub fn with<C: Controller>(mut self, qualified_name: impl Into<String>) -> Self {
        self.register::<C>(qualified_name);
        self
    }

    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.controllers.contains_key(qualified_name)
    }

    /// Qualified names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Action names of a controller, sorted.
    #[must_use]
    pub fn actions_of(&self, qualified_name: &str) -> Option<Vec<&str>> {
        self.controllers
            .get(qualified_name)
            .map(|entry| entry.action_names())
    }

    /// Rust type registered under a qualified name.
    #[must_use]
    pub fn type_name_of(&self, qualified_name: &str) -> Option<&'static str> {
        self.controllers
            .get(qualified_name)
            .map(|entry| entry.type_name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub(crate) fn get(&self, qualified_name: &str) -> Option<&Arc<dyn ControllerEntry>> {
        self.controllers.get(qualified_name)
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.names())
            .finish()
    }
}
