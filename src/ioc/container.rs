//! The `Container` struct, injection targets and type descriptors.

use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use super::core::{Binding, ConstructionGuard, Constructor, Erased};
use super::error::ContainerError;

/// An object whose dependencies the container can fill in.
///
/// Implementations assign each injectable slot from [`Slots`]; most types
/// get this from `#[derive(Inject)]`. Types without dependencies can use the
/// default body.
pub trait Inject {
    fn inject(&mut self, slots: &Slots<'_>) -> Result<(), ContainerError> {
        let _ = slots;
        Ok(())
    }
}

/// View of the container handed to [`Inject::inject`].
pub struct Slots<'c> {
    container: &'c Container,
}

impl<'c> Slots<'c> {
    /// Resolve a slot by binding name, falling back to the last binding
    /// that provides `T`. `None` when neither matches.
    pub fn resolve<T>(&self, name: &str) -> Result<Option<Arc<T>>, ContainerError>
    where
        T: ?Sized + Any + Send + Sync,
    {
        if let Some(found) = self.container.get::<T>(name)? {
            trace!(slot = %name, type_name = type_name::<T>(), "Slot resolved by name");
            return Ok(Some(found));
        }
        let found = self.container.get_by_type::<T>()?;
        if found.is_some() {
            trace!(slot = %name, type_name = type_name::<T>(), "Slot resolved by type");
        }
        Ok(found)
    }

    /// Like [`Slots::resolve`] but a missing binding is an error.
    pub fn require<T>(&self, name: &str) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Any + Send + Sync,
    {
        self.resolve::<T>(name)?
            .ok_or_else(|| ContainerError::Unresolved {
                slot: name.to_string(),
                type_name: type_name::<T>(),
            })
    }

    #[must_use]
    pub fn container(&self) -> &'c Container {
        self.container
    }
}

/// Descriptor of a component the container builds on every use.
#[derive(Clone)]
pub struct ComponentType {
    type_id: TypeId,
    type_name: &'static str,
    construct: Arc<Constructor>,
}

impl ComponentType {
    /// Default-construct `T` and inject it.
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: Inject + Default + Send + Sync + 'static,
    {
        Self::provides::<T, T>(|component| component)
    }

    /// Default-construct and inject `T`, then expose it as `I` (usually a
    /// `dyn Trait`). Slots asking for `I` by type will find it.
    pub fn provides<I, T>(upcast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Self
    where
        I: ?Sized + Any + Send + Sync,
        T: Inject + Default + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<I>(),
            type_name: type_name::<T>(),
            construct: Arc::new(move |container: &Container, _name: &str| {
                let mut component = T::default();
                container.inject(&mut component)?;
                let shared: Arc<I> = upcast(Arc::new(component));
                Ok(Arc::new(shared) as Erased)
            }),
        }
    }

    /// Build `T` with a custom factory. Factory errors surface as
    /// [`ContainerError::Construction`]; container errors raised while the
    /// factory resolves its own dependencies are passed through unchanged.
    pub fn from_fn<T>(
        factory: impl Fn(&Container) -> anyhow::Result<T> + Send + Sync + 'static,
    ) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            construct: Arc::new(move |container: &Container, name: &str| match factory(container) {
                Ok(component) => Ok(Arc::new(Arc::new(component)) as Erased),
                Err(err) => match err.downcast::<ContainerError>() {
                    Ok(inner) => Err(inner),
                    Err(err) => Err(ContainerError::Construction {
                        name: name.to_string(),
                        message: format!("{err:#}"),
                    }),
                },
            }),
        }
    }

    /// Name of the concrete type this descriptor builds.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn provided_type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn construct(&self, container: &Container, name: &str) -> Result<Erased, ContainerError> {
        (self.construct)(container, name)
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Name-keyed component registry and injector.
///
/// Bindings are either ready instances or [`ComponentType`]s built per use.
/// Registering a name again replaces the earlier binding, which is how later
/// apps override earlier ones. The container is safe to share across
/// threads; registration normally happens once at startup.
#[derive(Default)]
pub struct Container {
    bindings: DashMap<String, Binding>,
    /// Names providing each type, most recently bound last.
    by_type: DashMap<TypeId, Vec<String>>,
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&self, name: String, binding: Binding) {
        let type_id = binding.type_id();
        let type_name = binding.type_name();
        let kind = binding.kind();
        let previous = self.bindings.insert(name.clone(), binding);
        debug!(
            component = %name,
            type_name = type_name,
            kind = kind,
            replaced = previous.is_some(),
            "Component bound"
        );
        if let Some(old_type) = previous.map(|b| b.type_id()) {
            self.unindex(old_type, &name);
        }
        self.by_type.entry(type_id).or_default().push(name);
    }

    fn unindex(&self, type_id: TypeId, name: &str) {
        if let Some(mut names) = self.by_type.get_mut(&type_id) {
            names.retain(|n| n != name);
        }
        self.by_type.remove_if(&type_id, |_, names| names.is_empty());
    }

    /// Register a ready instance under `name`.
    pub fn add_instance<T: Any + Send + Sync>(&self, name: impl Into<String>, instance: T) {
        self.add_shared(name, Arc::new(instance));
    }

    /// Register an already shared instance, e.g. an `Arc<dyn Trait>`.
    pub fn add_shared<T: ?Sized + Any + Send + Sync>(&self, name: impl Into<String>, instance: Arc<T>) {
        self.bind(
            name.into(),
            Binding::Instance {
                type_id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
                value: Arc::new(instance) as Erased,
            },
        );
    }

    /// Register a type that is constructed and injected on every use.
    pub fn add_type(&self, name: impl Into<String>, component: ComponentType) {
        self.bind(name.into(), Binding::Type(component));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Look up `name` as a `T`. `None` if the name is unbound or bound to a
    /// different type.
    pub fn get<T>(&self, name: &str) -> Result<Option<Arc<T>>, ContainerError>
    where
        T: ?Sized + Any + Send + Sync,
    {
        // Clone out of the map so no shard lock is held while constructing.
        let Some(binding) = self.bindings.get(name).map(|b| b.value().clone()) else {
            return Ok(None);
        };
        self.materialize::<T>(name, &binding)
    }

    /// Look up the last binding that provides `T`.
    pub fn get_by_type<T>(&self) -> Result<Option<Arc<T>>, ContainerError>
    where
        T: ?Sized + Any + Send + Sync,
    {
        let last = self
            .by_type
            .get(&TypeId::of::<T>())
            .and_then(|names| names.last().cloned());
        let Some(name) = last else {
            return Ok(None);
        };
        self.get::<T>(&name)
    }

    /// Fill the injectable slots of `target`.
    pub fn inject<I: Inject + ?Sized>(&self, target: &mut I) -> Result<(), ContainerError> {
        target.inject(&Slots { container: self })
    }

    fn materialize<T>(&self, name: &str, binding: &Binding) -> Result<Option<Arc<T>>, ContainerError>
    where
        T: ?Sized + Any + Send + Sync,
    {
        if binding.type_id() != TypeId::of::<T>() {
            return Ok(None);
        }
        let erased = match binding {
            Binding::Instance { value, .. } => Arc::clone(value),
            Binding::Type(component) => {
                let _guard = ConstructionGuard::enter(name)?;
                trace!(component = %name, type_name = component.type_name(), "Constructing component");
                component.construct(self, name)?
            }
        };
        let any: &(dyn Any + Send + Sync) = &*erased;
        Ok(any.downcast_ref::<Arc<T>>().cloned())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.names())
            .finish()
    }
}
