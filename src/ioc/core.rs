//! Non-public building blocks of the container.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::sync::Arc;

use super::container::Container;
use super::error::ContainerError;

thread_local! {
    // Binding names currently under construction on this thread, outermost first.
    static CONSTRUCTING: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard that detects dependency cycles.
///
/// Entering pushes the binding name onto the thread-local construction
/// stack; if the name is already there the dependency graph loops back and
/// entering fails. Dropping the guard pops the name again, including when a
/// factory unwinds.
pub(crate) struct ConstructionGuard {
    _private: (),
}

impl ConstructionGuard {
    pub(crate) fn enter(name: &str) -> Result<Self, ContainerError> {
        CONSTRUCTING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|n| n == name) {
                let mut chain = stack[start..].to_vec();
                chain.push(name.to_string());
                return Err(ContainerError::CyclicDependency { chain });
            }
            stack.push(name.to_string());
            Ok(Self { _private: () })
        })
    }
}

impl Drop for ConstructionGuard {
    fn drop(&mut self) {
        CONSTRUCTING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Type-erased `Arc<T>` as stored in the container. Boxing the `Arc` itself
/// (rather than `T`) lets unsized targets such as `dyn Trait` round-trip.
pub(crate) type Erased = Arc<dyn Any + Send + Sync>;

pub(crate) type Constructor =
    dyn Fn(&Container, &str) -> Result<Erased, ContainerError> + Send + Sync;

#[derive(Clone)]
pub(crate) enum Binding {
    Instance {
        type_id: TypeId,
        type_name: &'static str,
        value: Erased,
    },
    Type(super::container::ComponentType),
}

impl Binding {
    pub(crate) fn type_id(&self) -> TypeId {
        match self {
            Binding::Instance { type_id, .. } => *type_id,
            Binding::Type(ty) => ty.provided_type_id(),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Binding::Instance { type_name, .. } => type_name,
            Binding::Type(ty) => ty.type_name(),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Binding::Instance { .. } => "instance",
            Binding::Type(_) => "type",
        }
    }
}
