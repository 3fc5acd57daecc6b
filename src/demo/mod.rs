//! A small user directory app wired through the dispatch core.
//!
//! `config/app.yaml` sets `package: demo`, so controllers are registered as
//! `demo.controllers.*`. Components are bound by descriptor:
//!
//! | Descriptor | Provides |
//! |------------|----------|
//! | `demo::PlainGreeter` | `dyn Greeter` |
//! | `demo::FriendlyGreeter` | `dyn Greeter`, titled from the main app |
//! | `demo::MemoryUserDirectory` | `dyn UserDirectory` |

mod components;
mod controllers;

pub use components::{FriendlyGreeter, Greeter, MemoryUserDirectory, PlainGreeter, User, UserDirectory};
pub use controllers::{Index, Users};

use crate::dispatcher::ControllerRegistry;
use crate::ioc::{ComponentCatalog, ComponentType};

/// Package the demo controllers live under.
pub const PACKAGE: &str = "demo";

/// Descriptors the demo app descriptors can bind.
#[must_use]
pub fn catalog() -> ComponentCatalog {
    ComponentCatalog::new()
        .with(
            "demo::PlainGreeter",
            ComponentType::provides::<dyn Greeter, PlainGreeter>(|g| g),
        )
        .with(
            "demo::FriendlyGreeter",
            ComponentType::provides::<dyn Greeter, FriendlyGreeter>(|g| g),
        )
        .with(
            "demo::MemoryUserDirectory",
            ComponentType::provides::<dyn UserDirectory, MemoryUserDirectory>(|d| d),
        )
}

#[must_use]
pub fn controllers() -> ControllerRegistry {
    ControllerRegistry::new()
        .with::<Index>(format!("{PACKAGE}.controllers.Index"))
        .with::<Users>(format!("{PACKAGE}.controllers.Users"))
}
