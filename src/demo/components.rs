use std::collections::BTreeMap;
use std::sync::Arc;

use crate::apps::App;
use crate::ioc::Inject;

pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

#[derive(Debug, Default)]
pub struct PlainGreeter;

impl Inject for PlainGreeter {}

impl Greeter for PlainGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {name}.")
    }
}

/// Greets with the `title` of the main app.
#[derive(Debug, Default, Inject)]
pub struct FriendlyGreeter {
    #[inject(name = "app")]
    app: Option<Arc<App>>,
}

impl Greeter for FriendlyGreeter {
    fn greet(&self, name: &str) -> String {
        let title = self
            .app
            .as_deref()
            .and_then(|app| app.get("title"))
            .unwrap_or("brrtmvc");
        format!("Welcome to {title}, {name}!")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
}

pub trait UserDirectory: Send + Sync {
    fn all(&self) -> Vec<User>;
    fn find(&self, id: u64) -> Option<User>;
}

/// Fixed, in-memory user list.
#[derive(Debug)]
pub struct MemoryUserDirectory {
    users: BTreeMap<u64, User>,
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        let users = [(1, "Ada"), (2, "Grace"), (3, "Linus")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    User {
                        id,
                        name: name.to_string(),
                    },
                )
            })
            .collect();
        Self { users }
    }
}

impl Inject for MemoryUserDirectory {}

impl UserDirectory for MemoryUserDirectory {
    fn all(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    fn find(&self, id: u64) -> Option<User> {
        self.users.get(&id).cloned()
    }
}
