use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::app::App;
use super::error::ConfigError;

/// File suffixes that mark a discoverable app fragment.
pub const APP_FRAGMENT_SUFFIXES: [&str; 3] = [".app.yaml", ".app.yml", ".app.toml"];

/// One entry of the merged component view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ComponentEntry {
    pub name: String,
    pub descriptor: String,
    /// App whose binding won.
    pub app: String,
}

/// Ordered collection of every app visible to the process.
///
/// Order is discovery order and decides override precedence: a component
/// bound by a later app replaces the same name from an earlier one.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: Vec<App>,
}

impl AppRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover app fragments in each search path.
    ///
    /// Paths are visited in the order given; inside a path, fragment files
    /// (`*.app.yaml`, `*.app.yml`, `*.app.toml`) are taken in file-name
    /// order, so the same set of files always yields the same app order.
    /// Missing search paths are skipped.
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for dir in paths {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                debug!(path = %dir.display(), "App search path missing, skipped");
                continue;
            }
            for file_name in fragment_files(dir)? {
                registry.add(App::load(dir, &file_name)?);
            }
        }
        info!(
            apps = registry.apps.len(),
            names = ?registry.apps.iter().map(App::name).collect::<Vec<_>>(),
            "App registry loaded"
        );
        Ok(registry)
    }

    /// Append an app; it takes precedence over every app added before it.
    pub fn add(&mut self, app: App) {
        self.apps.push(app);
    }

    #[must_use]
    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    /// Last app registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&App> {
        self.apps.iter().rev().find(|a| a.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Component bindings after merging all apps, last one wins, sorted by name.
    #[must_use]
    pub fn component_bindings(&self) -> Vec<ComponentEntry> {
        let mut merged: BTreeMap<String, ComponentEntry> = BTreeMap::new();
        for app in &self.apps {
            for (name, descriptor) in app.components() {
                merged.insert(
                    name.clone(),
                    ComponentEntry {
                        name,
                        descriptor,
                        app: app.name().to_string(),
                    },
                );
            }
        }
        merged.into_values().collect()
    }
}

fn fragment_files(dir: &Path) -> Result<Vec<String>, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if APP_FRAGMENT_SUFFIXES.iter().any(|s| name.ends_with(s)) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Split a `:`-separated search path (as in `BRRTMVC_APP_PATH`).
#[must_use]
pub fn split_search_path(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
