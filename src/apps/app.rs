use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::ConfigError;

/// Prefix of component bindings inside an app descriptor.
pub const COMPONENT_PREFIX: &str = "component.";

/// A named, flat property map loaded from one app descriptor.
///
/// Nested tables are flattened to dotted keys, so these two YAML documents
/// describe the same app:
///
/// ```yaml
/// component:
///   users: demo::MemoryUserDirectory
/// ```
///
/// ```yaml
/// component.users: demo::MemoryUserDirectory
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct App {
    name: String,
    properties: BTreeMap<String, String>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Build an app from already flat key/value pairs.
    pub fn from_properties<K, V>(name: impl Into<String>, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load `dir/file_name`. The format follows the extension: `.yaml` /
    /// `.yml` or `.toml`.
    pub fn load(dir: impl AsRef<Path>, file_name: &str) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(file_name);
        if !path.is_file() {
            return Err(ConfigError::NotFound { path });
        }
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let name = app_name(file_name);
        let app = match extension(&path).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(name, &text),
            Some("toml") => Self::from_toml_str(name, &text),
            other => Err(format!("unsupported descriptor extension {other:?}")),
        }
        .map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;
        debug!(
            app = %app.name,
            path = %path.display(),
            properties = app.properties.len(),
            "App descriptor loaded"
        );
        Ok(app)
    }

    /// Parse a YAML document into a flattened app.
    pub fn from_yaml_str(name: impl Into<String>, text: &str) -> Result<Self, String> {
        let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        let mut properties = BTreeMap::new();
        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(_) => flatten_yaml("", &value, &mut properties),
            _ => return Err("top level of an app descriptor must be a mapping".to_string()),
        }
        Ok(Self {
            name: name.into(),
            properties,
        })
    }

    /// Parse a TOML document into a flattened app.
    pub fn from_toml_str(name: impl Into<String>, text: &str) -> Result<Self, String> {
        let table: toml::Table = toml::from_str(text).map_err(|e| e.to_string())?;
        let mut properties = BTreeMap::new();
        for (key, value) in &table {
            flatten_toml(key, value, &mut properties);
        }
        Ok(Self {
            name: name.into(),
            properties,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Entries whose key starts with `prefix`, with the prefix stripped.
    #[must_use]
    pub fn get_map(&self, prefix: &str) -> BTreeMap<String, String> {
        self.properties
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .filter_map(|(k, v)| {
                let stripped = &k[prefix.len()..];
                (!stripped.is_empty()).then(|| (stripped.to_string(), v.clone()))
            })
            .collect()
    }

    /// Component bindings declared by this app (`component.*`).
    #[must_use]
    pub fn components(&self) -> BTreeMap<String, String> {
        self.get_map(COMPONENT_PREFIX)
    }

    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// `users.app.yaml` -> `users`, `app.toml` -> `app`.
pub(crate) fn app_name(file_name: &str) -> String {
    let stem = PathBuf::from(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string();
    stem.strip_suffix(".app").map(str::to_string).unwrap_or(stem)
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(yaml_scalar)
                .collect::<Vec<_>>()
                .join(","),
        ),
        serde_yaml::Value::Tagged(tagged) => yaml_scalar(&tagged.value),
        serde_yaml::Value::Mapping(_) => None,
    }
}

fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let Some(key) = yaml_scalar(k) else { continue };
                flatten_yaml(&join_key(prefix, &key), v, out);
            }
        }
        serde_yaml::Value::Tagged(tagged) => flatten_yaml(prefix, &tagged.value, out),
        other => {
            if let Some(text) = yaml_scalar(other) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

fn flatten_toml(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (k, v) in table {
                flatten_toml(&join_key(prefix, k), v, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
