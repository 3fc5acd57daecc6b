//! # Runtime Configuration Module
//!
//! Environment variable based configuration for where apps are found and how
//! the dispatch core is mounted.
//!
//! ## Environment Variables
//!
//! ### `BRRTMVC_CONFIG_DIR`
//!
//! Directory holding the main app descriptor. Default: `config`
//!
//! ### `BRRTMVC_APP_PATH`
//!
//! `:`-separated list of directories searched for app fragments
//! (`*.app.yaml`, `*.app.yml`, `*.app.toml`). Directories are visited in the
//! order given. Default: the config directory.
//!
//! ### `BRRTMVC_MAIN_APP`
//!
//! File name of the main app descriptor inside the config directory.
//! Default: `app.yaml`
//!
//! ### `BRRTMVC_MOUNT`
//!
//! Path prefix the dispatcher is mounted under, e.g. `/shop`. Default: none
//!
//! ### `BRRTMVC_REDIRECT_STATUS`
//!
//! Status code used for redirects. Must be 3xx. Default: `302`
//!
//! ## Usage
//!
//! ```rust
//! use brrtmvc::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Main app: {}", config.main_app_path().display());
//! ```
//!
//! ## Example Configuration
//!
//! ```bash
//! export BRRTMVC_CONFIG_DIR=/etc/shop
//! export BRRTMVC_APP_PATH=/etc/shop:/opt/shop/plugins
//! export BRRTMVC_MOUNT=/shop
//! ```

use std::env;
use std::path::PathBuf;

use crate::apps::split_search_path;

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_MAIN_APP: &str = "app.yaml";
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory of the main app descriptor.
    pub config_dir: PathBuf,
    /// Fragment search path, in precedence order (later wins).
    pub app_paths: Vec<PathBuf>,
    /// Main app descriptor file name.
    pub main_app: String,
    /// Mount prefix, empty when mounted at the root.
    pub mount: String,
    pub redirect_status: u16,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            app_paths: vec![PathBuf::from(DEFAULT_CONFIG_DIR)],
            main_app: DEFAULT_MAIN_APP.to_string(),
            mount: String::new(),
            redirect_status: DEFAULT_REDIRECT_STATUS,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; `from_env` uses the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config_dir = non_empty("BRRTMVC_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));
        let app_paths = non_empty("BRRTMVC_APP_PATH")
            .map(|v| split_search_path(&v))
            .filter(|paths| !paths.is_empty())
            .unwrap_or_else(|| vec![config_dir.clone()]);
        let main_app = non_empty("BRRTMVC_MAIN_APP").unwrap_or_else(|| DEFAULT_MAIN_APP.to_string());
        let mount = non_empty("BRRTMVC_MOUNT").unwrap_or_default();
        let redirect_status = non_empty("BRRTMVC_REDIRECT_STATUS")
            .and_then(|v| v.parse::<u16>().ok())
            .filter(|s| (300..400).contains(s))
            .unwrap_or(DEFAULT_REDIRECT_STATUS);

        RuntimeConfig {
            config_dir,
            app_paths,
            main_app,
            mount,
            redirect_status,
        }
    }

    /// Full path of the main app descriptor.
    #[must_use]
    pub fn main_app_path(&self) -> PathBuf {
        self.config_dir.join(&self.main_app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), RuntimeConfig::default());
    }

    #[test]
    fn test_app_path_defaults_to_config_dir() {
        let cfg = config(&[("BRRTMVC_CONFIG_DIR", "/etc/shop")]);
        assert_eq!(cfg.app_paths, vec![PathBuf::from("/etc/shop")]);
        assert_eq!(cfg.main_app_path(), PathBuf::from("/etc/shop/app.yaml"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("BRRTMVC_APP_PATH", "a:b"),
            ("BRRTMVC_MAIN_APP", "main.toml"),
            ("BRRTMVC_MOUNT", "/shop"),
            ("BRRTMVC_REDIRECT_STATUS", "303"),
        ]);
        assert_eq!(cfg.app_paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cfg.main_app, "main.toml");
        assert_eq!(cfg.mount, "/shop");
        assert_eq!(cfg.redirect_status, 303);
    }

    #[test]
    fn test_invalid_redirect_status_falls_back() {
        assert_eq!(config(&[("BRRTMVC_REDIRECT_STATUS", "200")]).redirect_status, 302);
        assert_eq!(config(&[("BRRTMVC_REDIRECT_STATUS", "abc")]).redirect_status, 302);
    }
}
