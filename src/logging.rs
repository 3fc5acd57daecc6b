//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and either a
//! JSON or a pretty fmt layer. Output goes to stderr so command output on
//! stdout stays clean.
//!
//! ## Environment Variables
//!
//! - `BRRTMVC_LOG_LEVEL`: trace/debug/info/warn/error (default `info`)
//! - `BRRTMVC_LOG_FORMAT`: json/pretty (default `json`)
//! - `BRRTMVC_LOG_TARGET_FILTER`: extra comma-separated directives, e.g.
//!   `brrtmvc::ioc=debug`
//! - `BRRTMVC_LOG_LOCATION`: `true` to include file and line
//!
//! `RUST_LOG`, when set, replaces the level as the base filter.

use anyhow::{Context, Result};
use std::env;
use tracing::{warn, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything but `pretty` selects JSON.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Extra filter directives such as `brrtmvc::dispatcher=trace`.
    pub directives: Vec<String>,
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            directives: Vec::new(),
            include_location: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Unknown levels fall back to
    /// `info`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup("BRRTMVC_LOG_LEVEL")
            .and_then(|v| v.trim().parse::<Level>().ok())
            .unwrap_or(Level::INFO);
        let format = lookup("BRRTMVC_LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();
        let directives = lookup("BRRTMVC_LOG_TARGET_FILTER")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let include_location = lookup("BRRTMVC_LOG_LOCATION")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Self {
            level,
            format,
            directives,
            include_location,
        }
    }

    /// Base filter plus every directive that parses; the rest are returned
    /// so they can be reported once logging is up.
    fn env_filter(&self) -> (EnvFilter, Vec<String>) {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()));
        let mut rejected = Vec::new();
        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(_) => rejected.push(directive.clone()),
            }
        }
        (filter, rejected)
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let location = config.include_location;
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(location)
            .with_line_number(location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(location)
            .with_line_number(location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let (filter, rejected) = config.env_filter();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    for directive in rejected {
        warn!(directive = %directive, "Ignoring invalid log filter directive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Json);
    }

    #[test]
    fn test_defaults_without_variables() {
        assert_eq!(LogConfig::from_lookup(|_| None), LogConfig::default());
    }

    #[test]
    fn test_lookup_reads_every_variable() {
        let config = LogConfig::from_lookup(lookup(&[
            ("BRRTMVC_LOG_LEVEL", "WARN"),
            ("BRRTMVC_LOG_FORMAT", "pretty"),
            ("BRRTMVC_LOG_TARGET_FILTER", "brrtmvc::ioc=debug, ,hyper=off"),
            ("BRRTMVC_LOG_LOCATION", "yes"),
        ]));
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.directives, ["brrtmvc::ioc=debug", "hyper=off"]);
        assert!(config.include_location);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = LogConfig::from_lookup(lookup(&[("BRRTMVC_LOG_LEVEL", "loud")]));
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn test_invalid_directives_are_set_aside() {
        let config = LogConfig {
            directives: vec!["brrtmvc=debug".to_string(), "brrtmvc=loud".to_string()],
            ..LogConfig::default()
        };
        let (_, rejected) = config.env_filter();
        assert_eq!(rejected, ["brrtmvc=loud"]);
    }
}
