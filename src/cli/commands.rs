use anyhow::Context;
use clap::{Parser, Subcommand};
use http::header::{CONTENT_TYPE, COOKIE};
use http::Method;
use serde::Serialize;
use std::path::PathBuf;

use crate::apps::{split_search_path, App, AppRegistry, ConfigError};
use crate::dispatcher::ControllerRegistry;
use crate::ioc::ComponentCatalog;
use crate::runtime_config::RuntimeConfig;
use crate::server::{Service, SESSION_COOKIE};

/// Command-line interface for the brrtmvc dispatch core.
///
/// Global flags override the `BRRTMVC_*` environment variables.
#[derive(Debug, Parser)]
#[command(name = "brrtmvc")]
#[command(about = "brrtmvc dispatch CLI", long_about = None)]
pub struct Cli {
    /// Directory holding the main app descriptor
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// `:`-separated app fragment search path
    #[arg(long, global = true)]
    pub app_path: Option<String>,

    /// Main app descriptor file name
    #[arg(long, global = true)]
    pub main_app: Option<String>,

    /// Mount prefix, e.g. /shop
    #[arg(long, global = true)]
    pub mount: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Dispatch one request and print the response
    Dispatch {
        /// Request target, e.g. `/users/show?id=7`
        target: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Form body sent as application/x-www-form-urlencoded
        #[arg(short, long)]
        form: Option<String>,

        /// Existing session id to send as cookie
        #[arg(long)]
        session: Option<String>,

        /// Print status line and headers before the body
        #[arg(short = 'i', long, default_value_t = false)]
        include_headers: bool,
    },
    /// List apps in precedence order and the merged component bindings
    Apps {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List registered controllers and their actions
    Controllers,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    #[must_use]
    pub fn runtime_config(&self) -> RuntimeConfig {
        let mut config = RuntimeConfig::from_env();
        if let Some(dir) = &self.config_dir {
            config.config_dir = dir.clone();
            if self.app_path.is_none() && std::env::var("BRRTMVC_APP_PATH").is_err() {
                config.app_paths = vec![dir.clone()];
            }
        }
        if let Some(path) = &self.app_path {
            config.app_paths = split_search_path(path);
        }
        if let Some(main_app) = &self.main_app {
            config.main_app = main_app.clone();
        }
        if let Some(mount) = &self.mount {
            config.mount = mount.clone();
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct AppSummary<'a> {
    name: &'a str,
    package: Option<&'a str>,
    properties: usize,
}

#[derive(Debug, Serialize)]
struct ComponentSummary {
    name: String,
    descriptor: String,
    app: String,
    resolved: bool,
}

#[derive(Debug, Serialize)]
struct AppsReport<'a> {
    apps: Vec<AppSummary<'a>>,
    components: Vec<ComponentSummary>,
}

/// Run a parsed command against the given catalog and controllers.
pub fn run_cli(cli: Cli, catalog: &ComponentCatalog, controllers: ControllerRegistry) -> anyhow::Result<()> {
    let config = cli.runtime_config();
    match &cli.command {
        Commands::Dispatch {
            target,
            method,
            form,
            session,
            include_headers,
        } => {
            let service = Service::bootstrap(&config, catalog, controllers)
                .context("Failed to bootstrap service")?;
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method: {method}"))?;

            let uri = format!("{}{}", service.mount(), ensure_leading_slash(target));
            let mut builder = http::Request::builder().method(method).uri(uri);
            if let Some(session) = session {
                builder = builder.header(COOKIE, format!("{SESSION_COOKIE}={session}"));
            }
            if form.is_some() {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            let req = builder
                .body(form.clone().unwrap_or_default())
                .context("Failed to build request")?;

            let res = service.handle(&req);
            if *include_headers {
                println!("{:?} {}", res.version(), res.status());
                for (name, value) in res.headers() {
                    println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
                }
                println!();
            }
            println!("{}", res.body());
            Ok(())
        }
        Commands::Apps { json } => {
            let registry = load_apps(&config)?;
            let report = AppsReport {
                apps: registry
                    .apps()
                    .iter()
                    .map(|app| AppSummary {
                        name: app.name(),
                        package: app.get("package"),
                        properties: app.properties().len(),
                    })
                    .collect(),
                components: registry
                    .component_bindings()
                    .into_iter()
                    .map(|entry| ComponentSummary {
                        resolved: catalog.resolve(&entry.descriptor).is_some(),
                        name: entry.name,
                        descriptor: entry.descriptor,
                        app: entry.app,
                    })
                    .collect(),
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Apps (lowest precedence first):");
                for app in &report.apps {
                    println!(
                        "  {} package={} properties={}",
                        app.name,
                        app.package.unwrap_or("-"),
                        app.properties
                    );
                }
                println!("Components:");
                for c in &report.components {
                    let mark = if c.resolved { "ok" } else { "UNRESOLVED" };
                    println!("  {} = {} (from {}) [{}]", c.name, c.descriptor, c.app, mark);
                }
            }
            Ok(())
        }
        Commands::Controllers => {
            for name in controllers.names() {
                let actions = controllers.actions_of(name).unwrap_or_default();
                println!("{name}: {}", actions.join(", "));
            }
            Ok(())
        }
    }
}

/// Fragments first, then the main app when it exists.
fn load_apps(config: &RuntimeConfig) -> anyhow::Result<AppRegistry> {
    let mut registry = AppRegistry::load_from_paths(&config.app_paths)?;
    match App::load(&config.config_dir, &config.main_app) {
        Ok(app) => registry.add(app),
        Err(ConfigError::NotFound { path }) => {
            eprintln!("Warning: main app not found at {}", path.display());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(registry)
}

fn ensure_leading_slash(target: &str) -> String {
    if target.starts_with('/') {
        target.to_string()
    } else {
        format!("/{target}")
    }
}
