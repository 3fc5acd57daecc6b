use std::path::PathBuf;

/// Failure to load an app descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The descriptor file does not exist.
    #[error("configuration not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor exists but is not valid YAML/TOML, or has an
    /// unsupported extension.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}
