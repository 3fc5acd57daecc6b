use crate::apps::ConfigError;

/// Fatal failure while wiring a [`Service`](super::Service).
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot resolve component '{name}': unknown descriptor '{descriptor}' in app '{app}'")]
    ComponentResolution {
        name: String,
        descriptor: String,
        app: String,
    },
}
