//! CLI error types.

use icons_config::ConfigError;
use icons_registry::RegistryError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("icon `{0}` not found")]
    IconNotFound(String),

    #[error("{0}")]
    Validation(String),
}
