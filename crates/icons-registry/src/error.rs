use std::path::PathBuf;

use icons_core::ConfigurationError;

/// Error returned by [`PackRegistry`](crate::PackRegistry) operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A pack definition or extractor configuration is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A definition file exists but cannot be read.
    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No enabled pack has this id.
    #[error("unknown icon pack `{0}`")]
    UnknownPack(String),
}
