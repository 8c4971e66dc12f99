//! Error types for pack configuration.
//!
//! Only fatal conditions are errors. Unreadable files, unparseable SVG and
//! remote failures are reported through `tracing` and contribute no icons.

use std::path::PathBuf;

/// A required [`IconRecord`](crate::IconRecord) field was empty.
///
/// Lists every violated field, not just the first one found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("icon record is missing required values: {}", .missing.join(", "))]
pub struct IconRecordError {
    /// Names of the empty fields, in declaration order.
    pub missing: Vec<&'static str>,
}

/// Fatal pack configuration error.
///
/// Raised while loading pack definitions or running an extractor. Always
/// aborts the operation that triggered it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// An extractor-specific `config` key is missing.
    #[error("extractor `{plugin}` requires `config.{key}`")]
    MissingKey {
        /// Extractor plugin id (e.g. "path").
        plugin: &'static str,
        /// Missing key below `config`.
        key: &'static str,
    },

    /// A pack definition lacks a mandatory top-level key.
    #[error("icon pack `{pack}` is missing the required key `{key}`")]
    MissingDefinitionKey {
        /// Pack id.
        pack: String,
        /// Missing key (e.g. "extractor").
        key: &'static str,
    },

    /// A pack id contains characters outside `[a-z0-9_]`.
    #[error("icon pack id `{pack}` must only contain lowercase letters, digits and underscores")]
    InvalidPackId {
        /// Offending pack id.
        pack: String,
    },

    /// The `extractor` key names no known extractor.
    #[error("icon pack `{pack}` uses unknown extractor `{extractor}`")]
    UnknownExtractor {
        /// Pack id.
        pack: String,
        /// Extractor name as written.
        extractor: String,
    },

    /// An extractor produced an invalid icon record.
    #[error("invalid icon in pack `{pack}`: {source}")]
    InvalidIcon {
        /// Pack id.
        pack: String,
        /// Validation failure.
        source: IconRecordError,
    },

    /// A font source file holds malformed YAML or JSON.
    #[error("extractor `{plugin}` cannot parse {}: {message}", .path.display())]
    MalformedSource {
        /// Extractor plugin id.
        plugin: &'static str,
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A pack definition file cannot be parsed.
    #[error("invalid icon pack definition file {}: {message}", .path.display())]
    InvalidDefinitionFile {
        /// Definition file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

impl ConfigurationError {
    /// Extractor plugin id involved, when known.
    #[must_use]
    pub fn plugin_id(&self) -> Option<&'static str> {
        match self {
            Self::MissingKey { plugin, .. } | Self::MalformedSource { plugin, .. } => Some(plugin),
            _ => None,
        }
    }

    /// Pack id involved, when known.
    #[must_use]
    pub fn pack_id(&self) -> Option<&str> {
        match self {
            Self::MissingDefinitionKey { pack, .. }
            | Self::InvalidPackId { pack }
            | Self::UnknownExtractor { pack, .. }
            | Self::InvalidIcon { pack, .. } => Some(pack),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_lists_all_fields() {
        let err = IconRecordError {
            missing: vec!["pack_id", "icon_id", "template"],
        };
        assert_eq!(
            err.to_string(),
            "icon record is missing required values: pack_id, icon_id, template"
        );
    }

    #[test]
    fn test_missing_key_names_plugin() {
        let err = ConfigurationError::MissingKey {
            plugin: "path",
            key: "sources",
        };
        assert_eq!(err.plugin_id(), Some("path"));
        assert_eq!(err.to_string(), "extractor `path` requires `config.sources`");
    }
}
