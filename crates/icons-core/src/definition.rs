//! Pack definitions.
//!
//! Packs are declared in `<extension>.icons.yml` files:
//!
//! ```yaml
//! solid:
//!   label: Solid icons
//!   extractor: svg
//!   config:
//!     sources:
//!       - icons/solid/{icon_id}.svg
//!   settings:
//!     size:
//!       type: integer
//!       default: 24
//!   template: '<svg width="{{ size }}">{{ content }}</svg>'
//! ```
//!
//! Parsing validates the id charset and the mandatory `extractor`/`config`
//! keys, and injects the path context of the declaring extension.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigurationError;
use crate::extractor::ExtractorKind;
use crate::settings::SettingSchema;

static PACK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("invalid pack id regex"));

/// Location of the extension declaring a pack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathContext {
    /// Extension name (directory name).
    pub provider: String,
    /// Extension directory relative to the application root.
    pub relative_path: String,
    /// Extension directory on disk.
    pub absolute_path: PathBuf,
}

impl PathContext {
    /// Build the context for an extension directory below `root`.
    #[must_use]
    pub fn for_extension(root: &Path, relative_path: &str) -> Self {
        let relative_path = relative_path.trim_matches('/').to_owned();
        let provider = relative_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        Self {
            provider,
            absolute_path: root.join(&relative_path),
            relative_path,
        }
    }
}

/// License information of a pack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, rename = "gpl-compatible")]
    pub gpl_compatible: bool,
}

/// A validated pack definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackDefinition {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    pub extractor: ExtractorKind,
    /// Extractor-specific configuration.
    pub config: Map<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub settings: IndexMap<String, SettingSchema>,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// Where the pack was declared.
    pub path: PathContext,
}

/// Pack definition as written in YAML, before validation.
#[derive(Deserialize)]
struct RawPackDefinition {
    label: Option<String>,
    description: Option<String>,
    enabled: Option<bool>,
    extractor: Option<String>,
    config: Option<Map<String, Value>>,
    #[serde(default)]
    settings: IndexMap<String, SettingSchema>,
    #[serde(default)]
    template: String,
    library: Option<String>,
    preview: Option<String>,
    version: Option<String>,
    license: Option<License>,
    #[serde(default)]
    links: Vec<String>,
}

impl PackDefinition {
    /// Label, optionally followed by `" - " + description`.
    #[must_use]
    pub fn display_label(&self, include_description: bool) -> String {
        match &self.description {
            Some(description) if include_description && !description.is_empty() => {
                format!("{} - {description}", self.label)
            }
            _ => self.label.clone(),
        }
    }

    /// Defaults of every setting that declares one.
    #[must_use]
    pub fn setting_defaults(&self) -> Map<String, Value> {
        self.settings
            .iter()
            .filter_map(|(name, schema)| Some((name.clone(), schema.default.clone()?)))
            .collect()
    }

    fn from_raw(
        id: String,
        raw: RawPackDefinition,
        path: &PathContext,
    ) -> Result<Self, ConfigurationError> {
        if !PACK_ID.is_match(&id) {
            return Err(ConfigurationError::InvalidPackId { pack: id });
        }
        let Some(extractor) = raw.extractor else {
            return Err(ConfigurationError::MissingDefinitionKey {
                pack: id,
                key: "extractor",
            });
        };
        let Some(config) = raw.config else {
            return Err(ConfigurationError::MissingDefinitionKey {
                pack: id,
                key: "config",
            });
        };
        let Ok(kind) = extractor.parse::<ExtractorKind>() else {
            return Err(ConfigurationError::UnknownExtractor {
                pack: id,
                extractor,
            });
        };

        Ok(Self {
            label: raw.label.unwrap_or_else(|| id.clone()),
            id,
            description: raw.description,
            enabled: raw.enabled.unwrap_or(true),
            extractor: kind,
            config,
            settings: raw.settings,
            template: raw.template,
            library: raw.library,
            preview: raw.preview,
            version: raw.version,
            license: raw.license,
            links: raw.links,
            path: path.clone(),
        })
    }
}

/// Parse and validate every pack of one definition file.
///
/// Packs are returned in file order, including disabled ones.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidDefinitionFile`] for unparseable YAML
/// and the validation error of the first invalid pack otherwise.
pub fn parse_pack_definitions(
    content: &str,
    file: &Path,
    path: &PathContext,
) -> Result<Vec<PackDefinition>, ConfigurationError> {
    let raw: Option<IndexMap<String, RawPackDefinition>> = serde_yaml::from_str(content)
        .map_err(|e| ConfigurationError::InvalidDefinitionFile {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;

    raw.unwrap_or_default()
        .into_iter()
        .map(|(id, raw)| PackDefinition::from_raw(id, raw, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx() -> PathContext {
        PathContext::for_extension(Path::new("/var/www"), "modules/ui_kit/")
    }

    fn parse(yaml: &str) -> Result<Vec<PackDefinition>, ConfigurationError> {
        parse_pack_definitions(yaml, Path::new("ui_kit.icons.yml"), &ctx())
    }

    #[test]
    fn test_path_context() {
        let ctx = ctx();
        assert_eq!(ctx.provider, "ui_kit");
        assert_eq!(ctx.relative_path, "modules/ui_kit");
        assert_eq!(ctx.absolute_path, PathBuf::from("/var/www/modules/ui_kit"));
    }

    #[test]
    fn test_parse_full_definition() {
        let yaml = r#"
solid:
  label: Solid
  description: Filled glyphs
  version: "2.1"
  license:
    name: MIT
    url: https://opensource.org/licenses/MIT
    gpl-compatible: true
  links: [https://example.com]
  extractor: svg
  config:
    sources: ["icons/solid/*.svg"]
  settings:
    size:
      type: integer
      default: 24
    color:
      type: string
  template: "{{ content }}"
  library: ui_kit/icons
  preview: "<img src='{{ source }}'>"
outline:
  enabled: false
  extractor: path
  config:
    sources: ["icons/outline/*"]
  template: "<img>"
"#;
        let defs = parse(yaml).unwrap();
        assert_eq!(defs.len(), 2);

        let solid = &defs[0];
        assert_eq!(solid.id, "solid");
        assert_eq!(solid.extractor, ExtractorKind::Svg);
        assert!(solid.enabled);
        assert_eq!(solid.config["sources"], json!(["icons/solid/*.svg"]));
        assert_eq!(solid.display_label(true), "Solid - Filled glyphs");
        assert_eq!(solid.display_label(false), "Solid");
        assert!(solid.license.as_ref().unwrap().gpl_compatible);
        assert_eq!(solid.setting_defaults(), json!({"size": 24}).as_object().unwrap().clone());
        assert_eq!(solid.path.provider, "ui_kit");

        let outline = &defs[1];
        assert!(!outline.enabled);
        assert_eq!(outline.label, "outline");
    }

    #[test]
    fn test_invalid_pack_id() {
        let err = parse("Bad-Id:\n  extractor: path\n  config: {}\n").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPackId { ref pack } if pack == "Bad-Id"));
    }

    #[test]
    fn test_missing_extractor_and_config() {
        let err = parse("p:\n  config: {}\n").unwrap_err();
        assert_eq!(err.pack_id(), Some("p"));
        assert!(err.to_string().contains("`extractor`"));

        let err = parse("p:\n  extractor: path\n").unwrap_err();
        assert!(err.to_string().contains("`config`"));
    }

    #[test]
    fn test_unknown_extractor() {
        let err = parse("p:\n  extractor: bitmap\n  config: {}\n").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownExtractor { ref extractor, .. } if extractor == "bitmap"));
    }

    #[test]
    fn test_empty_file_has_no_packs() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("p: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidDefinitionFile { .. }));
    }
}
