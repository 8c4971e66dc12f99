//! Extractors turn one pack's source configuration into icon records.
//!
//! The set of extractors is closed: a pack's `extractor` key must parse into
//! an [`ExtractorKind`], and [`Extractors`] maps every kind to its
//! implementation.
//!
//! | kind         | required config | reads files |
//! |--------------|-----------------|-------------|
//! | `manual`     | `icons`         | no          |
//! | `path`       | `sources`       | no          |
//! | `svg`        | `sources`       | yes         |
//! | `svg_sprite` | `sources`       | yes         |
//! | `font`       | `sources`       | yes         |
//! | `iconify`    | `collections`   | remote      |
//!
//! Missing configuration is a [`ConfigurationError`]; missing or unreadable
//! files are logged and contribute nothing.

mod font;
mod iconify;
mod manual;
mod path;
mod svg;
mod svg_sprite;
mod woff;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use icons_finder::IconFinder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::definition::PackDefinition;
use crate::error::ConfigurationError;
use crate::record::{ICON_ID_SEPARATOR, IconRecord};

pub use font::FontExtractor;
pub use iconify::{
    CollectionResponse, HttpIconifyClient, IconifyClient, IconifyError, IconifyExtractor,
};
pub use manual::ManualExtractor;
pub use path::PathExtractor;
pub use svg::SvgExtractor;
pub use svg_sprite::SvgSpriteExtractor;

/// Icon records keyed by full id, in discovery order.
pub type IconMap = IndexMap<String, IconRecord>;

/// Strategy turning one pack into icon records.
pub trait PackExtractor: Send + Sync {
    /// Plugin id, as used in the `extractor` key.
    fn id(&self) -> &'static str;

    /// Discover the icons of `pack`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the pack's configuration lacks a
    /// key this extractor requires or a produced record is invalid.
    fn discover(
        &self,
        pack: &PackDefinition,
        finder: &mut IconFinder,
    ) -> Result<IconMap, ConfigurationError>;
}

/// Known extractor kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    Manual,
    Path,
    Svg,
    SvgSprite,
    Font,
    Iconify,
}

impl ExtractorKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Manual,
        Self::Path,
        Self::Svg,
        Self::SvgSprite,
        Self::Font,
        Self::Iconify,
    ];

    /// Plugin id of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Path => "path",
            Self::Svg => "svg",
            Self::SvgSprite => "svg_sprite",
            Self::Font => "font",
            Self::Iconify => "iconify",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown extractor name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown extractor `{0}`")]
pub struct UnknownExtractorKind(pub String);

impl FromStr for ExtractorKind {
    type Err = UnknownExtractorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownExtractorKind(s.to_owned()))
    }
}

/// Registry mapping each [`ExtractorKind`] to its implementation.
pub struct Extractors {
    iconify: IconifyExtractor,
}

impl Extractors {
    /// Create the registry with the given Iconify API client.
    #[must_use]
    pub fn new(iconify: Arc<dyn IconifyClient>) -> Self {
        Self {
            iconify: IconifyExtractor::new(iconify),
        }
    }

    /// Implementation for `kind`.
    #[must_use]
    pub fn get(&self, kind: ExtractorKind) -> &dyn PackExtractor {
        match kind {
            ExtractorKind::Manual => &ManualExtractor,
            ExtractorKind::Path => &PathExtractor,
            ExtractorKind::Svg => &SvgExtractor,
            ExtractorKind::SvgSprite => &SvgSpriteExtractor,
            ExtractorKind::Font => &FontExtractor,
            ExtractorKind::Iconify => &self.iconify,
        }
    }

    /// Run the extractor declared by `pack`.
    ///
    /// # Errors
    ///
    /// Propagates the extractor's [`ConfigurationError`].
    pub fn discover(
        &self,
        pack: &PackDefinition,
        finder: &mut IconFinder,
    ) -> Result<IconMap, ConfigurationError> {
        let extractor = self.get(pack.extractor);
        let icons = extractor.discover(pack, finder)?;
        tracing::debug!(
            pack = %pack.id,
            extractor = extractor.id(),
            count = icons.len(),
            "discovered icons"
        );
        Ok(icons)
    }
}

/// Read `config.<key>` as a list of strings.
///
/// Non-string entries are dropped.
pub(crate) fn string_list(
    pack: &PackDefinition,
    plugin: &'static str,
    key: &'static str,
) -> Result<Vec<String>, ConfigurationError> {
    let Some(Value::Array(items)) = pack.config.get(key) else {
        return Err(ConfigurationError::MissingKey { plugin, key });
    };
    Ok(items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_owned))
        .collect())
}

/// Data shared by every record of `pack`.
pub(crate) fn base_data(pack: &PackDefinition) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("pack_label".to_owned(), Value::from(pack.label.as_str()));
    if let Some(library) = &pack.library {
        data.insert("library".to_owned(), Value::from(library.as_str()));
    }
    if let Some(preview) = &pack.preview {
        data.insert("preview".to_owned(), Value::from(preview.as_str()));
    }
    let defaults = pack.setting_defaults();
    if !defaults.is_empty() {
        data.insert("settings_defaults".to_owned(), Value::Object(defaults));
    }
    data.insert("config".to_owned(), Value::Object(pack.config.clone()));
    data
}

/// Create a record for `pack` and add it to `icons` under its full id.
///
/// An id already present keeps its first record. Ids containing the full id
/// separator are skipped.
pub(crate) fn push_icon(
    icons: &mut IconMap,
    pack: &PackDefinition,
    icon_id: &str,
    source: Option<String>,
    group: Option<String>,
    data: Map<String, Value>,
) -> Result<(), ConfigurationError> {
    if icon_id.contains(ICON_ID_SEPARATOR) {
        tracing::warn!(pack = %pack.id, icon_id, "skipping icon id containing `:`");
        return Ok(());
    }
    let record = IconRecord::create(
        pack.id.as_str(),
        icon_id,
        pack.template.as_str(),
        source,
        group,
        Some(data),
    )
    .map_err(|source| ConfigurationError::InvalidIcon {
        pack: pack.id.clone(),
        source,
    })?;
    icons.entry(record.id()).or_insert(record);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use crate::definition::{PackDefinition, parse_pack_definitions, PathContext};

    /// Parse a single pack declared under `root/pack`.
    pub(crate) fn pack(root: &Path, yaml: &str) -> PackDefinition {
        let ctx = PathContext::for_extension(root, "pack");
        parse_pack_definitions(yaml, Path::new("pack.icons.yml"), &ctx)
            .unwrap()
            .remove(0)
    }

    pub(crate) fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}
