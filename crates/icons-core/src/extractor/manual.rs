use icons_finder::IconFinder;
use serde::Deserialize;
use serde_json::Value;

use super::{IconMap, PackExtractor, base_data, push_icon};
use crate::definition::PackDefinition;
use crate::error::ConfigurationError;

/// Icons listed one by one in `config.icons`.
pub struct ManualExtractor;

#[derive(Deserialize)]
struct ManualIcon {
    name: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    group: Option<String>,
}

impl PackExtractor for ManualExtractor {
    fn id(&self) -> &'static str {
        "manual"
    }

    fn discover(
        &self,
        pack: &PackDefinition,
        finder: &mut IconFinder,
    ) -> Result<IconMap, ConfigurationError> {
        let Some(Value::Array(entries)) = pack.config.get("icons") else {
            return Err(ConfigurationError::MissingKey {
                plugin: self.id(),
                key: "icons",
            });
        };

        let mut icons = IconMap::new();
        for entry in entries {
            let icon = match ManualIcon::deserialize(entry) {
                Ok(icon) => icon,
                Err(e) => {
                    tracing::warn!(pack = %pack.id, error = %e, "skipping malformed icon entry");
                    continue;
                }
            };
            let source = icon.source.map(|s| source_url(finder, pack, &s));
            push_icon(
                &mut icons,
                pack,
                &icon.name,
                source,
                icon.group,
                base_data(pack),
            )?;
        }
        Ok(icons)
    }
}

/// URL for a declared source; local paths are mapped without touching disk.
fn source_url(finder: &IconFinder, pack: &PackDefinition, source: &str) -> String {
    if source.starts_with("http://") || source.starts_with("https://") {
        return source.to_owned();
    }
    let path = match source.strip_prefix('/') {
        Some(absolute) => finder.root().join(absolute),
        None => finder.root().join(&pack.path.relative_path).join(source),
    };
    finder.url_for(&path)
}
