use icons_finder::IconFinder;

use super::{IconMap, PackExtractor, base_data, push_icon, string_list};
use crate::definition::PackDefinition;
use crate::error::ConfigurationError;

/// One icon per file matched by `config.sources`, without reading content.
pub struct PathExtractor;

impl PackExtractor for PathExtractor {
    fn id(&self) -> &'static str {
        "path"
    }

    fn discover(
        &self,
        pack: &PackDefinition,
        finder: &mut IconFinder,
    ) -> Result<IconMap, ConfigurationError> {
        let sources = string_list(pack, self.id(), "sources")?;
        let files = finder.get_files_from_sources(&sources, &pack.path.relative_path);

        let mut icons = IconMap::new();
        for (icon_id, file) in files {
            push_icon(
                &mut icons,
                pack,
                &icon_id,
                Some(file.source),
                Some(file.group),
                base_data(pack),
            )?;
        }
        Ok(icons)
    }
}
