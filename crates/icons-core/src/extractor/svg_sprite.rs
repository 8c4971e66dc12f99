use icons_finder::IconFinder;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::svg::{SvgError, local_name};
use super::{IconMap, PackExtractor, base_data, push_icon, string_list};
use crate::definition::PackDefinition;
use crate::error::ConfigurationError;

/// One icon per `<symbol id>` of each matched sprite sheet.
pub struct SvgSpriteExtractor;

impl PackExtractor for SvgSpriteExtractor {
    fn id(&self) -> &'static str {
        "svg_sprite"
    }

    fn discover(
        &self,
        pack: &PackDefinition,
        finder: &mut IconFinder,
    ) -> Result<IconMap, ConfigurationError> {
        let sources = string_list(pack, self.id(), "sources")?;
        let files = finder.get_files_from_sources(&sources, &pack.path.relative_path);

        let mut icons = IconMap::new();
        for file in files.into_values() {
            let text = finder.get_file_contents(&file.absolute_path);
            let symbols = match symbol_ids(&text) {
                Ok(symbols) => symbols,
                Err(e) => {
                    tracing::warn!(path = %file.absolute_path, error = %e, "skipping invalid sprite");
                    continue;
                }
            };
            if symbols.is_empty() {
                tracing::debug!(path = %file.absolute_path, "sprite has no symbols");
            }
            for symbol in symbols {
                push_icon(
                    &mut icons,
                    pack,
                    &symbol,
                    Some(file.source.clone()),
                    Some(file.group.clone()),
                    base_data(pack),
                )?;
            }
        }
        Ok(icons)
    }
}

/// Ids of the `<symbol>` elements directly under the root `<svg>` or under
/// a top-level `<defs>`, in document order.
pub(crate) fn symbol_ids(text: &str) -> Result<Vec<String>, SvgError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<String> = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = open_element(&stack, &e)?;
                collect_symbol(&stack, &name, &e, &mut ids);
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = open_element(&stack, &e)?;
                collect_symbol(&stack, &name, &e, &mut ids);
                if stack.is_empty() {
                    return Ok(ids);
                }
            }
            Event::End(_) => {
                stack.pop();
                if stack.is_empty() {
                    return Ok(ids);
                }
            }
            Event::Eof if stack.is_empty() => return Err(SvgError::NoRoot),
            Event::Eof => return Err(SvgError::Unclosed),
            _ => {}
        }
    }
}

/// Name of a new element, checking that the document root is `<svg>`.
fn open_element(stack: &[String], element: &BytesStart<'_>) -> Result<String, SvgError> {
    let name = local_name(element);
    if stack.is_empty() && name != "svg" {
        return Err(SvgError::NotSvg(name));
    }
    Ok(name)
}

fn collect_symbol(stack: &[String], name: &str, element: &BytesStart<'_>, ids: &mut Vec<String>) {
    let top_level = matches!(stack, [root] if root == "svg")
        || matches!(stack, [root, defs] if root == "svg" && defs == "defs");
    if name != "symbol" || !top_level {
        return;
    }
    let id = element
        .try_get_attribute("id")
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(std::borrow::Cow::into_owned));
    if let Some(id) = id.filter(|id| !id.is_empty()) {
        ids.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::test_support::{pack, write};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SPRITE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <symbol id="top"><path d="M0"/></symbol>
  <defs>
    <symbol id="in-defs"/>
    <g><symbol id="too-deep"/></g>
  </defs>
  <g><symbol id="nested"/></g>
  <symbol><path/></symbol>
</svg>"#;

    #[test]
    fn test_symbol_ids() {
        assert_eq!(symbol_ids(SPRITE).unwrap(), ["top", "in-defs"]);
    }

    #[test]
    fn test_symbol_ids_errors() {
        assert!(matches!(symbol_ids(""), Err(SvgError::NoRoot)));
        assert!(matches!(symbol_ids("<html/>"), Err(SvgError::NotSvg(_))));
        assert!(symbol_ids("<svg><symbol id=\"a\">").is_err());
    }

    #[test]
    fn test_discover_sprite() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pack/sprite.svg", SPRITE);
        write(dir.path(), "pack/plain.svg", "<svg><path/></svg>");
        let pack = pack(
            dir.path(),
            "sprite:\n  extractor: svg_sprite\n  template: t\n  config:\n    sources: [\"*.svg\"]\n",
        );

        let mut finder = IconFinder::new(dir.path(), "/");
        let icons = SvgSpriteExtractor.discover(&pack, &mut finder).unwrap();

        let ids: Vec<&String> = icons.keys().collect();
        assert_eq!(ids, ["sprite:top", "sprite:in-defs"]);
        assert_eq!(icons["sprite:top"].source(), Some("/pack/sprite.svg"));
        assert_eq!(icons["sprite:in-defs"].source(), Some("/pack/sprite.svg"));
    }

    #[test]
    fn test_missing_sources_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pack = pack(dir.path(), "sprite:\n  extractor: svg_sprite\n  template: t\n  config: {}\n");
        let mut finder = IconFinder::new(dir.path(), "/");
        let err = SvgSpriteExtractor.discover(&pack, &mut finder).unwrap_err();
        assert_eq!(err.plugin_id(), Some("svg_sprite"));
    }
}
