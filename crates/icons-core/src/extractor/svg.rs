use icons_finder::IconFinder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use super::{IconMap, PackExtractor, base_data, push_icon, string_list};
use crate::definition::PackDefinition;
use crate::error::ConfigurationError;

/// Root attributes that belong to the file, not to the rendered icon.
const SKIPPED_ATTRIBUTES: [&str; 2] = ["width", "height"];

/// Inline SVG icons: the children of each file's root `<svg>` become
/// `data.content`.
pub struct SvgExtractor;

/// Reason an SVG file was skipped.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SvgError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("document has no root element")]
    NoRoot,
    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
    #[error("unexpected end of document")]
    Unclosed,
    #[error("cannot serialize content: {0}")]
    Write(String),
}

/// Parsed SVG file.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct SvgDocument {
    /// Markup between `<svg>` and `</svg>`, trimmed.
    pub content: String,
    /// Root attributes other than namespaces and dimensions.
    pub attributes: Map<String, Value>,
}

impl PackExtractor for SvgExtractor {
    fn id(&self) -> &'static str {
        "svg"
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
            let text = finder.get_file_contents(&file.absolute_path);
            if text.trim().is_empty() {
                tracing::warn!(path = %file.absolute_path, "skipping empty svg file");
                continue;
            }
            let document = match parse_svg(&text) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(path = %file.absolute_path, error = %e, "skipping invalid svg file");
                    continue;
                }
            };

            let mut data = base_data(pack);
            data.insert("content".to_owned(), Value::from(document.content));
            if !document.attributes.is_empty() {
                data.insert("attributes".to_owned(), Value::Object(document.attributes));
            }
            push_icon(
                &mut icons,
                pack,
                &icon_id,
                Some(file.source),
                Some(file.group),
                data,
            )?;
        }
        Ok(icons)
    }
}

/// Split an SVG file into its inner markup and root attributes.
pub(crate) fn parse_svg(text: &str) -> Result<SvgDocument, SvgError> {
    let mut reader = Reader::from_str(text);

    let (root, self_closing) = loop {
        match reader.read_event()? {
            Event::Start(e) => break (e, false),
            Event::Empty(e) => break (e, true),
            Event::Eof => return Err(SvgError::NoRoot),
            _ => {}
        }
    };

    let name = local_name(&root);
    if name != "svg" {
        return Err(SvgError::NotSvg(name));
    }

    let content = if self_closing {
        String::new()
    } else {
        inner_markup(&mut reader)?
    };
    Ok(SvgDocument {
        content,
        attributes: root_attributes(&root),
    })
}

/// Re-serialize everything up to the end tag of the current element.
fn inner_markup(reader: &mut Reader<&[u8]>) -> Result<String, SvgError> {
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;
    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(SvgError::Unclosed),
            _ => {}
        }
        writer
            .write_event(event)
            .map_err(|e| SvgError::Write(e.to_string()))?;
    }

    let markup =
        String::from_utf8(writer.into_inner()).map_err(|e| SvgError::Write(e.to_string()))?;
    Ok(markup.trim().to_owned())
}

fn root_attributes(root: &BytesStart<'_>) -> Map<String, Value> {
    let mut attributes = Map::new();
    for attr in root.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key.starts_with("xmlns") || SKIPPED_ATTRIBUTES.contains(&key.as_str()) {
            continue;
        }
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attributes.insert(key, Value::from(value));
    }
    attributes
}

/// Element name without namespace prefix.
pub(crate) fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}
