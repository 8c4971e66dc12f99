use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use icons_finder::{IconFinder, ResolvedFile};
use indexmap::IndexMap;
use serde_json::Value;

use super::woff;
use super::{IconMap, PackExtractor, base_data, push_icon, string_list};
use crate::definition::PackDefinition;
use crate::error::ConfigurationError;

/// Glyphs of icon fonts and their companion name lists.
///
/// Supported sources, by extension:
///
/// - `.codepoints`: one `<name> <codepoint>` pair per line
/// - `.ttf`, `.otf`, `.woff`: glyph names from the font itself
/// - `.json`: keys of the top-level object
/// - `.yml`, `.yaml`: keys of the top-level mapping
pub struct FontExtractor;

/// Glyph found in one source, before records are built.
struct Glyph {
    content: Option<String>,
    source: String,
    group: String,
}

impl PackExtractor for FontExtractor {
    fn id(&self) -> &'static str {
        "font"
    }

    fn discover(
        &self,
        pack: &PackDefinition,
        finder: &mut IconFinder,
    ) -> Result<IconMap, ConfigurationError> {
        let sources = string_list(pack, self.id(), "sources")?;
        let offset = pack
            .config
            .get("offset")
            .and_then(Value::as_u64)
            .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX));

        let mut glyphs: IndexMap<String, Glyph> = IndexMap::new();
        for source in &sources {
            let files = finder.get_files_from_source(source, &pack.path.relative_path);
            if files.is_empty() {
                tracing::warn!(pack = %pack.id, source, "font source not found");
            }
            for file in files.into_values() {
                for (name, content) in self.read_source(finder, &file)? {
                    glyphs.entry(name).or_insert_with(|| Glyph {
                        content,
                        source: file.source.clone(),
                        group: file.group.clone(),
                    });
                }
            }
        }

        let mut icons = IconMap::new();
        for (name, glyph) in glyphs.into_iter().skip(offset) {
            let mut data = base_data(pack);
            if let Some(content) = glyph.content {
                data.insert("content".to_owned(), Value::from(content));
            }
            push_icon(
                &mut icons,
                pack,
                &name,
                Some(glyph.source),
                Some(glyph.group),
                data,
            )?;
        }
        Ok(icons)
    }
}

impl FontExtractor {
    /// Glyph names and optional content of one source file.
    fn read_source(
        &self,
        finder: &IconFinder,
        file: &ResolvedFile,
    ) -> Result<Vec<(String, Option<String>)>, ConfigurationError> {
        let path = Path::new(&file.absolute_path);
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "codepoints" => Ok(parse_codepoints(&finder.get_file_contents(&file.absolute_path))),
            "ttf" | "otf" | "woff" => Ok(font_glyphs(path, &finder.get_file_bytes(&file.absolute_path))),
            "json" => {
                let text = finder.get_file_contents(&file.absolute_path);
                let value: Value = serde_json::from_str(&text)
                    .map_err(|e| self.malformed(path, e.to_string()))?;
                let Value::Object(map) = value else {
                    return Err(self.malformed(path, "expected a top-level object".to_owned()));
                };
                Ok(map.into_iter().map(|(k, v)| (k, scalar(&v))).collect())
            }
            "yml" | "yaml" => {
                let text = finder.get_file_contents(&file.absolute_path);
                let map: Option<IndexMap<String, serde_yaml::Value>> = serde_yaml::from_str(&text)
                    .map_err(|e| self.malformed(path, e.to_string()))?;
                Ok(map
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(k, v)| {
                        let content = serde_json::to_value(v).ok().as_ref().and_then(scalar);
                        (k, content)
                    })
                    .collect())
            }
            other => {
                tracing::warn!(path = %file.absolute_path, extension = other, "unsupported font source");
                Ok(Vec::new())
            }
        }
    }

    fn malformed(&self, path: &Path, message: String) -> ConfigurationError {
        ConfigurationError::MalformedSource {
            plugin: self.id(),
            path: PathBuf::from(path),
            message,
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse `<name> <codepoint>` lines. Blank lines are ignored.
fn parse_codepoints(text: &str) -> Vec<(String, Option<String>)> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            Some((name.to_owned(), parts.next().map(str::to_owned)))
        })
        .collect()
}

/// Named glyphs of a font file, with their first Unicode codepoint in hex.
///
/// Unparseable fonts yield nothing.
fn font_glyphs(path: &Path, data: &[u8]) -> Vec<(String, Option<String>)> {
    let unpacked;
    let data = if woff::is_woff(data) {
        match woff::to_sfnt(data) {
            Ok(sfnt) => {
                unpacked = sfnt;
                unpacked.as_slice()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot unpack woff font");
                return Vec::new();
            }
        }
    } else {
        data
    };

    let face = match ttf_parser::Face::parse(data, 0) {
        Ok(face) => face,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot parse font");
            return Vec::new();
        }
    };

    let mut codepoints: BTreeMap<u16, u32> = BTreeMap::new();
    if let Some(cmap) = face.tables().cmap {
        for subtable in cmap.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|cp| {
                if let Some(glyph) = subtable.glyph_index(cp) {
                    codepoints.entry(glyph.0).or_insert(cp);
                }
            });
        }
    }

    (0..face.number_of_glyphs())
        .filter_map(|id| {
            let name = face.glyph_name(ttf_parser::GlyphId(id))?;
            if name.is_empty() || name.starts_with('.') {
                return None;
            }
            let content = codepoints.get(&id).map(|cp| format!("{cp:x}"));
            Some((name.to_owned(), content))
        })
        .collect()
}
