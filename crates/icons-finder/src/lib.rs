//! Source pattern resolution for icon packs.
//!
//! [`IconFinder`] turns one declarative source string into concrete files or
//! URLs. A source is one of:
//!
//! - an absolute URL (`http://` or `https://`), returned as-is
//! - an absolute local path (`/icons/*.svg`), resolved under the application root
//! - a path relative to the pack's directory (`assets/{group}/{icon_id}.svg`)
//!
//! Local sources may contain glob wildcards (`*`, `?`, `[...]`, `{a,b}`) and two
//! placeholders: `{group}` in a directory segment names the sub-category of
//! every icon found below it, `{icon_id}` in the filename marks the part of the
//! name that becomes the icon id.
//!
//! # Example
//!
//! ```no_run
//! use icons_finder::IconFinder;
//!
//! let mut finder = IconFinder::new("/var/www", "/");
//! let files = finder.get_files_from_source("assets/{group}/*.svg", "themes/my_theme");
//! for (id, file) in &files {
//!     println!("{id} [{}] -> {}", file.group, file.source);
//! }
//! ```

mod id;
mod pattern;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use id::clean_id;
pub use pattern::glob_to_regex;

use pattern::{
    GROUP_MARK, GROUP_TOKEN, ICON_ID_TOKEN, has_wildcard, mark_placeholders, split_extension,
};

/// Extensions a wildcard filename pattern may enumerate.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["gif", "svg", "png"];

/// One file or URL produced by resolving a source pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    /// Icon id, possibly suffixed with `__N` after a collision.
    pub icon_id: String,
    /// Public URL of the asset (generated relative URL or the original URL).
    pub source: String,
    /// Filesystem path of the asset, or the URL for remote sources.
    pub absolute_path: String,
    /// Directory name captured by `{group}`, empty when the pattern has none.
    pub group: String,
}

/// Resolved files keyed by icon id, in discovery order.
pub type ResolvedFiles = IndexMap<String, ResolvedFile>;

/// Resolves source patterns against the filesystem.
///
/// One finder is used per discovery sweep. It remembers how many times each
/// icon id collided so repeated collisions keep producing fresh `__N` suffixes
/// for the lifetime of the finder.
pub struct IconFinder {
    root: PathBuf,
    base_url: String,
    collisions: HashMap<String, usize>,
}

/// Compiled form of a local source pattern.
struct LocalPattern {
    /// Literal directory to list when the directory part has no wildcard.
    dir: PathBuf,
    /// Glob pattern for the directories to list (depth 0 inside each).
    dir_glob: String,
    /// Whether `dir_glob` contains wildcards and needs expansion.
    dir_is_pattern: bool,
    /// Directory the pattern's segments are counted from.
    base: PathBuf,
    /// Position of the `{group}` segment below `base` and its capture regex.
    group: Option<(usize, Regex)>,
    /// Anchored filename regex (with an `icon_id` capture when requested).
    filename: Regex,
    /// Whether the filename carries `{icon_id}`.
    captures_id: bool,
}

impl IconFinder {
    /// Create a finder for an application rooted at `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Application root; absolute local sources resolve below it
    /// * `base_url` - URL prefix for generated icon URLs (e.g. `"/"`)
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            root: fs::canonicalize(&root).unwrap_or(root),
            base_url: base_url.into(),
            collisions: HashMap::new(),
        }
    }

    /// Application root this finder resolves against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve several sources into one map.
    ///
    /// Sources are processed in order and share the result map, so ids stay
    /// unique across all of them.
    pub fn get_files_from_sources<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        relative_path: &str,
    ) -> ResolvedFiles {
        let mut result = ResolvedFiles::new();
        for source in sources {
            self.resolve_into(source.as_ref(), relative_path, &mut result);
        }
        result
    }

    /// Resolve a single source.
    ///
    /// Never fails: a missing directory or an unusable pattern yields an
    /// empty map.
    pub fn get_files_from_source(&mut self, source: &str, relative_path: &str) -> ResolvedFiles {
        let mut result = ResolvedFiles::new();
        self.resolve_into(source, relative_path, &mut result);
        result
    }

    /// Read a local file as UTF-8 text, returning an empty string on failure.
    #[must_use]
    pub fn get_file_contents(&self, path: &str) -> String {
        if is_url(path) {
            tracing::debug!(path, "remote sources are not read");
            return String::new();
        }
        fs::read_to_string(path).unwrap_or_else(|e| {
            tracing::warn!(path, error = %e, "failed to read icon file");
            String::new()
        })
    }

    /// Read a local file as bytes, returning an empty vector on failure.
    #[must_use]
    pub fn get_file_bytes(&self, path: &str) -> Vec<u8> {
        if is_url(path) {
            tracing::debug!(path, "remote sources are not read");
            return Vec::new();
        }
        fs::read(path).unwrap_or_else(|e| {
            tracing::warn!(path, error = %e, "failed to read icon file");
            Vec::new()
        })
    }

    /// Build the public URL for a local path under the root.
    #[must_use]
    pub fn url_for(&self, path: &Path) -> String {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return path.to_string_lossy().into_owned();
        };
        let relative: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        format!("{}/{}", self.base_url.trim_end_matches('/'), relative.join("/"))
    }

    fn resolve_into(&mut self, source: &str, relative_path: &str, result: &mut ResolvedFiles) {
        if is_url(source) {
            if let Some(file) = file_from_url(source) {
                self.insert(result, file);
            }
            return;
        }

        let Some(pattern) = self.compile(source, relative_path) else {
            return;
        };

        let mut found = 0usize;
        for dir in pattern.directories() {
            for path in list_files(&dir) {
                let Some(file) = self.resolved_file(&pattern, &path) else {
                    continue;
                };
                self.insert(result, file);
                found += 1;
            }
        }
        tracing::debug!(source, found, "resolved icon source");
    }

    /// Insert `file`, suffixing its id when it is already taken.
    fn insert(&mut self, result: &mut ResolvedFiles, mut file: ResolvedFile) {
        if result.contains_key(&file.icon_id) {
            let counter = self.collisions.entry(file.icon_id.clone()).or_insert(0);
            *counter += 1;
            file.icon_id = format!("{}__{counter}", file.icon_id);
        }
        result.insert(file.icon_id.clone(), file);
    }

    fn compile(&self, source: &str, relative_path: &str) -> Option<LocalPattern> {
        let relative_path = relative_path.trim_matches('/');
        let base = if source.starts_with('/') || relative_path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative_path)
        };
        let source = source.trim_start_matches('/');
        let (dir_part, filename) = match source.rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => ("", source),
        };

        let group = group_segment(dir_part)?;

        let dir_marked = mark_placeholders(dir_part);
        let dir_is_pattern = has_wildcard(&dir_marked);
        let mut dir = base.clone();
        let mut dir_glob = glob::Pattern::escape(&base.to_string_lossy());
        for segment in dir_part.split('/').filter(|s| !s.is_empty()) {
            dir.push(segment);
            dir_glob.push('/');
            dir_glob.push_str(&segment.replace(GROUP_TOKEN, "*"));
        }

        let (filename, captures_id) = filename_regex(filename)?;

        Some(LocalPattern {
            dir,
            dir_glob,
            dir_is_pattern,
            base,
            group,
            filename,
            captures_id,
        })
    }

    fn resolved_file(&self, pattern: &LocalPattern, path: &Path) -> Option<ResolvedFile> {
        let name = path.file_name()?.to_str()?;
        let caps = pattern.filename.captures(name)?;

        let icon_id = if pattern.captures_id {
            let raw = caps.name("icon_id").map(|m| m.as_str())?;
            clean_id(raw)
        } else {
            let stem = path.file_stem().map_or(name.into(), |s| s.to_string_lossy());
            clean_id(&stem)
        };
        if icon_id.is_empty() {
            return None;
        }

        let group = match &pattern.group {
            Some((position, regex)) => extract_group(&pattern.base, path, *position, regex)?,
            None => String::new(),
        };

        Some(ResolvedFile {
            icon_id,
            source: self.url_for(path),
            absolute_path: path.to_string_lossy().into_owned(),
            group,
        })
    }
}

impl LocalPattern {
    /// Directories to search, in sorted order.
    fn directories(&self) -> Vec<PathBuf> {
        if !self.dir_is_pattern {
            return if self.dir.is_dir() {
                vec![self.dir.clone()]
            } else {
                Vec::new()
            };
        }
        match glob::glob(&self.dir_glob) {
            Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_dir()).collect(),
            Err(e) => {
                tracing::warn!(pattern = %self.dir_glob, error = %e, "invalid directory pattern");
                Vec::new()
            }
        }
    }
}

/// Locate the `{group}` segment of a directory pattern.
///
/// Returns `Some(None)` when there is no placeholder and `None` when the
/// segment regex cannot be built.
#[allow(clippy::option_option)]
fn group_segment(dir_part: &str) -> Option<Option<(usize, Regex)>> {
    let segments: Vec<&str> = dir_part.split('/').filter(|s| !s.is_empty()).collect();
    let Some(position) = segments.iter().position(|s| s.contains(GROUP_TOKEN)) else {
        return Some(None);
    };
    // Only the first {group} is captured; later ones act as plain wildcards
    let marked = mark_placeholders(segments[position]);
    let first = marked.find(GROUP_MARK).unwrap_or(0);
    let (head, tail) = marked.split_at(first + GROUP_MARK.len_utf8());
    let marked = format!("{head}{}", tail.replace(GROUP_MARK, "*"));
    match Regex::new(&format!("^{}$", glob_to_regex(&marked))) {
        Ok(regex) => Some(Some((position, regex))),
        Err(e) => {
            tracing::warn!(segment = segments[position], error = %e, "invalid group pattern");
            None
        }
    }
}

/// Build the anchored filename regex.
///
/// A filename without wildcards matches exactly. With wildcards, candidate
/// extensions are limited to [`ALLOWED_EXTENSIONS`] intersected with the
/// pattern's own extension, if any.
fn filename_regex(filename: &str) -> Option<(Regex, bool)> {
    let captures_id = filename.contains(ICON_ID_TOKEN);
    let marked = mark_placeholders(filename);

    let body = if has_wildcard(&marked) {
        let (stem, extension) = split_extension(&marked);
        let allowed: Vec<&str> = match extension {
            Some(ext) => {
                let ext_regex = Regex::new(&format!("^{}$", glob_to_regex(ext))).ok()?;
                ALLOWED_EXTENSIONS
                    .into_iter()
                    .filter(|e| ext_regex.is_match(e))
                    .collect()
            }
            None => ALLOWED_EXTENSIONS.to_vec(),
        };
        if allowed.is_empty() {
            tracing::debug!(filename, "no allowed extension matches the pattern");
            return None;
        }
        format!(r"{}\.(?:{})", glob_to_regex(stem), allowed.join("|"))
    } else {
        regex::escape(filename)
    };

    match Regex::new(&format!("^{body}$")) {
        Ok(regex) => Some((regex, captures_id)),
        Err(e) => {
            tracing::warn!(filename, error = %e, "invalid filename pattern");
            None
        }
    }
}

/// Read the group name from the directory segment at `position` below `base`.
fn extract_group(base: &Path, path: &Path, position: usize, regex: &Regex) -> Option<String> {
    let relative = path.parent()?.strip_prefix(base).ok()?;
    let segment = relative.components().nth(position)?;
    let segment = segment.as_os_str().to_str()?;
    let caps = regex.captures(segment)?;
    Some(caps.name("group").map_or(segment, |m| m.as_str()).to_owned())
}

/// List regular files of one directory (depth 0), sorted by name.
fn list_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Build the single entry for a remote source.
fn file_from_url(url: &str) -> Option<ResolvedFile> {
    let decoded = percent_decode_str(url).decode_utf8_lossy();
    let path = decoded.split(['?', '#']).next().unwrap_or_default();
    let name = path.trim_end_matches('/').rsplit('/').next()?;
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let icon_id = clean_id(stem);
    if icon_id.is_empty() {
        tracing::debug!(url, "no icon id could be derived from URL");
        return None;
    }
    Some(ResolvedFile {
        icon_id,
        source: url.to_owned(),
        absolute_path: url.to_owned(),
        group: String::new(),
    })
}
