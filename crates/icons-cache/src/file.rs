//! File-based cache implementation.
//!
//! Each bucket is a directory below the cache root and each entry one file:
//!
//! ```text
//! [etag_len: u32 LE][etag bytes][data bytes]
//! ```
//!
//! Entries are written to a uniquely named temporary file in the bucket
//! directory and renamed into place, so concurrent writers of one key never
//! share a partially written file.
//!
//! Tag counters live in `{root}/.tags/{tag}` as decimal text, so invalidations
//! are visible to every process sharing the cache directory. Invalidating a
//! tag also deletes the entries stored under it.
//!
//! The root carries a `VERSION` file. A missing or different version wipes
//! the directory before first use.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Cache, CacheBucket, etag_mentions, format_checksum};

/// Directory holding tag counters, relative to the cache root.
const TAGS_DIR: &str = ".tags";
const VERSION_FILE: &str = "VERSION";
const ETAG_LEN_SIZE: usize = 4;

/// File-based [`Cache`] rooted at a directory on disk.
///
/// ```text
/// {root}/
/// +-- VERSION
/// +-- .tags/icon_pack_plugins
/// +-- icon_pack/definitions
/// +-- icon_search/<query hash>
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open the cache at `root` for cache format `version`.
    ///
    /// Never fails: directory problems are logged and every later operation
    /// degrades to a miss or a dropped write.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        prepare_root(&root, version);
        Self { root }
    }

    fn tag_path(&self, tag: &str) -> PathBuf {
        self.root.join(TAGS_DIR).join(tag)
    }

    fn read_counter(&self, tag: &str) -> u64 {
        fs::read_to_string(self.tag_path(tag))
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Delete entries of every bucket whose etag was built from `tags`.
    fn prune(&self, tags: &[&str]) {
        let Ok(buckets) = fs::read_dir(&self.root) else {
            return;
        };
        let mut removed = 0usize;
        for bucket in buckets.flatten() {
            if bucket.file_name() == TAGS_DIR || !bucket.path().is_dir() {
                continue;
            }
            let Ok(entries) = fs::read_dir(bucket.path()) else {
                continue;
            };
            for entry in entries.flatten() {
                // In-flight temporary files
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                let path = entry.path();
                let Ok(etag) = read_etag(&path) else {
                    continue;
                };
                if tags.iter().any(|tag| etag_mentions(&etag, tag))
                    && fs::remove_file(&path).is_ok()
                {
                    removed += 1;
                }
            }
        }
        tracing::debug!(removed, "pruned invalidated cache entries");
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }

    fn invalidate_tags(&self, tags: &[&str]) {
        let dir = self.root.join(TAGS_DIR);
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("failed to create tag directory: {e}");
            return;
        }
        for tag in tags {
            let next = self.read_counter(tag) + 1;
            if let Err(e) = fs::write(self.tag_path(tag), next.to_string()) {
                tracing::warn!(tag, "failed to write tag counter: {e}");
            }
        }
        self.prune(tags);
    }

    fn tag_checksum(&self, tags: &[&str]) -> String {
        format_checksum(tags, |tag| self.read_counter(tag))
    }
}

struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    fn write_entry(&self, key: &str, etag: &str, value: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&encode_entry(etag, value)?)?;
        tmp.persist(self.dir.join(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let bytes = fs::read(self.dir.join(key)).ok()?;
        let (stored_etag, data) = decode_entry(&bytes)?;
        if !etag.is_empty() && stored_etag != etag.as_bytes() {
            return None;
        }
        Some(data.to_vec())
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        if let Err(e) = self.write_entry(key, etag, value) {
            tracing::warn!(key, dir = %self.dir.display(), "failed to write cache entry: {e}");
        }
    }

    fn delete(&self, key: &str) {
        let _ = fs::remove_file(self.dir.join(key));
    }
}

fn encode_entry(etag: &str, value: &[u8]) -> io::Result<Vec<u8>> {
    let etag_len = u32::try_from(etag.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "etag too long"))?;
    let mut buf = Vec::with_capacity(ETAG_LEN_SIZE + etag.len() + value.len());
    buf.extend_from_slice(&etag_len.to_le_bytes());
    buf.extend_from_slice(etag.as_bytes());
    buf.extend_from_slice(value);
    Ok(buf)
}

/// Split an entry into `(etag, data)`. `None` for truncated files.
fn decode_entry(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let (len, rest) = bytes.split_first_chunk::<ETAG_LEN_SIZE>()?;
    let etag_len = usize::try_from(u32::from_le_bytes(*len)).ok()?;
    if rest.len() < etag_len {
        return None;
    }
    Some(rest.split_at(etag_len))
}

/// Read only the etag header of an entry file.
fn read_etag(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut len = [0u8; ETAG_LEN_SIZE];
    file.read_exact(&mut len)?;
    let mut etag = Vec::new();
    file.take(u64::from(u32::from_le_bytes(len)))
        .read_to_end(&mut etag)?;
    Ok(String::from_utf8_lossy(&etag).into_owned())
}

/// Make sure `root` exists and holds entries of `version` only.
fn prepare_root(root: &Path, version: &str) {
    let version_file = root.join(VERSION_FILE);
    let stored = fs::read_to_string(&version_file).ok();
    if stored.as_deref() == Some(version) {
        tracing::debug!(version, "cache version matches");
        return;
    }

    match &stored {
        Some(stored) => tracing::info!(stored, version, "cache version changed, clearing cache"),
        None => tracing::info!(root = %root.display(), "initializing cache"),
    }
    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to clear cache directory: {e}");
    }
    let result = fs::create_dir_all(root).and_then(|()| fs::write(&version_file, version));
    if let Err(e) = result {
        tracing::warn!(root = %root.display(), "failed to initialize cache: {e}");
    }
}
