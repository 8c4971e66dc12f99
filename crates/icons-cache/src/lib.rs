//! Tagged cache abstraction for icon pack discovery.
//!
//! This crate provides generic caching traits that decouple cache consumers
//! from the underlying storage mechanism. Two traits form the core API:
//!
//! - [`Cache`]: Factory for named cache buckets, plus tag-based invalidation
//! - [`CacheBucket`]: Key-value store with etag-based invalidation
//!
//! Tags tie entries from several buckets to one invalidation group. Each tag
//! carries an invalidation counter; [`Cache::tag_checksum`] folds the counters
//! of a tag set into an etag, so bumping any tag with
//! [`Cache::invalidate_tags`] turns every entry written under the old checksum
//! into a miss and drops the entries stored under it. [`TaggedBucket`] wraps
//! this into `get`/`set(key, value, tags)`.
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`MemoryCache`]: Process-local implementation shared between handles
//! - [`FileCache`]: File-based implementation with version validation
//!
//! # Example
//!
//! ```
//! use icons_cache::{Cache, MemoryCache, TaggedBucket};
//!
//! let cache = MemoryCache::new();
//! let bucket = TaggedBucket::new(&cache, "icon_pack");
//! bucket.set_json("definitions", &vec!["solid", "outline"], &["icon_pack_plugins"]);
//!
//! let hit: Option<Vec<String>> = bucket.get_json("definitions", &["icon_pack_plugins"]);
//! assert_eq!(hit.as_deref(), Some(&["solid".to_owned(), "outline".to_owned()][..]));
//!
//! cache.invalidate_tags(&["icon_pack_plugins"]);
//! let miss: Option<Vec<String>> = bucket.get_json("definitions", &["icon_pack_plugins"]);
//! assert!(miss.is_none());
//! ```

mod ext;
mod file;
mod memory;
mod tagged;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;
pub use tagged::TaggedBucket;

/// A named partition within a [`Cache`].
///
/// Each bucket stores key-value pairs where values are invalidated by an etag.
/// The etag is an opaque string chosen by the caller (e.g., a tag checksum or
/// a version string). A cache hit occurs only when both the key and etag match.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `Some(value)` if the key exists **and** was stored with the same
    /// `etag`. Returns `None` on cache miss or etag mismatch.
    ///
    /// If `etag` is an empty string, etag validation is skipped and the cached
    /// data is returned regardless of the stored etag.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store a value in the cache.
    ///
    /// Overwrites any existing entry for the same key, regardless of the
    /// previous etag. The write replaces the entry as a whole.
    fn set(&self, key: &str, etag: &str, value: &[u8]);

    /// Remove an entry. Missing keys are ignored.
    fn delete(&self, key: &str);
}

/// Factory for named cache [`CacheBucket`]s with tag invalidation.
///
/// A `Cache` produces buckets that are logically isolated from each other.
/// Tags are shared by all buckets of the same cache.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// Calling `bucket` multiple times with the same name may return
    /// independent handles that share the same underlying storage.
    ///
    /// # Arguments
    ///
    /// * `name` - Bucket name (e.g., "icon_pack", "icon_search")
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;

    /// Bump the invalidation counter of every tag in `tags`.
    ///
    /// Entries stored under a checksum of any of these tags become misses and
    /// may be removed from storage.
    fn invalidate_tags(&self, tags: &[&str]);

    /// Current checksum of a tag set.
    ///
    /// The checksum changes whenever any of the tags is invalidated and is
    /// never empty, so it can be used directly as a bucket etag.
    fn tag_checksum(&self, tags: &[&str]) -> String;
}

/// Build a checksum string from `(tag, counter)` pairs.
pub(crate) fn format_checksum(tags: &[&str], counter: impl Fn(&str) -> u64) -> String {
    let parts: Vec<String> = tags
        .iter()
        .map(|tag| format!("{tag}:{}", counter(tag)))
        .collect();
    if parts.is_empty() {
        "untagged".to_owned()
    } else {
        parts.join(";")
    }
}

/// Whether a checksum built by [`format_checksum`] includes `tag`.
pub(crate) fn etag_mentions(etag: &str, tag: &str) -> bool {
    etag.split(';')
        .filter_map(|part| part.rsplit_once(':'))
        .any(|(name, _)| name == tag)
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` is silently discarded.
/// Used as the bucket type for [`NullCache`].
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}

    fn delete(&self, _key: &str) {}
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when persistent caching is disabled. All operations are no-ops and all
/// lookups return `None`.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }

    fn invalidate_tags(&self, _tags: &[&str]) {}

    fn tag_checksum(&self, tags: &[&str]) -> String {
        format_checksum(tags, |_| 0)
    }
}
