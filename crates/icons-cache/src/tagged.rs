//! Tag-aware view over a [`CacheBucket`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Cache, CacheBucket, CacheBucketExt};

/// A bucket whose entries are validated against invalidation tags.
///
/// `set_json(key, value, tags)` stores the value under the current checksum
/// of `tags`; `get_json(key, tags)` only hits while none of those tags has
/// been invalidated since. Entries are written as a whole, so readers never
/// observe a partial value.
pub struct TaggedBucket<'a> {
    cache: &'a dyn Cache,
    bucket: Box<dyn CacheBucket>,
}

impl<'a> TaggedBucket<'a> {
    /// Open bucket `name` of `cache`.
    #[must_use]
    pub fn new(cache: &'a dyn Cache, name: &str) -> Self {
        Self {
            cache,
            bucket: cache.bucket(name),
        }
    }

    /// Retrieve a value stored under `key`, if its tags are still valid.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str, tags: &[&str]) -> Option<T> {
        let etag = self.cache.tag_checksum(tags);
        self.bucket.get_json(key, &etag)
    }

    /// Store a value under `key`, bound to the current state of `tags`.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T, tags: &[&str]) {
        let etag = self.cache.tag_checksum(tags);
        self.bucket.set_json(key, &etag, value);
    }

    /// Remove the entry stored under `key`.
    pub fn delete(&self, key: &str) {
        self.bucket.delete(key);
    }
}
