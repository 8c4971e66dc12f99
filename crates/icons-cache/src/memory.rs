//! Process-local cache implementation.
//!
//! [`MemoryCache`] keeps entries in a shared map guarded by `RwLock`s. Cloning
//! the cache (or opening the same bucket twice) yields handles over the same
//! storage, which is how several registries in one process share discovery
//! results. Lock poisoning is treated like any other cache failure: the
//! operation degrades to a miss or a dropped write.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{Cache, CacheBucket, etag_mentions, format_checksum};

type Entries = HashMap<String, (String, Vec<u8>)>;

#[derive(Default)]
struct Store {
    buckets: RwLock<HashMap<String, Entries>>,
    tags: RwLock<HashMap<String, u64>>,
}

/// In-memory [`Cache`] shared between clones.
#[derive(Clone, Default)]
pub struct MemoryCache {
    store: Arc<Store>,
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            store: Arc::clone(&self.store),
        })
    }

    fn invalidate_tags(&self, tags: &[&str]) {
        {
            let Ok(mut counters) = self.store.tags.write() else {
                return;
            };
            for tag in tags {
                *counters.entry((*tag).to_owned()).or_insert(0) += 1;
            }
        }

        let Ok(mut buckets) = self.store.buckets.write() else {
            return;
        };
        for entries in buckets.values_mut() {
            entries.retain(|_, (etag, _)| !tags.iter().any(|tag| etag_mentions(etag, tag)));
        }
    }

    fn tag_checksum(&self, tags: &[&str]) -> String {
        let counters = self.store.tags.read().ok();
        format_checksum(tags, |tag| {
            counters
                .as_ref()
                .and_then(|c| c.get(tag).copied())
                .unwrap_or(0)
        })
    }
}

struct MemoryCacheBucket {
    name: String,
    store: Arc<Store>,
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let buckets = self.store.buckets.read().ok()?;
        let (stored_etag, data) = buckets.get(&self.name)?.get(key)?;
        if !etag.is_empty() && stored_etag != etag {
            return None;
        }
        Some(data.clone())
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        let Ok(mut buckets) = self.store.buckets.write() else {
            return;
        };
        buckets
            .entry(self.name.clone())
            .or_default()
            .insert(key.to_owned(), (etag.to_owned(), value.to_vec()));
    }

    fn delete(&self, key: &str) {
        if let Ok(mut buckets) = self.store.buckets.write()
            && let Some(entries) = buckets.get_mut(&self.name)
        {
            entries.remove(key);
        }
    }
}
