//! Fuzzy icon search.
//!
//! Queries are matched against `"<icon_id> <pack_id> <pack_label>"` of every
//! icon, scanning the catalog in order:
//!
//! 1. an exact full id returns that icon alone
//! 2. whole-word matches of any query word (tier 1)
//! 3. substring matches of any query word (tier 2)
//!
//! Scanning stops once `max_results` icons matched; tier 1 hits are listed
//! before tier 2 hits. Ranked id lists are cached per raw query in the
//! `icon_search` bucket, invalidated together with the pack registry.

use std::sync::Arc;

use icons_cache::TaggedBucket;
use icons_core::IconRecord;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::RegistryError;
use crate::registry::{CACHE_TAG, PackRegistry};

/// Default number of results.
pub const DEFAULT_MAX_RESULTS: usize = 20;

const SEARCH_BUCKET: &str = "icon_search";
const MIN_QUERY_LEN: usize = 2;

/// Autocomplete suggestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AutocompleteEntry {
    /// Full icon id.
    pub value: String,
    /// `"<Label> (<pack label>)"`.
    pub label: String,
}

/// Search over the catalog of a [`PackRegistry`].
pub struct IconSearch {
    registry: Arc<PackRegistry>,
}

impl IconSearch {
    #[must_use]
    pub fn new(registry: Arc<PackRegistry>) -> Self {
        Self { registry }
    }

    /// Full ids of the icons matching `query`, best tier first.
    ///
    /// An empty `allowed_packs` searches every pack.
    ///
    /// # Errors
    ///
    /// Propagates registry loading errors.
    pub fn search_ids(
        &self,
        query: &str,
        allowed_packs: &[&str],
        max_results: usize,
    ) -> Result<Vec<String>, RegistryError> {
        if query.trim().chars().count() < MIN_QUERY_LEN || max_results == 0 {
            return Ok(Vec::new());
        }

        let icons = self.registry.get_icons(&[])?;
        if let Some(icon) = icons.get(query)
            && is_allowed(icon, allowed_packs)
        {
            return Ok(vec![query.to_owned()]);
        }

        let key = cache_key(query, allowed_packs, max_results);
        let bucket = TaggedBucket::new(self.registry.cache(), SEARCH_BUCKET);
        if let Some(ids) = bucket.get_json::<Vec<String>>(&key, &[CACHE_TAG]) {
            tracing::debug!(query, "search cache hit");
            return Ok(ids);
        }

        let words = normalize(query);
        if words.is_empty() {
            return Ok(Vec::new());
        }
        let Some(whole_word) = whole_word_pattern(&words) else {
            return Ok(Vec::new());
        };

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (id, icon) in icons.as_ref() {
            if !is_allowed(icon, allowed_packs) {
                continue;
            }
            let text = searchable_text(icon);
            if whole_word.is_match(&text) {
                exact.push(id.clone());
            } else {
                let lower = text.to_lowercase();
                if words.iter().any(|word| lower.contains(word.as_str())) {
                    partial.push(id.clone());
                }
            }
            if exact.len() + partial.len() >= max_results {
                break;
            }
        }

        exact.append(&mut partial);
        bucket.set_json(&key, &exact, &[CACHE_TAG]);
        Ok(exact)
    }

    /// Matching icons turned into entries by `build`.
    ///
    /// Icons for which `build` returns `None`, or which left the catalog
    /// since the ids were cached, are omitted.
    pub fn search_with<T>(
        &self,
        query: &str,
        allowed_packs: &[&str],
        max_results: usize,
        mut build: impl FnMut(&IconRecord) -> Option<T>,
    ) -> Result<Vec<T>, RegistryError> {
        let ids = self.search_ids(query, allowed_packs, max_results)?;
        let icons = self.registry.get_icons(&[])?;
        Ok(ids
            .iter()
            .filter_map(|id| icons.get(id).and_then(&mut build))
            .collect())
    }

    /// Matching icon records.
    pub fn search(
        &self,
        query: &str,
        allowed_packs: &[&str],
        max_results: usize,
    ) -> Result<Vec<IconRecord>, RegistryError> {
        self.search_with(query, allowed_packs, max_results, |icon| Some(icon.clone()))
    }

    /// Autocomplete suggestions for `query`.
    pub fn autocomplete(
        &self,
        query: &str,
        allowed_packs: &[&str],
        max_results: usize,
    ) -> Result<Vec<AutocompleteEntry>, RegistryError> {
        self.search_with(query, allowed_packs, max_results, |icon| {
            Some(AutocompleteEntry {
                value: icon.id(),
                label: format!("{} ({})", icon.label(), icon.pack_label()),
            })
        })
    }
}

fn is_allowed(icon: &IconRecord, allowed_packs: &[&str]) -> bool {
    allowed_packs.is_empty() || allowed_packs.contains(&icon.pack_id())
}

fn searchable_text(icon: &IconRecord) -> String {
    format!("{} {} {}", icon.icon_id(), icon.pack_id(), icon.pack_label())
}

/// Lowercase words of `query`, keeping word characters and hyphens.
fn normalize(query: &str) -> Vec<String> {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(str::to_owned).collect()
}

fn whole_word_pattern(words: &[String]) -> Option<Regex> {
    let alternation = words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).ok()
}

/// Cache key of a raw query and its filters.
fn cache_key(query: &str, allowed_packs: &[&str], max_results: usize) -> String {
    let content = format!("{query}\0{}\0{max_results}", allowed_packs.join(","));
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
