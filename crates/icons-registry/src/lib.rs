//! Icon pack registry and search.
//!
//! [`PackRegistry`] owns the pack definitions and the merged icon catalog;
//! [`IconSearch`] ranks that catalog against free-text queries. Both cache
//! through the same [`Cache`](icons_cache::Cache) backend and are invalidated
//! together by [`PackRegistry::invalidate`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use icons_cache::MemoryCache;
//! use icons_core::{Extractors, HttpIconifyClient};
//! use icons_registry::{IconSearch, PackRegistry, RegistryConfig};
//!
//! let config = RegistryConfig {
//!     extensions: vec!["modules/ui_kit".to_owned()],
//!     ..RegistryConfig::default()
//! };
//! let extractors = Extractors::new(Arc::new(HttpIconifyClient::default()));
//! let registry = Arc::new(PackRegistry::new(Arc::new(MemoryCache::new()), extractors, config));
//!
//! let search = IconSearch::new(Arc::clone(&registry));
//! for icon in search.search("arrow", &[], 10)? {
//!     println!("{} {}", icon.id(), icon.label());
//! }
//! # Ok::<(), icons_registry::RegistryError>(())
//! ```

mod error;
mod forms;
mod registry;
mod search;

pub use error::RegistryError;
pub use forms::SettingsForm;
pub use registry::{CACHE_TAG, Definitions, PackCheck, PackRegistry, RegistryConfig};
pub use search::{AutocompleteEntry, DEFAULT_MAX_RESULTS, IconSearch};
