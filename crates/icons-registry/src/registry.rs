//! Pack catalog and aggregate icon registry.
//!
//! [`PackRegistry`] loads pack definitions from the configured extensions,
//! runs every pack's extractor once per cache generation and serves the
//! merged catalog.
//!
//! # Caching
//!
//! Two layers, both keyed by the checksum of the `icon_pack_plugins` tag:
//!
//! - an in-process snapshot (`Arc`) shared by all callers of one registry
//! - the `icon_pack` bucket of the injected [`Cache`], holding `definitions`
//!   and the `_icons_loaded` aggregate, shared by every registry on the same
//!   backend
//!
//! Rebuilds within one registry are serialized by a reload lock, so a cache
//! generation is discovered at most once per process. Registries in other
//! processes may rebuild concurrently; the aggregate is written as one
//! entry, so the last writer wins without partial results.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use icons_cache::{Cache, TaggedBucket};
use icons_core::{
    ConfigurationError, Extractors, IconMap, IconRecord, PackDefinition, PathContext,
    parse_pack_definitions,
};
use icons_finder::IconFinder;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::RegistryError;
use crate::forms::SettingsForm;

/// Cache tag bumped whenever pack definitions change.
pub const CACHE_TAG: &str = "icon_pack_plugins";

const PACK_BUCKET: &str = "icon_pack";
const DEFINITIONS_KEY: &str = "definitions";
const ICONS_KEY: &str = "_icons_loaded";

/// Enabled pack definitions keyed by pack id, in discovery order.
pub type Definitions = IndexMap<String, PackDefinition>;

/// Registry configuration.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Application root. Extensions and `/` sources resolve below it.
    pub root: PathBuf,
    /// URL prefix for generated icon URLs.
    pub base_url: String,
    /// Extension directories relative to `root`. Glob patterns are expanded.
    pub extensions: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            base_url: "/".to_owned(),
            extensions: Vec::new(),
        }
    }
}

/// Outcome of running one pack's extractor.
#[derive(Debug)]
pub struct PackCheck {
    pub pack_id: String,
    /// Number of icons found, or the fatal configuration error.
    pub result: Result<usize, ConfigurationError>,
}

struct Snapshot<T> {
    etag: String,
    value: Arc<T>,
}

/// Catalog of icon packs and their icons.
pub struct PackRegistry {
    cache: Arc<dyn Cache>,
    extractors: Extractors,
    config: RegistryConfig,
    /// Serializes rebuilds.
    reload_lock: Mutex<()>,
    definitions: RwLock<Option<Snapshot<Definitions>>>,
    icons: RwLock<Option<Snapshot<IconMap>>>,
}

impl PackRegistry {
    /// Create a registry.
    ///
    /// # Arguments
    ///
    /// * `cache` - Persistent cache backend, shared with [`IconSearch`](crate::IconSearch)
    /// * `extractors` - Extractor implementations
    /// * `config` - Root, URL prefix and extension directories
    #[must_use]
    pub fn new(cache: Arc<dyn Cache>, extractors: Extractors, config: RegistryConfig) -> Self {
        Self {
            cache,
            extractors,
            config,
            reload_lock: Mutex::new(()),
            definitions: RwLock::new(None),
            icons: RwLock::new(None),
        }
    }

    /// Cache backend of this registry.
    #[must_use]
    pub fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    /// Enabled pack definitions.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Configuration`] naming the first invalid pack
    /// or definition file, and [`RegistryError::Io`] for unreadable files.
    pub fn get_definitions(&self) -> Result<Arc<Definitions>, RegistryError> {
        let etag = self.etag();
        if let Some(definitions) = current(&self.definitions, &etag) {
            return Ok(definitions);
        }

        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(definitions) = current(&self.definitions, &etag) {
            return Ok(definitions);
        }

        let bucket = TaggedBucket::new(self.cache.as_ref(), PACK_BUCKET);
        let cached: Option<Definitions> = bucket.get_json(DEFINITIONS_KEY, &[CACHE_TAG]);
        let definitions = if let Some(cached) = cached {
            tracing::debug!("pack definitions loaded from cache");
            cached
        } else {
            let definitions = self.scan_definitions()?;
            bucket.set_json(DEFINITIONS_KEY, &definitions, &[CACHE_TAG]);
            definitions
        };

        let definitions = Arc::new(definitions);
        store(&self.definitions, etag, Arc::clone(&definitions));
        Ok(definitions)
    }

    /// The merged icon catalog, optionally restricted to `allowed_packs`.
    ///
    /// An empty `allowed_packs` returns every icon. Packs whose extractor
    /// fails are logged and left out.
    ///
    /// # Errors
    ///
    /// Propagates definition loading errors.
    pub fn get_icons(&self, allowed_packs: &[&str]) -> Result<Arc<IconMap>, RegistryError> {
        let icons = self.all_icons()?;
        if allowed_packs.is_empty() {
            return Ok(icons);
        }
        Ok(Arc::new(
            icons
                .iter()
                .filter(|(_, icon)| allowed_packs.contains(&icon.pack_id()))
                .map(|(id, icon)| (id.clone(), icon.clone()))
                .collect(),
        ))
    }

    /// Look up one icon by full id.
    ///
    /// # Errors
    ///
    /// Propagates definition loading errors. An unknown id is `Ok(None)`.
    pub fn get_icon(&self, full_id: &str) -> Result<Option<IconRecord>, RegistryError> {
        Ok(self.all_icons()?.get(full_id).cloned())
    }

    /// Pack labels keyed by pack id, optionally with `" - " + description`.
    pub fn list_pack_options(
        &self,
        include_description: bool,
    ) -> Result<IndexMap<String, String>, RegistryError> {
        Ok(self
            .get_definitions()?
            .values()
            .map(|pack| (pack.id.clone(), pack.display_label(include_description)))
            .collect())
    }

    /// Declared setting defaults of `pack_id`. Unknown packs have none.
    pub fn get_extractor_form_defaults(
        &self,
        pack_id: &str,
    ) -> Result<Map<String, Value>, RegistryError> {
        Ok(self
            .get_definitions()?
            .get(pack_id)
            .map(PackDefinition::setting_defaults)
            .unwrap_or_default())
    }

    /// One settings form per pack declaring settings.
    ///
    /// `default_values` maps pack ids to value objects that take precedence
    /// over schema defaults. An empty `allowed_packs` includes every pack.
    pub fn get_extractor_plugin_forms(
        &self,
        allowed_packs: &[&str],
        default_values: &Map<String, Value>,
    ) -> Result<IndexMap<String, SettingsForm>, RegistryError> {
        Ok(self
            .get_definitions()?
            .values()
            .filter(|pack| !pack.settings.is_empty())
            .filter(|pack| allowed_packs.is_empty() || allowed_packs.contains(&pack.id.as_str()))
            .map(|pack| {
                let values = default_values.get(&pack.id).and_then(Value::as_object);
                (pack.id.clone(), SettingsForm::new(pack, values))
            })
            .collect())
    }

    /// Run the extractor of one pack, surfacing its configuration error.
    ///
    /// Bypasses the aggregate cache.
    pub fn discover_pack(&self, pack_id: &str) -> Result<IconMap, RegistryError> {
        let definitions = self.get_definitions()?;
        let pack = definitions
            .get(pack_id)
            .ok_or_else(|| RegistryError::UnknownPack(pack_id.to_owned()))?;
        let mut finder = self.finder();
        Ok(self.extractors.discover(pack, &mut finder)?)
    }

    /// Run every pack's extractor and report the outcome per pack.
    pub fn check(&self) -> Result<Vec<PackCheck>, RegistryError> {
        let definitions = self.get_definitions()?;
        let mut finder = self.finder();
        Ok(definitions
            .values()
            .map(|pack| PackCheck {
                pack_id: pack.id.clone(),
                result: self
                    .extractors
                    .discover(pack, &mut finder)
                    .map(|icons| icons.len()),
            })
            .collect())
    }

    /// Drop definitions, the aggregate and search results.
    ///
    /// Bumps [`CACHE_TAG`], so every registry sharing the cache backend
    /// rebuilds on next access.
    pub fn invalidate(&self) {
        self.cache.invalidate_tags(&[CACHE_TAG]);
        clear(&self.definitions);
        clear(&self.icons);
        tracing::info!("icon pack caches invalidated");
    }

    fn etag(&self) -> String {
        self.cache.tag_checksum(&[CACHE_TAG])
    }

    fn finder(&self) -> IconFinder {
        IconFinder::new(&self.config.root, self.config.base_url.as_str())
    }

    fn all_icons(&self) -> Result<Arc<IconMap>, RegistryError> {
        let etag = self.etag();
        if let Some(icons) = current(&self.icons, &etag) {
            return Ok(icons);
        }

        let definitions = self.get_definitions()?;

        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(icons) = current(&self.icons, &etag) {
            return Ok(icons);
        }

        let bucket = TaggedBucket::new(self.cache.as_ref(), PACK_BUCKET);
        let cached: Option<IconMap> = bucket.get_json(ICONS_KEY, &[CACHE_TAG]);
        let icons = if let Some(cached) = cached {
            tracing::debug!("icon catalog loaded from cache");
            cached
        } else {
            let icons = self.sweep(&definitions);
            bucket.set_json(ICONS_KEY, &icons, &[CACHE_TAG]);
            icons
        };

        let icons = Arc::new(icons);
        store(&self.icons, etag, Arc::clone(&icons));
        Ok(icons)
    }

    /// Discover every pack and merge the results, first writer wins.
    fn sweep(&self, definitions: &Definitions) -> IconMap {
        let mut finder = self.finder();
        let mut catalog = IconMap::new();
        let mut failed = 0usize;

        for pack in definitions.values() {
            let icons = match self.extractors.discover(pack, &mut finder) {
                Ok(icons) => icons,
                Err(e) => {
                    tracing::error!(pack = %pack.id, error = %e, "icon pack discovery failed");
                    failed += 1;
                    continue;
                }
            };
            for (id, icon) in icons {
                if catalog.contains_key(&id) {
                    tracing::warn!(id = %id, pack = %pack.id, "duplicate icon id, keeping first");
                    continue;
                }
                catalog.insert(id, icon);
            }
        }

        tracing::info!(
            packs = definitions.len(),
            failed,
            icons = catalog.len(),
            "icon discovery complete"
        );
        catalog
    }

    fn scan_definitions(&self) -> Result<Definitions, RegistryError> {
        let mut definitions = Definitions::new();
        for extension in self.extension_dirs() {
            let ctx = PathContext::for_extension(&self.config.root, &extension);
            let file = ctx.absolute_path.join(format!("{}.icons.yml", ctx.provider));
            let content = match fs::read_to_string(&file) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(extension = %extension, "extension declares no icon packs");
                    continue;
                }
                Err(source) => return Err(RegistryError::Io { path: file, source }),
            };

            for pack in parse_pack_definitions(&content, &file, &ctx)? {
                if !pack.enabled {
                    tracing::debug!(pack = %pack.id, "skipping disabled icon pack");
                    continue;
                }
                if definitions.contains_key(&pack.id) {
                    tracing::warn!(pack = %pack.id, file = %file.display(), "duplicate icon pack id, keeping first");
                    continue;
                }
                definitions.insert(pack.id.clone(), pack);
            }
        }
        tracing::info!(count = definitions.len(), "icon pack definitions loaded");
        Ok(definitions)
    }

    /// Configured extensions with glob patterns expanded, in order.
    fn extension_dirs(&self) -> Vec<String> {
        let mut dirs = Vec::new();
        for extension in &self.config.extensions {
            if !extension.contains(['*', '?', '[']) {
                dirs.push(extension.trim_matches('/').to_owned());
                continue;
            }
            let pattern = self.config.root.join(extension.trim_start_matches('/'));
            let Ok(paths) = glob::glob(&pattern.to_string_lossy()) else {
                tracing::warn!(extension = %extension, "invalid extension pattern");
                continue;
            };
            for path in paths.flatten().filter(|p| p.is_dir()) {
                if let Ok(relative) = path.strip_prefix(&self.config.root) {
                    dirs.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        dirs
    }
}

fn current<T>(slot: &RwLock<Option<Snapshot<T>>>, etag: &str) -> Option<Arc<T>> {
    let guard = slot.read().ok()?;
    guard
        .as_ref()
        .filter(|snapshot| snapshot.etag == etag)
        .map(|snapshot| Arc::clone(&snapshot.value))
}

fn store<T>(slot: &RwLock<Option<Snapshot<T>>>, etag: String, value: Arc<T>) {
    let mut guard = slot.write().unwrap_or_else(PoisonError::into_inner);
    *guard = Some(Snapshot { etag, value });
}

fn clear<T>(slot: &RwLock<Option<Snapshot<T>>>) {
    let mut guard = slot.write().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}

#[cfg(test)]
pub(crate) mod tests {
    static_assertions::assert_impl_all!(super::PackRegistry: Send, Sync);

    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use icons_cache::{MemoryCache, NullCache};
    use icons_core::extractor::{CollectionResponse, IconifyError};
    use icons_core::IconifyClient;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    pub(crate) struct OfflineIconify;

    impl IconifyClient for OfflineIconify {
        fn api_url(&self) -> &str {
            "https://api.iconify.design"
        }

        fn collection(&self, _prefix: &str) -> Result<CollectionResponse, IconifyError> {
            Err(IconifyError::HttpResponse {
                status: 503,
                body: "offline".to_owned(),
            })
        }
    }

    pub(crate) fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub(crate) fn open_registry(root: &Path, cache: Arc<dyn Cache>, extensions: &[&str]) -> PackRegistry {
        let config = RegistryConfig {
            root: root.to_path_buf(),
            base_url: "/".to_owned(),
            extensions: extensions.iter().map(|e| (*e).to_owned()).collect(),
        };
        PackRegistry::new(cache, Extractors::new(Arc::new(OfflineIconify)), config)
    }

    const KIT: &str = r#"
solid:
  label: Solid
  description: Filled glyphs
  extractor: path
  config:
    sources: ["icons/solid/*.svg"]
  settings:
    size:
      type: integer
      default: 24
    color:
      type: string
  template: "<img src=\"{{ source }}\">"
outline:
  extractor: path
  config:
    sources: ["icons/outline/*.svg"]
  template: t
hidden:
  enabled: false
  extractor: path
  config:
    sources: ["icons/solid/*.svg"]
  template: t
"#;

    fn kit(root: &Path) {
        write(root, "modules/kit/kit.icons.yml", KIT);
        write(root, "modules/kit/icons/solid/home.svg", "<svg/>");
        write(root, "modules/kit/icons/solid/star.svg", "<svg/>");
        write(root, "modules/kit/icons/outline/home.svg", "<svg/>");
    }

    fn keys(icons: &IconMap) -> Vec<&str> {
        icons.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_definitions_exclude_disabled_packs() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        let registry = open_registry(dir.path(), Arc::new(NullCache), &["modules/kit", "modules/none"]);

        let definitions = registry.get_definitions().unwrap();
        let ids: Vec<&str> = definitions.keys().map(String::as_str).collect();
        assert_eq!(ids, ["solid", "outline"]);
        assert_eq!(definitions["solid"].path.relative_path, "modules/kit");
        assert_eq!(definitions["outline"].label, "outline");
    }

    #[test]
    fn test_extension_globs() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        write(
            dir.path(),
            "themes/dark/dark.icons.yml",
            "dark:\n  extractor: path\n  config: {sources: []}\n  template: t\n",
        );
        let registry = open_registry(dir.path(), Arc::new(NullCache), &["themes/*", "modules/*"]);

        let ids: Vec<String> = registry.get_definitions().unwrap().keys().cloned().collect();
        assert_eq!(ids, ["dark", "solid", "outline"]);
    }

    #[test]
    fn test_get_icons_merges_packs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        let registry = open_registry(dir.path(), Arc::new(NullCache), &["modules/kit"]);

        let icons = registry.get_icons(&[]).unwrap();
        assert_eq!(keys(&icons), ["solid:home", "solid:star", "outline:home"]);

        let filtered = registry.get_icons(&["outline"]).unwrap();
        assert_eq!(keys(&filtered), ["outline:home"]);

        let home = registry.get_icon("solid:home").unwrap().unwrap();
        assert_eq!(home.source(), Some("/modules/kit/icons/solid/home.svg"));
        assert_eq!(home.pack_label(), "Solid");
        assert!(registry.get_icon("solid:missing").unwrap().is_none());
    }

    #[test]
    fn test_get_icons_is_memoized() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        let registry = open_registry(dir.path(), Arc::new(NullCache), &["modules/kit"]);

        let first = registry.get_icons(&[]).unwrap();
        fs::remove_dir_all(dir.path().join("modules/kit/icons")).unwrap();
        let second = registry.get_icons(&[]).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    /// Iconify client counting collection requests.
    struct CountingIconify {
        calls: AtomicUsize,
    }

    impl IconifyClient for CountingIconify {
        fn api_url(&self) -> &str {
            "https://api.iconify.design"
        }

        fn collection(&self, _prefix: &str) -> Result<CollectionResponse, IconifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(CollectionResponse {
                categories: Some(json!({"Arrows": ["arrow-left", "arrow-right"]})),
                uncategorized: None,
            })
        }
    }

    #[test]
    fn test_concurrent_callers_share_one_discovery() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "modules/remote/remote.icons.yml",
            "remote:\n  extractor: iconify\n  config:\n    collections: [mdi]\n  template: t\n",
        );
        let client = Arc::new(CountingIconify {
            calls: AtomicUsize::new(0),
        });
        let config = RegistryConfig {
            root: dir.path().to_path_buf(),
            base_url: "/".to_owned(),
            extensions: vec!["modules/remote".to_owned()],
        };
        let extractors = Extractors::new(Arc::clone(&client) as Arc<dyn IconifyClient>);
        let registry = Arc::new(PackRegistry::new(Arc::new(NullCache), extractors, config));

        let results: Vec<Arc<IconMap>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let registry = Arc::clone(&registry);
                    scope.spawn(move || registry.get_icons(&[]).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(keys(&results[0]), ["remote:arrow-left", "remote:arrow-right"]);
        for icons in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], icons));
        }
    }

    #[test]
    fn test_aggregate_shared_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());

        let first = open_registry(dir.path(), Arc::clone(&cache), &["modules/kit"])
            .get_icons(&[])
            .unwrap();
        fs::remove_dir_all(dir.path().join("modules/kit/icons")).unwrap();
        let second = open_registry(dir.path(), Arc::clone(&cache), &["modules/kit"])
            .get_icons(&[])
            .unwrap();

        assert_eq!(*first, *second);
    }

    #[test]
    fn test_invalidate_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
        let registry = open_registry(dir.path(), Arc::clone(&cache), &["modules/kit"]);
        let other = open_registry(dir.path(), cache, &["modules/kit"]);

        assert_eq!(registry.get_icons(&[]).unwrap().len(), 3);
        assert_eq!(other.get_icons(&[]).unwrap().len(), 3);
        write(dir.path(), "modules/kit/icons/outline/star.svg", "<svg/>");
        assert_eq!(registry.get_icons(&[]).unwrap().len(), 3);

        registry.invalidate();
        assert_eq!(registry.get_icons(&[]).unwrap().len(), 4);
        assert_eq!(other.get_icons(&[]).unwrap().len(), 4);
    }

    #[test]
    fn test_failing_pack_is_left_out() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        write(
            dir.path(),
            "modules/broken/broken.icons.yml",
            "broken:\n  extractor: path\n  config: {}\n  template: t\nempty:\n  extractor: path\n  config:\n    sources: [missing.svg]\n  template: t\n",
        );
        let registry = open_registry(dir.path(), Arc::new(NullCache), &["modules/broken", "modules/kit"]);

        assert_eq!(registry.get_icons(&[]).unwrap().len(), 3);

        let err = registry.discover_pack("broken").unwrap_err();
        let RegistryError::Configuration(err) = err else {
            panic!("expected configuration error, got {err}");
        };
        assert_eq!(err.plugin_id(), Some("path"));
        assert!(registry.discover_pack("empty").unwrap().is_empty());
        assert!(matches!(
            registry.discover_pack("nope"),
            Err(RegistryError::UnknownPack(_))
        ));

        let report: Vec<(String, Option<usize>)> = registry
            .check()
            .unwrap()
            .into_iter()
            .map(|c| (c.pack_id, c.result.ok()))
            .collect();
        assert_eq!(
            report,
            [
                ("broken".to_owned(), None),
                ("empty".to_owned(), Some(0)),
                ("solid".to_owned(), Some(2)),
                ("outline".to_owned(), Some(1)),
            ]
        );
    }

    #[test]
    fn test_invalid_definition_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "modules/bad/bad.icons.yml",
            "bad:\n  config: {}\n  template: t\n",
        );
        let registry = open_registry(dir.path(), Arc::new(NullCache), &["modules/bad"]);

        let err = registry.get_definitions().unwrap_err();
        let RegistryError::Configuration(err) = err else {
            panic!("expected configuration error, got {err}");
        };
        assert_eq!(err.pack_id(), Some("bad"));
        assert!(registry.get_icons(&[]).is_err());
    }

    #[test]
    fn test_pack_options_and_forms() {
        let dir = tempfile::tempdir().unwrap();
        kit(dir.path());
        let registry = open_registry(dir.path(), Arc::new(NullCache), &["modules/kit"]);

        let options = registry.list_pack_options(true).unwrap();
        assert_eq!(options["solid"], "Solid - Filled glyphs");
        assert_eq!(options["outline"], "outline");
        assert_eq!(registry.list_pack_options(false).unwrap()["solid"], "Solid");

        let defaults = registry.get_extractor_form_defaults("solid").unwrap();
        assert_eq!(Value::Object(defaults), json!({"size": 24}));
        assert!(registry.get_extractor_form_defaults("nope").unwrap().is_empty());

        let Value::Object(values) = json!({"solid": {"color": "red"}}) else {
            unreachable!()
        };
        let forms = registry.get_extractor_plugin_forms(&[], &values).unwrap();
        let ids: Vec<&String> = forms.keys().collect();
        assert_eq!(ids, ["solid"]);
        assert_eq!(
            Value::Object(forms["solid"].values.clone()),
            json!({"size": 24, "color": "red"})
        );
        assert!(
            registry
                .get_extractor_plugin_forms(&["outline"], &Map::new())
                .unwrap()
                .is_empty()
        );
    }
}
