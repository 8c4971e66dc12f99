//! CLI command implementations.

mod check;
mod clear_cache;
mod list;
mod packs;
mod search;
mod show;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use icons_cache::{Cache, FileCache, MemoryCache};
use icons_config::{CliSettings, Config};
use icons_core::{Extractors, HttpIconifyClient};
use icons_registry::{PackRegistry, RegistryConfig};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use clear_cache::ClearCacheArgs;
pub(crate) use list::ListArgs;
pub(crate) use packs::PacksArgs;
pub(crate) use search::SearchArgs;
pub(crate) use show::ShowArgs;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover icons.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Application root (overrides config).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Iconify API URL (overrides config).
    #[arg(long, global = true, env = "ICONIFY_API_URL")]
    iconify_url: Option<String>,

    /// Disable the persistent cache.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load the configuration with command-line overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            root: self.root.clone(),
            cache_enabled: self.no_cache.then_some(false),
            iconify_url: self.iconify_url.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Build the registry described by the configuration.
    pub(crate) fn open_registry(&self) -> Result<(Config, Arc<PackRegistry>), CliError> {
        let config = self.load_config()?;
        tracing::info!(
            config = ?config.config_path,
            root = %config.root_resolved.display(),
            cache = config.cache_resolved.enabled,
            "Loaded configuration"
        );
        let registry = Arc::new(registry_from_config(&config));
        Ok((config, registry))
    }
}

/// Wire cache, extractors and registry from `config`.
pub(crate) fn registry_from_config(config: &Config) -> PackRegistry {
    let cache: Arc<dyn Cache> = if config.cache_resolved.enabled {
        Arc::new(FileCache::new(config.cache_resolved.dir.clone(), VERSION))
    } else {
        Arc::new(MemoryCache::new())
    };
    let iconify = HttpIconifyClient::new(&config.iconify.api_url, config.iconify.timeout());
    let registry_config = RegistryConfig {
        root: config.root_resolved.clone(),
        base_url: config.base_url.clone(),
        extensions: config.extensions.clone(),
    };
    PackRegistry::new(cache, Extractors::new(Arc::new(iconify)), registry_config)
}
