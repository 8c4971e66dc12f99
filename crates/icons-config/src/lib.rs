//! Configuration management for icon pack discovery.
//!
//! Parses `icons.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `root`
//! - `base_url`
//! - `iconify.api_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the application root.
    pub root: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override the Iconify API URL.
    pub iconify_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "icons.toml";

/// Default Iconify API endpoint.
pub const DEFAULT_ICONIFY_URL: &str = "https://api.iconify.design";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application root as written in the file (relative to the config file).
    root: Option<String>,
    /// Prefix for generated icon URLs.
    pub base_url: String,
    /// Extension directories (relative to the root) holding `<name>.icons.yml`.
    pub extensions: Vec<String>,
    /// Persistent cache configuration.
    cache: CacheConfigRaw,
    /// Iconify API configuration.
    pub iconify: IconifyConfig,
    /// Search configuration.
    pub search: SearchConfig,

    /// Resolved application root (set after loading).
    #[serde(skip)]
    pub root_resolved: PathBuf,
    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw cache configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved cache configuration with absolute paths.
#[derive(Debug, Default)]
pub struct CacheConfig {
    /// Whether the on-disk cache is used.
    pub enabled: bool,
    /// Cache directory.
    pub dir: PathBuf,
}

/// Iconify API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IconifyConfig {
    /// Base URL of the Iconify API.
    pub api_url: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl IconifyConfig {
    /// HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for IconifyConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ICONIFY_URL.to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Search configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default maximum number of search results.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 20 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`iconify.api_url`").
        field: String,
        /// Error message (e.g., "${`ICONIFY_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `icons.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.root {
            self.root_resolved.clone_from(root);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(url) = &settings.iconify_url {
            self.iconify.api_url.clone_from(url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            root: None,
            base_url: "/".to_owned(),
            extensions: Vec::new(),
            cache: CacheConfigRaw::default(),
            iconify: IconifyConfig::default(),
            search: SearchConfig::default(),
            root_resolved: base.to_path_buf(),
            cache_resolved: CacheConfig {
                enabled: true,
                dir: base.join(".icons").join("cache"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "base_url")?;
        require_non_empty(&self.iconify.api_url, "iconify.api_url")?;
        require_http_url(&self.iconify.api_url, "iconify.api_url")?;
        if self.iconify.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "iconify.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::Validation(
                "search.max_results must be greater than 0".to_owned(),
            ));
        }
        for ext in &self.extensions {
            require_non_empty(ext, "extensions")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.root {
            self.root = Some(expand::expand_env(root, "root")?);
        }
        self.base_url = expand::expand_env(&self.base_url, "base_url")?;
        self.iconify.api_url = expand::expand_env(&self.iconify.api_url, "iconify.api_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.root_resolved = config_dir.join(self.root.as_deref().unwrap_or("."));
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: config_dir.join(self.cache.dir.as_deref().unwrap_or(".icons/cache")),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));
        assert_eq!(config.root_resolved, PathBuf::from("/site"));
        assert_eq!(config.base_url, "/");
        assert!(config.extensions.is_empty());
        assert!(config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.dir, PathBuf::from("/site/.icons/cache"));
        assert_eq!(config.iconify.api_url, DEFAULT_ICONIFY_URL);
        assert_eq!(config.iconify.timeout(), Duration::from_secs(30));
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("", Path::new("/site")).unwrap();
        assert_eq!(config.root_resolved, PathBuf::from("/site/."));
        assert_eq!(config.base_url, "/");
        assert!(config.cache_resolved.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
root = "web"
base_url = "/sites/default/"
extensions = ["modules/ui_kit", "themes/olivero"]

[cache]
enabled = false
dir = "var/cache"

[iconify]
api_url = "http://localhost:3000"
timeout_secs = 5

[search]
max_results = 50
"#;
        let config = Config::from_toml_str(toml, Path::new("/srv")).unwrap();
        assert_eq!(config.root_resolved, PathBuf::from("/srv/web"));
        assert_eq!(config.base_url, "/sites/default/");
        assert_eq!(config.extensions, vec!["modules/ui_kit", "themes/olivero"]);
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.dir, PathBuf::from("/srv/var/cache"));
        assert_eq!(config.iconify.api_url, "http://localhost:3000");
        assert_eq!(config.iconify.timeout_secs, 5);
        assert_eq!(config.search.max_results, 50);
    }

    #[test]
    fn test_invalid_iconify_url_rejected() {
        let toml = "[iconify]\napi_url = \"ftp://example.com\"\n";
        let err = Config::from_toml_str(toml, Path::new("/srv")).unwrap_err();
        assert!(err.to_string().contains("iconify.api_url must start with http"));
    }

    #[test]
    fn test_zero_max_results_rejected() {
        let toml = "[search]\nmax_results = 0\n";
        let err = Config::from_toml_str(toml, Path::new("/srv")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_env_expansion_with_default() {
        let toml = "base_url = \"${ICONS_TEST_UNSET_BASE:-/cdn/}\"\n";
        let config = Config::from_toml_str(toml, Path::new("/srv")).unwrap();
        assert_eq!(config.base_url, "/cdn/");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/definitely/not/icons.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_applies_cli_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("icons.toml");
        std::fs::write(&path, "extensions = [\"modules/a\"]\n").unwrap();

        let settings = CliSettings {
            root: Some(PathBuf::from("/override")),
            cache_enabled: Some(false),
            iconify_url: None,
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.root_resolved, PathBuf::from("/override"));
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }
}
