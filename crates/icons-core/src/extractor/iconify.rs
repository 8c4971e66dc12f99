//! Icons listed by the Iconify API.

use std::sync::Arc;
use std::time::Duration;

use icons_finder::IconFinder;
use serde::Deserialize;
use serde_json::Value;
use ureq::Agent;

use super::{IconMap, PackExtractor, base_data, push_icon, string_list};
use crate::definition::PackDefinition;
use crate::error::ConfigurationError;

/// Public Iconify API.
const DEFAULT_API_URL: &str = "https://api.iconify.design";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 10;

/// Iconify API failure. Never fatal to discovery.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IconifyError {
    /// Transport-level failure.
    #[error("HTTP error")]
    Http(#[from] ureq::Error),

    /// The API answered with an error status.
    #[error("HTTP {status}: {body}")]
    HttpResponse {
        /// Status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

/// Body of the `/collection` endpoint.
///
/// `categories` is either an object of named icon lists or a list of lists.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CollectionResponse {
    #[serde(default)]
    pub categories: Option<Value>,
    #[serde(default)]
    pub uncategorized: Option<Vec<Value>>,
}

impl CollectionResponse {
    /// Icon names with their category, in response order.
    ///
    /// When categories are present only categorized icons are returned.
    /// Non-string names are dropped.
    #[must_use]
    pub fn icon_names(&self) -> Vec<(String, Option<String>)> {
        fn names(list: &Value) -> impl Iterator<Item = String> + '_ {
            list.as_array()
                .into_iter()
                .flatten()
                .filter_map(|v| v.as_str().map(str::to_owned))
        }

        match &self.categories {
            Some(Value::Object(categories)) => categories
                .iter()
                .flat_map(|(category, list)| names(list).map(move |n| (n, Some(category.clone()))))
                .collect(),
            Some(Value::Array(lists)) => lists
                .iter()
                .flat_map(|list| names(list).map(|n| (n, None)))
                .collect(),
            _ => self
                .uncategorized
                .iter()
                .flatten()
                .filter_map(|v| v.as_str().map(|n| (n.to_owned(), None)))
                .collect(),
        }
    }
}

/// Access to Iconify collection listings.
pub trait IconifyClient: Send + Sync {
    /// Base URL used to build icon sources.
    fn api_url(&self) -> &str;

    /// List the icons of collection `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`IconifyError`] on transport failure or error status.
    fn collection(&self, prefix: &str) -> Result<CollectionResponse, IconifyError>;
}

/// [`IconifyClient`] over HTTP.
pub struct HttpIconifyClient {
    agent: Agent,
    api_url: String,
}

impl HttpIconifyClient {
    /// Create a client for `api_url` with the given request timeout.
    #[must_use]
    pub fn new(api_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for HttpIconifyClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_secs(DEFAULT_TIMEOUT))
    }
}

impl IconifyClient for HttpIconifyClient {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn collection(&self, prefix: &str) -> Result<CollectionResponse, IconifyError> {
        let url = format!("{}/collection", self.api_url);
        tracing::debug!(prefix, "fetching iconify collection");

        let response = self
            .agent
            .get(&url)
            .query("prefix", prefix)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(IconifyError::HttpResponse { status, body });
        }

        Ok(body_reader.read_json()?)
    }
}

/// One icon per name of each collection in `config.collections`.
pub struct IconifyExtractor {
    client: Arc<dyn IconifyClient>,
}

impl IconifyExtractor {
    #[must_use]
    pub fn new(client: Arc<dyn IconifyClient>) -> Self {
        Self { client }
    }
}

impl PackExtractor for IconifyExtractor {
    fn id(&self) -> &'static str {
        "iconify"
    }

    fn discover(
        &self,
        pack: &PackDefinition,
        _finder: &mut IconFinder,
    ) -> Result<IconMap, ConfigurationError> {
        let collections = string_list(pack, self.id(), "collections")?;
        let api_url = self.client.api_url().trim_end_matches('/');

        let mut icons = IconMap::new();
        for collection in &collections {
            let response = match self.client.collection(collection) {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(pack = %pack.id, collection, error = %e, "iconify request failed");
                    continue;
                }
            };
            for (name, category) in response.icon_names() {
                let source = format!("{api_url}/{collection}/{name}.svg");
                let mut data = base_data(pack);
                data.insert("collection".to_owned(), Value::from(collection.as_str()));
                push_icon(&mut icons, pack, &name, Some(source), category, data)?;
            }
        }
        Ok(icons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::test_support::pack;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;

    struct FakeClient {
        collections: HashMap<&'static str, Value>,
    }

    impl IconifyClient for FakeClient {
        fn api_url(&self) -> &str {
            "https://icons.test/"
        }

        fn collection(&self, prefix: &str) -> Result<CollectionResponse, IconifyError> {
            match self.collections.get(prefix) {
                Some(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
                None => Err(IconifyError::HttpResponse {
                    status: 404,
                    body: "404".to_owned(),
                }),
            }
        }
    }

    fn extractor() -> IconifyExtractor {
        let collections = HashMap::from([
            (
                "mdi",
                json!({
                    "categories": {"Home": ["home", "door"], "Misc": ["star", 42]},
                    "uncategorized": ["ignored"],
                }),
            ),
            ("flat", json!({"uncategorized": ["one", null, "two"]})),
            ("lists", json!({"categories": [["a"], ["b", "c"]]})),
        ]);
        IconifyExtractor::new(Arc::new(FakeClient { collections }))
    }

    fn discover(collections: &str) -> IconMap {
        let dir = TempDir::new().unwrap();
        let pack = pack(
            dir.path(),
            &format!(
                "remote:\n  extractor: iconify\n  template: t\n  config:\n    collections: {collections}\n"
            ),
        );
        let mut finder = IconFinder::new(dir.path(), "/");
        extractor().discover(&pack, &mut finder).unwrap()
    }

    fn ids(icons: &IconMap) -> Vec<&str> {
        icons.values().map(|i| i.icon_id()).collect()
    }

    #[test]
    fn test_categories_exclude_uncategorized() {
        let icons = discover("[mdi]");
        assert_eq!(ids(&icons), ["home", "door", "star"]);
        assert_eq!(
            icons["remote:home"].source(),
            Some("https://icons.test/mdi/home.svg")
        );
        assert_eq!(icons["remote:home"].group(), Some("Home"));
    }

    #[test]
    fn test_uncategorized_only() {
        assert_eq!(ids(&discover("[flat]")), ["one", "two"]);
    }

    #[test]
    fn test_category_lists() {
        assert_eq!(ids(&discover("[lists]")), ["a", "b", "c"]);
    }

    #[test]
    fn test_failed_collection_is_skipped() {
        assert_eq!(ids(&discover("[missing, flat]")), ["one", "two"]);
    }

    #[test]
    fn test_missing_collections_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pack = pack(dir.path(), "remote:\n  extractor: iconify\n  template: t\n  config: {}\n");
        let mut finder = IconFinder::new(dir.path(), "/");
        let err = extractor().discover(&pack, &mut finder).unwrap_err();
        assert_eq!(err.plugin_id(), Some("iconify"));
    }
}
