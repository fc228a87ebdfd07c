//! Configuration management.
//!
//! A collector is described by one TOML file: where the listing lives, how to
//! page through it, where per-item details live, and which numeric fields to
//! pull out of them. See [`CollectorConfig::sample_config`] for an annotated
//! example.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use statsweep_collect::{CollectionWalker, Collector, MetricAssembler};
use statsweep_core::FieldSpec;
use statsweep_fetch::{
    CancellationToken, DetailFetcher, DetailSpec, FetchContext, ListingSpec, Method, PageFetcher,
    RequestTemplate,
};

use crate::error::StoreError;

const SAMPLE_CONFIG: &str = r#"# Statsweep collector configuration.

# Measurement name written on every record.
name = "youtube"

# Seconds between cycles in `statsweep watch`.
interval_secs = 900

# Per-request timeout in seconds.
request_timeout_secs = 5

# Upper bound on listing pages per cycle.
max_pages = 1000

# Detail requests in flight at once. 1 fetches items one by one.
detail_concurrency = 1

# GET puts parameters in the query string, POST sends them as a form body.
method = "GET"

# API key, sent as the `api_key_param` parameter on every request.
# Leave empty to read it from `api_key_env` instead.
api_key = ""
api_key_param = "key"
api_key_env = "YOUTUBE_API_KEY"

[listing]
url = "https://www.googleapis.com/youtube/v3/playlistItems?part=snippet"
collection_param = "playlistId"
collection_id = "PLxxxxxxxxxxxxxxxx"
page_size = 5
page_size_param = "maxResults"
token_param = "pageToken"
token_path = "nextPageToken"
items_path = "items.#.snippet.resourceId.videoId"

[detail]
url = "https://www.googleapis.com/youtube/v3/videos?part=statistics,snippet"
id_param = "id"
tag_key = "videoId"

[[fields]]
name = "viewCount"
path = "items.#.statistics.viewCount"

[[fields]]
name = "likeCount"
path = "items.#.statistics.likeCount"

[[fields]]
name = "commentCount"
path = "items.#.statistics.commentCount"

# Extra parameters and headers added to every request.
[parameters]

[headers]
"#;

// ============================================================================
// Sections
// ============================================================================

/// Listing endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Listing endpoint URL. May carry fixed query parameters.
    pub url: String,
    /// Query parameter naming the collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_param: Option<String>,
    /// Collection identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    /// Requested page size.
    #[serde(default = "default_page_size", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Query parameter carrying the page size.
    #[serde(default = "default_page_size_param")]
    pub page_size_param: String,
    /// Query parameter carrying the continuation token.
    #[serde(default = "default_token_param")]
    pub token_param: String,
    /// Path of the continuation token in listing responses.
    #[serde(default = "default_token_path")]
    pub token_path: String,
    /// Path of the item identifiers in listing responses.
    #[serde(default = "default_items_path")]
    pub items_path: String,
}

/// Detail endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailConfig {
    /// Detail endpoint URL. May carry fixed query parameters.
    pub url: String,
    /// Query parameter carrying the item identifier.
    #[serde(default = "default_id_param")]
    pub id_param: String,
    /// Tag name under which the identifier is recorded.
    #[serde(default = "default_id_param")]
    pub tag_key: String,
}

fn default_name() -> String {
    "statsweep".to_string()
}

fn default_interval_secs() -> u64 {
    900
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_max_pages() -> usize {
    statsweep_collect::DEFAULT_MAX_PAGES
}

fn default_detail_concurrency() -> usize {
    1
}

fn default_api_key_param() -> String {
    "key".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_page_size() -> Option<u32> {
    Some(5)
}

fn default_page_size_param() -> String {
    "maxResults".to_string()
}

fn default_token_param() -> String {
    "pageToken".to_string()
}

fn default_token_path() -> String {
    "nextPageToken".to_string()
}

fn default_items_path() -> String {
    "items.#.id".to_string()
}

fn default_id_param() -> String {
    "id".to_string()
}

// ============================================================================
// Collector Config
// ============================================================================

/// Complete collector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Measurement name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Seconds between cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound on listing pages per cycle.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Detail requests in flight at once.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
    /// HTTP method for every request.
    #[serde(default)]
    pub method: Method,
    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Parameter the API key is sent in.
    #[serde(default = "default_api_key_param")]
    pub api_key_param: String,
    /// Environment variable consulted when `api_key` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Domains requests may go to. Empty allows any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_domains: Vec<String>,
    /// Listing endpoint.
    pub listing: ListingConfig,
    /// Detail endpoint.
    pub detail: DetailConfig,
    /// Fields extracted from each detail document.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Extra parameters sent with every request.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl CollectorConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("statsweep")
            .join("config.toml")
    }

    /// Loads and validates configuration from the default path.
    ///
    /// # Errors
    ///
    /// See [`CollectorConfig::load_from`].
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads and validates configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, not valid TOML,
    /// or fails [`CollectorConfig::validate`].
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found");
            return Err(StoreError::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        info!(path = %path.display(), fields = config.fields.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error.
    pub fn from_toml(content: &str) -> Result<Self, StoreError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, StoreError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Returns an annotated sample configuration.
    pub fn sample_config() -> &'static str {
        SAMPLE_CONFIG
    }

    /// Configuration for the YouTube Data API: every video of a playlist,
    /// with its public statistics.
    pub fn youtube_playlist(playlist_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let fields = [
            "viewCount",
            "likeCount",
            "dislikeCount",
            "favoriteCount",
            "commentCount",
        ]
        .into_iter()
        .map(|name| FieldSpec::new(name, format!("items.#.statistics.{name}")))
        .collect();

        Self {
            name: "youtube".to_string(),
            api_key: Some(api_key.into()),
            listing: ListingConfig {
                url: "https://www.googleapis.com/youtube/v3/playlistItems?part=snippet".to_string(),
                collection_param: Some("playlistId".to_string()),
                collection_id: Some(playlist_id.into()),
                items_path: "items.#.snippet.resourceId.videoId".to_string(),
                ..ListingConfig::new("")
            },
            detail: DetailConfig {
                url: "https://www.googleapis.com/youtube/v3/videos?part=statistics,snippet"
                    .to_string(),
                id_param: "id".to_string(),
                tag_key: "videoId".to_string(),
            },
            fields,
            allowed_domains: vec!["googleapis.com".to_string()],
            ..Self::new(ListingConfig::new(""), DetailConfig::new(""))
        }
    }

    /// Creates a configuration with defaults for everything but the endpoints.
    pub fn new(listing: ListingConfig, detail: DetailConfig) -> Self {
        Self {
            name: default_name(),
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_pages: default_max_pages(),
            detail_concurrency: default_detail_concurrency(),
            method: Method::default(),
            api_key: None,
            api_key_param: default_api_key_param(),
            api_key_env: None,
            allowed_domains: Vec::new(),
            listing,
            detail,
            fields: Vec::new(),
            parameters: BTreeMap::new(),
            headers: BTreeMap::new(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), StoreError> {
        Url::parse(&self.listing.url)
            .map_err(|e| StoreError::Config(format!("listing.url '{}': {e}", self.listing.url)))?;
        Url::parse(&self.detail.url)
            .map_err(|e| StoreError::Config(format!("detail.url '{}': {e}", self.detail.url)))?;

        if self.fields.is_empty() {
            return Err(StoreError::Config("at least one field is required".to_string()));
        }
        let mut names = HashSet::new();
        for field in &self.fields {
            field.validate()?;
            if !names.insert(field.name.as_str()) {
                return Err(StoreError::Config(format!("duplicate field '{}'", field.name)));
            }
        }

        for (key, path) in [
            ("listing.items_path", &self.listing.items_path),
            ("listing.token_path", &self.listing.token_path),
        ] {
            FieldSpec::new(key, path.as_str()).validate()?;
        }

        if self.listing.collection_param.is_some() != self.listing.collection_id.is_some() {
            return Err(StoreError::Config(
                "listing.collection_param and listing.collection_id must be set together"
                    .to_string(),
            ));
        }
        if self.listing.page_size == Some(0) {
            return Err(StoreError::Config("listing.page_size must be positive".to_string()));
        }
        if self.max_pages == 0 {
            return Err(StoreError::Config("max_pages must be at least 1".to_string()));
        }
        if self.detail_concurrency == 0 {
            return Err(StoreError::Config("detail_concurrency must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(StoreError::Config("request_timeout_secs must be positive".to_string()));
        }
        if self.interval_secs == 0 {
            return Err(StoreError::Config("interval_secs must be positive".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(StoreError::Config("name must not be empty".to_string()));
        }

        Ok(())
    }

    /// Returns the API key from the config, falling back to `api_key_env`.
    pub fn resolved_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Some(key.to_string());
        }
        let var = self.api_key_env.as_deref()?;
        std::env::var(var).ok().filter(|k| !k.is_empty())
    }

    /// Returns a copy with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            config.api_key = Some("********".to_string());
        }
        config
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Cycle interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Builds the request template shared by listing and detail requests.
    ///
    /// The API key is registered as a secret parameter so it never shows up
    /// in error messages or request spans.
    pub fn request_template(&self) -> RequestTemplate {
        let mut template = RequestTemplate::new(self.method);
        for (name, value) in &self.parameters {
            template = template.with_parameter(name.as_str(), value.as_str());
        }
        for (name, value) in &self.headers {
            template = template.with_header(name.as_str(), value.as_str());
        }
        if let Some(key) = self.resolved_api_key() {
            template = template.with_secret_parameter(self.api_key_param.as_str(), key);
        }
        template
    }

    /// Builds the listing spec.
    pub fn listing_spec(&self) -> ListingSpec {
        let listing = &self.listing;
        let mut spec = ListingSpec::new(listing.url.as_str(), listing.items_path.as_str());
        if let (Some(param), Some(id)) = (&listing.collection_param, &listing.collection_id) {
            spec = spec.with_collection(param.as_str(), id.as_str());
        }
        spec.page_size = listing.page_size;
        spec.page_size_param.clone_from(&listing.page_size_param);
        spec.token_param.clone_from(&listing.token_param);
        spec.token_path.clone_from(&listing.token_path);
        spec
    }

    /// Builds the detail spec.
    pub fn detail_spec(&self) -> DetailSpec {
        DetailSpec::new(self.detail.url.as_str(), self.detail.id_param.as_str())
    }

    /// Builds a collector for this configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error.
    pub fn build_collector(&self) -> Result<Collector, StoreError> {
        self.validate()?;
        let template = self.request_template();

        let walker = CollectionWalker::new(PageFetcher::new(self.listing_spec(), template.clone()))
            .with_max_pages(self.max_pages);
        let assembler = MetricAssembler::new(
            DetailFetcher::new(self.detail_spec(), template),
            self.fields.clone(),
            self.name.as_str(),
            self.detail.tag_key.as_str(),
        );

        Ok(Collector::new(walker, assembler).with_concurrency(self.detail_concurrency))
    }

    /// Builds a fetch context over HTTP with this configuration's timeout
    /// and domain allowlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn fetch_context(&self, cancel: CancellationToken) -> Result<FetchContext, StoreError> {
        let mut builder = FetchContext::builder()
            .timeout(self.request_timeout())
            .cancel_token(cancel);
        if !self.allowed_domains.is_empty() {
            builder = builder.allowed_domains(self.allowed_domains.clone());
        }
        Ok(builder.build()?)
    }
}

impl ListingConfig {
    /// Creates a listing section with default parameter names.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            collection_param: None,
            collection_id: None,
            page_size: default_page_size(),
            page_size_param: default_page_size_param(),
            token_param: default_token_param(),
            token_path: default_token_path(),
            items_path: default_items_path(),
        }
    }
}

impl DetailConfig {
    /// Creates a detail section with default parameter names.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id_param: default_id_param(),
            tag_key: default_id_param(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[listing]
url = "https://api.example.com/items"

[detail]
url = "https://api.example.com/item"

[[fields]]
name = "views"
path = "stats.views"
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = CollectorConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "statsweep");
        assert_eq!(config.interval_secs, 900);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.interval(), Duration::from_secs(900));
        assert_eq!(config.max_pages, 1000);
        assert_eq!(config.detail_concurrency, 1);
        assert_eq!(config.method, Method::Get);
        assert_eq!(config.listing.page_size, Some(5));
        assert_eq!(config.listing.token_path, "nextPageToken");
        assert_eq!(config.detail.tag_key, "id");
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = CollectorConfig::from_toml(CollectorConfig::sample_config()).unwrap();
        assert_eq!(config.name, "youtube");
        assert_eq!(config.fields.len(), 3);
        assert_eq!(config.detail.tag_key, "videoId");
    }

    #[test]
    fn test_youtube_preset() {
        let config = CollectorConfig::youtube_playlist("PL123", "secret");
        assert!(config.validate().is_ok());
        assert_eq!(config.fields.len(), 5);

        let listing = config.listing_spec();
        assert_eq!(listing.collection_id.as_deref(), Some("PL123"));
        assert_eq!(listing.items_path, "items.#.snippet.resourceId.videoId");

        let request = config
            .request_template()
            .build(&config.detail.url, &[("id", "abc")])
            .unwrap();
        assert_eq!(request.query_param("key").as_deref(), Some("secret"));
        assert_eq!(request.query_param("part").as_deref(), Some("statistics,snippet"));
    }

    #[test]
    fn test_validation_failures() {
        let base = CollectorConfig::from_toml(MINIMAL).unwrap();

        let mut config = base.clone();
        config.fields.clear();
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));

        let mut config = base.clone();
        config.fields.push(FieldSpec::new("views", "other"));
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));

        let mut config = base.clone();
        config.fields[0].path = "stats..views".to_string();
        assert!(matches!(config.validate(), Err(StoreError::Core(_))));

        let mut config = base.clone();
        config.listing.url = "not a url".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("listing.url"));

        let mut config = base.clone();
        config.max_pages = 0;
        assert!(config.validate().is_err());

        let mut config = base;
        config.listing.collection_param = Some("playlistId".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_method_rejected() {
        let content = format!("method = \"DELETE\"\n{MINIMAL}");
        assert!(matches!(
            CollectorConfig::from_toml(&content),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn test_api_key_and_parameters_in_template() {
        let mut config = CollectorConfig::from_toml(MINIMAL).unwrap();
        config.api_key = Some("k1".to_string());
        config.api_key_param = "apikey".to_string();
        config.parameters.insert("part".to_string(), "statistics".to_string());
        config.headers.insert("Accept".to_string(), "application/json".to_string());

        let request = config
            .request_template()
            .build("https://api.example.com/item", &[])
            .unwrap();
        assert_eq!(request.query_param("apikey").as_deref(), Some("k1"));
        assert_eq!(request.query_param("part").as_deref(), Some("statistics"));
        assert!(request.headers.iter().any(|(k, _)| k == "Accept"));
        assert!(!request.display_url().contains("k1"));
        assert!(request.display_url().contains("part=statistics"));
    }

    #[test]
    fn test_redacted_hides_key() {
        let config = CollectorConfig::youtube_playlist("PL1", "secret");
        let shown = config.redacted().to_toml().unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("********"));
    }

    #[test]
    fn test_build_collector_applies_limits() {
        let mut config = CollectorConfig::from_toml(MINIMAL).unwrap();
        config.max_pages = 7;
        let collector = config.build_collector().unwrap();
        assert_eq!(collector.walker().max_pages(), 7);
        assert_eq!(collector.assembler().fields().len(), 1);
    }
}
