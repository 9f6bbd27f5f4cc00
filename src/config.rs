//! Client configuration
//!
//! Configuration is read from YAML. Every section and field has a default, so
//! an empty document is a valid config:
//!
//! ```yaml
//! api:
//!   base_url: https://api.github.com
//!   token: ghp_example
//!   api_version: "2022-11-28"
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   backoff: exponential
//!   rate_limit:
//!     requests_per_second: 10
//!     burst_size: 10
//! fetch:
//!   default_pages: 2
//!   max_pages: 5
//!   concurrency: 4
//!   error_policy: partial
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{
    ErrorPolicy, FetchOptions, PageOrdering, DEFAULT_CONCURRENCY, GITHUB_ACCEPT,
};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Pages fetched when the caller does not ask for a count
pub const DEFAULT_PAGES: u32 = 2;

/// Upper bound on pages per fetch
pub const MAX_PAGES: u32 = 5;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint and credentials
    #[serde(default)]
    pub api: ApiSettings,

    /// HTTP client behaviour
    #[serde(default)]
    pub http: HttpSettings,

    /// Paginated fetch behaviour
    #[serde(default)]
    pub fetch: FetchSettings,
}

impl Config {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.api.base_url()?;

        if self.fetch.max_pages == 0 {
            return Err(Error::invalid_value("fetch.max_pages", "must be at least 1"));
        }
        if self.fetch.default_pages > self.fetch.max_pages {
            return Err(Error::invalid_value(
                "fetch.default_pages",
                format!(
                    "{} exceeds max_pages ({})",
                    self.fetch.default_pages, self.fetch.max_pages
                ),
            ));
        }
        if self.fetch.concurrency == 0 {
            return Err(Error::invalid_value("fetch.concurrency", "must be at least 1"));
        }
        if self.fetch.per_page == Some(0) {
            return Err(Error::invalid_value("fetch.per_page", "must be at least 1"));
        }
        Ok(())
    }

    /// The configured token, if any
    pub fn token(&self) -> Option<String> {
        self.api.token.clone().none_if_empty()
    }

    /// HTTP client configuration derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );

        builder = match &self.http.rate_limit {
            Some(rate_limit) => builder.rate_limit(rate_limit.clone()),
            None => builder.no_rate_limit(),
        };
        if let Some(version) = &self.api.api_version {
            builder = builder.header("X-GitHub-Api-Version", version.as_str());
        }
        if let Some(agent) = &self.api.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        builder.build()
    }
}

// ============================================================================
// API Settings
// ============================================================================

/// API endpoint and credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// API root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,

    /// `Accept` header sent with every request
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Value for the `X-GitHub-Api-Version` header
    #[serde(default)]
    pub api_version: Option<String>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            accept: default_accept(),
            api_version: None,
            user_agent: None,
        }
    }
}

impl ApiSettings {
    /// Parsed base URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(Error::invalid_value(
                "api.base_url",
                format!("'{}' cannot be a base URL", self.base_url),
            ));
        }
        Ok(url)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_accept() -> String {
    GITHUB_ACCEPT.to_string()
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit: default_rate_limit(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Paginated fetch behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Pages fetched when none are requested
    #[serde(default = "default_pages")]
    pub default_pages: u32,

    /// Ceiling on requested pages
    #[serde(default = "max_pages")]
    pub max_pages: u32,

    /// Optional `per_page` query value
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Page requests in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Whole-fetch deadline in seconds
    #[serde(default)]
    pub deadline_secs: Option<u64>,

    /// Failure policy
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Combined result ordering
    #[serde(default)]
    pub ordering: PageOrdering,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            default_pages: default_pages(),
            max_pages: max_pages(),
            per_page: None,
            concurrency: default_concurrency(),
            deadline_secs: None,
            error_policy: ErrorPolicy::default(),
            ordering: PageOrdering::default(),
        }
    }
}

impl FetchSettings {
    /// Resolve a requested page count against the default and ceiling
    pub fn clamp_pages(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_pages)
            .min(self.max_pages)
    }

    /// Fetch options derived from these settings
    pub fn fetch_options(&self) -> FetchOptions {
        let mut options = FetchOptions::new()
            .concurrency(self.concurrency)
            .error_policy(self.error_policy)
            .ordering(self.ordering);
        if let Some(per_page) = self.per_page {
            options = options.per_page(per_page);
        }
        if let Some(secs) = self.deadline_secs {
            options = options.deadline(Duration::from_secs(secs));
        }
        options
    }
}

fn default_pages() -> u32 {
    DEFAULT_PAGES
}

fn max_pages() -> u32 {
    MAX_PAGES
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.accept, GITHUB_ACCEPT);
        assert_eq!(config.fetch.default_pages, 2);
        assert_eq!(config.fetch.max_pages, 5);
        assert!(config.token().is_none());
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
api:
  base_url: https://ghe.example.com/api/v3
  token: ghp_abc
  api_version: "2022-11-28"
http:
  timeout_secs: 10
  max_retries: 1
  backoff: linear
  rate_limit: null
fetch:
  default_pages: 1
  max_pages: 3
  per_page: 50
  concurrency: 2
  deadline_secs: 20
  error_policy: fail_on_any
  ordering: arrival
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.token().as_deref(), Some("ghp_abc"));
        assert_eq!(
            config.api.base_url().unwrap().as_str(),
            "https://ghe.example.com/api/v3"
        );
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert!(config.http.rate_limit.is_none());

        let http = config.http_client_config();
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(http.max_retries, 1);
        assert!(http.rate_limit.is_none());
        assert_eq!(
            http.default_headers.get("X-GitHub-Api-Version"),
            Some(&"2022-11-28".to_string())
        );

        let options = config.fetch.fetch_options();
        assert_eq!(options.concurrency, 2);
        assert_eq!(options.per_page, Some(50));
        assert_eq!(options.deadline, Some(Duration::from_secs(20)));
        assert_eq!(options.error_policy, ErrorPolicy::FailOnAny);
        assert_eq!(options.ordering, PageOrdering::Arrival);
    }

    #[test]
    fn test_empty_token_is_none() {
        let config = Config::from_yaml("api:\n  token: \"\"\n").unwrap();
        assert!(config.token().is_none());
    }

    #[test]
    fn test_clamp_pages() {
        let settings = FetchSettings::default();
        assert_eq!(settings.clamp_pages(None), 2);
        assert_eq!(settings.clamp_pages(Some(3)), 3);
        assert_eq!(settings.clamp_pages(Some(50)), 5);
        assert_eq!(settings.clamp_pages(Some(0)), 0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = Config::from_yaml("fetch:\n  default_pages: 9\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "fetch.default_pages"));

        let err = Config::from_yaml("fetch:\n  concurrency: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "fetch.concurrency"));

        let err = Config::from_yaml("fetch:\n  max_pages: 0\n  default_pages: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "fetch.max_pages"));

        let err = Config::from_yaml("api:\n  base_url: not a url\n").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = Config::from_yaml("api:\n  base_url: \"mailto:x@example.com\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "api.base_url"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = Config::from_yaml("fetch: [unclosed").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fetch:\n  max_pages: 4").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.fetch.max_pages, 4);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
