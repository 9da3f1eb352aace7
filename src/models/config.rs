//! Application configuration structures.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SiteSelectors;
use crate::services::parse_selector;

/// Environment variable that overrides `proximity.api_key`.
pub const API_KEY_ENV: &str = "PARKSCOUT_API_KEY";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory site location
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Location-search API settings
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// Persistent cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Markup selectors for the extractors
    #[serde(default)]
    pub selectors: SiteSelectors,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    ///
    /// A missing file is expected and only logged at debug level.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(AppError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path.as_ref());
                Self::default()
            }
            Err(e) => {
                log::warn!(
                    "Config load failed from {:?}: {}. Using defaults.",
                    path.as_ref(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.proximity.api_key = key.trim().to_string();
            }
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.site.origin_url()?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.proximity.endpoint.trim().is_empty() {
            return Err(AppError::config("proximity.endpoint is empty"));
        }
        Url::parse(&self.proximity.endpoint)?;
        if self.proximity.radius == 0 {
            return Err(AppError::config("proximity.radius must be > 0"));
        }
        if self.proximity.max_matches == 0 {
            return Err(AppError::config("proximity.max_matches must be > 0"));
        }
        if let FlushPolicy::Deferred { max_pending: 0 } = self.cache.flush {
            return Err(AppError::config(
                "cache.flush.max_pending must be > 0",
            ));
        }
        for (name, selector) in self.selectors.all() {
            parse_selector(selector).map_err(|e| {
                AppError::config(format!("selectors.{name}: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Where the parks directory lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host that relative links are resolved against
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// Path of the index page listing every region
    #[serde(default = "defaults::index_path")]
    pub index_path: String,
}

impl SiteConfig {
    pub fn origin_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.origin)?)
    }

    /// Absolute URL of the index page.
    pub fn index_url(&self) -> Result<String> {
        Ok(self.origin_url()?.join(&self.index_path)?.to_string())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: defaults::origin(),
            index_path: defaults::index_path(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// Location-search (radius search) API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    /// Search radius around the postal code
    #[serde(default = "defaults::radius")]
    pub radius: u32,

    #[serde(default = "defaults::max_matches")]
    pub max_matches: u32,

    #[serde(default = "defaults::ambiguities")]
    pub ambiguities: String,

    #[serde(default = "defaults::out_format")]
    pub out_format: String,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            api_key: String::new(),
            radius: defaults::radius(),
            max_matches: defaults::max_matches(),
            ambiguities: defaults::ambiguities(),
            out_format: defaults::out_format(),
        }
    }
}

/// Persistent cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache document location
    #[serde(default = "defaults::cache_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub flush: FlushPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: defaults::cache_path(),
            flush: FlushPolicy::default(),
        }
    }
}

/// When cache writes reach the disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FlushPolicy {
    /// Rewrite the whole document after every write
    #[default]
    Always,

    /// Rewrite once `max_pending` writes have accumulated, and on drop
    Deferred { max_pending: usize },
}

mod defaults {
    use std::path::PathBuf;

    pub fn origin() -> String {
        "https://www.nps.gov".into()
    }
    pub fn index_path() -> String {
        "/index.htm".into()
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; parkscout/0.1)".into()
    }

    pub fn endpoint() -> String {
        "http://www.mapquestapi.com/search/v2/radius".into()
    }
    pub fn radius() -> u32 {
        10
    }
    pub fn max_matches() -> u32 {
        10
    }
    pub fn ambiguities() -> String {
        "ignore".into()
    }
    pub fn out_format() -> String {
        "json".into()
    }

    pub fn cache_path() -> PathBuf {
        PathBuf::from("parkscout_cache.json")
    }
}
