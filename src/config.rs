//! Client configuration

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{NewznabError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Construction-time settings for a [`crate::NewznabClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Indexer base URL (e.g. "https://api.nzbgeek.info"); `/api` and `/rss`
    /// are appended per request
    pub base_url: String,

    /// API key sent as `apikey` (search) or `r` (rss)
    pub api_key: String,

    /// Numeric account id, only needed for `/rss` polling
    pub user_id: Option<i64>,

    /// Skip TLS certificate verification (self-signed indexer proxies)
    pub insecure_skip_verify: bool,

    /// Add `extended=1` to every request
    pub extended_attributes: bool,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            user_id: None,
            insecure_skip_verify: false,
            extended_attributes: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_verify = insecure;
        self
    }

    pub fn with_extended_attributes(mut self, extended: bool) -> Self {
        self.extended_attributes = extended;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from `NEWZNAB_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("NEWZNAB_URL")
            .ok_or_else(|| NewznabError::config("NEWZNAB_URL is required"))?;
        let api_key = lookup("NEWZNAB_API_KEY")
            .ok_or_else(|| NewznabError::config("NEWZNAB_API_KEY is required"))?;

        let user_id = lookup("NEWZNAB_USER_ID")
            .map(|v| {
                v.trim()
                    .parse()
                    .map_err(|_| NewznabError::config(format!("Invalid NEWZNAB_USER_ID: {}", v)))
            })
            .transpose()?;

        let timeout_secs = match lookup("NEWZNAB_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| {
                NewznabError::config(format!("Invalid NEWZNAB_TIMEOUT_SECS: {}", v))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false)
        };

        let config = Self {
            base_url,
            api_key,
            user_id,
            insecure_skip_verify: flag("NEWZNAB_INSECURE"),
            extended_attributes: flag("NEWZNAB_EXTENDED"),
            timeout: Duration::from_secs(timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the base URL and credentials before any request is built
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(NewznabError::config("API key is required"));
        }
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NewznabError::config(format!(
                "unsupported URL scheme: {}",
                url.scheme()
            )));
        }
        Ok(())
    }
}
