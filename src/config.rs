use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::i18n::Language;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend REST API, including the `/api` prefix
    pub backend_url: String,
    /// Address the web server binds to
    pub listen: String,
    /// Backend request timeout in seconds
    pub request_timeout: u64,
    /// Automatic retries for data fetches; mutations are never retried
    pub fetch_retries: u32,
    /// Seconds a cached backend response stays fresh
    pub cache_ttl: u64,
    pub language: Language,
    pub fallback_language: Language,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    /// Articles per page on the all-articles view
    pub page_size: u32,
    /// Articles shown on the landing page
    pub landing_limit: u32,
    /// Characters kept from an article summary
    pub truncate_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000/api".to_string(),
            listen: "0.0.0.0:3000".to_string(),
            request_timeout: 30,
            fetch_retries: 1,
            cache_ttl: 30,
            language: Language::Fa,
            fallback_language: Language::En,
            display: DisplayConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 15,
            landing_limit: 12,
            truncate_length: crate::text::DEFAULT_SUMMARY_LENGTH,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.backend_url.trim().is_empty() {
            anyhow::bail!("backend_url must not be empty");
        }
        if self.display.page_size == 0 || self.display.landing_limit == 0 {
            anyhow::bail!("page_size and landing_limit must be positive");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}
