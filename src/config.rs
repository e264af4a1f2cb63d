// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Values come from three layers, later ones winning:
// 1. CrawlConfig::default()
// 2. An optional TOML file (every key optional)
// 3. CLI flags (applied in main.rs)
//
// Example file:
//   batch_size = 20
//   timeout_secs = 15
//   user_agent = "my-docs-bot/1.0"
//   strip_boilerplate = true
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{CrawlError, Result};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Settings for one crawler instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    /// How many URLs are fetched concurrently in one batch
    pub batch_size: usize,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Redirects followed before a fetch counts as failed
    pub max_redirects: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Remove footer boilerplate ("privacy policy", "subscribe", ...) from page text
    pub strip_boilerplate: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("doc-crawler/{}", env!("CARGO_PKG_VERSION")),
            strip_boilerplate: false,
        }
    }
}

impl CrawlConfig {
    /// Load a config from a TOML file. Missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: CrawlConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style override for the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Rejects values that would make a crawl meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(CrawlError::InvalidBatchSize(self.batch_size));
        }
        if self.timeout_secs == 0 {
            return Err(CrawlError::config("timeout_secs must be at least 1"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CrawlError::config("user_agent must not be empty"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = CrawlConfig::default();
        assert_eq!(config.batch_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = CrawlConfig::default().with_batch_size(0);
        assert!(matches!(
            config.validate(),
            Err(CrawlError::InvalidBatchSize(0))
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CrawlConfig {
            timeout_secs: 0,
            ..CrawlConfig::default()
        };
        assert!(matches!(config.validate(), Err(CrawlError::Config(_))));
    }

    #[test]
    fn test_partial_toml_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "batch_size = 3").unwrap();
        writeln!(file, "strip_boilerplate = true").unwrap();

        let config = CrawlConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.batch_size, 3);
        assert!(config.strip_boilerplate);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 3").unwrap();

        let result = CrawlConfig::from_toml_file(file.path());
        assert!(matches!(result, Err(CrawlError::ConfigParse(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = CrawlConfig::from_toml_file(Path::new("/nonexistent/crawl.toml"));
        assert!(matches!(result, Err(CrawlError::ConfigFile(_))));
    }
}
