// src/error.rs
// =============================================================================
// Error types for the crawler library.
//
// Two families:
// - CrawlError: fatal for a whole crawl call (bad base URL, bad config)
// - FetchError: per-URL failures; the coordinator logs them and moves on
// =============================================================================

use thiserror::Error;

/// Result alias for operations that fail the whole crawl.
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Errors that abort a crawl before (or instead of) producing results.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// The base URL could not be parsed as an absolute URL
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The base URL uses a scheme other than http/https
    #[error("unsupported scheme '{scheme}' in base URL '{url}' (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },

    /// The base URL has no host to scope the crawl to
    #[error("base URL has no host: {0}")]
    MissingHost(String),

    /// Batch size must be a positive integer
    #[error("batch size must be at least 1 (got {0})")]
    InvalidBatchSize(usize),

    /// Any other invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file could not be read
    #[error("failed to read config file: {0}")]
    ConfigFile(#[from] std::io::Error),

    /// The configuration file is not valid TOML for CrawlConfig
    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The crawl was cancelled between batches
    #[error("crawl cancelled after visiting {visited} page(s)")]
    Cancelled { visited: usize },
}

impl CrawlError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Why a single URL produced no content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("too many redirects")]
    Redirect,

    #[error("unsupported content type '{0}'")]
    UnsupportedContent(String),

    #[error("{0}")]
    Other(String),
}
