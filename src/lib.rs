// src/lib.rs
// =============================================================================
// doc-crawler: discovers every page of a documentation site and extracts
// clean text for retrieval indexing.
//
// Modules:
// - crawl: site scope, fetching and the breadth-first coordinator
// - extract: links and cleaned text from HTML / Markdown pages
// - config: crawl settings (defaults, TOML file)
// - error: fatal crawl errors and per-page fetch errors
//
// Quick start:
//   let urls = doc_crawler::discover_urls("https://docs.example.com/", None).await?;
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;

pub use config::CrawlConfig;
pub use crawl::{discover_urls, CrawlOutcome, CrawledPage, Crawler, FailedPage, SiteScope};
pub use error::{CrawlError, FetchError};
