// src/crawl/mod.rs
// =============================================================================
// This module crawls one documentation site.
//
// Submodules:
// - scope: decides which URLs belong to the site and canonicalizes them
// - fetch: one network retrieval per URL (Fetcher trait + HTTP client)
// - coordinator: breadth-first waves of bounded, concurrent batches
// =============================================================================

mod coordinator;
mod fetch;
mod scope;

pub use coordinator::{discover_urls, CrawlOutcome, CrawledPage, Crawler, FailedPage};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use scope::SiteScope;
