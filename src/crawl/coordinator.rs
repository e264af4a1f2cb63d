// src/crawl/coordinator.rs
// =============================================================================
// Breadth-first crawl of one documentation site.
//
// How it works:
// 1. Derive the site scope from the base URL and seed the frontier with it
// 2. Split the frontier into batches of `batch_size` URLs
// 3. Fetch every URL of a batch concurrently; parse each body on the
//    blocking pool (links, text, description)
// 4. Canonicalize and scope-check every link; unseen ones join the next wave
// 5. Repeat until a wave discovers nothing new
//
// All crawl state (visited set, frontier, collected pages) lives in a
// CrawlRun that exists for exactly one crawl() call. Concurrent fetches
// only report back; the coordinator task is the single writer, so the
// visited check and insert are one HashSet::insert and need no lock.
//
// A URL is marked visited when it is enqueued, so it is dispatched at most
// once per run, and the loop ends after at most one fetch per reachable
// same-site URL.
//
// Redirects: content is filed under the URL it was served from. A page that
// lands off-site is a failure, and one that lands on an already visited
// page is dropped so its text is indexed once.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::fetch::{FetchedPage, Fetcher, HttpFetcher};
use super::scope::SiteScope;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError, Result};
use crate::extract::{self, ParsedPage};

/// Cleaned text of one page, ready for the embedding indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawledPage {
    pub url: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A visited URL that produced no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPage {
    pub url: String,
    pub reason: String,
}

/// Everything one crawl produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlOutcome {
    /// Every visited URL, sorted and deduplicated (failed fetches included)
    pub urls: Vec<String>,
    /// Pages that yielded content, sorted by URL
    pub pages: Vec<CrawledPage>,
    /// Pages that could not be fetched or parsed, sorted by URL
    pub failed: Vec<FailedPage>,
    /// Pages served with a non-text content type (images, PDFs), sorted by URL
    pub skipped: Vec<FailedPage>,
}

impl CrawlOutcome {
    /// Number of discovered pages, for progress reporting.
    pub fn page_count(&self) -> usize {
        self.urls.len()
    }

    /// `(url, text)` pairs in URL order.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pages
            .iter()
            .map(|page| (page.url.as_str(), page.text.as_str()))
    }
}

/// Crawls documentation sites with a given fetcher and configuration.
///
/// A Crawler holds no crawl state of its own: every call to `crawl` or
/// `discover_urls` starts from an empty visited set.
pub struct Crawler<F = HttpFetcher> {
    fetcher: F,
    config: CrawlConfig,
    cancel: CancellationToken,
}

impl Crawler<HttpFetcher> {
    /// Crawler that fetches over HTTP.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Self::with_fetcher(fetcher, config)
    }
}

impl<F: Fetcher> Crawler<F> {
    /// Crawler backed by any Fetcher.
    ///
    /// Fails on invalid configuration (e.g. a batch size of 0).
    pub fn with_fetcher(fetcher: F, config: CrawlConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher,
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Checked before every batch; once cancelled, crawls stop with
    /// `CrawlError::Cancelled`.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Discovers every same-site URL reachable from `base_url`.
    ///
    /// Returns the sorted, deduplicated list. Pages that failed to fetch are
    /// still listed; only their outgoing links are missing.
    pub async fn discover_urls(&self, base_url: &str) -> Result<Vec<String>> {
        Ok(self.crawl(base_url).await?.urls)
    }

    /// Crawls the site and returns the URL list together with page text.
    pub async fn crawl(&self, base_url: &str) -> Result<CrawlOutcome> {
        let scope = SiteScope::from_base_url(base_url)?;
        let seed = scope
            .canonicalize(base_url)
            .ok_or_else(|| CrawlError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a crawlable page URL".to_string(),
            })?;

        info!(
            base_url = %seed,
            batch_size = self.config.batch_size,
            "starting crawl"
        );

        let mut run = CrawlRun::seeded(scope, seed);
        let mut wave = 0usize;

        while !run.frontier.is_empty() {
            wave += 1;
            let frontier = run.take_frontier();
            debug!(wave, pending = frontier.len(), "expanding frontier");

            for batch in frontier.chunks(self.config.batch_size) {
                if self.cancel.is_cancelled() {
                    warn!(visited = run.visited.len(), "crawl cancelled");
                    return Err(CrawlError::Cancelled {
                        visited: run.visited.len(),
                    });
                }

                let fetches = batch.iter().cloned().map(|url| self.visit(url));
                let visits: Vec<Visit> = stream::iter(fetches)
                    .buffer_unordered(batch.len())
                    .collect()
                    .await;

                for visit in visits {
                    run.absorb(visit);
                }
            }
        }

        let outcome = run.finish();
        info!(
            pages = outcome.page_count(),
            indexed = outcome.pages.len(),
            failed = outcome.failed.len(),
            waves = wave,
            "crawl finished"
        );

        Ok(outcome)
    }

    // Fetch then parse one URL. Never fails: problems become a Visit outcome
    async fn visit(&self, url: String) -> Visit {
        debug!(url = %url, "fetching");

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(error) => {
                return Visit {
                    url,
                    outcome: VisitOutcome::FetchFailed(error),
                }
            }
        };

        let served_from = page.url.clone();
        let strip = self.config.strip_boilerplate;

        let outcome = match parse_off_io_path(move || parse_fetched(page, strip)).await {
            Ok(page) => VisitOutcome::Parsed { served_from, page },
            Err(reason) => VisitOutcome::ParseFailed(reason),
        };

        Visit { url, outcome }
    }
}

/// Discovers every same-site URL reachable from `base_url` over HTTP.
///
/// `batch_size` bounds concurrent requests (default 10). A base URL that is
/// not http(s) or a batch size of 0 fails before anything is fetched.
pub async fn discover_urls(base_url: &str, batch_size: Option<usize>) -> Result<Vec<String>> {
    let mut config = CrawlConfig::default();
    if let Some(batch_size) = batch_size {
        config = config.with_batch_size(batch_size);
    }

    Crawler::new(config)?.discover_urls(base_url).await
}

fn parse_fetched(page: FetchedPage, strip_boilerplate: bool) -> ParsedPage {
    extract::parse_page(page.kind, &page.body, &page.url, strip_boilerplate)
}

// Runs a parse on the blocking pool. A panic comes back as Err
async fn parse_off_io_path<P>(parse: P) -> std::result::Result<ParsedPage, String>
where
    P: FnOnce() -> ParsedPage + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|error| error.to_string())
}

struct Visit {
    url: String,
    outcome: VisitOutcome,
}

enum VisitOutcome {
    Parsed {
        /// Final URL after redirects
        served_from: String,
        page: ParsedPage,
    },
    FetchFailed(FetchError),
    ParseFailed(String),
}

// State of one crawl() call
struct CrawlRun {
    scope: SiteScope,
    visited: HashSet<String>,
    frontier: BTreeSet<String>,
    pages: Vec<CrawledPage>,
    failed: Vec<FailedPage>,
    skipped: Vec<FailedPage>,
}

impl CrawlRun {
    fn seeded(scope: SiteScope, seed: String) -> Self {
        let mut run = Self {
            scope,
            visited: HashSet::new(),
            frontier: BTreeSet::new(),
            pages: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        };
        run.enqueue(seed);
        run
    }

    // Visited check and insert in one step
    fn enqueue(&mut self, url: String) -> bool {
        if self.visited.insert(url.clone()) {
            self.frontier.insert(url);
            true
        } else {
            false
        }
    }

    // Sorted, so batches are formed in a stable order
    fn take_frontier(&mut self) -> Vec<String> {
        std::mem::take(&mut self.frontier).into_iter().collect()
    }

    fn absorb(&mut self, visit: Visit) {
        let Visit { url, outcome } = visit;

        match outcome {
            VisitOutcome::Parsed { served_from, page } => {
                let Some(url) = self.landing_url(url, &served_from) else {
                    return;
                };

                if let Some(description) = &page.description {
                    debug!(url = %url, description = %description, "page description");
                }

                let mut discovered = 0usize;
                for link in &page.links {
                    if let Some(canonical) = self.scope.canonicalize(link) {
                        if self.enqueue(canonical) {
                            discovered += 1;
                        }
                    }
                }
                debug!(url = %url, links = page.links.len(), new = discovered, "page parsed");

                self.pages.push(CrawledPage {
                    url,
                    text: page.text,
                    description: page.description,
                });
            }
            VisitOutcome::FetchFailed(FetchError::UnsupportedContent(content_type)) => {
                debug!(url = %url, content_type = %content_type, "not a text page, skipped");
                self.skipped.push(FailedPage {
                    url,
                    reason: format!("unsupported content type '{content_type}'"),
                });
            }
            VisitOutcome::FetchFailed(error) => {
                warn!(url = %url, error = %error, "failed to fetch page, continuing");
                self.failed.push(FailedPage {
                    url,
                    reason: error.to_string(),
                });
            }
            VisitOutcome::ParseFailed(reason) => {
                warn!(url = %url, error = %reason, "failed to parse page, continuing");
                self.failed.push(FailedPage {
                    url,
                    reason: format!("parse failed: {reason}"),
                });
            }
        }
    }

    // URL the content of a redirected fetch is filed under, or None when
    // the content must not be indexed
    fn landing_url(&mut self, requested: String, served_from: &str) -> Option<String> {
        if served_from == requested {
            return Some(requested);
        }

        match self.scope.canonicalize(served_from) {
            None => {
                warn!(
                    url = %requested,
                    location = %served_from,
                    "redirected off-site, dropping page"
                );
                self.failed.push(FailedPage {
                    url: requested,
                    reason: format!("redirected off-site to {served_from}"),
                });
                None
            }
            Some(landing) if landing == requested => Some(requested),
            Some(landing) => {
                if self.visited.insert(landing.clone()) {
                    debug!(url = %requested, location = %landing, "redirected");
                    Some(landing)
                } else {
                    debug!(
                        url = %requested,
                        location = %landing,
                        "redirect target already visited"
                    );
                    None
                }
            }
        }
    }

    fn finish(self) -> CrawlOutcome {
        let mut urls: Vec<String> = self.visited.into_iter().collect();
        urls.sort();

        let mut pages = self.pages;
        pages.sort_by(|a, b| a.url.cmp(&b.url));

        let mut failed = self.failed;
        failed.sort_by(|a, b| a.url.cmp(&b.url));

        let mut skipped = self.skipped;
        skipped.sort_by(|a, b| a.url.cmp(&b.url));

        CrawlOutcome {
            urls,
            pages,
            failed,
            skipped,
        }
    }
}
