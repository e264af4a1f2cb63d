// src/crawl/fetch.rs
// =============================================================================
// Fetching one page.
//
// The crawler talks to the network through the Fetcher trait, so the
// coordinator can be driven by a real HTTP client or by an in-memory site
// in tests.
//
// HttpFetcher rules:
// - one GET per call, no retries
// - redirects are followed up to the configured limit
// - any non-2xx status, timeout, connection or TLS failure is a FetchError
// - bodies that are not text (images, PDFs, ...) are refused before download
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::config::CrawlConfig;
use crate::error::FetchError;
use crate::extract::PageKind;

/// A successfully fetched page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the body was served from, after redirects
    pub url: String,
    pub kind: PageKind,
    pub body: String,
}

/// Retrieves one URL. Implementations must not retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Fetcher backed by a shared reqwest client (connection pooling).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> crate::error::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let kind = PageKind::detect(&final_url, content_type.as_deref()).ok_or_else(|| {
            FetchError::UnsupportedContent(content_type.clone().unwrap_or_default())
        })?;

        let body = response.text().await.map_err(categorize_error)?;

        Ok(FetchedPage {
            url: final_url,
            kind,
            body,
        })
    }
}

// Maps reqwest's error into the failure categories we log.
//
// reqwest hides the root cause (DNS, refused, certificate) in the source
// chain, so we flatten the chain before looking for TLS hints.
fn categorize_error(error: reqwest::Error) -> FetchError {
    let details = error_chain(&error);
    let lower = details.to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::Redirect
    } else if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
        FetchError::Tls(details)
    } else if error.is_connect() {
        FetchError::Connect(details)
    } else {
        FetchError::Other(details)
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
