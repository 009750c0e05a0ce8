//! HTTP page fetcher for Violation Tracker listing pages.

use std::time::Duration;

use crate::{retry::RetryPolicy, user_agent::get_user_agent, FetchError};

/// Default overall timeout for one request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for [`Client`].
#[derive(Clone, Copy, Debug)]
pub struct ClientOptions {
    /// Overall timeout for a single request, body included.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Also retry timed-out requests. Off by default: only failures surfaced
    /// at the HTTP layer (non-2xx status, refused connection) are retried.
    pub retry_timeouts: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            retry_timeouts: false,
        }
    }
}

/// Fetches listing pages as raw HTML.
///
/// Sends browser-like headers with a randomized desktop user agent. Failed
/// requests are retried according to [`ClientOptions::retry`].
pub struct Client {
    http: reqwest::Client,
    options: ClientOptions,
}

impl Client {
    /// Creates a client with the default timeout and retry policy.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(ClientOptions::default())
    }

    pub fn with_options(options: ClientOptions) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(options.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                FetchError::Request(e)
            })?;
        Ok(Self { http, options })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Whether `err` should trigger another attempt under these options.
    pub fn is_retryable(&self, err: &FetchError) -> bool {
        err.is_http_transport() || (self.options.retry_timeouts && err.is_timeout())
    }

    /// Fetches `url` and returns the body text, retrying transient failures.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.options
            .retry
            .run(|err| self.is_retryable(err), || self.fetch_once(url))
            .await
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("cache-control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to get {}: {}", url, e);
                FetchError::from(e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::warn!("Failed to read response body from {}: {}", url, e);
            FetchError::from(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::warn!("Request to {} failed with status {}", url, status);
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
