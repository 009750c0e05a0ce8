//! Error types for the page fetcher.

/// Errors that can occur when fetching a page.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The connection could not be established (DNS, refused, TLS handshake).
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),
    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    /// The server answered with a non-success status. `body` holds a snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// Any other request failure (redirect loop, builder error, ...).
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// The response body could not be read or decoded as text.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    /// A page URL could not be constructed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Whether the failure surfaced at the HTTP layer: a non-2xx response or
    /// a failed connection.
    ///
    /// Timeouts are deliberately excluded; see [`crate::ClientOptions::retry_timeouts`].
    pub fn is_http_transport(&self) -> bool {
        matches!(self, Self::HttpStatus { .. } | Self::Connect(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else if e.is_connect() {
            Self::Connect(e)
        } else if e.is_body() || e.is_decode() {
            Self::Body(e)
        } else {
            Self::Request(e)
        }
    }
}
