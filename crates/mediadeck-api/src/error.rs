use thiserror::Error;

/// Transport-level failure raised by [`ApiClient`](crate::ApiClient).
///
/// API-level rejections (a well-formed `{"status":"error"}` envelope, or a
/// non-2xx status) are NOT errors at this layer -- they come back as
/// [`ApiResult::Failure`](crate::ApiResult::Failure). Everything in this enum
/// means the request never produced a usable response and may be retried.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or joining failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The bearer token could not be encoded as a header value.
    #[error("Invalid auth token: {0}")]
    InvalidToken(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not a valid result envelope, with the raw body for debugging.
    #[error("Malformed response: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl Error {
    /// Wrap a `reqwest` failure, promoting timeouts to [`Error::Timeout`].
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Transport(err)
        }
    }

    /// Returns `true` if retrying the same request might succeed.
    ///
    /// Connectivity loss, timeouts and malformed bodies are retryable;
    /// configuration mistakes (bad URL, bad TLS setup, bad token) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } | Self::Deserialization { .. } => true,
            Self::InvalidUrl(_) | Self::Tls(_) | Self::InvalidToken(_) | Self::Encode(_) => false,
        }
    }

    /// Returns `true` if the server could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}
