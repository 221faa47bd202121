// ── Core error types ──
//
// `QueryError` is what a hook stores in its snapshot: cheap to clone and
// free of transport internals. `CoreError` is the facade's fallible-call
// error and absorbs both layers.

use mediadeck_api::ApiFailure;
use thiserror::Error;

/// Failure recorded in a query or mutation snapshot.
///
/// A `Transport` failure means no usable response arrived; an
/// `Application` failure is the server saying no.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{message}")]
    Transport { message: String, retryable: bool },

    #[error("{}", .messages.join("; "))]
    Application {
        http_status: Option<u16>,
        messages: Vec<String>,
    },

    /// The hook is disabled (missing parameters or switched off).
    #[error("query is disabled")]
    Disabled,
}

impl QueryError {
    /// Server-provided messages; empty for transport failures.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Application { messages, .. } => messages,
            Self::Transport { .. } | Self::Disabled => &[],
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Application { http_status, .. } => *http_status,
            Self::Transport { .. } | Self::Disabled => None,
        }
    }
}

impl From<ApiFailure> for QueryError {
    fn from(failure: ApiFailure) -> Self {
        Self::Application {
            http_status: failure.http_status,
            messages: failure.messages,
        }
    }
}

impl From<&mediadeck_api::Error> for QueryError {
    fn from(err: &mediadeck_api::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<mediadeck_api::Error> for QueryError {
    fn from(err: mediadeck_api::Error) -> Self {
        Self::from(&err)
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach media server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Not authenticated")]
    NotAuthenticated,

    // ── Server-side rejections ───────────────────────────────────────
    #[error("Request rejected by server: {}", .messages.join("; "))]
    Rejected {
        http_status: Option<u16>,
        messages: Vec<String>,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Query is disabled")]
    Disabled,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Messages the server attached to a rejection, if any.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Rejected { messages, .. } => messages,
            _ => &[],
        }
    }
}

// ── Conversion from lower layers ─────────────────────────────────────

impl From<mediadeck_api::Error> for CoreError {
    fn from(err: mediadeck_api::Error) -> Self {
        use mediadeck_api::Error as E;
        match err {
            E::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            E::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            E::Tls(msg) => Self::Config {
                message: format!("TLS error: {msg}"),
            },
            E::InvalidToken(msg) => Self::Config {
                message: format!("Invalid token: {msg}"),
            },
            E::Transport(e) => Self::ConnectionFailed {
                reason: e.to_string(),
            },
            E::Deserialization { message, body: _ } => {
                Self::Internal(format!("Malformed response: {message}"))
            }
            E::Encode(msg) => Self::Internal(format!("Failed to encode request: {msg}")),
        }
    }
}

impl From<QueryError> for CoreError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Transport { message, .. } => Self::ConnectionFailed { reason: message },
            QueryError::Application {
                http_status: Some(401),
                ..
            } => Self::NotAuthenticated,
            QueryError::Application {
                http_status,
                messages,
            } => Self::Rejected {
                http_status,
                messages,
            },
            QueryError::Disabled => Self::Disabled,
        }
    }
}
