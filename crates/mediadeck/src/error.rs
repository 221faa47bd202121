//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use mediadeck_config::ConfigError;
use mediadeck_core::{CoreError, QueryError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the media server")]
    #[diagnostic(
        code(mediadeck::connection_failed),
        help(
            "{reason}\n\
             Check the server URL in your profile or pass --server.\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(mediadeck::auth_failed),
        help(
            "The server rejected the token.\n\
             Store a new one with: mediadeck config init\n\
             Or pass --token / set MEDIADECK_TOKEN."
        )
    )]
    AuthFailed,

    // ── Server responses ─────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(mediadeck::not_found),
        help("Run: mediadeck {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Server rejected the request: {message}")]
    #[diagnostic(code(mediadeck::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mediadeck::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mediadeck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mediadeck config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No media server configured")]
    #[diagnostic(
        code(mediadeck::no_config),
        help(
            "Create a profile with: mediadeck config init\n\
             Or pass --server (MEDIADECK_SERVER).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(mediadeck::config))]
    Config(#[from] ConfigError),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(mediadeck::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(mediadeck::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(mediadeck::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotAuthenticated => CliError::AuthFailed,

            CoreError::Rejected {
                http_status,
                messages,
            } => CliError::ApiError {
                status: http_status,
                message: if messages.is_empty() {
                    "no details given".into()
                } else {
                    messages.join("; ")
                },
            },

            CoreError::InvalidParameter { field, reason } => CliError::Validation { field, reason },

            CoreError::Disabled => CliError::Validation {
                field: "arguments".into(),
                reason: "required parameters are missing or blank".into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                status: None,
                message,
            },
        }
    }
}

impl From<QueryError> for CliError {
    fn from(err: QueryError) -> Self {
        CoreError::from(err).into()
    }
}

/// Rewrite a 404 rejection into a `NotFound` with a hint.
pub fn not_found_hint(
    err: QueryError,
    resource_type: &str,
    identifier: impl ToString,
    list_command: &str,
) -> CliError {
    if err.http_status() == Some(404) {
        return CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.to_string(),
            list_command: list_command.into(),
        };
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let auth = CliError::from(CoreError::NotAuthenticated);
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let conn = CliError::from(CoreError::ConnectionFailed {
            reason: "refused".into(),
        });
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let disabled = CliError::from(QueryError::Disabled);
        assert_eq!(disabled.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn rejection_404_becomes_not_found() {
        let err = QueryError::Application {
            http_status: Some(404),
            messages: vec!["Tag not found".into()],
        };
        let mapped = not_found_hint(err, "tag", 7, "tags list");
        assert!(matches!(mapped, CliError::NotFound { ref identifier, .. } if identifier == "7"));
        assert_eq!(mapped.exit_code(), exit_code::NOT_FOUND);
    }
}
