// ── Runtime client configuration ──
//
// Describes how to reach one media server and how long cached query
// results live. Never touches disk: the CLI builds a `ClientConfig`
// from its profile file and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use mediadeck_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed home servers).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::SystemRoots,
            TlsVerification::CustomCa(path) => Self::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Lifetime limits for the shared query cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long an entry with no observers survives before eviction.
    pub gc_time: Duration,
    /// Upper bound on retained entries; least recently released entries
    /// beyond it are evicted first. Observed entries are never evicted.
    pub max_entries: usize,
    /// How often the background collector runs.
    pub gc_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            gc_time: Duration::from_secs(5 * 60),
            max_entries: 256,
            gc_interval: Duration::from_secs(60),
        }
    }
}

/// Configuration for talking to a single media server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL (e.g., `https://media.local:8443`). `/api/` is appended
    /// when missing.
    pub url: Url,
    /// Bearer token to start the session with.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub cache: CacheConfig,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            cache: CacheConfig::default(),
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_tls(TlsMode::from(&self.tls))
            .with_timeout(self.timeout)
    }
}
