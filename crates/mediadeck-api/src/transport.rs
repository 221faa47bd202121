// HTTP client construction for talking to a media server.
//
// Home servers are often reached over plain HTTP on the LAN, through a
// reverse proxy with a private CA, or directly on a self-signed port, so
// certificate handling is the main knob here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// How server certificates are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Platform trust roots.
    #[default]
    SystemRoots,
    /// Trust the PEM bundle at this path in addition to the platform roots.
    CustomCa(PathBuf),
    /// Skip verification entirely.
    DangerAcceptInvalid,
}

/// Settings for the `reqwest::Client` behind an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Whole-request timeout, including reading the body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("mediadeck/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        let builder = match &self.tls {
            TlsMode::SystemRoots => builder,
            TlsMode::CustomCa(path) => builder.add_root_certificate(load_ca(path)?),
            TlsMode::DangerAcceptInvalid => builder.danger_accept_invalid_certs(true),
        };

        builder
            .build()
            .map_err(|e| Error::Tls(format!("cannot build HTTP client: {e}")))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }
}

fn load_ca(path: &Path) -> Result<reqwest::Certificate, Error> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::Tls(format!("cannot read CA bundle {}: {e}", path.display())))?;
    reqwest::Certificate::from_pem(&pem)
        .map_err(|e| Error::Tls(format!("{} is not a PEM certificate: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_verify_against_system_roots() {
        let config = TransportConfig::default();
        assert_eq!(config.tls, TlsMode::SystemRoots);
        assert!(config.user_agent.starts_with("mediadeck/"));
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn missing_ca_bundle_is_a_tls_error() {
        let config = TransportConfig::default()
            .with_tls(TlsMode::CustomCa(PathBuf::from("/nonexistent/mediadeck-ca.pem")));
        match config.build_client() {
            Err(Error::Tls(message)) => assert!(message.contains("mediadeck-ca.pem"), "{message}"),
            other => panic!("expected a TLS error, got {other:?}"),
        }
    }
}
