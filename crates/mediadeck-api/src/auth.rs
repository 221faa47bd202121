use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;
use tracing::info;

/// Read-only view of the current bearer token.
///
/// The transport only ever reads through this trait; whoever owns the
/// session decides when the token changes.
pub trait TokenSource: Send + Sync {
    /// The token to attach to the next request, if any.
    fn token(&self) -> Option<Arc<SecretString>>;
}

/// Process-wide authentication state.
///
/// Set by [`login`](Self::login), cleared by [`logout`](Self::logout), read
/// lock-free by every outgoing request in between. Clones share state.
#[derive(Clone, Default)]
pub struct AuthSession {
    token: Arc<ArcSwapOption<SecretString>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that is already logged in.
    pub fn with_token(token: SecretString) -> Self {
        let session = Self::new();
        session.login(token);
        session
    }

    /// Install the token obtained from the auth collaborator.
    pub fn login(&self, token: SecretString) {
        self.token.store(Some(Arc::new(token)));
        info!("session token installed");
    }

    /// Drop the token. Subsequent requests go out unauthenticated.
    pub fn logout(&self) {
        if self.token.swap(None).is_some() {
            info!("session token cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.load().is_some()
    }
}

impl TokenSource for AuthSession {
    fn token(&self) -> Option<Arc<SecretString>> {
        self.token.load_full()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn login_then_logout() {
        let session = AuthSession::new();
        assert!(session.token().is_none());

        session.login(SecretString::from("abc".to_string()));
        assert!(session.is_authenticated());
        assert_eq!(
            session.token().map(|t| t.expose_secret().to_owned()),
            Some("abc".to_owned())
        );

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn clones_share_state() {
        let session = AuthSession::new();
        let reader = session.clone();
        session.login(SecretString::from("t".to_string()));
        assert!(reader.is_authenticated());
    }
}
