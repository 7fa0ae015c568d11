//! Bearer credentials and where they are kept between requests.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use zeal_core::{Role, UserId};

/// What the backend issued at login.
#[derive(Clone)]
pub struct Credentials {
    pub token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub role: Role,
    pub email: Option<String>,
    pub user_id: Option<UserId>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("role", &self.role)
            .field("email", &self.email)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl Credentials {
    /// Credentials holding only a token, as handed out by `ZEAL_TOKEN`.
    #[must_use]
    pub fn from_token(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: SecretString::from(token.into()),
            refresh_token: None,
            role,
            email: None,
            user_id: None,
        }
    }

    /// Same identity with a newly issued token pair.
    #[must_use]
    pub fn refreshed(&self, token: SecretString, refresh_token: Option<SecretString>) -> Self {
        Self {
            token,
            refresh_token: refresh_token.or_else(|| self.refresh_token.clone()),
            role: self.role,
            email: self.email.clone(),
            user_id: self.user_id.clone(),
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub(crate) fn bearer(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Per-user credential storage.
///
/// The web crates keep credentials in the visitor's session; the CLI and
/// tests keep them in memory. Writes are last-write-wins.
pub trait TokenStore: Send + Sync {
    /// Current credentials, if logged in.
    fn load(&self) -> impl Future<Output = Option<Credentials>> + Send;

    /// Replace the stored credentials.
    fn store(&self, credentials: Credentials) -> impl Future<Output = ()> + Send;

    /// Forget everything auth-related.
    fn clear(&self) -> impl Future<Output = ()> + Send;
}

/// In-memory [`TokenStore`]. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<RwLock<Option<Credentials>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(credentials))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<Credentials> {
        self.slot.read().await.clone()
    }

    async fn store(&self, credentials: Credentials) {
        *self.slot.write().await = Some(credentials);
    }

    async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

/// A store that never holds credentials, for anonymous calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl TokenStore for Anonymous {
    async fn load(&self) -> Option<Credentials> {
        None
    }

    async fn store(&self, _credentials: Credentials) {}

    async fn clear(&self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_tokens() {
        let creds = Credentials {
            refresh_token: Some(SecretString::from("refresh-secret")),
            email: Some("admin@zeal.vn".to_owned()),
            ..Credentials::from_token("access-secret", Role::Admin)
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("access-secret"));
        assert!(!debug.contains("refresh-secret"));
        assert!(debug.contains("admin@zeal.vn"));
    }

    #[test]
    fn test_refreshed_keeps_identity() {
        let creds = Credentials {
            refresh_token: Some(SecretString::from("r1")),
            email: Some("a@zeal.vn".to_owned()),
            ..Credentials::from_token("t1", Role::User)
        };
        let next = creds.refreshed(SecretString::from("t2"), None);
        assert_eq!(next.bearer(), "t2");
        assert_eq!(next.refresh_token.unwrap().expose_secret(), "r1");
        assert_eq!(next.email.as_deref(), Some("a@zeal.vn"));
        assert_eq!(next.role, Role::User);
    }

    #[tokio::test]
    async fn test_memory_store_is_shared_between_clones() {
        let store = MemoryTokenStore::new();
        let other = store.clone();
        store.store(Credentials::from_token("t", Role::Admin)).await;
        assert!(other.load().await.is_some());
        other.clear().await;
        assert!(store.load().await.is_none());
    }
}
