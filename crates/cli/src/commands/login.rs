//! Admin credentials for CLI commands.
//!
//! # Environment Variables
//!
//! - `ZEAL_TOKEN` - use this bearer token as-is
//! - `ZEAL_EMAIL` / `ZEAL_PASSWORD` - log in through the backend

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use zeal_api::{ApiClient, ApiConfig, ApiError, Credentials, MemoryTokenStore};
use zeal_core::{Email, Role};

/// Errors that can occur while obtaining credentials.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Neither a token nor email/password is configured.
    #[error("Set ZEAL_TOKEN, or ZEAL_EMAIL and ZEAL_PASSWORD")]
    MissingCredentials,

    /// `ZEAL_EMAIL` is not an email address.
    #[error("Invalid ZEAL_EMAIL: {0}")]
    InvalidEmail(String),

    /// The account is not an admin.
    #[error("Account {0} is not an admin")]
    NotAdmin(String),

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where credentials come from.
#[derive(Debug)]
pub enum CredentialSource {
    Token(SecretString),
    Password { email: String, password: SecretString },
}

impl CredentialSource {
    /// Read credentials from the environment; a token wins over a password.
    ///
    /// # Errors
    ///
    /// [`LoginError::MissingCredentials`] when nothing usable is set.
    pub fn from_env() -> Result<Self, LoginError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoginError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = get("ZEAL_TOKEN") {
            return Ok(Self::Token(SecretString::from(token)));
        }
        match (get("ZEAL_EMAIL"), get("ZEAL_PASSWORD")) {
            (Some(email), Some(password)) => Ok(Self::Password {
                email,
                password: SecretString::from(password),
            }),
            _ => Err(LoginError::MissingCredentials),
        }
    }
}

/// Build a client and an in-memory credential store for one command.
///
/// # Errors
///
/// Returns a [`LoginError`] when the backend refuses the login or the
/// account is not an admin.
pub async fn connect(
    api_url: &str,
    timeout: Duration,
    source: CredentialSource,
) -> Result<(ApiClient, MemoryTokenStore), LoginError> {
    let client = ApiClient::new(ApiConfig::new(api_url, timeout)?)?;

    let store = match source {
        CredentialSource::Token(token) => {
            tracing::debug!("Using ZEAL_TOKEN");
            MemoryTokenStore::with_credentials(Credentials {
                token,
                refresh_token: None,
                role: Role::Admin,
                email: None,
                user_id: None,
            })
        }
        CredentialSource::Password { email, password } => {
            let email = Email::parse(&email).map_err(|_| LoginError::InvalidEmail(email))?;
            let store = MemoryTokenStore::new();
            let credentials = client.with(&store).login(&email, &password).await?;
            if !credentials.is_admin() {
                return Err(LoginError::NotAdmin(email.into_inner()));
            }
            tracing::info!(email = %email, "Logged in");
            store
        }
    };

    Ok((client, store))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_token_wins_over_password() {
        let source = CredentialSource::from_lookup(lookup(&[
            ("ZEAL_TOKEN", "abc"),
            ("ZEAL_EMAIL", "admin@zeal.vn"),
            ("ZEAL_PASSWORD", "secret"),
        ]));
        assert!(matches!(source, Ok(CredentialSource::Token(_))));
    }

    #[test]
    fn test_password_needs_both_values() {
        let source = CredentialSource::from_lookup(lookup(&[("ZEAL_EMAIL", "admin@zeal.vn")]));
        assert!(matches!(source, Err(LoginError::MissingCredentials)));

        let source = CredentialSource::from_lookup(lookup(&[
            ("ZEAL_TOKEN", "  "),
            ("ZEAL_EMAIL", "admin@zeal.vn"),
            ("ZEAL_PASSWORD", "secret"),
        ]));
        assert!(matches!(source, Ok(CredentialSource::Password { .. })));
    }
}
