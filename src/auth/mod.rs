pub mod claims;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::database::BackendError;
use crate::local_storage::LocalStorageError;
use crate::messages;
use crate::types::Locale;

pub use claims::{decode_unverified, Claims};
pub use http::HttpAuthProvider;

/// Authenticated identity as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds; taken from the token response or the JWT `exp` claim
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Auth-state change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl AuthEvent {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(s) | AuthEvent::TokenRefreshed(s) => Some(s),
            AuthEvent::SignedOut => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Invalid access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Storage(#[from] LocalStorageError),

    #[error("No active session")]
    NoSession,
}

impl AuthError {
    /// Message shown on the login form: the provider's own message when it sent one
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            AuthError::Backend(e) => e
                .backend_message()
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| messages::sign_in_failed(locale)),
            AuthError::NoSession => messages::no_active_session(locale),
            _ => messages::sign_in_failed(locale),
        }
    }
}

/// Email/password authentication with session persistence and change notifications
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Cached session, refreshed first when its access token has expired
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Current user as seen by the provider (not the cache)
    async fn get_user(&self) -> Result<Option<AuthUser>, AuthError>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
