use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{decode_unverified, AuthError, AuthEvent, AuthProvider, AuthUser, Session};
use crate::database::{BackendClient, BackendError};
use crate::local_storage::LocalStorage;

/// Local-storage key holding the serialized session
pub const SESSION_STORAGE_KEY: &str = "aeg-auth-token";

// Refresh slightly before the token actually expires
const EXPIRY_MARGIN_SECS: i64 = 10;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

/// Auth provider speaking the hosted backend's `/auth/v1` API
pub struct HttpAuthProvider {
    client: BackendClient,
    storage: Arc<dyn LocalStorage>,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpAuthProvider {
    pub fn new(client: BackendClient, storage: Arc<dyn LocalStorage>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { client, storage, events }
    }

    fn stored_session(&self) -> Result<Option<Session>, AuthError> {
        match self.storage.get_item(SESSION_STORAGE_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    warn!("Discarding unreadable stored session: {}", e);
                    self.storage.remove_item(SESSION_STORAGE_KEY)?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn store_session(&self, session: &Session) -> Result<(), AuthError> {
        let raw = serde_json::to_string(session).map_err(BackendError::from)?;
        self.storage.set_item(SESSION_STORAGE_KEY, &raw)?;
        self.client.set_access_token(Some(session.access_token.clone())).await;
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), AuthError> {
        self.storage.remove_item(SESSION_STORAGE_KEY)?;
        self.client.set_access_token(None).await;
        Ok(())
    }

    fn emit(&self, event: AuthEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn session_from(&self, token: TokenResponse) -> Result<Session, AuthError> {
        let expires_at = match (token.expires_at, token.expires_in) {
            (Some(at), _) => Some(at),
            (None, Some(secs)) => Some(Utc::now().timestamp() + secs),
            (None, None) => decode_unverified(&token.access_token)?.exp,
        };
        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
            user: token.user,
        })
    }

    async fn request_token(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, AuthError> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        let request = self.client.request(Method::POST, url).await.json(&body);
        let token: TokenResponse = self.client.send_json(request).await?;
        self.session_from(token)
    }

    async fn refresh(&self, session: &Session) -> Result<Option<Session>, AuthError> {
        debug!("Refreshing expired session for {}", session.user.id);
        match self
            .request_token("refresh_token", json!({ "refresh_token": session.refresh_token }))
            .await
        {
            Ok(refreshed) => {
                self.store_session(&refreshed).await?;
                self.emit(AuthEvent::TokenRefreshed(refreshed.clone()));
                Ok(Some(refreshed))
            }
            // Rejected refresh token: the session is gone
            Err(AuthError::Backend(BackendError::Api { status: status @ (400 | 401 | 403), message, .. })) => {
                warn!("Session refresh rejected ({}): {}", status, message);
                self.clear_session().await?;
                self.emit(AuthEvent::SignedOut);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self
            .request_token("password", json!({ "email": email, "password": password }))
            .await?;
        self.store_session(&session).await?;
        info!("Signed in as {}", session.user.id);
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.stored_session()?;
        self.clear_session().await?;
        if let Some(session) = session {
            let url = self.client.endpoint("auth/v1/logout")?;
            let request = self.client.request_with_token(Method::POST, url, &session.access_token);
            if let Err(e) = self.client.send(request).await {
                // Local state is already cleared
                warn!("Remote sign-out failed: {}", e);
            }
        }
        info!("Signed out");
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.stored_session()? else {
            return Ok(None);
        };
        if session.is_expired_at(Utc::now().timestamp() + EXPIRY_MARGIN_SECS) {
            return self.refresh(&session).await;
        }
        self.client.set_access_token(Some(session.access_token.clone())).await;
        Ok(Some(session))
    }

    async fn get_user(&self) -> Result<Option<AuthUser>, AuthError> {
        let Some(session) = self.get_session().await? else {
            return Ok(None);
        };
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self.client.request_with_token(Method::GET, url, &session.access_token);
        match self.client.send_json::<AuthUser>(request).await {
            Ok(user) => Ok(Some(user)),
            Err(BackendError::Api { status: 401 | 403, .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
