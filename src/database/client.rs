use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error};
use url::Url;

use crate::config::BackendConfig;
use crate::filter::FilterError;

/// Errors from the hosted backend (data, auth and storage endpoints)
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Error payload returned by the backend with a non-success status
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BackendError {
    /// Backend condition code (e.g. a Postgres SQLSTATE), falling back to the HTTP status
    pub fn condition_code(&self) -> Option<String> {
        match self {
            BackendError::Api { status, code, .. } => code.clone().or_else(|| Some(status.to_string())),
            _ => None,
        }
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            BackendError::Api { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build an `Api` error from a status and the raw response body.
    ///
    /// The data API reports `{code, message, details, hint}`; the auth API uses
    /// `{error, error_description}` or `{code, error_code, msg}`.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let text = |keys: &[&str]| {
            keys.iter().find_map(|k| match parsed.get(*k) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
        };
        let message = text(&["message", "msg", "error_description", "error"])
            .unwrap_or_else(|| body.trim().to_string());
        BackendError::Api {
            status,
            code: text(&["error_code", "code", "error"]),
            message,
            details: text(&["details"]),
            hint: text(&["hint"]),
        }
    }
}

impl From<FilterError> for BackendError {
    fn from(err: FilterError) -> Self {
        BackendError::QueryError(err.to_string())
    }
}

/// Shared HTTP client for the hosted backend.
///
/// Cloning is cheap; all clones share the connection pool and the current
/// access token, so signing in through one handle authorizes every service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        if config.url.trim().is_empty() {
            return Err(BackendError::ConfigMissing("AEG_BACKEND_URL"));
        }
        if config.anon_key.trim().is_empty() {
            return Err(BackendError::ConfigMissing("AEG_ANON_KEY"));
        }
        let base_url = Url::parse(config.url.trim_end_matches('/'))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key.clone(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Absolute URL for a path relative to the project base
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))?)
    }

    pub fn rest_url(&self, table: &str) -> Result<Url, BackendError> {
        self.endpoint(&format!("rest/v1/{table}"))
    }

    /// Request with the project key and the caller's bearer token (or the anon key)
    pub async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token().await.unwrap_or_else(|| self.anon_key.clone());
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
    }

    /// Request authorized with an explicit token, used by the auth endpoints
    pub fn request_with_token(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|e| {
            error!("Backend request failed: {}", e);
            BackendError::Http(e)
        })?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::from_response_body(status.as_u16(), &body))
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
