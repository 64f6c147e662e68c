//! Object storage for profile pictures.

use reqwest::{header, Method};
use thiserror::Error;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::database::{BackendClient, BackendError};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File name has no extension: {0}")]
    MissingExtension(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Object key for an uploaded avatar: `<user-id>/<millis>.<ext>`
pub fn avatar_path(user_id: Uuid, file_name: &str, millis: i64) -> Result<String, StorageError> {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => return Err(StorageError::MissingExtension(file_name.to_string())),
    };
    Ok(format!("{user_id}/{millis}.{ext}"))
}

fn content_type(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct AvatarStorage {
    client: BackendClient,
    bucket: String,
}

impl AvatarStorage {
    pub fn new(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let url = self.client.endpoint(&format!("storage/v1/object/{}/{path}", self.bucket))?;
        let size = bytes.len();
        let request = self
            .client
            .request(Method::POST, url)
            .await
            .header(header::CONTENT_TYPE, content_type(path))
            .body(bytes);
        self.client.send(request).await?;
        debug!("uploaded {} bytes to {}/{}", size, self.bucket, path);
        Ok(())
    }

    /// Publicly readable URL for an object; no request is made
    pub fn public_url(&self, path: &str) -> Result<Url, StorageError> {
        Ok(self
            .client
            .endpoint(&format!("storage/v1/object/public/{}/{path}", self.bucket))?)
    }
}
