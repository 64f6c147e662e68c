use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{AuthError, AuthProvider};
use crate::database::models::{Profile, ProfileUpdate};
use crate::database::{BackendClient, BackendError, Repository};
use crate::error::{classify, DomainError};
use crate::filter::FilterData;
use crate::messages;
use crate::storage::{avatar_path, AvatarStorage, StorageError};
use crate::types::Locale;

pub const PROFILE_TABLE: &str = "usuarios";
const ENTITY: &str = "perfil";

/// Source of profiles for the session context
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError>;
}

/// Self-service profile writes used by the profile editor
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, DomainError>;

    async fn upload_avatar(&self, user_id: Uuid, file_name: &str, bytes: Vec<u8>) -> Result<String, DomainError>;
}

pub struct ProfileService {
    repo: Repository<Profile>,
    auth: Arc<dyn AuthProvider>,
    avatars: AvatarStorage,
    locale: Locale,
}

impl ProfileService {
    pub fn new(client: BackendClient, auth: Arc<dyn AuthProvider>, avatar_bucket: &str, locale: Locale) -> Self {
        Self {
            repo: Repository::new(PROFILE_TABLE, client.clone()),
            auth,
            avatars: AvatarStorage::new(client, avatar_bucket),
            locale,
        }
    }

    fn classify(&self, err: BackendError) -> DomainError {
        let classified = classify(&err, ENTITY, self.locale);
        warn!("{} on {}: {}", classified.kind, PROFILE_TABLE, err);
        classified
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        let filter = FilterData { where_clause: Some(json!({ "id": user_id })), ..Default::default() };
        self.repo.select_one(filter).await.map_err(|e| self.classify(e))
    }

    async fn active_user_id(&self) -> Result<Uuid, DomainError> {
        match self.auth.get_user().await {
            Ok(Some(user)) => Ok(user.id),
            Ok(None) | Err(AuthError::NoSession) => Err(DomainError::unknown(messages::no_active_session(self.locale))),
            Err(AuthError::Backend(e)) => Err(self.classify(e)),
            Err(e) => Err(DomainError::unknown(e.to_string())),
        }
    }

    /// Update the signed-in user's own profile. `rol` is never written.
    ///
    /// A write matching no row fails with `NoRowsAffected`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, DomainError> {
        let user_id = self.active_user_id().await?;
        let rows = self.repo.update_by_id(&user_id, update).await.map_err(|e| self.classify(e))?;
        match rows.into_iter().next() {
            Some(profile) => {
                info!("Profile {} updated", user_id);
                Ok(profile)
            }
            None => Err(DomainError::no_rows_affected(self.locale, ENTITY)),
        }
    }

    /// Store an avatar image and return its public URL
    pub async fn upload_avatar(&self, user_id: Uuid, file_name: &str, bytes: Vec<u8>) -> Result<String, DomainError> {
        let storage_err = |e: StorageError| match e {
            StorageError::Backend(e) => self.classify(e),
            other => DomainError::validation(other.to_string()),
        };
        let path = avatar_path(user_id, file_name, Utc::now().timestamp_millis()).map_err(storage_err)?;
        self.avatars.upload(&path, bytes).await.map_err(storage_err)?;
        let url = self.avatars.public_url(&path).map_err(storage_err)?;
        Ok(url.to_string())
    }
}

#[async_trait]
impl ProfileDirectory for ProfileService {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        self.get_profile(user_id).await
    }
}

#[async_trait]
impl ProfileStore for ProfileService {
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, DomainError> {
        ProfileService::update_profile(self, update).await
    }

    async fn upload_avatar(&self, user_id: Uuid, file_name: &str, bytes: Vec<u8>) -> Result<String, DomainError> {
        ProfileService::upload_avatar(self, user_id, file_name, bytes).await
    }
}
