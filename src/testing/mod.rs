//! In-memory fakes shared by unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::{AuthError, AuthEvent, AuthProvider, AuthUser, Session};
use crate::database::models::{Company, Profile, ProfileUpdate};
use crate::database::BackendError;
use crate::error::{DomainError, ErrorKind};
use crate::grid::GridRecord;
use crate::services::{ProfileDirectory, ProfileStore, RecordService};
use crate::types::Role;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

pub fn company(id: i64, rif: &str, razon_social: &str) -> Company {
    Company {
        id,
        rif: rif.to_string(),
        razon_social: razon_social.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + chrono::Duration::days(id),
    }
}

pub fn session_for(user_id: Uuid) -> Session {
    Session {
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_at: None,
        user: AuthUser { id: user_id, email: Some("ana@example.com".to_string()) },
    }
}

pub fn profile(user_id: Uuid, rol: Role) -> Profile {
    Profile {
        id: user_id,
        nombre: "Ana Pérez".to_string(),
        foto_perfil: None,
        rol,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Record service backed by a vector. Drafts and patches are merged through
/// their JSON form, so any record with `id` and `created_at` columns works.
pub struct MemoryService<R: GridRecord> {
    rows: Mutex<Vec<R>>,
    next_id: AtomicI64,
    writable: bool,
    fail_list: Mutex<Option<DomainError>>,
    fail_create: Mutex<Option<DomainError>>,
    fail_update: Mutex<Option<DomainError>>,
    fail_delete: Mutex<Option<DomainError>>,
    pub list_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl<R: GridRecord> MemoryService<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            next_id: AtomicI64::new(rows.len() as i64 + 100),
            rows: Mutex::new(rows),
            writable: true,
            fail_list: Mutex::new(None),
            fail_create: Mutex::new(None),
            fail_update: Mutex::new(None),
            fail_delete: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    /// No update or delete support
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn fail_next_list(&self, err: DomainError) {
        *lock(&self.fail_list) = Some(err);
    }

    pub fn fail_next_create(&self, err: DomainError) {
        *lock(&self.fail_create) = Some(err);
    }

    pub fn fail_next_update(&self, err: DomainError) {
        *lock(&self.fail_update) = Some(err);
    }

    pub fn fail_next_delete(&self, err: DomainError) {
        *lock(&self.fail_delete) = Some(err);
    }

    pub fn stored(&self) -> Vec<R> {
        lock(&self.rows).clone()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn merge<R: Serialize + DeserializeOwned>(record: &R, patch: Value) -> Result<R, DomainError> {
    let mut value = serde_json::to_value(record).map_err(|e| DomainError::unknown(e.to_string()))?;
    if let (Some(target), Value::Object(changes)) = (value.as_object_mut(), patch) {
        target.extend(changes);
    }
    serde_json::from_value(value).map_err(|e| DomainError::unknown(e.to_string()))
}

#[async_trait]
impl<R> RecordService for MemoryService<R>
where
    R: GridRecord<Id = i64> + Serialize + DeserializeOwned,
{
    type Record = R;

    async fn list(&self) -> Result<Vec<R>, DomainError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = lock(&self.fail_list).take() {
            return Err(err);
        }
        Ok(self.stored())
    }

    async fn create(&self, draft: R::Draft) -> Result<R, DomainError> {
        if let Some(err) = lock(&self.fail_create).take() {
            return Err(err);
        }
        let mut value = serde_json::to_value(&draft).map_err(|e| DomainError::unknown(e.to_string()))?;
        if let Some(object) = value.as_object_mut() {
            object.insert("id".into(), self.next_id.fetch_add(1, Ordering::SeqCst).into());
            object.insert("created_at".into(), Utc::now().to_rfc3339().into());
        }
        let record: R = serde_json::from_value(value).map_err(|e| DomainError::unknown(e.to_string()))?;
        lock(&self.rows).insert(0, record.clone());
        Ok(record)
    }

    fn supports_update(&self) -> bool {
        self.writable
    }

    async fn update(&self, id: &i64, patch: R::Patch) -> Result<R, DomainError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = lock(&self.fail_update).take() {
            return Err(err);
        }
        let patch = serde_json::to_value(&patch).map_err(|e| DomainError::unknown(e.to_string()))?;
        let mut rows = lock(&self.rows);
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == *id)
            .ok_or_else(|| DomainError::new(ErrorKind::NoRowsAffected, "no rows"))?;
        *slot = merge(slot, patch)?;
        Ok(slot.clone())
    }

    fn supports_delete(&self) -> bool {
        self.writable
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<(), DomainError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = lock(&self.fail_delete).take() {
            return Err(err);
        }
        lock(&self.rows).retain(|r| !ids.contains(&r.id()));
        Ok(())
    }
}

/// Auth provider holding a single in-memory session
pub struct StaticAuthProvider {
    session: Mutex<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
    fail_next_read: AtomicBool,
}

impl StaticAuthProvider {
    pub const PASSWORD: &'static str = "correct-horse";

    fn with_session(session: Option<Session>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { session: Mutex::new(session), events, fail_next_read: AtomicBool::new(false) }
    }

    pub fn signed_in(session: Session) -> Self {
        Self::with_session(Some(session))
    }

    pub fn signed_out() -> Self {
        Self::with_session(None)
    }

    pub fn emit(&self, event: AuthEvent) {
        *lock(&self.session) = event.session().cloned();
        let _ = self.events.send(event);
    }

    /// Make the next `get_session` fail with a 503 from the auth server
    pub fn fail_next_read(&self) {
        self.fail_next_read.store(true, Ordering::SeqCst);
    }

    /// Drop the cached session without notifying anyone
    pub fn forget_session(&self) {
        *lock(&self.session) = None;
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn sign_in_with_password(&self, _email: &str, password: &str) -> Result<Session, AuthError> {
        if password != Self::PASSWORD {
            return Err(AuthError::Backend(BackendError::Api {
                status: 400,
                code: Some("invalid_credentials".to_string()),
                message: "Invalid login credentials".to_string(),
                details: None,
                hint: None,
            }));
        }
        let session = session_for(Uuid::new_v4());
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        if self.fail_next_read.swap(false, Ordering::SeqCst) {
            return Err(AuthError::Backend(BackendError::Api {
                status: 503,
                code: None,
                message: "upstream unavailable".to_string(),
                details: None,
                hint: None,
            }));
        }
        Ok(lock(&self.session).clone())
    }

    async fn get_user(&self) -> Result<Option<AuthUser>, AuthError> {
        Ok(lock(&self.session).as_ref().map(|s| s.user.clone()))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

/// Profile directory keyed by user id. A profile registered under
/// `Uuid::nil()` is returned for every user.
#[derive(Default)]
pub struct MemoryProfiles {
    profiles: Mutex<HashMap<Uuid, Profile>>,
    failing: bool,
    pub fetch_calls: AtomicUsize,
}

impl MemoryProfiles {
    pub fn with(profile: Profile) -> Self {
        let profiles = Self::default();
        lock(&profiles.profiles).insert(Uuid::nil(), profile);
        profiles
    }

    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, DomainError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(DomainError::unknown("profile lookup failed"));
        }
        let profiles = lock(&self.profiles);
        Ok(profiles
            .get(&user_id)
            .or_else(|| profiles.get(&Uuid::nil()))
            .map(|p| Profile { id: user_id, ..p.clone() }))
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, DomainError> {
        if self.failing {
            return Err(DomainError::new(ErrorKind::PermissionError, "profile update refused"));
        }
        let mut profiles = lock(&self.profiles);
        let profile = profiles
            .values_mut()
            .next()
            .ok_or_else(|| DomainError::new(ErrorKind::NoRowsAffected, "no rows"))?;
        if let Some(nombre) = &update.nombre {
            profile.nombre = nombre.clone();
        }
        if let Some(url) = &update.foto_perfil {
            profile.foto_perfil = Some(url.clone());
        }
        Ok(profile.clone())
    }

    async fn upload_avatar(&self, user_id: Uuid, file_name: &str, _bytes: Vec<u8>) -> Result<String, DomainError> {
        if self.failing {
            return Err(DomainError::unknown("bucket not found"));
        }
        Ok(format!("https://storage.test/perfiles/{user_id}/{file_name}"))
    }
}
