use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::database::models::{Profile, ProfileUpdate};
use crate::error::DomainError;
use crate::grid::{Notification, Notifier};
use crate::messages;
use crate::services::ProfileStore;
use crate::session::SessionContext;
use crate::types::{Locale, Role};

pub const PROFILE_TITLE: &str = "Configuración de Cuenta";
const PROFILE_UPDATE_KEY: &str = "profile-update";
const AVATAR_UPDATE_KEY: &str = "avatar-update";
const AVATAR_ERROR_KEY: &str = "avatar-error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTag {
    pub label: String,
    pub color: &'static str,
}

pub fn role_tag(profile: Option<&Profile>, loading: bool) -> RoleTag {
    match profile.map(|p| p.rol) {
        Some(Role::Admin) => RoleTag { label: Role::Admin.to_string(), color: "gold" },
        Some(Role::Viewer) => RoleTag { label: Role::Viewer.to_string(), color: "blue" },
        None if loading => RoleTag { label: "Cargando...".to_string(), color: "default" },
        None => RoleTag { label: "Sin Perfil".to_string(), color: "default" },
    }
}

pub fn role_hint(profile: Option<&Profile>) -> String {
    let role = profile.map(|p| p.rol.to_string()).unwrap_or_else(|| "...".to_string());
    format!(
        "Tu rol de {role} define tus permisos en el sistema. Si necesitas un cambio de rol, contacta al administrador."
    )
}

/// What the profile card shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: Option<String>,
    /// Read-only here; changed through the auth provider only
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub role: RoleTag,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOutcome {
    Saved,
    /// Inline field message; nothing sent
    Invalid(String),
    /// No signed-in user, or the same action is already running
    Skipped,
    Failed(DomainError),
}

pub struct ProfileEditor {
    store: Arc<dyn ProfileStore>,
    session: Arc<SessionContext>,
    notifier: Arc<dyn Notifier>,
    locale: Locale,
    saving: AtomicBool,
    uploading: AtomicBool,
}

/// Clears its flag when the operation finishes, however it finishes
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).ok().map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ProfileEditor {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        session: Arc<SessionContext>,
        notifier: Arc<dyn Notifier>,
        locale: Locale,
    ) -> Self {
        Self {
            store,
            session,
            notifier,
            locale,
            saving: AtomicBool::new(false),
            uploading: AtomicBool::new(false),
        }
    }

    pub fn view(&self) -> ProfileView {
        let state = self.session.current();
        ProfileView {
            name: state.profile.as_ref().map(|p| p.nombre.clone()),
            email: state.user().and_then(|u| u.email.clone()),
            avatar_url: state.profile.as_ref().and_then(|p| p.foto_perfil.clone()),
            role: role_tag(state.profile.as_ref(), state.loading),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    pub async fn save_name(&self, nombre: &str) -> ProfileOutcome {
        let nombre = nombre.trim();
        if nombre.is_empty() {
            return ProfileOutcome::Invalid("El nombre es obligatorio".to_string());
        }
        if self.session.current().user().is_none() {
            debug!("Profile update skipped: no signed-in user");
            return ProfileOutcome::Skipped;
        }
        let Some(_guard) = InFlight::acquire(&self.saving) else {
            return ProfileOutcome::Skipped;
        };

        match self.store.update_profile(&ProfileUpdate::rename(nombre)).await {
            Ok(_) => {
                self.session.refresh_profile().await;
                self.notifier.notify(
                    Notification::success(messages::profile_updated(self.locale)).with_key(PROFILE_UPDATE_KEY),
                );
                ProfileOutcome::Saved
            }
            Err(e) => {
                self.notifier.notify(
                    Notification::error(messages::profile_update_failed(self.locale, &e.message))
                        .with_key(PROFILE_UPDATE_KEY),
                );
                ProfileOutcome::Failed(e)
            }
        }
    }

    /// Upload a new avatar, point the profile at its public URL and reload the profile
    pub async fn change_avatar(&self, file_name: &str, bytes: Vec<u8>) -> ProfileOutcome {
        let Some(user) = self.session.current().user().cloned() else {
            return ProfileOutcome::Skipped;
        };
        let Some(_guard) = InFlight::acquire(&self.uploading) else {
            return ProfileOutcome::Skipped;
        };

        let result = async {
            let url = self.store.upload_avatar(user.id, file_name, bytes).await?;
            self.store.update_profile(&ProfileUpdate::avatar(url)).await
        }
        .await;
        match result {
            Ok(_) => {
                self.session.refresh_profile().await;
                self.notifier
                    .notify(Notification::success(messages::avatar_updated(self.locale)).with_key(AVATAR_UPDATE_KEY));
                ProfileOutcome::Saved
            }
            Err(e) => {
                self.notifier.notify(
                    Notification::error(messages::avatar_upload_failed(self.locale, &e.message))
                        .with_key(AVATAR_ERROR_KEY),
                );
                ProfileOutcome::Failed(e)
            }
        }
    }
}
