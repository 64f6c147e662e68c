//! Session context: the signed-in user, their profile, and the sync lifecycle.

pub mod permissions;

use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, AuthEvent, AuthProvider, AuthUser, Session};
use crate::database::models::Profile;
use crate::services::ProfileDirectory;

pub use permissions::permissions;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// True until the cached session has been resolved once
    pub loading: bool,
    pub session: Option<Session>,
    pub profile: Option<Profile>,
}

impl SessionState {
    pub fn loading() -> Self {
        Self { loading: true, session: None, profile: None }
    }

    pub fn signed_out() -> Self {
        Self { loading: false, session: None, profile: None }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

struct Shared {
    profiles: Arc<dyn ProfileDirectory>,
    state: watch::Sender<SessionState>,
}

impl Shared {
    async fn load_profile(&self, session: Option<&Session>) -> Option<Profile> {
        let user = &session?.user;
        match self.profiles.fetch_profile(user.id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Error fetching profile for {}: {}", user.id, e);
                None
            }
        }
    }

    async fn apply_event(&self, event: AuthEvent) {
        debug!("Auth state change: {:?}", std::mem::discriminant(&event));
        let session = event.session().cloned();
        let profile = self.load_profile(session.as_ref()).await;
        self.state.send_replace(SessionState { loading: false, session, profile });
    }
}

/// Scoped session state shared by every page.
///
/// Created once, initialized with [`SessionContext::init`], and torn down
/// with [`SessionContext::teardown`] (or on drop). Readers subscribe to a
/// watch channel instead of polling.
pub struct SessionContext {
    auth: Arc<dyn AuthProvider>,
    shared: Arc<Shared>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionContext {
    pub fn new(auth: Arc<dyn AuthProvider>, profiles: Arc<dyn ProfileDirectory>) -> Self {
        let (state, _) = watch::channel(SessionState::loading());
        Self {
            auth,
            shared: Arc::new(Shared { profiles, state }),
            listener: Mutex::new(None),
        }
    }

    /// Start following auth events, then resolve the cached session and load its profile.
    ///
    /// The listener runs even when the cached session cannot be resolved, so a
    /// later sign-in still reaches the context.
    pub async fn init(&self) -> Result<(), AuthError> {
        let mut events = self.auth.subscribe();
        let shared = self.shared.clone();
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => shared.apply_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Missed {} auth events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        {
            let mut listener = self.listener.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(previous) = listener.replace(handle) {
                previous.abort();
            }
        }

        let resolved = match self.auth.get_session().await {
            Ok(session) => {
                let profile = self.shared.load_profile(session.as_ref()).await;
                info!("Session initialized (signed in: {})", session.is_some());
                Ok(SessionState { loading: false, session, profile })
            }
            Err(e) => Err(e),
        };

        // An auth event that already landed is newer than the cached read
        let initial = resolved.as_ref().cloned().unwrap_or_else(|_| SessionState::signed_out());
        self.shared.state.send_if_modified(|state| {
            if !state.loading {
                return false;
            }
            *state = initial;
            true
        });
        resolved.map(|_| ())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    /// Re-read the session when the console regains focus. A missing session
    /// never clears the current one here; sign-out arrives as an auth event.
    pub async fn on_visibility_change(&self, visible: bool) {
        if !visible {
            return;
        }
        match self.auth.get_session().await {
            Ok(Some(session)) => {
                let profile = self.shared.load_profile(Some(&session)).await;
                self.shared.state.send_modify(|state| {
                    state.session = Some(session);
                    state.profile = profile;
                });
            }
            Ok(None) => {}
            Err(e) => warn!("Session re-sync failed: {}", e),
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await?;
        self.shared.state.send_replace(SessionState::signed_out());
        Ok(())
    }

    pub async fn refresh_profile(&self) {
        let session = self.shared.state.borrow().session.clone();
        if session.is_none() {
            return;
        }
        let profile = self.shared.load_profile(session.as_ref()).await;
        self.shared.state.send_modify(|state| state.profile = profile);
    }

    /// Stop following auth events
    pub fn teardown(&self) {
        let mut listener = self.listener.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = listener.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.teardown();
    }
}
