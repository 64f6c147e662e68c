use std::sync::Arc;

use crate::auth::HttpAuthProvider;
use crate::config::AppConfig;
use crate::database::BackendClient;
use crate::grid::{Capabilities, NotificationLog};
use crate::local_storage::LocalStorage;
use crate::messages;
use crate::services::ProfileService;
use crate::session::{permissions, SessionContext};
use crate::shell::{guard, Route, RouteOutcome};
use crate::types::Locale;

/// Everything a command needs, wired the way the console shell wires its providers
pub struct AppContext {
    pub config: AppConfig,
    pub client: BackendClient,
    pub storage: Arc<dyn LocalStorage>,
    pub auth: Arc<HttpAuthProvider>,
    pub profiles: Arc<ProfileService>,
    pub session: Arc<SessionContext>,
    pub notifications: Arc<NotificationLog>,
}

impl AppContext {
    pub fn load() -> anyhow::Result<Self> {
        let storage = super::config::local_storage()?;
        Self::with(crate::config::config().clone(), storage)
    }

    pub fn with(config: AppConfig, storage: Arc<dyn LocalStorage>) -> anyhow::Result<Self> {
        let client = BackendClient::new(&config.backend)?;
        let auth = Arc::new(HttpAuthProvider::new(client.clone(), storage.clone()));
        let profiles = Arc::new(ProfileService::new(
            client.clone(),
            auth.clone(),
            &config.backend.avatar_bucket,
            config.ui.locale,
        ));
        let session = Arc::new(SessionContext::new(auth.clone(), profiles.clone()));
        Ok(Self {
            config,
            client,
            storage,
            auth,
            profiles,
            session,
            notifications: Arc::new(NotificationLog::new()),
        })
    }

    /// Resolve the stored session and its profile
    pub async fn init(&self) -> anyhow::Result<()> {
        self.session.init().await?;
        Ok(())
    }

    pub fn teardown(&self) {
        self.session.teardown();
    }

    pub fn locale(&self) -> Locale {
        self.config.ui.locale
    }

    pub fn page_size(&self) -> usize {
        self.config.ui.page_size
    }

    pub fn capabilities(&self) -> Capabilities {
        permissions(self.session.current().profile.as_ref())
    }

    /// Apply the route guard; commands behind a protected route fail without a session
    pub fn require(&self, route: Route) -> anyhow::Result<()> {
        match guard(route.path(), &self.session.current()) {
            RouteOutcome::Render(_) => Ok(()),
            RouteOutcome::Redirect(to) => Err(anyhow::anyhow!(
                "{}. Run `aeg login <email>` first ({})",
                messages::no_active_session(self.locale()),
                to
            )),
            RouteOutcome::Loading => Err(anyhow::anyhow!("Session is still loading")),
            RouteOutcome::NotFound => Err(anyhow::anyhow!("No page at {}", route)),
        }
    }
}
