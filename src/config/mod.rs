use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

use crate::types::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL; REST, auth and storage live under it
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    pub avatar_bucket: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub locale: Locale,
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub debug_logging: bool,
    pub default_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Backend overrides
        if let Ok(v) = env::var("AEG_BACKEND_URL") {
            self.backend.url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("AEG_ANON_KEY") {
            self.backend.anon_key = v;
        }
        if let Ok(v) = env::var("AEG_AVATAR_BUCKET") {
            self.backend.avatar_bucket = v;
        }
        if let Ok(v) = env::var("AEG_REQUEST_TIMEOUT_SECS") {
            self.backend.request_timeout_secs = v.parse().unwrap_or(self.backend.request_timeout_secs);
        }

        // UI overrides
        if let Ok(v) = env::var("AEG_LOCALE") {
            self.ui.locale = v.parse().unwrap_or(self.ui.locale);
        }
        if let Ok(v) = env::var("AEG_PAGE_SIZE") {
            self.ui.page_size = v.parse().unwrap_or(self.ui.page_size).max(1);
        }

        // Logging overrides
        if let Ok(v) = env::var("AEG_DEBUG_LOGGING") {
            self.logging.debug_logging = v.parse().unwrap_or(self.logging.debug_logging);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                avatar_bucket: "perfiles".to_string(),
                request_timeout_secs: 30,
            },
            ui: UiConfig { locale: Locale::Es, page_size: 15 },
            logging: LoggingConfig {
                debug_logging: true,
                default_filter: "aeg_admin=debug,warn".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                avatar_bucket: "perfiles".to_string(),
                request_timeout_secs: 15,
            },
            ui: UiConfig { locale: Locale::Es, page_size: 15 },
            logging: LoggingConfig {
                debug_logging: false,
                default_filter: "aeg_admin=info,warn".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                url: String::new(),
                anon_key: String::new(),
                avatar_bucket: "perfiles".to_string(),
                request_timeout_secs: 10,
            },
            ui: UiConfig { locale: Locale::Es, page_size: 15 },
            logging: LoggingConfig {
                debug_logging: false,
                default_filter: "warn".to_string(),
            },
        }
    }

    /// Configuration pointing at an arbitrary backend, used by tests
    pub fn for_backend(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.backend.url = url.into().trim_end_matches('/').to_string();
        config.backend.anon_key = anon_key.into();
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
