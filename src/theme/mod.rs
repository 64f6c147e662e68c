//! Light/dark theme preference, persisted across runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::local_storage::{LocalStorage, LocalStorageError};

pub const THEME_STORAGE_KEY: &str = "app-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    pub preference: ThemePreference,
    pub system_dark: bool,
}

impl ThemeState {
    pub fn is_dark(&self) -> bool {
        match self.preference {
            ThemePreference::Dark => true,
            ThemePreference::Light => false,
            ThemePreference::System => self.system_dark,
        }
    }
}

/// Holds the user's theme choice and the current OS color scheme
pub struct ThemeContext {
    storage: Arc<dyn LocalStorage>,
    state: watch::Sender<ThemeState>,
}

impl ThemeContext {
    /// Restore the stored preference; unset or unknown values mean `System`
    pub fn new(storage: Arc<dyn LocalStorage>, system_dark: bool) -> Self {
        let preference = match storage.get_item(THEME_STORAGE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                warn!("Could not read stored theme: {}", e);
                ThemePreference::default()
            }
        };
        let (state, _) = watch::channel(ThemeState { preference, system_dark });
        Self { storage, state }
    }

    pub fn preference(&self) -> ThemePreference {
        self.state.borrow().preference
    }

    pub fn set_preference(&self, preference: ThemePreference) -> Result<(), LocalStorageError> {
        self.storage.set_item(THEME_STORAGE_KEY, &preference.to_string())?;
        self.state.send_modify(|s| s.preference = preference);
        Ok(())
    }

    /// OS color scheme changed
    pub fn set_system_dark(&self, dark: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.system_dark != dark;
            s.system_dark = dark;
            changed
        });
    }

    pub fn is_dark(&self) -> bool {
        self.state.borrow().is_dark()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeState> {
        self.state.subscribe()
    }
}

/// Best-effort terminal background detection from `COLORFGBG` ("fg;bg").
pub fn detect_system_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| bg < 7 || bg == 8)
        .unwrap_or(false)
}
