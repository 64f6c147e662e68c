use chrono::Datelike;

use super::routes::Route;
use crate::database::models::Profile;
use crate::session::SessionState;
use crate::theme::ThemePreference;

/// Viewport width (px) at which the sidebar is shown inline instead of as a drawer
pub const LG_BREAKPOINT: u32 = 992;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<K> {
    pub key: K,
    pub label: &'static str,
}

pub fn sidebar_items() -> Vec<MenuItem<Route>> {
    vec![
        MenuItem { key: Route::Dashboard, label: "Panel de Control" },
        MenuItem { key: Route::Companies, label: "Empresas" },
        MenuItem { key: Route::Branches, label: "Sucursales" },
        MenuItem { key: Route::PrinterModels, label: "Modelos" },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMenuAction {
    /// Opens the profile page
    Settings,
    SignOut,
}

impl UserMenuAction {
    /// Route to navigate to, if the action is a plain navigation
    pub fn target(&self) -> Option<Route> {
        match self {
            UserMenuAction::Settings => Some(Route::Profile),
            UserMenuAction::SignOut => None,
        }
    }
}

pub fn user_menu() -> Vec<MenuItem<UserMenuAction>> {
    vec![
        MenuItem { key: UserMenuAction::Settings, label: "Configuración" },
        MenuItem { key: UserMenuAction::SignOut, label: "Cerrar Sesión" },
    ]
}

pub fn theme_menu() -> Vec<MenuItem<ThemePreference>> {
    vec![
        MenuItem { key: ThemePreference::Light, label: "Modo Claro" },
        MenuItem { key: ThemePreference::Dark, label: "Modo Oscuro" },
        MenuItem { key: ThemePreference::System, label: "Tema del Sistema" },
    ]
}

/// Name shown in the header: profile name, then email, then a placeholder
pub fn display_name(state: &SessionState) -> String {
    state
        .profile
        .as_ref()
        .map(|p: &Profile| p.nombre.clone())
        .filter(|n| !n.trim().is_empty())
        .or_else(|| state.user().and_then(|u| u.email.clone()))
        .unwrap_or_else(|| "Usuario Administrador".to_string())
}

pub fn footer_text(year: i32) -> String {
    format!("AEG Admin ©{year} Creado para el Control de Máquinas Fiscales")
}

pub fn current_footer() -> String {
    footer_text(chrono::Local::now().year())
}

/// Sidebar visibility for the current viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    pub width: u32,
    pub collapsed: bool,
    pub current: Route,
}

impl LayoutState {
    pub fn new(width: u32) -> Self {
        Self { width, collapsed: width < LG_BREAKPOINT, current: Route::Dashboard }
    }

    pub fn is_wide(&self) -> bool {
        self.width >= LG_BREAKPOINT
    }

    /// Crossing the breakpoint resets the sidebar: open on wide screens, closed on narrow ones
    pub fn resize(&mut self, width: u32) {
        let was_wide = self.is_wide();
        self.width = width;
        if was_wide != self.is_wide() {
            self.collapsed = !self.is_wide();
        }
    }

    pub fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// The drawer closes itself after a pick on narrow screens
    pub fn navigate(&mut self, route: Route) {
        self.current = route;
        if !self.is_wide() {
            self.collapsed = true;
        }
    }
}
