use std::fmt;
use std::str::FromStr;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Companies,
    Branches,
    PrinterModels,
    Profile,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Dashboard,
        Route::Companies,
        Route::Branches,
        Route::PrinterModels,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/",
            Route::Companies => "/empresas",
            Route::Branches => "/sucursales",
            Route::PrinterModels => "/modelos",
            Route::Profile => "/perfil",
        }
    }

    /// Everything except the login page needs a session
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL
            .into_iter()
            .find(|r| r.path() == normalized)
            .ok_or_else(|| format!("no route for {trimmed}"))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Session state not resolved yet; show a spinner
    Loading,
    Redirect(Route),
    Render(Route),
    NotFound,
}

/// Decide what to show for `path` given the current session state
pub fn guard(path: &str, state: &SessionState) -> RouteOutcome {
    let Ok(route) = path.parse::<Route>() else {
        return RouteOutcome::NotFound;
    };
    if !route.requires_session() {
        return RouteOutcome::Render(route);
    }
    if state.loading {
        RouteOutcome::Loading
    } else if state.session.is_none() {
        RouteOutcome::Redirect(Route::Login)
    } else {
        RouteOutcome::Render(route)
    }
}
