//! Navigation shell: routes, the session guard and the responsive layout.

pub mod layout;
pub mod routes;

pub use layout::{
    current_footer, display_name, footer_text, sidebar_items, theme_menu, user_menu, LayoutState, MenuItem, UserMenuAction,
    LG_BREAKPOINT,
};
pub use routes::{guard, Route, RouteOutcome};
