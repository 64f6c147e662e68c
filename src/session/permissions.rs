use crate::database::models::Profile;
use crate::grid::Capabilities;
use crate::types::Role;

/// Viewers get a read-only grid; admins and users without a profile row get everything
pub fn permissions(profile: Option<&Profile>) -> Capabilities {
    match profile.map(|p| p.rol) {
        Some(Role::Viewer) => Capabilities::none(),
        Some(Role::Admin) | None => Capabilities::all(),
    }
}
