//! User-facing message catalogue.
//!
//! Every string a user can see is produced here so the configured
//! [`Locale`] is honored in one place.

use crate::types::{Action, EntityLabel, Locale};

/// Choose between the Spanish and English rendering of a message.
pub fn pick(locale: Locale, es: &str, en: &str) -> String {
    match locale {
        Locale::Es => es.to_string(),
        Locale::En => en.to_string(),
    }
}

fn agree(label: &EntityLabel, feminine: &'static str, masculine: &'static str) -> &'static str {
    if label.feminine { feminine } else { masculine }
}

pub fn foreign_key_violation(locale: Locale, entity: &str) -> String {
    match locale {
        Locale::Es => format!("No se puede eliminar porque este {entity} tiene datos asociados."),
        Locale::En => format!("Cannot delete because this {entity} has associated records."),
    }
}

pub fn duplicate_record(locale: Locale, entity: &str) -> String {
    match locale {
        Locale::Es => format!("Ya existe un {entity} con esos datos únicos."),
        Locale::En => format!("A {entity} with those unique fields already exists."),
    }
}

pub fn permission_denied(locale: Locale, entity: &str) -> String {
    match locale {
        Locale::Es => format!("No tienes permisos para realizar esta acción en {entity}."),
        Locale::En => format!("You lack permission for this action on {entity}."),
    }
}

pub fn unexpected_error(locale: Locale, entity: &str) -> String {
    match locale {
        Locale::Es => format!("Error inesperado procesando {entity}."),
        Locale::En => format!("Unexpected error processing {entity}."),
    }
}

pub fn no_rows_affected(locale: Locale, entity: &str) -> String {
    match locale {
        Locale::Es => format!("La operación no modificó ningún {entity}: no existe o no tienes permiso para modificarlo."),
        Locale::En => format!("The operation did not modify any {entity}: it does not exist or you may not change it."),
    }
}

/// Foreign-key failure when more than one row was targeted
pub fn foreign_key_violation_plural(locale: Locale, label: &EntityLabel) -> String {
    match locale {
        Locale::Es => format!(
            "No se pueden eliminar {} {} porque tienen datos asociados.",
            agree(label, "las", "los"),
            label.plural
        ),
        Locale::En => format!("Cannot delete the {} because they have associated records.", label.plural),
    }
}

/// Generic per-action fallback used when a failure carries no message
pub fn action_failed(locale: Locale, action: Action, label: &EntityLabel) -> String {
    let singular = label.lowercase();
    match (locale, action) {
        (Locale::Es, Action::Load) => format!("Error al cargar {}", label.plural),
        (Locale::Es, Action::Save) => format!("Error al guardar {singular}"),
        (Locale::Es, Action::Update) => format!("Error al actualizar {singular}"),
        (Locale::Es, Action::Delete) => format!("Error al eliminar {}", label.plural),
        (Locale::En, Action::Load) => format!("Error loading {}", label.plural),
        (Locale::En, Action::Save) => format!("Error saving {singular}"),
        (Locale::En, Action::Update) => format!("Error updating {singular}"),
        (Locale::En, Action::Delete) => format!("Error deleting {}", label.plural),
    }
}

pub fn records_deleted(locale: Locale, count: usize, label: &EntityLabel) -> String {
    match locale {
        Locale::Es => format!(
            "{count} {} {} exitosamente",
            label.plural,
            agree(label, "eliminadas", "eliminados")
        ),
        Locale::En => format!("{count} {} deleted successfully", label.plural),
    }
}

pub fn confirm_bulk_delete(locale: Locale, count: usize, label: &EntityLabel) -> String {
    match locale {
        Locale::Es => format!(
            "¿Está seguro de que desea eliminar {} {count} {} {}? Esta acción no se puede deshacer.",
            agree(label, "las", "los"),
            label.plural,
            agree(label, "seleccionadas", "seleccionados")
        ),
        Locale::En => format!(
            "Are you sure you want to delete the {count} selected {}? This action cannot be undone.",
            label.plural
        ),
    }
}

pub fn field_updated(locale: Locale, header: &str) -> String {
    match locale {
        Locale::Es => format!("Campo \"{header}\" actualizado exitosamente"),
        Locale::En => format!("Field \"{header}\" updated successfully"),
    }
}

pub fn record_created(locale: Locale, label: &EntityLabel) -> String {
    match locale {
        Locale::Es => format!("{} {} exitosamente", label.singular, agree(label, "creada", "creado")),
        Locale::En => format!("{} created successfully", label.singular),
    }
}

pub fn new_record_title(locale: Locale, label: &EntityLabel) -> String {
    match locale {
        Locale::Es => format!("{} {}", agree(label, "Nueva", "Nuevo"), label.singular),
        Locale::En => format!("New {}", label.singular),
    }
}

pub fn invalid_tax_id(locale: Locale) -> String {
    pick(
        locale,
        "Formato de RIF inválido. Debe ser: V/E/J/P/G seguido de 7 a 9 números.",
        "Invalid tax ID. Expected V/E/J/P/G followed by 7 to 9 digits.",
    )
}

pub fn invalid_price(locale: Locale) -> String {
    pick(locale, "El precio debe ser mayor a 0", "Price must be greater than 0")
}

pub fn sign_in_failed(locale: Locale) -> String {
    pick(locale, "Error al iniciar sesión", "Error signing in")
}

pub fn no_active_session(locale: Locale) -> String {
    pick(locale, "No hay sesión de usuario activa", "There is no active user session")
}

pub fn profile_updated(locale: Locale) -> String {
    pick(locale, "Perfil actualizado correctamente", "Profile updated successfully")
}

pub fn profile_update_failed(locale: Locale, reason: &str) -> String {
    match locale {
        Locale::Es => format!("Error al actualizar perfil: {reason}"),
        Locale::En => format!("Error updating profile: {reason}"),
    }
}

pub fn avatar_updated(locale: Locale) -> String {
    pick(locale, "Foto de perfil actualizada", "Profile picture updated")
}

pub fn avatar_upload_failed(locale: Locale, reason: &str) -> String {
    match locale {
        Locale::Es => format!("Error al subir imagen: {reason}"),
        Locale::En => format!("Error uploading image: {reason}"),
    }
}
