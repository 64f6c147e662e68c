use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Role;

/// Row of `usuarios`, one per authenticated identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Same id as the auth subject
    pub id: Uuid,
    pub nombre: String,
    #[serde(default)]
    pub foto_perfil: Option<String>,
    pub rol: Role,
    pub created_at: DateTime<Utc>,
}

/// Client-mutable profile fields; `rol` is never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foto_perfil: Option<String>,
}

impl ProfileUpdate {
    pub fn rename(nombre: impl Into<String>) -> Self {
        Self { nombre: Some(nombre.into()), ..Default::default() }
    }

    pub fn avatar(url: impl Into<String>) -> Self {
        Self { foto_perfil: Some(url.into()), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.nombre.is_none() && self.foto_perfil.is_none()
    }
}
