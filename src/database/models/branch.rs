use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::{FormValues, GridRecord};
use crate::types::{FieldKind, FieldValue};
use crate::validation::normalize_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    /// Owning company
    pub id_empresa: i64,
    pub ciudad: String,
    pub estado: String,
    pub direccion: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub correo: Option<String>,
    pub es_cliente: bool,
    pub es_distribuidora: bool,
    pub es_centro_servicio: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchField {
    Id,
    CompanyId,
    City,
    State,
    Address,
    Phone,
    Email,
    IsCustomer,
    IsDistributor,
    IsServiceCenter,
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDraft {
    pub id_empresa: i64,
    pub ciudad: String,
    pub estado: String,
    pub direccion: String,
    pub telefono: Option<String>,
    pub correo: Option<String>,
    pub es_cliente: bool,
    pub es_distribuidora: bool,
    pub es_centro_servicio: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BranchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_empresa: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciudad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    // Outer None: untouched; Some(None): cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_cliente: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_distribuidora: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_centro_servicio: Option<bool>,
}

fn optional_text(value: &FieldValue) -> Option<String> {
    if value.is_empty() { None } else { Some(value.to_string()) }
}

fn flag(value: &FieldValue) -> Result<bool, String> {
    match value {
        FieldValue::Null => Ok(false),
        other => other.as_bool().ok_or_else(|| format!("expected a boolean, got {other}")),
    }
}

fn company_id(value: &FieldValue) -> Result<i64, String> {
    value.as_integer().ok_or_else(|| format!("expected a company id, got {value}"))
}

impl GridRecord for Branch {
    type Id = i64;
    type Field = BranchField;
    type Draft = BranchDraft;
    type Patch = BranchUpdate;

    fn id(&self) -> i64 {
        self.id
    }

    fn fields() -> &'static [BranchField] {
        use BranchField::*;
        &[Id, CompanyId, City, State, Address, Phone, Email, IsCustomer, IsDistributor, IsServiceCenter, CreatedAt]
    }

    fn field_name(field: BranchField) -> &'static str {
        match field {
            BranchField::Id => "id",
            BranchField::CompanyId => "id_empresa",
            BranchField::City => "ciudad",
            BranchField::State => "estado",
            BranchField::Address => "direccion",
            BranchField::Phone => "telefono",
            BranchField::Email => "correo",
            BranchField::IsCustomer => "es_cliente",
            BranchField::IsDistributor => "es_distribuidora",
            BranchField::IsServiceCenter => "es_centro_servicio",
            BranchField::CreatedAt => "created_at",
        }
    }

    fn field_kind(field: BranchField) -> FieldKind {
        match field {
            BranchField::Id | BranchField::CompanyId => FieldKind::Integer,
            BranchField::IsCustomer | BranchField::IsDistributor | BranchField::IsServiceCenter => FieldKind::Bool,
            BranchField::CreatedAt => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }

    fn get(&self, field: BranchField) -> FieldValue {
        match field {
            BranchField::Id => FieldValue::Integer(self.id),
            BranchField::CompanyId => FieldValue::Integer(self.id_empresa),
            BranchField::City => FieldValue::Text(self.ciudad.clone()),
            BranchField::State => FieldValue::Text(self.estado.clone()),
            BranchField::Address => FieldValue::Text(self.direccion.clone()),
            BranchField::Phone => self.telefono.clone().into(),
            BranchField::Email => self.correo.clone().into(),
            BranchField::IsCustomer => FieldValue::Bool(self.es_cliente),
            BranchField::IsDistributor => FieldValue::Bool(self.es_distribuidora),
            BranchField::IsServiceCenter => FieldValue::Bool(self.es_centro_servicio),
            BranchField::CreatedAt => FieldValue::Timestamp(self.created_at),
        }
    }

    fn set(&mut self, field: BranchField, value: FieldValue) -> Result<(), String> {
        match field {
            BranchField::CompanyId => self.id_empresa = company_id(&value)?,
            BranchField::City => self.ciudad = value.to_string(),
            BranchField::State => self.estado = value.to_string(),
            BranchField::Address => self.direccion = value.to_string(),
            BranchField::Phone => self.telefono = optional_text(&value),
            BranchField::Email => self.correo = optional_text(&value),
            BranchField::IsCustomer => self.es_cliente = flag(&value)?,
            BranchField::IsDistributor => self.es_distribuidora = flag(&value)?,
            BranchField::IsServiceCenter => self.es_centro_servicio = flag(&value)?,
            other => return Err(format!("{} is read-only", Self::field_name(other))),
        }
        Ok(())
    }

    fn patch(field: BranchField, value: &FieldValue) -> Result<BranchUpdate, String> {
        let mut patch = BranchUpdate::default();
        match field {
            BranchField::CompanyId => patch.id_empresa = Some(company_id(value)?),
            BranchField::City => patch.ciudad = Some(value.to_string()),
            BranchField::State => patch.estado = Some(value.to_string()),
            BranchField::Address => patch.direccion = Some(value.to_string()),
            BranchField::Phone => patch.telefono = Some(optional_text(value)),
            BranchField::Email => patch.correo = Some(optional_text(value)),
            BranchField::IsCustomer => patch.es_cliente = Some(flag(value)?),
            BranchField::IsDistributor => patch.es_distribuidora = Some(flag(value)?),
            BranchField::IsServiceCenter => patch.es_centro_servicio = Some(flag(value)?),
            other => return Err(format!("{} is read-only", Self::field_name(other))),
        }
        Ok(patch)
    }

    fn draft(values: &FormValues<BranchField>) -> Result<BranchDraft, String> {
        let text = |field| values.text(field).map(|s| normalize_text(s.as_str()));
        Ok(BranchDraft {
            id_empresa: values.integer(BranchField::CompanyId)?,
            ciudad: text(BranchField::City)?,
            estado: text(BranchField::State)?,
            direccion: text(BranchField::Address)?,
            telefono: values.optional_text(BranchField::Phone),
            correo: values.optional_text(BranchField::Email),
            es_cliente: values.flag(BranchField::IsCustomer),
            es_distribuidora: values.flag(BranchField::IsDistributor),
            es_centro_servicio: values.flag(BranchField::IsServiceCenter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_columns_deserialize_as_none() {
        let row = r#"{"id":3,"id_empresa":1,"ciudad":"MERIDA","estado":"MERIDA","direccion":"AV 4",
            "es_cliente":true,"es_distribuidora":false,"es_centro_servicio":false,
            "created_at":"2024-01-10T08:00:00+00:00"}"#;
        let branch: Branch = serde_json::from_str(row).unwrap();
        assert!(branch.telefono.is_none());
        assert_eq!(branch.get(BranchField::Email), FieldValue::Null);
    }

    #[test]
    fn clearing_phone_sends_explicit_null() {
        let patch = Branch::patch(BranchField::Phone, &FieldValue::Null).unwrap();
        assert_eq!(serde_json::to_value(patch).unwrap(), serde_json::json!({ "telefono": null }));
    }

    #[test]
    fn draft_defaults_flags_to_false() {
        let mut values = FormValues::new();
        values.set(BranchField::CompanyId, FieldValue::Integer(1));
        values.set(BranchField::City, FieldValue::Text("Mérida".into()));
        values.set(BranchField::State, FieldValue::Text("Mérida".into()));
        values.set(BranchField::Address, FieldValue::Text("Av. Las Américas".into()));
        let draft = Branch::draft(&values).unwrap();
        assert_eq!(draft.ciudad, "MERIDA");
        assert_eq!(draft.direccion, "AV. LAS AMERICAS");
        assert!(!draft.es_cliente && !draft.es_distribuidora && !draft.es_centro_servicio);
        assert!(draft.telefono.is_none());
    }
}
