use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::{FormValues, GridRecord};
use crate::types::{FieldKind, FieldValue};
use crate::validation::normalize_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    /// Tax id (RIF), unique
    pub rif: String,
    pub razon_social: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyField {
    Id,
    Rif,
    RazonSocial,
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDraft {
    pub rif: String,
    pub razon_social: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razon_social: Option<String>,
}

impl GridRecord for Company {
    type Id = i64;
    type Field = CompanyField;
    type Draft = CompanyDraft;
    type Patch = CompanyUpdate;

    fn id(&self) -> i64 {
        self.id
    }

    fn fields() -> &'static [CompanyField] {
        &[CompanyField::Id, CompanyField::Rif, CompanyField::RazonSocial, CompanyField::CreatedAt]
    }

    fn field_name(field: CompanyField) -> &'static str {
        match field {
            CompanyField::Id => "id",
            CompanyField::Rif => "rif",
            CompanyField::RazonSocial => "razon_social",
            CompanyField::CreatedAt => "created_at",
        }
    }

    fn field_kind(field: CompanyField) -> FieldKind {
        match field {
            CompanyField::Id => FieldKind::Integer,
            CompanyField::Rif | CompanyField::RazonSocial => FieldKind::Text,
            CompanyField::CreatedAt => FieldKind::Timestamp,
        }
    }

    fn get(&self, field: CompanyField) -> FieldValue {
        match field {
            CompanyField::Id => FieldValue::Integer(self.id),
            CompanyField::Rif => FieldValue::Text(self.rif.clone()),
            CompanyField::RazonSocial => FieldValue::Text(self.razon_social.clone()),
            CompanyField::CreatedAt => FieldValue::Timestamp(self.created_at),
        }
    }

    fn set(&mut self, field: CompanyField, value: FieldValue) -> Result<(), String> {
        match field {
            CompanyField::Rif => self.rif = value.to_string(),
            CompanyField::RazonSocial => self.razon_social = value.to_string(),
            other => return Err(format!("{} is read-only", Self::field_name(other))),
        }
        Ok(())
    }

    fn patch(field: CompanyField, value: &FieldValue) -> Result<CompanyUpdate, String> {
        let mut patch = CompanyUpdate::default();
        match field {
            CompanyField::Rif => patch.rif = Some(value.to_string()),
            CompanyField::RazonSocial => patch.razon_social = Some(value.to_string()),
            other => return Err(format!("{} is read-only", Self::field_name(other))),
        }
        Ok(patch)
    }

    fn draft(values: &FormValues<CompanyField>) -> Result<CompanyDraft, String> {
        Ok(CompanyDraft {
            rif: normalize_text(values.text(CompanyField::Rif)?.as_str()),
            razon_social: normalize_text(values.text(CompanyField::RazonSocial)?.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_row() {
        let row = r#"{"id":7,"rif":"J123456789","razon_social":"ACME","created_at":"2024-05-02T13:45:00.123456+00:00"}"#;
        let company: Company = serde_json::from_str(row).unwrap();
        assert_eq!(company.id, 7);
        assert_eq!(company.get(CompanyField::Rif), FieldValue::Text("J123456789".into()));
    }

    #[test]
    fn patch_serializes_only_the_changed_field() {
        let patch = Company::patch(CompanyField::RazonSocial, &FieldValue::Text("NUEVA".into())).unwrap();
        assert_eq!(serde_json::to_value(patch).unwrap(), serde_json::json!({ "razon_social": "NUEVA" }));
        assert!(Company::patch(CompanyField::Id, &FieldValue::Integer(3)).is_err());
    }

    #[test]
    fn draft_normalizes_text() {
        let mut values = FormValues::new();
        values.set(CompanyField::Rif, FieldValue::Text("j123456789".into()));
        values.set(CompanyField::RazonSocial, FieldValue::Text("Compañía Fiscal Andina".into()));
        let draft = Company::draft(&values).unwrap();
        assert_eq!(draft.rif, "J123456789");
        assert_eq!(draft.razon_social, "COMPANIA FISCAL ANDINA");
    }
}
