use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::grid::{FormValues, GridRecord};
use crate::types::{FieldKind, FieldValue};
use crate::validation::normalize_text;

/// Fiscal printer model approved for sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterModel {
    pub id: i64,
    pub marca: String,
    pub codigo_modelo: String,
    pub precio: Decimal,
    /// Regulatory filing reference
    #[serde(default)]
    pub providencia: Option<String>,
    #[serde(default)]
    pub fecha_homologacion: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrinterModelField {
    Id,
    Brand,
    ModelCode,
    Price,
    Filing,
    ApprovalDate,
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterModelDraft {
    pub marca: String,
    pub codigo_modelo: String,
    pub precio: Decimal,
    pub providencia: Option<String>,
    pub fecha_homologacion: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrinterModelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo_modelo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providencia: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_homologacion: Option<Option<NaiveDate>>,
}

fn price(value: &FieldValue) -> Result<Decimal, String> {
    value.as_decimal().ok_or_else(|| format!("expected a price, got {value}"))
}

fn approval_date(value: &FieldValue) -> Result<Option<NaiveDate>, String> {
    match value {
        FieldValue::Null => Ok(None),
        other => other.as_date().map(Some).ok_or_else(|| format!("expected a date, got {other}")),
    }
}

impl GridRecord for PrinterModel {
    type Id = i64;
    type Field = PrinterModelField;
    type Draft = PrinterModelDraft;
    type Patch = PrinterModelUpdate;

    fn id(&self) -> i64 {
        self.id
    }

    fn fields() -> &'static [PrinterModelField] {
        use PrinterModelField::*;
        &[Id, Brand, ModelCode, Price, Filing, ApprovalDate, CreatedAt]
    }

    fn field_name(field: PrinterModelField) -> &'static str {
        match field {
            PrinterModelField::Id => "id",
            PrinterModelField::Brand => "marca",
            PrinterModelField::ModelCode => "codigo_modelo",
            PrinterModelField::Price => "precio",
            PrinterModelField::Filing => "providencia",
            PrinterModelField::ApprovalDate => "fecha_homologacion",
            PrinterModelField::CreatedAt => "created_at",
        }
    }

    fn field_kind(field: PrinterModelField) -> FieldKind {
        match field {
            PrinterModelField::Id => FieldKind::Integer,
            PrinterModelField::Price => FieldKind::Decimal,
            PrinterModelField::ApprovalDate => FieldKind::Date,
            PrinterModelField::CreatedAt => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }

    fn get(&self, field: PrinterModelField) -> FieldValue {
        match field {
            PrinterModelField::Id => FieldValue::Integer(self.id),
            PrinterModelField::Brand => FieldValue::Text(self.marca.clone()),
            PrinterModelField::ModelCode => FieldValue::Text(self.codigo_modelo.clone()),
            PrinterModelField::Price => FieldValue::Decimal(self.precio),
            PrinterModelField::Filing => self.providencia.clone().into(),
            PrinterModelField::ApprovalDate => self.fecha_homologacion.into(),
            PrinterModelField::CreatedAt => FieldValue::Timestamp(self.created_at),
        }
    }

    fn set(&mut self, field: PrinterModelField, value: FieldValue) -> Result<(), String> {
        match field {
            PrinterModelField::Brand => self.marca = value.to_string(),
            PrinterModelField::ModelCode => self.codigo_modelo = value.to_string(),
            PrinterModelField::Price => self.precio = price(&value)?,
            PrinterModelField::Filing => {
                self.providencia = if value.is_empty() { None } else { Some(value.to_string()) }
            }
            PrinterModelField::ApprovalDate => self.fecha_homologacion = approval_date(&value)?,
            other => return Err(format!("{} is read-only", Self::field_name(other))),
        }
        Ok(())
    }

    fn patch(field: PrinterModelField, value: &FieldValue) -> Result<PrinterModelUpdate, String> {
        let mut patch = PrinterModelUpdate::default();
        match field {
            PrinterModelField::Brand => patch.marca = Some(value.to_string()),
            PrinterModelField::ModelCode => patch.codigo_modelo = Some(value.to_string()),
            PrinterModelField::Price => patch.precio = Some(price(value)?),
            PrinterModelField::Filing => {
                patch.providencia = Some(if value.is_empty() { None } else { Some(value.to_string()) })
            }
            PrinterModelField::ApprovalDate => patch.fecha_homologacion = Some(approval_date(value)?),
            other => return Err(format!("{} is read-only", Self::field_name(other))),
        }
        Ok(patch)
    }

    fn draft(values: &FormValues<PrinterModelField>) -> Result<PrinterModelDraft, String> {
        let text = |field| values.text(field).map(|s| normalize_text(s.as_str()));
        Ok(PrinterModelDraft {
            marca: text(PrinterModelField::Brand)?,
            codigo_modelo: text(PrinterModelField::ModelCode)?,
            precio: values.decimal(PrinterModelField::Price)?,
            providencia: values.optional_text(PrinterModelField::Filing).map(|s| normalize_text(s.as_str())),
            fecha_homologacion: values.date(PrinterModelField::ApprovalDate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_price_and_plain_date() {
        let row = r#"{"id":2,"marca":"BIXOLON","codigo_modelo":"SRP-812","precio":450.5,
            "providencia":"SNAT/2019/0042","fecha_homologacion":"2019-06-30",
            "created_at":"2024-02-01T00:00:00Z"}"#;
        let model: PrinterModel = serde_json::from_str(row).unwrap();
        assert_eq!(model.precio, Decimal::new(4505, 1));
        assert_eq!(model.fecha_homologacion, NaiveDate::from_ymd_opt(2019, 6, 30));
    }

    #[test]
    fn price_patch_rejects_text() {
        assert!(PrinterModel::patch(PrinterModelField::Price, &FieldValue::Text("caro".into())).is_err());
        let patch = PrinterModel::patch(PrinterModelField::Price, &FieldValue::Integer(10)).unwrap();
        assert_eq!(patch.precio, Some(Decimal::from(10)));
    }
}
