use rust_decimal::Decimal;
use std::sync::Arc;

use super::PRINTER_MODEL_LABEL;
use crate::database::models::{PrinterModel, PrinterModelField};
use crate::grid::column::{format_currency, format_date, normalized_text, price_parser};
use crate::grid::{Capabilities, ColumnDef, CreateForm, FormField, GridConfig, Notifier, RecordGrid};
use crate::services::RecordService;
use crate::types::{FieldKind, Locale};
use crate::validation::FieldRule;

pub fn columns(locale: Locale) -> Vec<ColumnDef<PrinterModelField>> {
    use PrinterModelField::*;
    vec![
        ColumnDef::new(Id, "ID").width(80).sortable().checkbox(),
        ColumnDef::new(Brand, "Marca").filterable().sortable().editable().parser(normalized_text),
        ColumnDef::new(ModelCode, "Código Modelo").filterable().sortable().editable().parser(normalized_text),
        ColumnDef::new(Price, "Precio")
            .width(130)
            .sortable()
            .editable()
            .parser(price_parser(locale))
            .formatter(format_currency),
        ColumnDef::new(Filing, "Providencia").filterable().sortable().editable().parser(normalized_text),
        ColumnDef::new(ApprovalDate, "Fecha Homologación")
            .width(180)
            .sortable()
            .editable()
            .formatter(move |v| format_date(locale, v)),
        ColumnDef::new(CreatedAt, "Creado el").width(150).sortable().formatter(move |v| format_date(locale, v)),
    ]
}

pub fn form() -> CreateForm<PrinterModelField> {
    use PrinterModelField::*;
    CreateForm::new(vec![
        FormField::new(Brand, "Marca", FieldKind::Text)
            .rule(FieldRule::required("La marca es obligatoria"))
            .normalized()
            .placeholder("Ej: BEMATECH"),
        FormField::new(ModelCode, "Código Modelo", FieldKind::Text)
            .rule(FieldRule::required("El código del modelo es obligatorio"))
            .normalized()
            .placeholder("Ej: MP-4000"),
        FormField::new(Price, "Precio (USD)", FieldKind::Decimal)
            .rule(FieldRule::required("El precio es obligatorio"))
            .rule(FieldRule::min(Decimal::new(1, 2), "El precio debe ser mayor a 0"))
            .placeholder("0.00"),
        FormField::new(Filing, "Providencia", FieldKind::Text)
            .rule(FieldRule::required("La providencia es obligatoria"))
            .normalized()
            .placeholder("Ej: SENIAT/0001"),
        FormField::new(ApprovalDate, "Fecha de Homologación", FieldKind::Date)
            .rule(FieldRule::required("La fecha de homologación es obligatoria")),
    ])
}

pub fn grid<S>(
    service: Arc<S>,
    notifier: Arc<dyn Notifier>,
    capabilities: Capabilities,
    locale: Locale,
    page_size: usize,
) -> RecordGrid<S>
where
    S: RecordService<Record = PrinterModel>,
{
    let config = GridConfig::new("Modelos", PRINTER_MODEL_LABEL)
        .columns(columns(locale))
        .form(form())
        .capabilities(capabilities)
        .locale(locale)
        .page_size(page_size);
    RecordGrid::new(config, service, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridRecord;
    use crate::types::FieldValue;

    #[test]
    fn price_must_be_positive() {
        let mut form = form();
        form.set_input(PrinterModelField::Brand, "Bematech").unwrap();
        form.set_input(PrinterModelField::ModelCode, "mp-4000").unwrap();
        form.set_input(PrinterModelField::Price, "0").unwrap();
        form.set_input(PrinterModelField::Filing, "seniat/0001").unwrap();
        form.set_input(PrinterModelField::ApprovalDate, "2023-10-01").unwrap();
        let issues = form.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, PrinterModelField::Price);
        assert_eq!(issues[0].message, "El precio debe ser mayor a 0");

        form.set_input(PrinterModelField::Price, "0.01").unwrap();
        assert!(form.validate().is_empty());
        let draft = PrinterModel::draft(form.values()).unwrap();
        assert_eq!(draft.codigo_modelo, "MP-4000");
        assert_eq!(draft.providencia.as_deref(), Some("SENIAT/0001"));
    }

    #[tokio::test]
    async fn inline_price_edit_below_one_cent_never_reaches_the_service() {
        use crate::grid::{EditOutcome, NotificationLog};
        use crate::testing::MemoryService;
        use chrono::TimeZone;

        let model = PrinterModel {
            id: 7,
            marca: "BEMATECH".into(),
            codigo_modelo: "MP-4000".into(),
            precio: Decimal::new(19990, 2),
            providencia: None,
            fecha_homologacion: None,
            created_at: chrono::Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        };
        let service = Arc::new(MemoryService::new(vec![model]));
        let log = Arc::new(NotificationLog::new());
        let mut grid = grid(service.clone(), log.clone(), Capabilities::all(), Locale::Es, 15);
        grid.refresh().await;

        for bad in [FieldValue::Decimal(Decimal::ZERO), FieldValue::Decimal(Decimal::new(-5, 0)), FieldValue::Null] {
            let outcome = grid.edit_cell(&7, PrinterModelField::Price, bad).await;
            assert!(matches!(outcome, EditOutcome::Rejected(ref m) if m == "El precio debe ser mayor a 0"));
        }
        assert_eq!(MemoryService::<PrinterModel>::calls(&service.update_calls), 0);
        assert_eq!(grid.row(&7).map(|m| m.precio), Some(Decimal::new(19990, 2)));

        let outcome = grid.edit_cell(&7, PrinterModelField::Price, FieldValue::Decimal(Decimal::new(250, 2))).await;
        assert!(matches!(outcome, EditOutcome::Saved));
        assert_eq!(service.stored()[0].precio, Decimal::new(250, 2));
    }

    #[test]
    fn price_column_renders_currency() {
        let cols = columns(Locale::Es);
        let price = cols.iter().find(|c| c.field == PrinterModelField::Price).unwrap();
        assert_eq!(price.format(&FieldValue::Decimal(Decimal::new(123450, 2))), "$ 1,234.50");
        assert_eq!(price.format(&FieldValue::Null), "");
    }
}
