use std::sync::Arc;

use super::COMPANY_LABEL;
use crate::database::models::{Company, CompanyField};
use crate::grid::column::{format_date, normalized_text, tax_id_parser};
use crate::grid::{Capabilities, ColumnDef, CreateForm, FormField, GridConfig, Notifier, RecordGrid};
use crate::services::RecordService;
use crate::types::{FieldKind, Locale};
use crate::validation::FieldRule;

pub fn columns(locale: Locale) -> Vec<ColumnDef<CompanyField>> {
    vec![
        ColumnDef::new(CompanyField::Id, "ID").width(100).sortable().checkbox(),
        ColumnDef::new(CompanyField::Rif, "RIF").filterable().sortable().editable().parser(tax_id_parser(locale)),
        ColumnDef::new(CompanyField::RazonSocial, "Razón Social")
            .filterable()
            .sortable()
            .editable()
            .parser(normalized_text),
        ColumnDef::new(CompanyField::CreatedAt, "Fecha de Creación")
            .sortable()
            .formatter(move |v| format_date(locale, v)),
    ]
}

pub fn form() -> CreateForm<CompanyField> {
    CreateForm::new(vec![
        FormField::new(CompanyField::Rif, "RIF", FieldKind::Text)
            .rule(FieldRule::required("Por favor ingrese el RIF"))
            .rule(FieldRule::tax_id("Formato inválido. Ejemplo: J123456789"))
            .normalized()
            .placeholder("Ej: J12345678"),
        FormField::new(CompanyField::RazonSocial, "Razón Social", FieldKind::Text)
            .rule(FieldRule::required("Por favor ingrese la razón social"))
            .normalized()
            .placeholder("Ej: Empresa Ejemplo, C.A."),
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
    S: RecordService<Record = Company>,
{
    let config = GridConfig::new("Empresas", COMPANY_LABEL)
        .columns(columns(locale))
        .form(form())
        .capabilities(capabilities)
        .locale(locale)
        .page_size(page_size);
    RecordGrid::new(config, service, notifier)
}
