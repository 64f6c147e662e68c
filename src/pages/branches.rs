use std::sync::{Arc, RwLock};
use tracing::warn;

use super::BRANCH_LABEL;
use crate::database::models::{Branch, BranchField, Company};
use crate::grid::column::{format_date, normalized_text};
use crate::grid::{Capabilities, ColumnDef, CreateForm, FormField, GridConfig, Notifier, RecordGrid};
use crate::services::RecordService;
use crate::types::{FieldKind, FieldValue, Locale};
use crate::validation::FieldRule;

/// Company id to display name, shared with the grid's company column
#[derive(Debug, Clone, Default)]
pub struct CompanyLookup {
    companies: Arc<RwLock<Vec<Company>>>,
}

impl CompanyLookup {
    pub fn replace(&self, companies: Vec<Company>) {
        *self.companies.write().unwrap_or_else(|p| p.into_inner()) = companies;
    }

    pub fn name(&self, id: i64) -> Option<String> {
        let companies = self.companies.read().unwrap_or_else(|p| p.into_inner());
        companies.iter().find(|c| c.id == id).map(|c| c.razon_social.clone())
    }

    /// Select options for the create form: `(id, "RAZON SOCIAL (RIF)")`
    pub fn options(&self) -> Vec<(i64, String)> {
        let companies = self.companies.read().unwrap_or_else(|p| p.into_inner());
        companies.iter().map(|c| (c.id, format!("{} ({})", c.razon_social, c.rif))).collect()
    }

    /// Case-insensitive search over option labels
    pub fn search(&self, input: &str) -> Vec<(i64, String)> {
        let needle = input.to_lowercase();
        self.options().into_iter().filter(|(_, label)| label.to_lowercase().contains(&needle)).collect()
    }

    /// Company name when known, otherwise the raw id
    pub fn format(&self, value: &FieldValue) -> String {
        value.as_integer().and_then(|id| self.name(id)).unwrap_or_else(|| value.to_string())
    }
}

fn yes_no(value: &FieldValue) -> String {
    match value.as_bool() {
        Some(true) => "Sí".to_string(),
        Some(false) => "No".to_string(),
        None => String::new(),
    }
}

pub fn columns(locale: Locale, lookup: &CompanyLookup) -> Vec<ColumnDef<BranchField>> {
    use BranchField::*;
    let names = lookup.clone();
    vec![
        ColumnDef::new(Id, "ID").width(80).sortable().checkbox(),
        ColumnDef::new(CompanyId, "Empresa").filterable().formatter(move |v| names.format(v)),
        ColumnDef::new(City, "Ciudad").filterable().editable().parser(normalized_text),
        ColumnDef::new(State, "Estado").filterable().editable().parser(normalized_text),
        ColumnDef::new(Address, "Dirección").width(250).filterable().editable().parser(normalized_text),
        ColumnDef::new(IsCustomer, "Cliente").width(100).editable().formatter(yes_no),
        ColumnDef::new(IsDistributor, "Distribuidora").width(130).editable().formatter(yes_no),
        ColumnDef::new(IsServiceCenter, "C. Servicio").width(130).editable().formatter(yes_no),
        ColumnDef::new(CreatedAt, "Fecha").width(120).formatter(move |v| format_date(locale, v)),
    ]
}

pub fn form() -> CreateForm<BranchField> {
    use BranchField::*;
    CreateForm::new(vec![
        FormField::new(CompanyId, "Empresa", FieldKind::Integer)
            .rule(FieldRule::required("Seleccione la empresa"))
            .placeholder("Seleccione una empresa"),
        FormField::new(City, "Ciudad", FieldKind::Text)
            .rule(FieldRule::required("Ingrese la ciudad"))
            .normalized()
            .placeholder("Ej: Caracas"),
        FormField::new(State, "Estado", FieldKind::Text)
            .rule(FieldRule::required("Ingrese el estado"))
            .normalized()
            .placeholder("Ej: Distrito Capital"),
        FormField::new(Address, "Dirección", FieldKind::Text)
            .rule(FieldRule::required("Ingrese la dirección"))
            .normalized()
            .placeholder("Dirección completa"),
        FormField::new(Phone, "Teléfono", FieldKind::Text).placeholder("Opcional"),
        FormField::new(Email, "Correo", FieldKind::Text).placeholder("Opcional"),
        FormField::new(IsCustomer, "Cliente", FieldKind::Bool).initial(FieldValue::Bool(false)),
        FormField::new(IsDistributor, "Distribuidora", FieldKind::Bool).initial(FieldValue::Bool(false)),
        FormField::new(IsServiceCenter, "C. Servicio", FieldKind::Bool).initial(FieldValue::Bool(false)),
    ])
}

/// Branch grid plus the company lookup its company column and form depend on
pub struct BranchesPage<S: RecordService, C> {
    grid: RecordGrid<S>,
    companies: Arc<C>,
    lookup: CompanyLookup,
}

impl<S, C> BranchesPage<S, C>
where
    S: RecordService<Record = Branch>,
    C: RecordService<Record = Company>,
{
    pub fn new(
        service: Arc<S>,
        companies: Arc<C>,
        notifier: Arc<dyn Notifier>,
        capabilities: Capabilities,
        locale: Locale,
        page_size: usize,
    ) -> Self {
        let lookup = CompanyLookup::default();
        let config = GridConfig::new("Sucursales", BRANCH_LABEL)
            .columns(columns(locale, &lookup))
            .form(form())
            .capabilities(capabilities)
            .locale(locale)
            .page_size(page_size);
        Self { grid: RecordGrid::new(config, service, notifier), companies, lookup }
    }

    /// Fetch branches and companies concurrently. A failed company fetch
    /// only leaves the company column showing raw ids.
    pub async fn load(&mut self) -> bool {
        let (loaded, companies) = futures::join!(self.grid.refresh(), self.companies.list());
        match companies {
            Ok(companies) => self.lookup.replace(companies),
            Err(e) => warn!("Error loading companies for branch lookup: {}", e),
        }
        loaded
    }

    pub fn grid(&self) -> &RecordGrid<S> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut RecordGrid<S> {
        &mut self.grid
    }

    pub fn lookup(&self) -> &CompanyLookup {
        &self.lookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::grid::{NotificationLog, ViewQuery};
    use crate::testing::{company, MemoryService};
    use chrono::Utc;

    fn branch(id: i64, id_empresa: i64, ciudad: &str) -> Branch {
        Branch {
            id,
            id_empresa,
            ciudad: ciudad.to_string(),
            estado: "MIRANDA".to_string(),
            direccion: "CALLE 1".to_string(),
            telefono: None,
            correo: None,
            es_cliente: true,
            es_distribuidora: false,
            es_centro_servicio: false,
            created_at: Utc::now(),
        }
    }

    fn page(
        companies: MemoryService<Company>,
    ) -> BranchesPage<MemoryService<Branch>, MemoryService<Company>> {
        let branches = MemoryService::new(vec![branch(2, 1, "CARACAS"), branch(1, 2, "VALENCIA")]);
        BranchesPage::new(
            Arc::new(branches),
            Arc::new(companies),
            Arc::new(NotificationLog::new()),
            Capabilities::all(),
            Locale::Es,
            15,
        )
    }

    #[tokio::test]
    async fn company_column_shows_and_filters_by_name() {
        let mut page = page(MemoryService::new(vec![company(1, "J100000001", "ACME"), company(2, "J200000002", "GLOBEX")]));
        assert!(page.load().await);

        let column = &page.grid().columns()[1];
        assert_eq!(column.format(&FieldValue::Integer(2)), "GLOBEX");
        assert_eq!(column.format(&FieldValue::Integer(9)), "9");

        let query = ViewQuery { filter: Some("globex".into()), ..Default::default() };
        let rows = page.grid().visible_rows(&query);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ciudad, "VALENCIA");
        assert_eq!(page.lookup().search("acme"), vec![(1, "ACME (J100000001)".to_string())]);
    }

    #[tokio::test]
    async fn company_fetch_failure_still_loads_branches() {
        let companies = MemoryService::new(vec![company(1, "J100000001", "ACME")]);
        companies.fail_next_list(DomainError::unknown("boom"));
        let mut page = page(companies);
        assert!(page.load().await);
        assert_eq!(page.grid().rows().len(), 2);
        assert_eq!(page.grid().columns()[1].format(&FieldValue::Integer(1)), "1");
    }

    #[test]
    fn flags_start_unchecked() {
        let form = form();
        assert_eq!(form.values().get(BranchField::IsCustomer), &FieldValue::Bool(false));
        let required: Vec<_> = form.fields().iter().filter(|f| f.is_required()).map(|f| f.field).collect();
        assert_eq!(
            required,
            vec![BranchField::CompanyId, BranchField::City, BranchField::State, BranchField::Address]
        );
    }
}
