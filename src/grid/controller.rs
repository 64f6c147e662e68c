use std::sync::Arc;
use tracing::{debug, warn};

use super::column::{Capabilities, ColumnDef};
use super::export::{export_file_name, write_csv, GridExportError};
use super::form::CreateForm;
use super::notify::{Notification, Notifier};
use super::record::GridRecord;
use super::view::{self, ViewQuery};
use crate::error::{DomainError, ErrorKind};
use crate::messages;
use crate::services::RecordService;
use crate::types::{Action, EntityLabel, FieldValue, Locale};
use crate::validation::FieldIssue;

type Rec<S> = <S as RecordService>::Record;
type IdOf<S> = <Rec<S> as GridRecord>::Id;
type FieldOf<S> = <Rec<S> as GridRecord>::Field;

const UPDATE_SUCCESS_KEY: &str = "grid-update-success";
const UPDATE_ERROR_KEY: &str = "grid-update-error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    Idle,
    Loading,
    Submitting,
}

/// Issued when a list fetch starts; only the latest ticket may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// New value equals the old one; nothing sent
    Unchanged,
    /// The edit never reached the backend (read-only column or parser rejection)
    Rejected(String),
    Saved,
    /// Backend refused the change; the working set was reloaded
    Reverted(DomainError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R: GridRecord> {
    /// Client-side rules failed; nothing sent and nothing notified
    Invalid(Vec<FieldIssue<R::Field>>),
    Created(R),
    /// Backend refused; the modal stays open with the entered values
    Failed(DomainError),
    /// The modal is closed or another submission is in flight
    Busy,
}

/// Pending bulk delete awaiting the user's confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation<I> {
    pub ids: Vec<I>,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(usize),
    Failed(DomainError),
    Nothing,
}

pub struct GridConfig<R: GridRecord> {
    pub title: String,
    pub label: EntityLabel,
    pub columns: Vec<ColumnDef<R::Field>>,
    pub form: Option<CreateForm<R::Field>>,
    pub capabilities: Capabilities,
    /// Identity used for selection and post-delete filtering
    pub id_of: fn(&R) -> R::Id,
    pub locale: Locale,
    pub page_size: usize,
}

impl<R: GridRecord> GridConfig<R> {
    pub fn new(title: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            title: title.into(),
            label,
            columns: vec![],
            form: None,
            capabilities: Capabilities::default(),
            id_of: R::id,
            locale: Locale::default(),
            page_size: 15,
        }
    }

    pub fn columns(mut self, columns: Vec<ColumnDef<R::Field>>) -> Self {
        self.columns = columns;
        self
    }

    pub fn form(mut self, form: CreateForm<R::Field>) -> Self {
        self.form = Some(form);
        self
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn id_of(mut self, id_of: fn(&R) -> R::Id) -> Self {
        self.id_of = id_of;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// List/create/update/bulk-delete controller for one entity page
pub struct RecordGrid<S: RecordService> {
    config: GridConfig<Rec<S>>,
    service: Arc<S>,
    notifier: Arc<dyn Notifier>,
    rows: Vec<Rec<S>>,
    selection: Vec<IdOf<S>>,
    state: GridState,
    latest_ticket: u64,
    create_open: bool,
}

impl<S: RecordService> RecordGrid<S> {
    pub fn new(mut config: GridConfig<Rec<S>>, service: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        let capabilities = config.capabilities;
        config.columns = config.columns.into_iter().map(|c| c.masked(capabilities)).collect();
        Self {
            config,
            service,
            notifier,
            rows: vec![],
            selection: vec![],
            state: GridState::Idle,
            latest_ticket: 0,
            create_open: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn label(&self) -> &EntityLabel {
        &self.config.label
    }

    pub fn columns(&self) -> &[ColumnDef<FieldOf<S>>] {
        &self.config.columns
    }

    pub fn capabilities(&self) -> Capabilities {
        self.config.capabilities
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    /// Current working set in backend order
    pub fn rows(&self) -> &[Rec<S>] {
        &self.rows
    }

    pub fn row(&self, id: &IdOf<S>) -> Option<&Rec<S>> {
        self.rows.iter().find(|r| &(self.config.id_of)(r) == id)
    }

    fn column(&self, field: FieldOf<S>) -> Option<&ColumnDef<FieldOf<S>>> {
        self.config.columns.iter().find(|c| c.field == field)
    }

    fn notify_error(&self, message: String, key: Option<&'static str>) {
        let notification = Notification::error(message);
        self.notifier.notify(match key {
            Some(key) => notification.with_key(key),
            None => notification,
        });
    }

    /// Message shown for a failed action; multi-row foreign-key failures get the plural wording
    pub fn friendly_error(&self, err: &DomainError, action: Action, targeted: usize) -> String {
        if err.is(ErrorKind::ForeignKeyViolation) && targeted > 1 {
            return messages::foreign_key_violation_plural(self.config.locale, &self.config.label);
        }
        if !err.message.trim().is_empty() {
            return err.message.clone();
        }
        messages::action_failed(self.config.locale, action, &self.config.label)
    }

    // ---- fetch ----

    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.state = GridState::Loading;
        FetchTicket(self.latest_ticket)
    }

    /// Apply a list result. Returns `false` when a newer fetch was started
    /// after this one, in which case the result is discarded.
    pub fn finish_refresh(&mut self, ticket: FetchTicket, result: Result<Vec<Rec<S>>, DomainError>) -> bool {
        if ticket.0 != self.latest_ticket {
            debug!("Discarding stale {} fetch #{}", self.config.label.plural, ticket.0);
            return false;
        }
        self.state = GridState::Idle;
        match result {
            Ok(rows) => {
                let id_of = self.config.id_of;
                self.selection.retain(|id| rows.iter().any(|r| &id_of(r) == id));
                self.rows = rows;
            }
            // Keep the previous working set
            Err(err) => self.notify_error(self.friendly_error(&err, Action::Load, 0), None),
        }
        true
    }

    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin_refresh();
        let result = self.service.list().await;
        self.finish_refresh(ticket, result)
    }

    // ---- inline edit ----

    /// Handle a cell edit. The value is applied to the working set first, then
    /// persisted with a single-field patch; a failed save reloads the list.
    pub async fn edit_cell(&mut self, id: &IdOf<S>, field: FieldOf<S>, new_value: FieldValue) -> EditOutcome {
        let Some(column) = self.column(field).filter(|c| c.editable) else {
            return EditOutcome::Rejected(format!("{field:?} is not editable"));
        };
        let header = column.header.clone();
        let value = match column.parse(new_value) {
            Ok(value) => value,
            Err(message) => {
                self.notify_error(message.clone(), None);
                return EditOutcome::Rejected(message);
            }
        };

        let id_of = self.config.id_of;
        let Some(index) = self.rows.iter().position(|r| &id_of(r) == id) else {
            return EditOutcome::Rejected(format!("no row with id {id}"));
        };
        if self.rows[index].get(field) == value {
            return EditOutcome::Unchanged;
        }
        let patch = match <Rec<S> as GridRecord>::patch(field, &value) {
            Ok(patch) => patch,
            Err(message) => {
                self.notify_error(message.clone(), None);
                return EditOutcome::Rejected(message);
            }
        };
        if let Err(message) = self.rows[index].set(field, value) {
            self.notify_error(message.clone(), None);
            return EditOutcome::Rejected(message);
        }

        if self.service.supports_update() {
            match self.service.update(id, patch).await {
                Ok(updated) => {
                    if let Some(slot) = self.rows.iter_mut().find(|r| &id_of(r) == id) {
                        *slot = updated;
                    }
                }
                Err(err) => {
                    warn!("Update of {} {} failed: {}", self.config.label.lowercase(), id, err);
                    self.notify_error(self.friendly_error(&err, Action::Update, 1), Some(UPDATE_ERROR_KEY));
                    self.refresh().await;
                    return EditOutcome::Reverted(err);
                }
            }
        }
        self.notifier.notify(
            Notification::success(messages::field_updated(self.config.locale, &header)).with_key(UPDATE_SUCCESS_KEY),
        );
        EditOutcome::Saved
    }

    // ---- selection ----

    pub fn selection_enabled(&self) -> bool {
        self.config.columns.iter().any(|c| c.checkbox)
    }

    pub fn selected(&self) -> &[IdOf<S>] {
        &self.selection
    }

    pub fn is_selected(&self, id: &IdOf<S>) -> bool {
        self.selection.contains(id)
    }

    pub fn select(&mut self, id: IdOf<S>) -> bool {
        if !self.selection_enabled() || self.row(&id).is_none() || self.is_selected(&id) {
            return false;
        }
        self.selection.push(id);
        true
    }

    pub fn deselect(&mut self, id: &IdOf<S>) {
        self.selection.retain(|s| s != id);
    }

    pub fn toggle(&mut self, id: IdOf<S>) {
        if self.is_selected(&id) {
            self.deselect(&id);
        } else {
            self.select(id);
        }
    }

    /// Header checkbox: select every row in the working set
    pub fn select_all(&mut self) {
        if self.selection_enabled() {
            self.selection = self.rows.iter().map(self.config.id_of).collect();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- bulk delete ----

    pub fn can_bulk_delete(&self) -> bool {
        !self.selection.is_empty() && self.config.capabilities.can_delete && self.service.supports_delete()
    }

    /// First step of a bulk delete: the prompt the user must confirm
    pub fn request_bulk_delete(&self) -> Option<DeleteConfirmation<IdOf<S>>> {
        if !self.can_bulk_delete() {
            return None;
        }
        Some(DeleteConfirmation {
            ids: self.selection.clone(),
            prompt: messages::confirm_bulk_delete(self.config.locale, self.selection.len(), &self.config.label),
        })
    }

    pub async fn confirm_bulk_delete(&mut self, confirmation: DeleteConfirmation<IdOf<S>>) -> DeleteOutcome {
        let ids = confirmation.ids;
        if ids.is_empty() {
            return DeleteOutcome::Nothing;
        }
        self.state = GridState::Loading;
        let result = self.service.delete_many(&ids).await;
        self.state = GridState::Idle;
        match result {
            Ok(()) => {
                let id_of = self.config.id_of;
                self.rows.retain(|r| !ids.contains(&id_of(r)));
                self.selection.clear();
                self.notifier
                    .notify(Notification::success(messages::records_deleted(self.config.locale, ids.len(), &self.config.label)));
                DeleteOutcome::Deleted(ids.len())
            }
            Err(err) => {
                warn!("Bulk delete of {} {} failed: {}", ids.len(), self.config.label.plural, err);
                self.notify_error(self.friendly_error(&err, Action::Delete, ids.len()), None);
                DeleteOutcome::Failed(err)
            }
        }
    }

    // ---- create ----

    pub fn can_create(&self) -> bool {
        self.config.capabilities.can_create && self.config.form.is_some()
    }

    pub fn create_title(&self) -> String {
        messages::new_record_title(self.config.locale, &self.config.label)
    }

    pub fn is_create_open(&self) -> bool {
        self.create_open
    }

    pub fn open_create(&mut self) -> bool {
        self.create_open = self.can_create();
        self.create_open
    }

    pub fn form(&self) -> Option<&CreateForm<FieldOf<S>>> {
        self.config.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut CreateForm<FieldOf<S>>> {
        self.config.form.as_mut()
    }

    pub fn cancel_create(&mut self) {
        self.create_open = false;
        if let Some(form) = self.config.form.as_mut() {
            form.reset();
        }
    }

    pub async fn submit_create(&mut self) -> SubmitOutcome<Rec<S>> {
        if !self.create_open || self.state == GridState::Submitting {
            return SubmitOutcome::Busy;
        }
        let Some(form) = self.config.form.as_ref() else {
            return SubmitOutcome::Busy;
        };
        let issues = form.validate();
        if !issues.is_empty() {
            return SubmitOutcome::Invalid(issues);
        }
        let draft = match <Rec<S> as GridRecord>::draft(form.values()) {
            Ok(draft) => draft,
            Err(message) => return SubmitOutcome::Failed(DomainError::validation(message)),
        };

        self.state = GridState::Submitting;
        let result = self.service.create(draft).await;
        self.state = GridState::Idle;
        match result {
            Ok(record) => {
                self.notifier
                    .notify(Notification::success(messages::record_created(self.config.locale, &self.config.label)));
                self.cancel_create();
                self.refresh().await;
                SubmitOutcome::Created(record)
            }
            Err(err) => {
                self.notify_error(self.friendly_error(&err, Action::Save, 1), None);
                SubmitOutcome::Failed(err)
            }
        }
    }

    // ---- view & export ----

    pub fn visible_rows(&self, query: &ViewQuery<FieldOf<S>>) -> Vec<&Rec<S>> {
        view::apply(&self.rows, &self.config.columns, query).0
    }

    /// Rows matching the query's filter, ignoring paging
    pub fn matching_count(&self, query: &ViewQuery<FieldOf<S>>) -> usize {
        view::apply(&self.rows, &self.config.columns, query).1
    }

    pub fn page_count(&self, query: &ViewQuery<FieldOf<S>>) -> usize {
        let size = query.page_size.unwrap_or(self.config.page_size).max(1);
        self.matching_count(query).div_ceil(size)
    }

    /// Export file name dated by the UTC day of `now`
    pub fn export_file_name(&self, now: chrono::DateTime<chrono::Utc>) -> String {
        export_file_name(&self.config.label, now.date_naive())
    }

    /// Export filtered and sorted rows (every page) as CSV
    pub fn export_csv<W: std::io::Write>(
        &self,
        writer: W,
        query: &ViewQuery<FieldOf<S>>,
    ) -> Result<usize, GridExportError> {
        let rows = self.visible_rows(&query.unpaged());
        write_csv::<Rec<S>, W>(writer, &self.config.columns, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Company, CompanyField};
    use crate::grid::{FormField, NotificationLevel, NotificationLog};
    use crate::testing::{company, MemoryService};
    use crate::validation::FieldRule;
    use crate::types::FieldKind;

    const EMPRESA: EntityLabel = EntityLabel::new("Empresa", "empresas", true);

    type Grid = RecordGrid<MemoryService<Company>>;

    fn columns() -> Vec<ColumnDef<CompanyField>> {
        vec![
            ColumnDef::new(CompanyField::Id, "ID").checkbox().sortable(),
            ColumnDef::new(CompanyField::Rif, "RIF").editable().sortable(),
            ColumnDef::new(CompanyField::RazonSocial, "Razón Social").editable().filterable(),
        ]
    }

    fn form() -> CreateForm<CompanyField> {
        CreateForm::new(vec![
            FormField::new(CompanyField::Rif, "RIF", FieldKind::Text).rule(FieldRule::required("El RIF es obligatorio")),
            FormField::new(CompanyField::RazonSocial, "Razón Social", FieldKind::Text)
                .rule(FieldRule::required("La razón social es obligatoria")),
        ])
    }

    fn seeded() -> Vec<Company> {
        vec![company(3, "J300000003", "TERCERA"), company(2, "J200000002", "SEGUNDA"), company(1, "J100000001", "PRIMERA")]
    }

    async fn grid_with(
        service: MemoryService<Company>,
        capabilities: Capabilities,
    ) -> (Grid, Arc<MemoryService<Company>>, Arc<NotificationLog>) {
        let service = Arc::new(service);
        let log = Arc::new(NotificationLog::new());
        let config = GridConfig::new("Empresas", EMPRESA).columns(columns()).form(form()).capabilities(capabilities);
        let mut grid = RecordGrid::new(config, service.clone(), log.clone());
        assert!(grid.refresh().await);
        (grid, service, log)
    }

    #[tokio::test]
    async fn bulk_delete_filters_rows_locally() {
        let (mut grid, service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        assert_eq!(MemoryService::<Company>::calls(&service.list_calls), 1);

        grid.select(3);
        grid.select(1);
        let confirmation = grid.request_bulk_delete().unwrap();
        assert!(confirmation.prompt.contains("las 2 empresas seleccionadas"));

        assert_eq!(grid.confirm_bulk_delete(confirmation).await, DeleteOutcome::Deleted(2));
        assert_eq!(grid.rows().iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
        assert!(grid.selected().is_empty());
        assert_eq!(MemoryService::<Company>::calls(&service.list_calls), 1);
        assert_eq!(log.snapshot()[0].message, "2 empresas eliminadas exitosamente");
    }

    #[tokio::test]
    async fn failed_bulk_delete_keeps_rows_and_selection() {
        let (mut grid, service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        service.fail_next_delete(DomainError::new(ErrorKind::ForeignKeyViolation, "fk"));
        grid.select_all();
        let confirmation = grid.request_bulk_delete().unwrap();

        assert!(matches!(grid.confirm_bulk_delete(confirmation).await, DeleteOutcome::Failed(_)));
        assert_eq!(grid.rows().len(), 3);
        assert_eq!(grid.selected().len(), 3);
        let notes = log.snapshot();
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].message, "No se pueden eliminar las empresas porque tienen datos asociados.");
    }

    #[tokio::test]
    async fn failed_update_reloads_exactly_once() {
        let (mut grid, service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        service.fail_next_update(DomainError::new(ErrorKind::DuplicateRecord, "Ya existe un empresa con esos datos únicos."));

        let outcome = grid.edit_cell(&2, CompanyField::Rif, FieldValue::Text("J300000003".into())).await;
        assert!(matches!(outcome, EditOutcome::Reverted(ref e) if e.is(ErrorKind::DuplicateRecord)));
        assert_eq!(MemoryService::<Company>::calls(&service.list_calls), 2);
        assert_eq!(grid.row(&2).unwrap().rif, "J200000002");
        assert_eq!(log.snapshot()[0].key, Some(UPDATE_ERROR_KEY));
    }

    #[tokio::test]
    async fn successful_update_replaces_row_without_reload() {
        let (mut grid, service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;

        let outcome = grid.edit_cell(&1, CompanyField::RazonSocial, FieldValue::Text("Nueva Razón".into())).await;
        assert_eq!(outcome, EditOutcome::Saved);
        assert_eq!(grid.row(&1).unwrap().razon_social, "Nueva Razón");
        assert_eq!(service.stored()[2].razon_social, "Nueva Razón");
        assert_eq!(MemoryService::<Company>::calls(&service.list_calls), 1);
        assert_eq!(log.snapshot()[0].message, "Campo \"Razón Social\" actualizado exitosamente");

        let again = grid.edit_cell(&1, CompanyField::RazonSocial, FieldValue::Text("Nueva Razón".into())).await;
        assert_eq!(again, EditOutcome::Unchanged);
        assert_eq!(MemoryService::<Company>::calls(&service.update_calls), 1);
    }

    #[tokio::test]
    async fn viewer_capabilities_lock_the_grid() {
        let (mut grid, service, _log) = grid_with(MemoryService::new(seeded()), Capabilities::none()).await;
        assert!(!grid.selection_enabled());
        assert!(!grid.select(1));
        assert!(!grid.open_create());
        let outcome = grid.edit_cell(&1, CompanyField::Rif, FieldValue::Text("J999999999".into())).await;
        assert!(matches!(outcome, EditOutcome::Rejected(_)));
        assert_eq!(MemoryService::<Company>::calls(&service.update_calls), 0);
    }

    #[tokio::test]
    async fn invalid_create_is_not_sent_or_notified() {
        let (mut grid, _service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        assert!(grid.open_create());
        let outcome = grid.submit_create().await;
        match outcome {
            SubmitOutcome::Invalid(issues) => assert_eq!(issues.len(), 2),
            other => panic!("expected invalid, got {other:?}"),
        }
        assert!(log.snapshot().is_empty());
        assert!(grid.is_create_open());
    }

    #[tokio::test]
    async fn duplicate_create_keeps_modal_and_values() {
        let (mut grid, service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        service.fail_next_create(DomainError::new(ErrorKind::DuplicateRecord, "Ya existe un empresa con esos datos únicos."));
        grid.open_create();
        let form = grid.form_mut().unwrap();
        form.set_input(CompanyField::Rif, "J100000001").unwrap();
        form.set_input(CompanyField::RazonSocial, "Primera").unwrap();

        assert!(matches!(grid.submit_create().await, SubmitOutcome::Failed(ref e) if e.is(ErrorKind::DuplicateRecord)));
        assert!(grid.is_create_open());
        assert_eq!(grid.state(), GridState::Idle);
        let values = grid.form().unwrap().values();
        assert_eq!(values.get(CompanyField::Rif), &FieldValue::Text("J100000001".into()));
        assert_eq!(log.snapshot()[0].message, "Ya existe un empresa con esos datos únicos.");
    }

    #[tokio::test]
    async fn successful_create_closes_and_reloads() {
        let (mut grid, service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        grid.open_create();
        let form = grid.form_mut().unwrap();
        form.set_input(CompanyField::Rif, "G200000000").unwrap();
        form.set_input(CompanyField::RazonSocial, "Gobernación").unwrap();

        let SubmitOutcome::Created(created) = grid.submit_create().await else {
            panic!("expected created");
        };
        assert_eq!(created.razon_social, "GOBERNACION");
        assert!(!grid.is_create_open());
        assert!(grid.form().unwrap().values().get(CompanyField::Rif).is_empty());
        assert_eq!(grid.rows().len(), 4);
        assert_eq!(MemoryService::<Company>::calls(&service.list_calls), 2);
        assert_eq!(log.snapshot()[0].message, "Empresa creada exitosamente");
    }

    #[tokio::test]
    async fn stale_fetch_results_are_discarded() {
        let (mut grid, _service, _log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        let first = grid.begin_refresh();
        let second = grid.begin_refresh();
        assert!(grid.finish_refresh(second, Ok(vec![company(9, "J900000009", "NUEVA")])));
        assert!(!grid.finish_refresh(first, Ok(vec![])));
        assert_eq!(grid.rows().len(), 1);
        assert_eq!(grid.state(), GridState::Idle);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_rows() {
        let (mut grid, service, log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        service.fail_next_list(DomainError::unknown(""));
        assert!(grid.refresh().await);
        assert_eq!(grid.rows().len(), 3);
        assert_eq!(log.snapshot()[0].message, "Error al cargar empresas");
    }

    #[tokio::test]
    async fn read_only_service_disables_bulk_delete() {
        let (mut grid, _service, _log) =
            grid_with(MemoryService::new(seeded()).read_only(), Capabilities::all()).await;
        grid.select(2);
        assert!(!grid.can_bulk_delete());
        assert!(grid.request_bulk_delete().is_none());
    }

    #[tokio::test]
    async fn export_covers_every_page() {
        let (grid, _service, _log) = grid_with(MemoryService::new(seeded()), Capabilities::all()).await;
        let query = ViewQuery::page(0, 1);
        assert_eq!(grid.visible_rows(&query).len(), 1);
        assert_eq!(grid.page_count(&query), 3);
        let mut out = Vec::new();
        assert_eq!(grid.export_csv(&mut out, &query).unwrap(), 3);
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.starts_with("ID,RIF,Razón Social"));
        let late_evening = chrono::DateTime::parse_from_rfc3339("2024-05-31T21:30:00-04:00").unwrap();
        assert_eq!(grid.export_file_name(late_evening.with_timezone(&chrono::Utc)), "empresas_2024-06-01.csv");
    }
}
