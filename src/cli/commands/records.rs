use anyhow::{anyhow, bail};
use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::utils::{output_empty_collection, output_notifications, output_success, render_table};
use crate::cli::{AppContext, OutputFormat};
use crate::filter::SortDirection;
use crate::grid::{DeleteOutcome, EditOutcome, GridRecord, RecordGrid, SubmitOutcome, ViewQuery};
use crate::pages::{self, BranchesPage};
use crate::services::{BranchService, CompanyService, PrinterModelService, RecordService};
use crate::shell::Route;
use crate::types::{Action, FieldValue};

#[derive(Subcommand)]
pub enum RecordCommands {
    #[command(about = "List records, newest first")]
    List {
        #[arg(long, help = "Quick filter over the filterable columns")]
        filter: Option<String>,
        #[arg(long, help = "Sort by column (backend column name)")]
        sort: Option<String>,
        #[arg(long, help = "Sort descending")]
        desc: bool,
        #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
        page: usize,
        #[arg(long, help = "Rows per page (defaults to the configured page size)")]
        page_size: Option<usize>,
    },

    #[command(about = "Create a record")]
    Create {
        #[arg(long = "set", value_name = "FIELD=VALUE", help = "Form value, repeatable")]
        values: Vec<String>,
    },

    #[command(about = "Change a single field of one record")]
    Update {
        #[arg(help = "Record id")]
        id: i64,
        #[arg(help = "Field (backend column name)")]
        field: String,
        #[arg(help = "New value; empty clears the field")]
        value: String,
    },

    #[command(about = "Delete the given records")]
    Delete {
        #[arg(required = true, help = "Record ids")]
        ids: Vec<i64>,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Export the filtered rows of every page as CSV")]
    Export {
        #[arg(long, help = "Quick filter over the filterable columns")]
        filter: Option<String>,
        #[arg(long, help = "Output file (defaults to <entity>_<date>.csv)")]
        output: Option<PathBuf>,
    },
}

pub async fn companies(ctx: &AppContext, cmd: RecordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.require(Route::Companies)?;
    let service = Arc::new(CompanyService::new(ctx.client.clone(), ctx.locale()));
    let mut grid = pages::companies::grid(
        service,
        ctx.notifications.clone(),
        ctx.capabilities(),
        ctx.locale(),
        ctx.page_size(),
    );
    grid.refresh().await;
    run(ctx, &mut grid, cmd, &output_format).await
}

pub async fn branches(ctx: &AppContext, cmd: RecordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.require(Route::Branches)?;
    let service = Arc::new(BranchService::new(ctx.client.clone(), ctx.locale()));
    let companies = Arc::new(CompanyService::new(ctx.client.clone(), ctx.locale()));
    let mut page = BranchesPage::new(
        service,
        companies,
        ctx.notifications.clone(),
        ctx.capabilities(),
        ctx.locale(),
        ctx.page_size(),
    );
    page.load().await;
    run(ctx, page.grid_mut(), cmd, &output_format).await
}

pub async fn printer_models(ctx: &AppContext, cmd: RecordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    ctx.require(Route::PrinterModels)?;
    let service = Arc::new(PrinterModelService::new(ctx.client.clone(), ctx.locale()));
    let mut grid = pages::printer_models::grid(
        service,
        ctx.notifications.clone(),
        ctx.capabilities(),
        ctx.locale(),
        ctx.page_size(),
    );
    grid.refresh().await;
    run(ctx, &mut grid, cmd, &output_format).await
}

type FieldOf<S> = <<S as RecordService>::Record as GridRecord>::Field;

fn field_named<S>(name: &str) -> anyhow::Result<FieldOf<S>>
where
    S: RecordService,
{
    <S::Record as GridRecord>::field_by_name(name.trim()).ok_or_else(|| {
        let known: Vec<&str> =
            <S::Record as GridRecord>::fields().iter().map(|f| <S::Record as GridRecord>::field_name(*f)).collect();
        anyhow!("Unknown field '{}'. Known fields: {}", name, known.join(", "))
    })
}

fn query<S>(filter: Option<String>, sort: Option<(FieldOf<S>, SortDirection)>) -> ViewQuery<FieldOf<S>>
where
    S: RecordService,
{
    ViewQuery { filter, sort, ..Default::default() }
}

async fn run<S>(
    ctx: &AppContext,
    grid: &mut RecordGrid<S>,
    cmd: RecordCommands,
    output_format: &OutputFormat,
) -> anyhow::Result<()>
where
    S: RecordService,
    S::Record: GridRecord<Id = i64> + Serialize,
{
    let result = match cmd {
        RecordCommands::List { filter, sort, desc, page, page_size } => {
            let sort = match sort {
                Some(name) => {
                    let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
                    Some((field_named::<S>(&name)?, direction))
                }
                None => None,
            };
            let page_size = page_size.unwrap_or(grid.page_size()).max(1);
            let mut view = query::<S>(filter, sort);
            view.page = page.saturating_sub(1);
            view.page_size = Some(page_size);
            list(grid, &view, output_format)
        }
        RecordCommands::Create { values } => create(grid, values, output_format).await,
        RecordCommands::Update { id, field, value } => update(grid, id, &field, &value, output_format).await,
        RecordCommands::Delete { ids, yes } => delete(grid, ids, yes, output_format).await,
        RecordCommands::Export { filter, output } => export(grid, query::<S>(filter, None), output, output_format),
    };

    output_notifications(output_format, ctx.notifications.take());
    result
}

fn list<S>(grid: &RecordGrid<S>, view: &ViewQuery<FieldOf<S>>, output_format: &OutputFormat) -> anyhow::Result<()>
where
    S: RecordService,
    S::Record: GridRecord<Id = i64> + Serialize,
{
    let rows = grid.visible_rows(view);
    if rows.is_empty() {
        return output_empty_collection(
            output_format,
            grid.label().plural,
            &format!("No {} found", grid.label().plural),
        );
    }

    match output_format {
        OutputFormat::Json => {
            let response = json!({
                grid.label().plural: rows,
                "total": grid.matching_count(view),
                "page": view.page + 1,
                "pages": grid.page_count(view),
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            let headers: Vec<String> = grid.columns().iter().map(|c| c.header.clone()).collect();
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|row| grid.columns().iter().map(|c| c.format(&row.get(c.field))).collect())
                .collect();
            println!("{}", render_table(&headers, &cells));
            println!();
            println!(
                "Página {} de {} ({} registros)",
                view.page + 1,
                grid.page_count(view).max(1),
                grid.matching_count(view)
            );
        }
    }
    Ok(())
}

async fn create<S>(grid: &mut RecordGrid<S>, values: Vec<String>, output_format: &OutputFormat) -> anyhow::Result<()>
where
    S: RecordService,
    S::Record: GridRecord<Id = i64> + Serialize,
{
    if !grid.open_create() {
        bail!("You are not allowed to create {}", grid.label().plural);
    }

    let plural = grid.label().plural;
    for pair in &values {
        let (name, raw) = pair.split_once('=').ok_or_else(|| anyhow!("Expected FIELD=VALUE, got '{}'", pair))?;
        let field = field_named::<S>(name)?;
        let form = grid.form_mut().ok_or_else(|| anyhow!("No create form for {}", plural))?;
        form.set_input(field, raw).map_err(|e| anyhow!("{}: {}", name.trim(), e))?;
    }

    match grid.submit_create().await {
        SubmitOutcome::Created(record) => {
            let message = format!("{} {}", grid.create_title(), record.id());
            output_success(output_format, &message, Some(json!({ "record": record })))
        }
        SubmitOutcome::Invalid(issues) => {
            let fields = grid.form().map(|f| f.fields()).unwrap_or_default();
            let lines: Vec<String> = issues
                .into_iter()
                .map(|issue| {
                    let label = fields
                        .iter()
                        .find(|f| f.field == issue.field)
                        .map(|f| f.label.clone())
                        .unwrap_or_else(|| format!("{:?}", issue.field));
                    format!("{}: {}", label, issue.message)
                })
                .collect();
            bail!("{}", lines.join("\n"))
        }
        SubmitOutcome::Failed(err) => bail!("{}", grid.friendly_error(&err, Action::Save, 1)),
        SubmitOutcome::Busy => bail!("Another submission is in progress"),
    }
}

async fn update<S>(
    grid: &mut RecordGrid<S>,
    id: i64,
    name: &str,
    raw: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<()>
where
    S: RecordService,
    S::Record: GridRecord<Id = i64> + Serialize,
{
    let field = field_named::<S>(name)?;
    if grid.row(&id).is_none() {
        bail!("No {} with id {}", grid.label().lowercase(), id);
    }
    let kind = <S::Record as GridRecord>::field_kind(field);
    let value = FieldValue::parse(kind, raw).map_err(|e| anyhow!("{}: {}", name, e))?;

    match grid.edit_cell(&id, field, value).await {
        EditOutcome::Saved => {
            let record = grid.row(&id).cloned();
            output_success(output_format, &format!("Updated {} {}", grid.label().lowercase(), id), Some(json!({ "record": record })))
        }
        EditOutcome::Unchanged => output_success(output_format, "Nothing to change", None),
        EditOutcome::Rejected(message) => bail!("{}", message),
        EditOutcome::Reverted(err) => bail!("{}", grid.friendly_error(&err, Action::Update, 1)),
    }
}

async fn delete<S>(grid: &mut RecordGrid<S>, ids: Vec<i64>, yes: bool, output_format: &OutputFormat) -> anyhow::Result<()>
where
    S: RecordService,
    S::Record: GridRecord<Id = i64> + Serialize,
{
    for id in &ids {
        if grid.row(id).is_none() {
            bail!("No {} with id {}", grid.label().lowercase(), id);
        }
        grid.select(*id);
    }

    let Some(confirmation) = grid.request_bulk_delete() else {
        bail!("You are not allowed to delete {}", grid.label().plural);
    };
    if !yes {
        bail!("{}\nRe-run with --yes to confirm.", confirmation.prompt);
    }

    match grid.confirm_bulk_delete(confirmation).await {
        DeleteOutcome::Deleted(count) => {
            output_success(output_format, &format!("Deleted {} {}", count, grid.label().plural), Some(json!({ "deleted": ids })))
        }
        DeleteOutcome::Failed(err) => bail!("{}", grid.friendly_error(&err, Action::Delete, ids.len())),
        DeleteOutcome::Nothing => output_success(output_format, "Nothing to delete", None),
    }
}

fn export<S>(
    grid: &RecordGrid<S>,
    view: ViewQuery<FieldOf<S>>,
    output: Option<PathBuf>,
    output_format: &OutputFormat,
) -> anyhow::Result<()>
where
    S: RecordService,
    S::Record: GridRecord<Id = i64> + Serialize,
{
    let path = output.unwrap_or_else(|| PathBuf::from(grid.export_file_name(chrono::Utc::now())));
    let file = std::fs::File::create(&path)?;
    let count = grid.export_csv(file, &view)?;
    output_success(
        output_format,
        &format!("Exported {} {} to {}", count, grid.label().plural, path.display()),
        Some(json!({ "path": path, "rows": count })),
    )
}
