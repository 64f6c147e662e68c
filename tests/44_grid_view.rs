mod common;

use std::sync::Arc;

use aeg_admin::database::models::{CompanyField, PrinterModelField};
use aeg_admin::filter::SortDirection;
use aeg_admin::grid::{Capabilities, NotificationLog, ViewQuery};
use aeg_admin::pages;
use aeg_admin::services::{CompanyService, PrinterModelService};
use aeg_admin::types::Locale;
use anyhow::Result;
use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use serde_json::json;

fn mock_companies(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/empresas");
        then.status(200).json_body(json!([
            common::company_row(3, "J300000003", "TERCERA ALFA"),
            common::company_row(2, "J200000002", "SEGUNDA"),
            common::company_row(1, "G100000001", "ALFA PRIMERA"),
        ]));
    });
}

#[tokio::test]
async fn quick_filter_sort_and_paging_work_on_the_loaded_set() -> Result<()> {
    let server = MockServer::start();
    mock_companies(&server);
    let service = Arc::new(CompanyService::new(common::client(&server), Locale::Es));
    let mut grid = pages::companies::grid(service, Arc::new(NotificationLog::new()), Capabilities::all(), Locale::Es, 2);
    grid.refresh().await;

    let filtered = ViewQuery { filter: Some("alfa".into()), ..Default::default() };
    assert_eq!(grid.matching_count(&filtered), 2);

    let sorted = ViewQuery {
        filter: Some("ALFA".into()),
        sort: Some((CompanyField::RazonSocial, SortDirection::Asc)),
        ..Default::default()
    };
    let ids: Vec<i64> = grid.visible_rows(&sorted).iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3]);

    let second_page = ViewQuery::page(1, 2);
    assert_eq!(grid.page_count(&second_page), 2);
    let ids: Vec<i64> = grid.visible_rows(&second_page).iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1]);
    Ok(())
}

#[tokio::test]
async fn export_writes_every_matching_row_with_formatted_cells() -> Result<()> {
    let server = MockServer::start();
    mock_companies(&server);
    let service = Arc::new(CompanyService::new(common::client(&server), Locale::Es));
    let mut grid = pages::companies::grid(service, Arc::new(NotificationLog::new()), Capabilities::all(), Locale::Es, 1);
    grid.refresh().await;

    let dir = tempfile::tempdir()?;
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 1, 30, 0).single().expect("valid timestamp");
    let path = dir.path().join(grid.export_file_name(now));
    let query = ViewQuery { filter: Some("alfa".into()), page: 0, page_size: Some(1), sort: None };

    let written = grid.export_csv(std::fs::File::create(&path)?, &query)?;
    let content = std::fs::read_to_string(&path)?;

    assert_eq!(written, 2);
    assert!(path.ends_with("empresas_2024-06-01.csv"));
    assert_eq!(
        content,
        "ID,RIF,Razón Social,Fecha de Creación\n\
         3,J300000003,TERCERA ALFA,03/01/2024\n\
         1,G100000001,ALFA PRIMERA,01/01/2024\n"
    );
    Ok(())
}

#[tokio::test]
async fn printer_model_prices_render_as_currency() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/modelos_impresora").query_param("order", "created_at.desc");
        then.status(200).json_body(json!([{
            "id": 4,
            "marca": "BIXOLON",
            "codigo_modelo": "SRP-812",
            "precio": "1250.5",
            "providencia": "SNAT/2023/0042",
            "fecha_homologacion": "2023-05-17",
            "created_at": "2024-02-01T09:30:00Z"
        }]));
    });

    let service = Arc::new(PrinterModelService::new(common::client(&server), Locale::Es));
    let mut grid =
        pages::printer_models::grid(service, Arc::new(NotificationLog::new()), Capabilities::all(), Locale::Es, 15);
    grid.refresh().await;

    let row = grid.row(&4).expect("model loaded");
    let cell = |field: PrinterModelField| {
        let column = grid.columns().iter().find(|c| c.field == field).expect("column");
        column.format(&aeg_admin::grid::GridRecord::get(row, field))
    };
    assert_eq!(cell(PrinterModelField::Price), "$ 1,250.50");
    assert_eq!(cell(PrinterModelField::ApprovalDate), "17/05/2023");
    Ok(())
}
