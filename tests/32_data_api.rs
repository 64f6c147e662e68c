mod common;

use std::sync::Arc;

use aeg_admin::database::models::{BranchUpdate, CompanyDraft, CompanyField, CompanyUpdate};
use aeg_admin::error::ErrorKind;
use aeg_admin::grid::{Capabilities, DeleteOutcome, EditOutcome, NotificationLevel, NotificationLog};
use aeg_admin::pages;
use aeg_admin::services::{BranchService, CompanyService, RecordService};
use aeg_admin::types::{FieldValue, Locale};
use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn companies_are_listed_newest_first() -> Result<()> {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/empresas")
            .query_param("select", "*")
            .query_param("order", "created_at.desc")
            .header("apikey", common::ANON_KEY);
        then.status(200).json_body(json!([
            common::company_row(2, "J200000002", "SEGUNDA"),
            common::company_row(1, "J100000001", "PRIMERA"),
        ]));
    });

    let service = CompanyService::new(common::client(&server), Locale::Es);
    let rows = service.list().await?;

    assert_eq!(list.calls(), 1);
    assert_eq!(rows.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(rows[0].razon_social, "SEGUNDA");
    Ok(())
}

#[tokio::test]
async fn branches_are_listed_by_id_descending() -> Result<()> {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/sucursales").query_param("order", "id.desc");
        then.status(200).json_body(json!([]));
    });

    let service = BranchService::new(common::client(&server), Locale::Es);
    assert!(service.list().await?.is_empty());
    assert_eq!(list.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_insert_is_classified() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/empresas")
            .header("Prefer", "return=representation")
            .json_body(json!({ "rif": "J123456789", "razon_social": "ACME" }));
        then.status(409)
            .json_body(common::pg_error("23505", "duplicate key value violates unique constraint \"empresas_rif_key\""));
    });

    let service = CompanyService::new(common::client(&server), Locale::Es);
    let draft = CompanyDraft { rif: "J123456789".into(), razon_social: "ACME".into() };
    let err = service.create(draft).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::DuplicateRecord);
    assert_eq!(err.message, "Ya existe un empresa con esos datos únicos.");
    Ok(())
}

#[tokio::test]
async fn update_matching_no_rows_is_reported() -> Result<()> {
    let server = MockServer::start();
    let patch = server.mock(|when, then| {
        when.method(PATCH)
            .path("/rest/v1/empresas")
            .query_param("id", "eq.7")
            .json_body(json!({ "razon_social": "NUEVA" }));
        then.status(200).json_body(json!([]));
    });

    let service = CompanyService::new(common::client(&server), Locale::Es);
    let update = CompanyUpdate { razon_social: Some("NUEVA".into()), ..Default::default() };
    let err = service.update(&7, update).await.unwrap_err();

    assert_eq!(patch.calls(), 1);
    assert_eq!(err.kind, ErrorKind::NoRowsAffected);
    Ok(())
}

#[tokio::test]
async fn permission_denied_update_is_classified() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH).path("/rest/v1/sucursales").query_param("id", "eq.3");
        then.status(403).json_body(common::pg_error("42501", "permission denied for table sucursales"));
    });

    let service = BranchService::new(common::client(&server), Locale::En);
    let update = BranchUpdate { ciudad: Some("MERIDA".into()), ..Default::default() };
    let err = service.update(&3, update).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::PermissionError);
    assert_eq!(err.message, "You lack permission for this action on sucursal.");
    Ok(())
}

#[tokio::test]
async fn bulk_delete_sends_one_in_filter() -> Result<()> {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/rest/v1/empresas").query_param("id", "in.(3,1)");
        then.status(204);
    });

    let service = CompanyService::new(common::client(&server), Locale::Es);
    service.delete_many(&[3, 1]).await?;
    assert_eq!(delete.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn grid_bulk_delete_with_dependents_keeps_rows() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/empresas");
        then.status(200).json_body(json!([
            common::company_row(2, "J200000002", "SEGUNDA"),
            common::company_row(1, "J100000001", "PRIMERA"),
        ]));
    });
    server.mock(|when, then| {
        when.method(DELETE).path("/rest/v1/empresas");
        then.status(409).json_body(common::pg_error(
            "23503",
            "update or delete on table \"empresas\" violates foreign key constraint",
        ));
    });

    let log = Arc::new(NotificationLog::new());
    let service = Arc::new(CompanyService::new(common::client(&server), Locale::Es));
    let mut grid = pages::companies::grid(service, log.clone(), Capabilities::all(), Locale::Es, 15);
    assert!(grid.refresh().await);

    grid.select_all();
    let confirmation = grid.request_bulk_delete().expect("delete allowed");
    let outcome = grid.confirm_bulk_delete(confirmation).await;

    assert!(matches!(outcome, DeleteOutcome::Failed(ref e) if e.kind == ErrorKind::ForeignKeyViolation));
    assert_eq!(grid.rows().len(), 2);
    assert_eq!(grid.selected().len(), 2);
    let errors: Vec<_> = log.take().into_iter().filter(|n| n.level == NotificationLevel::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "No se pueden eliminar las empresas porque tienen datos asociados.");
    Ok(())
}

#[tokio::test]
async fn grid_edit_patches_single_normalized_field() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/empresas");
        then.status(200).json_body(json!([common::company_row(1, "J100000001", "PRIMERA")]));
    });
    let patch = server.mock(|when, then| {
        when.method(PATCH)
            .path("/rest/v1/empresas")
            .query_param("id", "eq.1")
            .json_body(json!({ "razon_social": "INVERSIONES NUNEZ" }));
        then.status(200).json_body(json!([common::company_row(1, "J100000001", "INVERSIONES NUNEZ")]));
    });

    let log = Arc::new(NotificationLog::new());
    let service = Arc::new(CompanyService::new(common::client(&server), Locale::Es));
    let mut grid = pages::companies::grid(service, log.clone(), Capabilities::all(), Locale::Es, 15);
    grid.refresh().await;

    let outcome = grid
        .edit_cell(&1, CompanyField::RazonSocial, FieldValue::Text("inversiones núñez".into()))
        .await;

    assert_eq!(outcome, EditOutcome::Saved);
    assert_eq!(patch.calls(), 1);
    assert_eq!(grid.row(&1).map(|c| c.razon_social.as_str()), Some("INVERSIONES NUNEZ"));
    Ok(())
}
