#![allow(dead_code)]

use std::sync::Arc;

use aeg_admin::cli::AppContext;
use aeg_admin::config::AppConfig;
use aeg_admin::database::BackendClient;
use aeg_admin::local_storage::MemoryStorage;
use chrono::Utc;
use httpmock::prelude::*;
use serde_json::{json, Value};

pub const ANON_KEY: &str = "anon-key";
pub const USER_ID: &str = "4b8f6d1e-2c55-4e7a-9c1a-0d6b7f3e9a10";

pub fn config(server: &MockServer) -> AppConfig {
    AppConfig::for_backend(server.base_url(), ANON_KEY)
}

pub fn client(server: &MockServer) -> BackendClient {
    BackendClient::new(&config(server).backend).expect("backend client")
}

/// Fully wired context over in-memory storage
pub fn context(server: &MockServer) -> (AppContext, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let ctx = AppContext::with(config(server), storage.clone()).expect("app context");
    (ctx, storage)
}

pub fn token_body(access: &str) -> Value {
    json!({
        "access_token": access,
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": Utc::now().timestamp() + 3600,
        "refresh_token": "refresh-1",
        "user": { "id": USER_ID, "email": "ana@example.com", "aud": "authenticated" }
    })
}

pub fn profile_row(role: &str) -> Value {
    json!({
        "id": USER_ID,
        "nombre": "Ana Pérez",
        "foto_perfil": null,
        "rol": role,
        "created_at": "2024-01-01T12:00:00Z"
    })
}

pub fn company_row(id: i64, rif: &str, razon_social: &str) -> Value {
    json!({
        "id": id,
        "rif": rif,
        "razon_social": razon_social,
        "created_at": format!("2024-01-{:02}T12:00:00Z", id)
    })
}

/// PostgREST-style error payload
pub fn pg_error(code: &str, message: &str) -> Value {
    json!({ "code": code, "message": message, "details": null, "hint": null })
}

/// Mock the password grant and the profile lookup that follows it
pub fn mock_sign_in<'a>(server: &'a MockServer, role: &str) -> (httpmock::Mock<'a>, httpmock::Mock<'a>) {
    let token = server.mock(|when, then| {
        when.method(POST).path("/auth/v1/token").query_param("grant_type", "password");
        then.status(200).json_body(token_body("access-1"));
    });
    let profile = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/usuarios").query_param("id", format!("eq.{USER_ID}"));
        then.status(200).json_body(json!([profile_row(role)]));
    });
    (token, profile)
}
