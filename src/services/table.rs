use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt::Display;
use tracing::warn;

use super::RecordService;
use crate::database::{BackendClient, BackendError, Repository};
use crate::error::{classify, DomainError};
use crate::filter::FilterData;
use crate::grid::GridRecord;
use crate::types::Locale;

/// CRUD service over one backend table, with classified errors
#[derive(Debug, Clone)]
pub struct TableService<R> {
    repo: Repository<R>,
    entity: &'static str,
    order: &'static str,
    locale: Locale,
}

impl<R> TableService<R>
where
    R: GridRecord + DeserializeOwned,
{
    /// `entity` is the singular noun used in error messages; `order` is e.g. `"created_at desc"`
    pub fn with_table(
        client: BackendClient,
        table: &'static str,
        entity: &'static str,
        order: &'static str,
        locale: Locale,
    ) -> Self {
        Self { repo: Repository::new(table, client), entity, order, locale }
    }

    pub fn table(&self) -> &str {
        self.repo.table_name()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub(crate) fn classify(&self, err: BackendError) -> DomainError {
        let classified = classify(&err, self.entity, self.locale);
        warn!("{} on {}: {}", classified.kind, self.repo.table_name(), err);
        classified
    }

    pub(crate) async fn delete_by_id<I: Display + ?Sized>(&self, id: &I) -> Result<(), DomainError> {
        self.repo
            .delete_eq("id", json!(id.to_string()))
            .await
            .map_err(|e| self.classify(e))
    }
}

#[async_trait]
impl<R> RecordService for TableService<R>
where
    R: GridRecord + DeserializeOwned,
{
    type Record = R;

    async fn list(&self) -> Result<Vec<R>, DomainError> {
        let filter = FilterData { order: Some(self.order.to_string()), ..Default::default() };
        self.repo.select_any(filter).await.map_err(|e| self.classify(e))
    }

    async fn create(&self, draft: R::Draft) -> Result<R, DomainError> {
        match self.repo.insert_one(&draft).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(DomainError::no_rows_affected(self.locale, self.entity)),
            Err(e) => Err(self.classify(e)),
        }
    }

    fn supports_update(&self) -> bool {
        true
    }

    /// Zero rows back means nothing was updated (missing row or filtered by policy)
    async fn update(&self, id: &R::Id, patch: R::Patch) -> Result<R, DomainError> {
        let rows = self.repo.update_by_id(id, &patch).await.map_err(|e| self.classify(e))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DomainError::no_rows_affected(self.locale, self.entity))
    }

    fn supports_delete(&self) -> bool {
        true
    }

    async fn delete_many(&self, ids: &[R::Id]) -> Result<(), DomainError> {
        self.repo.delete_ids(ids).await.map_err(|e| self.classify(e))
    }
}
