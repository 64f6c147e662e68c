use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;

use crate::database::client::{BackendClient, BackendError};
use crate::database::query_builder::QueryBuilder;
use crate::filter::FilterData;

/// Table-scoped CRUD over the data API
#[derive(Debug, Clone)]
pub struct Repository<T> {
    table_name: String,
    client: BackendClient,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: DeserializeOwned + Send,
{
    pub fn new(table_name: impl Into<String>, client: BackendClient) -> Self {
        Self {
            table_name: table_name.into(),
            client,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, BackendError> {
        QueryBuilder::<T>::new(&self.table_name)?
            .filter(filter_data)?
            .select_all(&self.client)
            .await
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, BackendError> {
        QueryBuilder::<T>::new(&self.table_name)?
            .filter(filter_data)?
            .select_optional(&self.client)
            .await
    }

    /// Insert one row; `None` when the backend returned no representation
    pub async fn insert_one<B: Serialize + ?Sized>(&self, body: &B) -> Result<Option<T>, BackendError> {
        Ok(QueryBuilder::<T>::new(&self.table_name)?
            .insert_returning(&self.client, body)
            .await?
            .into_iter()
            .next())
    }

    /// Update the row with the given id; an empty result means no row was touched
    pub async fn update_by_id<I, B>(&self, id: &I, body: &B) -> Result<Vec<T>, BackendError>
    where
        I: Display + ?Sized,
        B: Serialize + ?Sized,
    {
        let filter = FilterData {
            where_clause: Some(json!({ "id": id.to_string() })),
            ..Default::default()
        };
        QueryBuilder::<T>::new(&self.table_name)?
            .filter(filter)?
            .update_returning(&self.client, body)
            .await
    }

    pub async fn delete_ids<I: Serialize>(&self, ids: &[I]) -> Result<(), BackendError> {
        if ids.is_empty() {
            return Ok(());
        }
        let filter = FilterData {
            where_clause: Some(json!({ "id": { "$in": ids } })),
            ..Default::default()
        };
        QueryBuilder::<T>::new(&self.table_name)?
            .filter(filter)?
            .delete(&self.client)
            .await
    }

    pub async fn delete_eq(&self, column: &str, value: Value) -> Result<(), BackendError> {
        let filter = FilterData {
            where_clause: Some(json!({ column: value })),
            ..Default::default()
        };
        QueryBuilder::<T>::new(&self.table_name)?
            .filter(filter)?
            .delete(&self.client)
            .await
    }
}
