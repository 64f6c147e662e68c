use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::database::client::{BackendClient, BackendError};
use crate::filter::{Filter, FilterData};

const PREFER_REPRESENTATION: &str = "return=representation";

pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: DeserializeOwned,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, BackendError> {
        Ok(Self {
            filter: Filter::new(table_name)?,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, BackendError> {
        self.filter.assign(filter_data)?;
        Ok(self)
    }

    pub fn table_name(&self) -> &str {
        self.filter.table_name()
    }

    pub async fn select_all(self, client: &BackendClient) -> Result<Vec<T>, BackendError> {
        let url = client.rest_url(self.table_name())?;
        let request = client.request(Method::GET, url).await.query(&self.filter.to_query()?);
        let rows: Vec<T> = client.send_json(request).await?;
        debug!("select {} -> {} rows", self.table_name(), rows.len());
        Ok(rows)
    }

    pub async fn select_optional(mut self, client: &BackendClient) -> Result<Option<T>, BackendError> {
        self.filter.limit(1)?;
        Ok(self.select_all(client).await?.into_iter().next())
    }

    pub async fn insert_returning<B: Serialize + ?Sized>(
        self,
        client: &BackendClient,
        body: &B,
    ) -> Result<Vec<T>, BackendError> {
        let url = client.rest_url(self.table_name())?;
        let request = client
            .request(Method::POST, url)
            .await
            .header("Prefer", PREFER_REPRESENTATION)
            .json(body);
        let rows: Vec<T> = client.send_json(request).await?;
        debug!("insert {} -> {} rows", self.table_name(), rows.len());
        Ok(rows)
    }

    /// PATCH every row matched by the where clause, returning the updated rows
    pub async fn update_returning<B: Serialize + ?Sized>(
        self,
        client: &BackendClient,
        body: &B,
    ) -> Result<Vec<T>, BackendError> {
        let params = self.guarded_where()?;
        let url = client.rest_url(self.table_name())?;
        let request = client
            .request(Method::PATCH, url)
            .await
            .query(&params)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(body);
        let rows: Vec<T> = client.send_json(request).await?;
        debug!("update {} -> {} rows", self.table_name(), rows.len());
        Ok(rows)
    }

    pub async fn delete(self, client: &BackendClient) -> Result<(), BackendError> {
        let params = self.guarded_where()?;
        let url = client.rest_url(self.table_name())?;
        let request = client.request(Method::DELETE, url).await.query(&params);
        client.send(request).await?;
        debug!("delete {} where {:?}", self.table_name(), params);
        Ok(())
    }

    // Writes without a row filter would touch the whole table
    fn guarded_where(&self) -> Result<Vec<(String, String)>, BackendError> {
        let params = self.filter.to_where_query()?;
        if params.is_empty() {
            return Err(BackendError::QueryError(format!(
                "Refusing unfiltered write on {}",
                self.table_name()
            )));
        }
        Ok(params)
    }
}
