use super::TableService;
use crate::database::models::Company;
use crate::database::BackendClient;
use crate::error::DomainError;
use crate::types::Locale;

pub const COMPANY_TABLE: &str = "empresas";

pub type CompanyService = TableService<Company>;

impl TableService<Company> {
    pub fn new(client: BackendClient, locale: Locale) -> Self {
        Self::with_table(client, COMPANY_TABLE, "empresa", "created_at desc", locale)
    }

    pub async fn delete_one(&self, id: i64) -> Result<(), DomainError> {
        self.delete_by_id(&id).await
    }
}
