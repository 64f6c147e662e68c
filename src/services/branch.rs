use super::TableService;
use crate::database::models::Branch;
use crate::database::BackendClient;
use crate::error::DomainError;
use crate::types::Locale;

pub const BRANCH_TABLE: &str = "sucursales";

pub type BranchService = TableService<Branch>;

impl TableService<Branch> {
    /// Branches are listed newest id first
    pub fn new(client: BackendClient, locale: Locale) -> Self {
        Self::with_table(client, BRANCH_TABLE, "sucursal", "id desc", locale)
    }

    pub async fn delete_one(&self, id: i64) -> Result<(), DomainError> {
        self.delete_by_id(&id).await
    }
}
