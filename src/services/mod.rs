pub mod branch;
pub mod company;
pub mod printer_model;
pub mod profile;
pub mod table;

use async_trait::async_trait;

use crate::error::DomainError;
use crate::grid::GridRecord;

pub use branch::BranchService;
pub use company::CompanyService;
pub use printer_model::PrinterModelService;
pub use profile::{ProfileDirectory, ProfileService, ProfileStore};
pub use table::TableService;

type IdOf<S> = <<S as RecordService>::Record as GridRecord>::Id;
type DraftOf<S> = <<S as RecordService>::Record as GridRecord>::Draft;
type PatchOf<S> = <<S as RecordService>::Record as GridRecord>::Patch;

/// Data access injected into a record grid.
///
/// Every error is already classified. `update` and `delete_many` are optional;
/// implementations that provide them must also override the matching
/// `supports_*` method.
#[async_trait]
pub trait RecordService: Send + Sync + 'static {
    type Record: GridRecord;

    async fn list(&self) -> Result<Vec<Self::Record>, DomainError>;

    async fn create(&self, draft: DraftOf<Self>) -> Result<Self::Record, DomainError>;

    fn supports_update(&self) -> bool {
        false
    }

    async fn update(&self, _id: &IdOf<Self>, _patch: PatchOf<Self>) -> Result<Self::Record, DomainError> {
        Err(DomainError::unknown("update is not supported"))
    }

    fn supports_delete(&self) -> bool {
        false
    }

    async fn delete_many(&self, _ids: &[IdOf<Self>]) -> Result<(), DomainError> {
        Err(DomainError::unknown("delete is not supported"))
    }
}
