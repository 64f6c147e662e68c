//! Generic record grid: list, inline edit, create and bulk delete for one entity.

pub mod column;
pub mod controller;
pub mod export;
pub mod form;
pub mod notify;
pub mod record;
pub mod view;

pub use column::{Capabilities, ColumnDef};
pub use controller::{
    DeleteConfirmation, DeleteOutcome, EditOutcome, FetchTicket, GridConfig, GridState, RecordGrid, SubmitOutcome,
};
pub use export::GridExportError;
pub use form::{CreateForm, FormField, FormValues};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use record::GridRecord;
pub use view::ViewQuery;
