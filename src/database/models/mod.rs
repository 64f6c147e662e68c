pub mod branch;
pub mod company;
pub mod printer_model;
pub mod profile;

pub use branch::{Branch, BranchDraft, BranchField, BranchUpdate};
pub use company::{Company, CompanyDraft, CompanyField, CompanyUpdate};
pub use printer_model::{PrinterModel, PrinterModelDraft, PrinterModelField, PrinterModelUpdate};
pub use profile::{Profile, ProfileUpdate};
