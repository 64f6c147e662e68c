//! Client-side text normalization and form validation.

pub mod rules;
pub mod tax_id;
pub mod text;

pub use rules::{FieldIssue, FieldRule};
pub use tax_id::is_valid_tax_id;
pub use text::normalize_text;
