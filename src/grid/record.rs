use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use super::form::FormValues;
use crate::types::{FieldKind, FieldValue};

/// A backend row that can be shown and edited in a [`RecordGrid`](super::RecordGrid).
///
/// Fields are addressed through a closed `Field` enum instead of string keys,
/// so column descriptors and patches are checked at compile time.
pub trait GridRecord: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Debug + Display + Serialize + Send + Sync + 'static;
    type Field: Copy + Eq + Hash + Debug + Send + Sync + 'static;
    /// Insert payload built from the create form
    type Draft: Serialize + Send + Sync + 'static;
    /// Partial update payload carrying a single changed field
    type Patch: Serialize + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    fn fields() -> &'static [Self::Field];

    /// Backend column name
    fn field_name(field: Self::Field) -> &'static str;

    fn field_kind(field: Self::Field) -> FieldKind;

    fn get(&self, field: Self::Field) -> FieldValue;

    fn set(&mut self, field: Self::Field, value: FieldValue) -> Result<(), String>;

    fn patch(field: Self::Field, value: &FieldValue) -> Result<Self::Patch, String>;

    fn draft(values: &FormValues<Self::Field>) -> Result<Self::Draft, String>;

    fn field_by_name(name: &str) -> Option<Self::Field> {
        Self::fields().iter().copied().find(|f| Self::field_name(*f) == name)
    }
}
