// Classified domain errors
use serde::Serialize;
use std::fmt;

use crate::database::BackendError;
use crate::messages;
use crate::types::Locale;

/// Postgres condition codes the backend forwards verbatim
pub const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
pub const PG_UNIQUE_VIOLATION: &str = "23505";
pub const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Closed taxonomy of failures surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ForeignKeyViolation,
    DuplicateRecord,
    PermissionError,
    /// Client-side only; blocks submission and never reaches the backend
    ValidationError,
    /// A write matched no rows (missing row or a policy silently filtered it)
    NoRowsAffected,
    UnknownError,
}

impl ErrorKind {
    /// Get error code for client handling
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ForeignKeyViolation => "FOREIGN_KEY_VIOLATION",
            ErrorKind::DuplicateRecord => "DUPLICATE_RECORD",
            ErrorKind::PermissionError => "PERMISSION_ERROR",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::NoRowsAffected => "NO_ROWS_AFFECTED",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An error tagged with one of the taxonomy kinds, carrying a localized message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DomainError {
    pub kind: ErrorKind,
    pub message: String,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownError, message)
    }

    pub fn no_rows_affected(locale: Locale, entity: &str) -> Self {
        Self::new(ErrorKind::NoRowsAffected, messages::no_rows_affected(locale, entity))
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

/// Map a raw backend failure onto the domain taxonomy.
///
/// `entity` is the lowercase singular noun used in the generated message.
pub fn classify(err: &BackendError, entity: &str, locale: Locale) -> DomainError {
    let code = err.condition_code();
    match code.as_deref() {
        Some(PG_FOREIGN_KEY_VIOLATION) => DomainError::new(
            ErrorKind::ForeignKeyViolation,
            messages::foreign_key_violation(locale, entity),
        ),
        Some(PG_UNIQUE_VIOLATION) => DomainError::new(
            ErrorKind::DuplicateRecord,
            messages::duplicate_record(locale, entity),
        ),
        Some(PG_INSUFFICIENT_PRIVILEGE) => DomainError::new(
            ErrorKind::PermissionError,
            messages::permission_denied(locale, entity),
        ),
        _ => {
            let message = err
                .backend_message()
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| messages::unexpected_error(locale, entity));
            DomainError::new(ErrorKind::UnknownError, message)
        }
    }
}
