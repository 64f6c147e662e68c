use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use super::tax_id::is_valid_tax_id;
use crate::types::FieldValue;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex should not panic"));

#[derive(Debug, Clone)]
enum Check {
    Required,
    TaxId,
    Email,
    MinDecimal(Decimal),
}

/// One validation rule attached to a form field.
///
/// Every rule except `required` passes on an empty value, so optional fields
/// are only checked when the user fills them in.
#[derive(Debug, Clone)]
pub struct FieldRule {
    check: Check,
    message: String,
}

impl FieldRule {
    pub fn required(message: impl Into<String>) -> Self {
        Self { check: Check::Required, message: message.into() }
    }

    pub fn tax_id(message: impl Into<String>) -> Self {
        Self { check: Check::TaxId, message: message.into() }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self { check: Check::Email, message: message.into() }
    }

    pub fn min(min: Decimal, message: impl Into<String>) -> Self {
        Self { check: Check::MinDecimal(min), message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_required(&self) -> bool {
        matches!(self.check, Check::Required)
    }

    pub fn check(&self, value: &FieldValue) -> bool {
        if let Check::Required = self.check {
            return !value.is_empty();
        }
        if value.is_empty() {
            return true;
        }
        match &self.check {
            Check::Required => true,
            Check::TaxId => value.as_text().is_some_and(is_valid_tax_id),
            Check::Email => value.as_text().is_some_and(|s| EMAIL_RE.is_match(s)),
            Check::MinDecimal(min) => value.as_decimal().is_some_and(|d| d >= *min),
        }
    }
}

/// A rule violation rendered inline next to the offending field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue<F> {
    pub field: F,
    pub message: String,
}

/// Run every rule for a field, returning the first failing rule's message.
pub fn first_violation<'r>(rules: &'r [FieldRule], value: &FieldValue) -> Option<&'r str> {
    rules.iter().find(|r| !r.check(value)).map(FieldRule::message)
}
