/// Shared types used across the codebase

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for every user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "es_es" | "es-es" | "es_ve" | "es-ve" => Ok(Locale::Es),
            "en" | "en_us" | "en-us" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// What the user was trying to do when an operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Load,
    Save,
    Update,
    Delete,
}

/// Role stored on the user profile. Not client-mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

/// Display labels for an entity, used to build generated messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLabel {
    /// Capitalized singular, e.g. "Empresa"
    pub singular: &'static str,
    /// Lowercase plural, e.g. "empresas"
    pub plural: &'static str,
    /// Grammatical gender for Spanish agreement ("creada" vs "creado")
    pub feminine: bool,
}

impl EntityLabel {
    pub const fn new(singular: &'static str, plural: &'static str, feminine: bool) -> Self {
        Self { singular, plural, feminine }
    }

    pub fn lowercase(&self) -> String {
        self.singular.to_lowercase()
    }
}

/// Storage type of a record field, used to parse raw user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Bool,
    Date,
    Timestamp,
}

/// A single cell value, independent of the record it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Parse raw text typed by a user into a value of the given kind.
    /// Blank input is `Null` for every kind.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(FieldValue::Null);
        }
        match kind {
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Integer => raw
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| format!("not an integer: {raw}")),
            FieldKind::Decimal => Decimal::from_str(raw)
                .map(FieldValue::Decimal)
                .map_err(|_| format!("not a decimal number: {raw}")),
            FieldKind::Bool => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "si" | "sí" | "s" => Ok(FieldValue::Bool(true)),
                "false" | "0" | "no" | "n" => Ok(FieldValue::Bool(false)),
                _ => Err(format!("not a boolean: {raw}")),
            },
            FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| format!("not a date (YYYY-MM-DD): {raw}")),
            FieldKind::Timestamp => DateTime::parse_from_rfc3339(raw)
                .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc)))
                .map_err(|_| format!("not an RFC 3339 timestamp: {raw}")),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Decimal(d) => Some(*d),
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Timestamp(ts) => Some(ts.date_naive()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map(FieldValue::Text).unwrap_or(FieldValue::Null)
    }
}

impl From<Option<NaiveDate>> for FieldValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map(FieldValue::Date).unwrap_or(FieldValue::Null)
    }
}
