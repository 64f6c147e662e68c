use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

use crate::messages;
use crate::types::{FieldValue, Locale};
use crate::validation::{is_valid_tax_id, normalize_text};

/// Turns an edited cell value into the value to persist, or rejects it with a message
pub type ValueParser = Arc<dyn Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync>;
/// Renders a cell value for display and export
pub type ValueFormatter = Arc<dyn Fn(&FieldValue) -> String + Send + Sync>;

/// UI affordances granted to the current user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl Capabilities {
    pub const fn all() -> Self {
        Self { can_create: true, can_update: true, can_delete: true }
    }

    pub const fn none() -> Self {
        Self { can_create: false, can_update: false, can_delete: false }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Clone)]
pub struct ColumnDef<F> {
    pub field: F,
    pub header: String,
    pub editable: bool,
    pub sortable: bool,
    pub filterable: bool,
    /// Row-selection checkbox rendered in this column
    pub checkbox: bool,
    pub width: Option<u16>,
    parser: Option<ValueParser>,
    formatter: Option<ValueFormatter>,
}

impl<F: Copy> ColumnDef<F> {
    pub fn new(field: F, header: impl Into<String>) -> Self {
        Self {
            field,
            header: header.into(),
            editable: false,
            sortable: false,
            filterable: false,
            checkbox: false,
            width: None,
            parser: None,
            formatter: None,
        }
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn checkbox(mut self) -> Self {
        self.checkbox = true;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn parser<P>(mut self, parser: P) -> Self
    where
        P: Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn formatter<G>(mut self, formatter: G) -> Self
    where
        G: Fn(&FieldValue) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn parse(&self, value: FieldValue) -> Result<FieldValue, String> {
        match &self.parser {
            Some(parser) => parser(value),
            None => Ok(value),
        }
    }

    pub fn format(&self, value: &FieldValue) -> String {
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => value.to_string(),
        }
    }

    /// Strip affordances the user is not allowed to use
    pub fn masked(mut self, capabilities: Capabilities) -> Self {
        self.editable = self.editable && capabilities.can_update;
        self.checkbox = self.checkbox && (capabilities.can_delete || capabilities.can_update);
        self
    }
}

/// Upper-cases and strips accents from text edits
pub fn normalized_text(value: FieldValue) -> Result<FieldValue, String> {
    Ok(match value {
        FieldValue::Text(s) => FieldValue::Text(normalize_text(s.as_str())),
        other => other,
    })
}

/// Normalizes a tax id edit and rejects it when malformed
pub fn tax_id_parser(locale: Locale) -> impl Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync + 'static {
    move |value| {
        let normalized = normalize_text(value.as_text());
        if is_valid_tax_id(&normalized) {
            Ok(FieldValue::Text(normalized))
        } else {
            Err(messages::invalid_tax_id(locale))
        }
    }
}

/// Rejects price edits below one cent, including a cleared cell
pub fn price_parser(locale: Locale) -> impl Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync + 'static {
    move |value| match value.as_decimal() {
        Some(amount) if amount >= Decimal::new(1, 2) => Ok(FieldValue::Decimal(amount)),
        _ => Err(messages::invalid_price(locale)),
    }
}

pub fn format_date(locale: Locale, value: &FieldValue) -> String {
    let pattern = match locale {
        Locale::Es => "%d/%m/%Y",
        Locale::En => "%m/%d/%Y",
    };
    value.as_date().map(|d| d.format(pattern).to_string()).unwrap_or_default()
}

/// `$ 1,234.50`; empty for missing values
pub fn format_currency(value: &FieldValue) -> String {
    let Some(amount) = value.as_decimal() else {
        return String::new();
    };
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && rounded != Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}$ {grouped}.{cents}")
}
