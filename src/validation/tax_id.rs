use once_cell::sync::Lazy;
use regex::Regex;

/// One category letter (V, E, J, P, G) followed by 7 to 9 digits
pub const TAX_ID_PATTERN: &str = r"(?i)^[VEJPG][0-9]{7,9}$";

static TAX_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(TAX_ID_PATTERN).expect("static regex should not panic"));

/// Check a company tax identifier (RIF), case-insensitively.
pub fn is_valid_tax_id(value: &str) -> bool {
    TAX_ID_RE.is_match(value)
}
