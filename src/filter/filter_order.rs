use super::error::FilterError;
use super::is_identifier;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `"created_at desc, id"` into ordered columns; direction defaults to ascending
    pub fn validate_and_parse(order: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut infos = Vec::new();
        for part in order.split(',') {
            let mut it = part.split_whitespace();
            let Some(column) = it.next() else { continue };
            if !is_identifier(column) {
                return Err(FilterError::InvalidColumn(format!("Invalid order column: {column}")));
            }
            let sort = match it.next() {
                None => SortDirection::Asc,
                Some(raw) if raw.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                Some(raw) if raw.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(raw) => return Err(FilterError::InvalidColumn(format!("Invalid sort direction: {raw}"))),
            };
            infos.push(FilterOrderInfo { column: column.to_string(), sort });
        }
        Ok(infos)
    }

    /// Render as the `order` query value, e.g. `created_at.desc,id.asc`
    pub fn generate(infos: &[FilterOrderInfo]) -> Option<String> {
        if infos.is_empty() { return None; }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{}.{}", i.column, i.sort.keyword()))
            .collect();
        Some(parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_columns() {
        let infos = FilterOrder::validate_and_parse("created_at desc, id").unwrap();
        assert_eq!(FilterOrder::generate(&infos).as_deref(), Some("created_at.desc,id.asc"));

        let infos = FilterOrder::validate_and_parse("id DESC").unwrap();
        assert_eq!(FilterOrder::generate(&infos).as_deref(), Some("id.desc"));
    }

    #[test]
    fn rejects_non_identifier_columns_and_bad_directions() {
        assert!(FilterOrder::validate_and_parse("id;drop desc").is_err());
        assert!(FilterOrder::validate_and_parse("id sideways").is_err());
    }

    #[test]
    fn empty_order_generates_nothing() {
        assert_eq!(FilterOrder::validate_and_parse(" , ").unwrap().len(), 0);
        assert_eq!(FilterOrder::generate(&[]), None);
    }
}
