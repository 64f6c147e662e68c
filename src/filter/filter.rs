use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::is_identifier;
use super::types::{FilterData, FilterOrderInfo, QueryParams};

pub struct Filter {
    table_name: String,
    where_data: Option<Value>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i32>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        if !is_identifier(&table_name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {table_name}")));
        }
        Ok(Self {
            table_name,
            where_data: None,
            order_data: vec![],
            limit: None,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(&order)?; }
        if let Some(limit) = data.limit { self.limit(limit)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn order(&mut self, order: &str) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(order)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: i32) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidPaging(format!("limit must be non-negative, got {limit}")));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Query-string pairs for a read (`select=*`, filters, `order`, `limit`)
    pub fn to_query(&self) -> Result<QueryParams, FilterError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.to_where_query()?);
        if let Some(order) = FilterOrder::generate(&self.order_data) {
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        Ok(params)
    }

    /// Only the row-matching filters, used by update and delete
    pub fn to_where_query(&self) -> Result<QueryParams, FilterError> {
        match self.where_data {
            Some(ref where_data) => FilterWhere::generate(where_data),
            None => Ok(vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_full_read_query() {
        let mut filter = Filter::new("empresas").unwrap();
        filter
            .assign(FilterData {
                where_clause: Some(json!({ "id": { "$in": [1, 2] } })),
                order: Some("created_at desc".to_string()),
                limit: Some(10),
            })
            .unwrap();
        let params = filter.to_query().unwrap();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "in.(1,2)".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_bad_table_names() {
        assert!(Filter::new("").is_err());
        assert!(Filter::new("1empresas").is_err());
        assert!(Filter::new("empresas;--").is_err());
        assert!(Filter::new("modelos_impresora").is_ok());
    }

    #[test]
    fn negative_limit_is_rejected() {
        let mut filter = Filter::new("sucursales").unwrap();
        assert!(matches!(filter.limit(-1), Err(FilterError::InvalidPaging(_))));
        assert!(filter.limit(5).is_ok());
    }
}
