use serde_json::Value;

use super::error::FilterError;
use super::is_identifier;
use super::types::{FilterOp, FilterWhereInfo, QueryParams};

pub struct FilterWhere {
    conditions: Vec<FilterWhereInfo>,
}

impl FilterWhere {
    pub fn generate(where_data: &Value) -> Result<QueryParams, FilterError> {
        let mut filter_where = Self { conditions: vec![] };
        filter_where.parse_where_data(where_data)?;
        filter_where.conditions.iter().map(Self::build_param).collect()
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn parse_where_data(&mut self, where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null => Ok(()),
            Value::Object(obj) => {
                for (key, value) in obj {
                    if key.starts_with('$') {
                        return Err(FilterError::UnsupportedOperator(key.clone()));
                    }
                    self.parse_field_condition(key, value)?;
                }
                Ok(())
            }
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn parse_field_condition(&mut self, field: &str, value: &Value) -> Result<(), FilterError> {
        if !is_identifier(field) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {field}")));
        }
        if let Value::Object(obj) = value {
            for (op_key, op_val) in obj {
                let operator = Self::map_operator(op_key)?;
                self.conditions.push(FilterWhereInfo { column: field.to_string(), operator, data: op_val.clone() });
            }
        } else {
            // Implicit equality: { field: value }
            self.conditions.push(FilterWhereInfo { column: field.to_string(), operator: FilterOp::Eq, data: value.clone() });
        }
        Ok(())
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$in" => FilterOp::In,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn build_param(condition: &FilterWhereInfo) -> Result<(String, String), FilterError> {
        let column = condition.column.clone();
        let value = match (condition.operator, &condition.data) {
            (FilterOp::Eq, Value::Null) => "is.null".to_string(),
            (FilterOp::In, Value::Array(values)) => {
                let items: Result<Vec<String>, FilterError> = values.iter().map(Self::list_item).collect();
                format!("in.({})", items?.join(","))
            }
            (FilterOp::In, other) => {
                return Err(FilterError::InvalidOperatorData(format!("$in requires an array, got {other}")));
            }
            (op, data) => format!("{}.{}", op.keyword(), Self::scalar(data)?),
        };
        Ok((column, value))
    }

    fn scalar(value: &Value) -> Result<String, FilterError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok("null".to_string()),
            other => Err(FilterError::InvalidOperatorData(format!("unsupported value: {other}"))),
        }
    }

    /// Items inside `in.(...)` are double-quoted when they contain reserved characters
    fn list_item(value: &Value) -> Result<String, FilterError> {
        let raw = Self::scalar(value)?;
        if raw.chars().any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\') || c.is_whitespace()) {
            Ok(format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\"")))
        } else {
            Ok(raw)
        }
    }
}
