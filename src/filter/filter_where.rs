use serde_json::Value;

use super::error::FilterError;
use super::types::{FieldMappings, FilterData};

/// Builds `WHERE` conditions from a [`FilterData`]: text values become
/// `column LIKE ?` with a `%value%` parameter, everything else `column = ?`.
pub struct FilterWhere;

impl FilterWhere {
    /// Returns the condition body (without the `WHERE` keyword) and its parameters.
    /// An empty filter set yields an empty string.
    pub fn generate(data: &FilterData, mappings: FieldMappings) -> Result<(String, Vec<Value>), FilterError> {
        let mut conditions = Vec::with_capacity(data.len());
        let mut params = Vec::with_capacity(data.len());

        for (field, value) in data.iter() {
            let column = Self::resolve_column(field, mappings)?;
            match value {
                Value::Null => continue,
                Value::String(s) => {
                    conditions.push(format!("{} LIKE ?", column));
                    params.push(Value::String(format!("%{}%", s)));
                }
                other => {
                    conditions.push(format!("{} = ?", column));
                    params.push(other.clone());
                }
            }
        }

        Ok((conditions.join(" AND "), params))
    }

    fn resolve_column(field: &str, mappings: FieldMappings) -> Result<&'static str, FilterError> {
        if field == "id" {
            return Ok("id");
        }
        mappings
            .iter()
            .find(|(api, _)| *api == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| FilterError::UnknownField(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAPPINGS: FieldMappings = &[("name", "name"), ("is_current", "is_current"), ("project", "project_id")];

    #[test]
    fn strings_use_like_and_others_use_equality() {
        let data = FilterData::new()
            .with("name", Some("rust"))
            .with("is_current", Some(true))
            .with("project", Some(7));
        let (sql, params) = FilterWhere::generate(&data, MAPPINGS).unwrap();
        assert_eq!(sql, "name LIKE ? AND is_current = ? AND project_id = ?");
        assert_eq!(params, vec![json!("%rust%"), json!(true), json!(7)]);
    }

    #[test]
    fn order_follows_insertion() {
        let data = FilterData::new().with("project", Some(1)).with("name", Some("a"));
        let (sql, _) = FilterWhere::generate(&data, MAPPINGS).unwrap();
        assert_eq!(sql, "project_id = ? AND name LIKE ?");
    }

    #[test]
    fn empty_filters_produce_no_condition() {
        let (sql, params) = FilterWhere::generate(&FilterData::new(), MAPPINGS).unwrap();
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn unmapped_fields_are_rejected() {
        let data = FilterData::new().with("name; DROP TABLE x", Some("a"));
        let err = FilterWhere::generate(&data, MAPPINGS).unwrap_err();
        assert!(matches!(err, FilterError::UnknownField(_)));
    }
}
