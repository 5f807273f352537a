use serde_json::Value;

use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FieldMappings, FilterData, SqlResult};

/// SELECT/COUNT generator for a single table
pub struct Filter {
    table_name: &'static str,
    mappings: FieldMappings,
    where_data: FilterData,
    page: Option<(i64, i64)>,
}

impl Filter {
    pub fn new(table_name: &'static str, mappings: FieldMappings) -> Result<Self, FilterError> {
        Self::validate_table_name(table_name)?;
        Ok(Self {
            table_name,
            mappings,
            where_data: FilterData::default(),
            page: None,
        })
    }

    pub fn where_fields(&mut self, data: FilterData) -> &mut Self {
        self.where_data = data;
        self
    }

    pub fn paginate(&mut self, skip: i64, limit: i64) -> Result<&mut Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        if skip < 0 {
            return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string()));
        }
        self.page = Some((skip, limit));
        Ok(self)
    }

    /// `SELECT * FROM t [WHERE ...] [LIMIT ? OFFSET ?]`
    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, mut params) = FilterWhere::generate(&self.where_data, self.mappings)?;

        let mut query = format!("SELECT * FROM {}", self.table_name);
        if !where_clause.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clause);
        }
        if let Some((skip, limit)) = self.page {
            query.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::from(limit));
            params.push(Value::from(skip));
        }

        Ok(SqlResult { query, params })
    }

    /// `SELECT COUNT(*) AS total FROM t [WHERE ...]`, pagination ignored
    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, self.mappings)?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS total FROM {}", self.table_name)
        } else {
            format!("SELECT COUNT(*) AS total FROM {} WHERE {}", self.table_name, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(FilterError::InvalidTableName(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MAPPINGS: FieldMappings = &[("name", "name"), ("company_id", "company_id")];

    #[test]
    fn select_without_filters_is_paginated() {
        let mut filter = Filter::new("companies", MAPPINGS).unwrap();
        filter.paginate(20, 10).unwrap();
        let sql = filter.to_sql().unwrap();
        assert_eq!(sql.query, "SELECT * FROM companies LIMIT ? OFFSET ?");
        assert_eq!(sql.params, vec![json!(10), json!(20)]);
    }

    #[test]
    fn select_with_filters_binds_where_params_before_pagination() {
        let mut filter = Filter::new("companies", MAPPINGS).unwrap();
        filter
            .where_fields(FilterData::new().with("name", Some("soft")).with("company_id", Some(4)))
            .paginate(0, 5)
            .unwrap();
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM companies WHERE name LIKE ? AND company_id = ? LIMIT ? OFFSET ?"
        );
        assert_eq!(sql.params, vec![json!("%soft%"), json!(4), json!(5), json!(0)]);
    }

    #[test]
    fn count_ignores_pagination() {
        let mut filter = Filter::new("companies", MAPPINGS).unwrap();
        filter
            .where_fields(FilterData::new().with("name", Some("x")))
            .paginate(3, 3)
            .unwrap();
        let sql = filter.to_count_sql().unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) AS total FROM companies WHERE name LIKE ?");
        assert_eq!(sql.params, vec![json!("%x%")]);
    }

    #[test]
    fn rejects_negative_pagination() {
        let mut filter = Filter::new("companies", MAPPINGS).unwrap();
        assert!(matches!(filter.paginate(0, -1), Err(FilterError::InvalidLimit(_))));
        assert!(matches!(filter.paginate(-1, 1), Err(FilterError::InvalidOffset(_))));
    }

    #[test]
    fn validates_table_names() {
        assert!(Filter::validate_table_name("project_tasks").is_ok());
        assert!(Filter::validate_table_name("_t1").is_ok());
        assert!(Filter::validate_table_name("").is_err());
        assert!(Filter::validate_table_name("1abc").is_err());
        assert!(Filter::validate_table_name("users; --").is_err());
    }
}
