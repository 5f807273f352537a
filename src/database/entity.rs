//! Entity descriptors and the SQL they generate.
//!
//! Every table-backed type implements [`Entity`]: it names its table, maps
//! filterable API fields to columns and hand-writes its `INSERT` and
//! full-replace `UPDATE`. Listing, counting, lookup by id and deletion are
//! derived from that metadata. Sparse updates go through [`PartialUpdate`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::FromRow;

use crate::filter::{FieldMappings, Filter, FilterData, FilterError, SqlResult};
use crate::validation::Validate;

pub trait Entity: DeserializeOwned + Validate + Send + Sync + 'static {
    /// Row shape returned by `SELECT *`
    type Row: for<'r> FromRow<'r, MySqlRow> + Serialize + Send + Unpin;

    /// Human readable name used in messages ("Company not found")
    const LABEL: &'static str;

    fn table_name() -> &'static str;

    fn field_mappings() -> FieldMappings;

    fn insert_query(&self) -> SqlResult;

    /// Sets every column
    fn update_query(&self, id: i64) -> SqlResult;

    fn select_query(filters: &FilterData, skip: i64, limit: i64) -> Result<SqlResult, FilterError> {
        let mut filter = Filter::new(Self::table_name(), Self::field_mappings())?;
        filter.where_fields(filters.clone()).paginate(skip, limit)?;
        filter.to_sql()
    }

    fn count_query(filters: &FilterData) -> Result<SqlResult, FilterError> {
        let mut filter = Filter::new(Self::table_name(), Self::field_mappings())?;
        filter.where_fields(filters.clone());
        filter.to_count_sql()
    }

    fn select_by_id_query(id: i64) -> SqlResult {
        SqlResult::new(format!("SELECT * FROM {} WHERE id = ?", Self::table_name()), vec![Value::from(id)])
    }

    fn delete_query(id: i64) -> SqlResult {
        SqlResult::new(format!("DELETE FROM {} WHERE id = ?", Self::table_name()), vec![Value::from(id)])
    }
}

/// A sparse update body: only the provided fields are written
pub trait PartialUpdate: DeserializeOwned + Validate + Send + Sync + 'static {
    type Target: Entity;

    /// Column/value pairs in SET order; `None` means "leave unchanged"
    fn changes(&self) -> Vec<(&'static str, Option<Value>)>;

    fn update_query(&self, id: i64) -> Result<SqlResult, FilterError> {
        sparse_update(Self::Target::table_name(), id, self.changes())
    }
}

/// `UPDATE t SET a = ?, b = ? WHERE id = ?` over the provided columns only.
/// Fails when nothing is provided.
pub fn sparse_update(
    table: &'static str,
    id: i64,
    changes: Vec<(&'static str, Option<Value>)>,
) -> Result<SqlResult, FilterError> {
    Filter::validate_table_name(table)?;

    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (column, value) in changes {
        if let Some(value) = value {
            assignments.push(format!("{} = ?", column));
            params.push(value);
        }
    }

    if assignments.is_empty() {
        return Err(FilterError::NoFieldsToUpdate);
    }

    params.push(Value::from(id));
    Ok(SqlResult::new(
        format!("UPDATE {} SET {} WHERE id = ?", table, assignments.join(", ")),
        params,
    ))
}

/// Serialize a field into a bound parameter. `None` becomes SQL NULL.
pub fn param<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Wrap an optional field for [`PartialUpdate::changes`]. On a
/// `Option<Option<T>>` field, `Some(None)` comes out as `Some(Value::Null)`.
pub fn opt<T: Serialize>(value: &Option<T>) -> Option<Value> {
    value.as_ref().map(param)
}

/// For nullable columns in update bodies, with `#[serde(default)]`: a missing
/// key stays `None`, an explicit `null` becomes `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
