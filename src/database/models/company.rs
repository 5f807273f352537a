use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{nullable, opt, param, Entity, PartialUpdate};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, SqlResult};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
    pub logo_path: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub logo_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompanyFilter {
    pub name: Option<String>,
}

impl From<CompanyFilter> for FilterData {
    fn from(f: CompanyFilter) -> Self {
        FilterData::new().with("name", f.name)
    }
}

impl Validate for CompanyCreate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("name", &self.name, 1, Some(150))
            .optional_length("logo_path", self.logo_path.as_deref(), 0, Some(255))
            .optional_length("website", self.website.as_deref(), 0, Some(255))
            .optional_length("location", self.location.as_deref(), 0, Some(150))
            .finish()
    }
}

impl Validate for CompanyUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .optional_length("name", self.name.as_deref(), 1, Some(150))
            .optional_length("logo_path", self.logo_path.as_ref().and_then(Option::as_deref), 0, Some(255))
            .optional_length("website", self.website.as_ref().and_then(Option::as_deref), 0, Some(255))
            .optional_length("location", self.location.as_ref().and_then(Option::as_deref), 0, Some(150))
            .finish()
    }
}

impl Entity for CompanyCreate {
    type Row = Company;
    const LABEL: &'static str = "Company";

    fn table_name() -> &'static str {
        "companies"
    }

    fn field_mappings() -> FieldMappings {
        &[("name", "name"), ("logo_path", "logo_path"), ("website", "website"), ("location", "location")]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO companies (name, logo_path, website, location) VALUES (?, ?, ?, ?)",
            vec![param(&self.name), param(&self.logo_path), param(&self.website), param(&self.location)],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE companies SET name = ?, logo_path = ?, website = ?, location = ? WHERE id = ?",
            vec![
                param(&self.name),
                param(&self.logo_path),
                param(&self.website),
                param(&self.location),
                param(&id),
            ],
        )
    }
}

impl PartialUpdate for CompanyUpdate {
    type Target = CompanyCreate;

    fn changes(&self) -> Vec<(&'static str, Option<serde_json::Value>)> {
        vec![
            ("name", opt(&self.name)),
            ("logo_path", opt(&self.logo_path)),
            ("website", opt(&self.website)),
            ("location", opt(&self.location)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn acme() -> CompanyCreate {
        CompanyCreate {
            name: "Acme".to_string(),
            logo_path: None,
            website: Some("https://acme.test".to_string()),
            location: Some("Madrid".to_string()),
        }
    }

    #[test]
    fn insert_binds_every_column() {
        let sql = acme().insert_query();
        assert_eq!(sql.params, vec![json!("Acme"), json!(null), json!("https://acme.test"), json!("Madrid")]);
    }

    #[test]
    fn full_update_sets_every_column_and_binds_id_last() {
        let sql = acme().update_query(12);
        assert!(sql.query.ends_with("WHERE id = ?"));
        assert_eq!(sql.params.len(), 5);
        assert_eq!(sql.params[4], json!(12));
    }

    #[test]
    fn list_filters_by_partial_name() {
        let filters: FilterData = CompanyFilter { name: Some("cme".to_string()) }.into();
        let sql = CompanyCreate::select_query(&filters, 0, 10).unwrap();
        assert_eq!(sql.query, "SELECT * FROM companies WHERE name LIKE ? LIMIT ? OFFSET ?");
        assert_eq!(sql.params, vec![json!("%cme%"), json!(10), json!(0)]);
    }

    #[test]
    fn partial_update_requires_a_field() {
        assert!(CompanyUpdate::default().update_query(1).is_err());
        let update = CompanyUpdate { location: Some(Some("Lisbon".to_string())), ..Default::default() };
        let sql = update.update_query(1).unwrap();
        assert_eq!(sql.query, "UPDATE companies SET location = ? WHERE id = ?");
    }

    #[test]
    fn validation_rejects_empty_name() {
        let mut company = acme();
        company.name.clear();
        assert!(company.validate().is_err());
        assert!(acme().validate().is_ok());
    }
}
