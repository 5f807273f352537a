use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{nullable, opt, param, Entity, PartialUpdate};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, SqlResult};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Technology {
    pub id: i64,
    pub name: String,
    pub abbr: Option<String>,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyCreate {
    pub name: String,
    pub abbr: Option<String>,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnologyUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub abbr: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub logo_path: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TechnologyFilter {
    pub name: Option<String>,
    pub abbr: Option<String>,
}

impl From<TechnologyFilter> for FilterData {
    fn from(f: TechnologyFilter) -> Self {
        FilterData::new().with("name", f.name).with("abbr", f.abbr)
    }
}

impl Validate for TechnologyCreate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .length("name", &self.name, 1, Some(100))
            .optional_length("abbr", self.abbr.as_deref(), 0, Some(20))
            .optional_length("logo_path", self.logo_path.as_deref(), 0, Some(255))
            .finish()
    }
}

impl Validate for TechnologyUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .optional_length("name", self.name.as_deref(), 1, Some(100))
            .optional_length("abbr", self.abbr.as_ref().and_then(Option::as_deref), 0, Some(20))
            .optional_length("logo_path", self.logo_path.as_ref().and_then(Option::as_deref), 0, Some(255))
            .finish()
    }
}

impl Entity for TechnologyCreate {
    type Row = Technology;
    const LABEL: &'static str = "Technology";

    fn table_name() -> &'static str {
        "technologies"
    }

    fn field_mappings() -> FieldMappings {
        &[("name", "name"), ("abbr", "abbr"), ("logo_path", "logo_path")]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO technologies (name, abbr, logo_path) VALUES (?, ?, ?)",
            vec![param(&self.name), param(&self.abbr), param(&self.logo_path)],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE technologies SET name = ?, abbr = ?, logo_path = ? WHERE id = ?",
            vec![param(&self.name), param(&self.abbr), param(&self.logo_path), param(&id)],
        )
    }
}

impl PartialUpdate for TechnologyUpdate {
    type Target = TechnologyCreate;

    fn changes(&self) -> Vec<(&'static str, Option<serde_json::Value>)> {
        vec![
            ("name", opt(&self.name)),
            ("abbr", opt(&self.abbr)),
            ("logo_path", opt(&self.logo_path)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_on_name_and_abbreviation() {
        let filters: FilterData = TechnologyFilter {
            name: Some("Type".to_string()),
            abbr: Some("TS".to_string()),
        }
        .into();
        let sql = TechnologyCreate::count_query(&filters).unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) AS total FROM technologies WHERE name LIKE ? AND abbr LIKE ?");
        assert_eq!(sql.params, vec![json!("%Type%"), json!("%TS%")]);
    }

    #[test]
    fn blank_query_values_do_not_filter() {
        let filters: FilterData = TechnologyFilter {
            name: None,
            abbr: Some(String::new()),
        }
        .into();
        let sql = TechnologyCreate::select_query(&filters, 0, 10).unwrap();
        assert_eq!(sql.query, "SELECT * FROM technologies LIMIT ? OFFSET ?");
        assert_eq!(sql.params, vec![json!(10), json!(0)]);
    }

    #[test]
    fn abbreviation_is_bounded() {
        let tech = TechnologyCreate {
            name: "Kubernetes".to_string(),
            abbr: Some("K".repeat(21)),
            logo_path: None,
        };
        assert!(tech.validate().is_err());
    }
}
