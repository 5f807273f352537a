use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{opt, param, Entity, PartialUpdate};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, SqlResult};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Responsibility {
    pub id: i64,
    pub experience_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsibilityCreate {
    pub experience_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponsibilityUpdate {
    pub experience_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsibilityFilter {
    pub experience_id: Option<i64>,
}

impl From<ResponsibilityFilter> for FilterData {
    fn from(f: ResponsibilityFilter) -> Self {
        FilterData::new().with("experience_id", f.experience_id)
    }
}

impl Validate for ResponsibilityCreate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .positive("experience_id", self.experience_id)
            .length("description", &self.description, 1, None)
            .finish()
    }
}

impl Validate for ResponsibilityUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(experience_id) = self.experience_id {
            errors.positive("experience_id", experience_id);
        }
        errors.optional_length("description", self.description.as_deref(), 1, None).finish()
    }
}

impl Entity for ResponsibilityCreate {
    type Row = Responsibility;
    const LABEL: &'static str = "Responsibility";

    fn table_name() -> &'static str {
        "responsibilities"
    }

    fn field_mappings() -> FieldMappings {
        &[("experience_id", "experience_id"), ("description", "description")]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO responsibilities (experience_id, description) VALUES (?, ?)",
            vec![param(&self.experience_id), param(&self.description)],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE responsibilities SET experience_id = ?, description = ? WHERE id = ?",
            vec![param(&self.experience_id), param(&self.description), param(&id)],
        )
    }
}

impl PartialUpdate for ResponsibilityUpdate {
    type Target = ResponsibilityCreate;

    fn changes(&self) -> Vec<(&'static str, Option<serde_json::Value>)> {
        vec![
            ("experience_id", opt(&self.experience_id)),
            ("description", opt(&self.description)),
        ]
    }
}
