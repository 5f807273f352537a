use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::entity::{nullable, opt, param, Entity, PartialUpdate};
use crate::error::ApiError;
use crate::filter::{FieldMappings, FilterData, SqlResult};
use crate::validation::{FieldErrors, Validate};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectTask {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTaskCreate {
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectTaskUpdate {
    pub project_id: Option<i64>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectTaskFilter {
    pub project_id: Option<i64>,
    pub name: Option<String>,
}

impl From<ProjectTaskFilter> for FilterData {
    fn from(f: ProjectTaskFilter) -> Self {
        FilterData::new().with("project_id", f.project_id).with("name", f.name)
    }
}

impl Validate for ProjectTaskCreate {
    fn validate(&self) -> Result<(), ApiError> {
        FieldErrors::new()
            .positive("project_id", self.project_id)
            .length("name", &self.name, 1, Some(200))
            .finish()
    }
}

impl Validate for ProjectTaskUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(project_id) = self.project_id {
            errors.positive("project_id", project_id);
        }
        errors.optional_length("name", self.name.as_deref(), 1, Some(200)).finish()
    }
}

impl Entity for ProjectTaskCreate {
    type Row = ProjectTask;
    const LABEL: &'static str = "Project task";

    fn table_name() -> &'static str {
        "project_tasks"
    }

    fn field_mappings() -> FieldMappings {
        &[("project_id", "project_id"), ("name", "name"), ("description", "description")]
    }

    fn insert_query(&self) -> SqlResult {
        SqlResult::new(
            "INSERT INTO project_tasks (project_id, name, description) VALUES (?, ?, ?)",
            vec![param(&self.project_id), param(&self.name), param(&self.description)],
        )
    }

    fn update_query(&self, id: i64) -> SqlResult {
        SqlResult::new(
            "UPDATE project_tasks SET project_id = ?, name = ?, description = ? WHERE id = ?",
            vec![param(&self.project_id), param(&self.name), param(&self.description), param(&id)],
        )
    }
}

impl PartialUpdate for ProjectTaskUpdate {
    type Target = ProjectTaskCreate;

    fn changes(&self) -> Vec<(&'static str, Option<serde_json::Value>)> {
        vec![
            ("project_id", opt(&self.project_id)),
            ("name", opt(&self.name)),
            ("description", opt(&self.description)),
        ]
    }
}
